//! Parse contexts.
//!
//! [`CommandContextBuilder`] is the mutable accumulator the dispatcher fills
//! in while walking the tree. Each redirect hop starts a nested child
//! builder, so one input line yields a chain of builders. [`build`] turns the
//! chain into immutable [`CommandContext`]s, which are what commands,
//! redirect modifiers and suggestion providers see.
//!
//! [`build`]: CommandContextBuilder::build

use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

use cmdtree_diagnostics::CommandSyntaxError;
use indexmap::IndexMap;

use crate::command::{Command, RedirectModifier, same_command};
use crate::range::StringRange;
use crate::tree::{CommandNode, NodeId};

// ── Argument values ─────────────────────────────────────────────────────────

/// A type-erased parsed argument value.
///
/// Values are recovered with a checked downcast; equality holds only
/// between values of the same concrete type.
#[derive(Clone)]
pub struct ArgumentValue {
    value: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
    eq: fn(&dyn Any, &dyn Any) -> bool,
    debug: fn(&dyn Any, &mut fmt::Formatter<'_>) -> fmt::Result,
}

impl ArgumentValue {
    /// Erase `value`.
    pub fn new<T>(value: T) -> Self
    where
        T: PartialEq + fmt::Debug + Send + Sync + 'static,
    {
        Self {
            value: Arc::new(value),
            type_name: type_name::<T>(),
            eq: eq_as::<T>,
            debug: debug_as::<T>,
        }
    }

    /// Borrow the value as `T`, if that is its type.
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// Name of the concrete type.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

fn eq_as<T: PartialEq + 'static>(a: &dyn Any, b: &dyn Any) -> bool {
    match (a.downcast_ref::<T>(), b.downcast_ref::<T>()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

fn debug_as<T: fmt::Debug + 'static>(value: &dyn Any, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match value.downcast_ref::<T>() {
        Some(value) => fmt::Debug::fmt(value, f),
        None => f.write_str("<?>"),
    }
}

impl PartialEq for ArgumentValue {
    fn eq(&self, other: &Self) -> bool {
        (self.eq)(&*self.value, &*other.value)
    }
}

impl fmt::Debug for ArgumentValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (self.debug)(&*self.value, f)
    }
}

/// A value together with the input it was parsed from.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedArgument {
    range: StringRange,
    value: ArgumentValue,
}

impl ParsedArgument {
    /// Record `value` as parsed from `start..end`. An `end` before `start`
    /// is clamped to an empty range at `start`.
    pub fn new(start: usize, end: usize, value: ArgumentValue) -> Self {
        Self {
            range: StringRange::between(start, end.max(start)),
            value,
        }
    }

    /// Where the value came from.
    pub fn range(&self) -> StringRange {
        self.range
    }

    /// The parsed value.
    pub fn value(&self) -> &ArgumentValue {
        &self.value
    }
}

/// Failure to fetch an argument from a context.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ArgumentError {
    /// No argument with that name was parsed.
    #[error("no such argument '{name}' exists on this command")]
    Missing {
        /// Requested argument name.
        name: String,
    },
    /// The argument exists but holds a different type.
    #[error("argument '{name}' is defined as {actual}, not {requested}")]
    WrongType {
        /// Requested argument name.
        name: String,
        /// Type actually stored.
        actual: &'static str,
        /// Type the caller asked for.
        requested: &'static str,
    },
}

/// Lets commands use `?` on argument lookups.
impl From<ArgumentError> for CommandSyntaxError {
    fn from(err: ArgumentError) -> Self {
        CommandSyntaxError::custom(err.to_string())
    }
}

/// A node matched during parsing and the input it consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedNode {
    /// The matched node.
    pub node: NodeId,
    /// The input it consumed.
    pub range: StringRange,
}

/// Where completion should look for candidates: the children of `parent`,
/// completing the token that starts at `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuggestionContext {
    /// Node whose children are the candidates.
    pub parent: NodeId,
    /// Offset of the token being completed.
    pub start: usize,
}

// ── Builder ─────────────────────────────────────────────────────────────────

/// Mutable parse state for one redirect hop.
pub struct CommandContextBuilder<S> {
    source: S,
    root: NodeId,
    arguments: IndexMap<String, ParsedArgument>,
    nodes: Vec<ParsedNode>,
    command: Option<Command<S>>,
    child: Option<Box<CommandContextBuilder<S>>>,
    range: StringRange,
    modifier: Option<RedirectModifier<S>>,
    forks: bool,
}

impl<S> CommandContextBuilder<S> {
    /// Start parsing at `root`, with input position `start`.
    pub fn new(source: S, root: NodeId, start: usize) -> Self {
        Self {
            source,
            root,
            arguments: IndexMap::new(),
            nodes: Vec::new(),
            command: None,
            child: None,
            range: StringRange::at(start),
            modifier: None,
            forks: false,
        }
    }

    /// Replace the source.
    pub fn with_source(&mut self, source: S) -> &mut Self {
        self.source = source;
        self
    }

    /// The source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// The node this hop started from.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Record a parsed argument.
    pub fn with_argument(
        &mut self,
        name: impl Into<String>,
        argument: ParsedArgument,
    ) -> &mut Self {
        self.arguments.insert(name.into(), argument);
        self
    }

    /// Arguments parsed so far.
    pub fn arguments(&self) -> &IndexMap<String, ParsedArgument> {
        &self.arguments
    }

    /// Set (or clear) the command to run.
    pub fn with_command(&mut self, command: Option<Command<S>>) -> &mut Self {
        self.command = command;
        self
    }

    /// The command to run, if the last matched node has one.
    pub fn command(&self) -> Option<&Command<S>> {
        self.command.as_ref()
    }

    /// Record that `node` matched `range`, adopting its redirect settings.
    pub fn with_node(
        &mut self,
        id: NodeId,
        node: &CommandNode<S>,
        range: StringRange,
    ) -> &mut Self {
        self.nodes.push(ParsedNode { node: id, range });
        self.range = StringRange::encompassing(self.range, range);
        self.modifier = node.redirect_modifier().cloned();
        self.forks = node.is_fork();
        self
    }

    /// Nodes matched so far, in input order.
    pub fn nodes(&self) -> &[ParsedNode] {
        &self.nodes
    }

    /// Input covered by this hop.
    pub fn range(&self) -> StringRange {
        self.range
    }

    /// Link the builder for the next redirect hop.
    pub fn with_child(&mut self, child: CommandContextBuilder<S>) -> &mut Self {
        self.child = Some(Box::new(child));
        self
    }

    /// The next redirect hop.
    pub fn child(&self) -> Option<&CommandContextBuilder<S>> {
        self.child.as_deref()
    }

    /// The final hop of the chain.
    pub fn last_child(&self) -> &CommandContextBuilder<S> {
        let mut result = self;
        while let Some(child) = result.child() {
            result = child;
        }
        result
    }

    /// Locate the node whose children should be offered at `cursor`.
    ///
    /// A cursor past this hop's range continues into the child hop, or
    /// completes a fresh token after the last matched node. A cursor inside
    /// the range completes the node it touches, offering that node's
    /// siblings. A cursor before the range falls back to this hop's root.
    pub fn find_suggestion_context(&self, cursor: usize) -> SuggestionContext {
        if self.range.start() > cursor {
            return SuggestionContext {
                parent: self.root,
                start: self.range.start(),
            };
        }
        if self.range.end() < cursor {
            if let Some(child) = self.child() {
                return child.find_suggestion_context(cursor);
            }
            return match self.nodes.last() {
                Some(last) => SuggestionContext {
                    parent: last.node,
                    start: last.range.end() + 1,
                },
                None => SuggestionContext {
                    parent: self.root,
                    start: self.range.start(),
                },
            };
        }
        let mut prev = self.root;
        for node in &self.nodes {
            if node.range.touches(cursor) {
                return SuggestionContext {
                    parent: prev,
                    start: node.range.start(),
                };
            }
            prev = node.node;
        }
        SuggestionContext {
            parent: prev,
            start: self.range.start(),
        }
    }
}

impl<S: Clone> CommandContextBuilder<S> {
    /// Freeze the chain into immutable contexts over `input`.
    pub fn build(&self, input: &str) -> CommandContext<S> {
        self.build_shared(Arc::from(input))
    }

    fn build_shared(&self, input: Arc<str>) -> CommandContext<S> {
        CommandContext {
            source: self.source.clone(),
            child: self
                .child
                .as_ref()
                .map(|child| Box::new(child.build_shared(Arc::clone(&input)))),
            input,
            arguments: Arc::new(self.arguments.clone()),
            command: self.command.clone(),
            root: self.root,
            nodes: self.nodes.clone(),
            range: self.range,
            modifier: self.modifier.clone(),
            forks: self.forks,
        }
    }
}

impl<S: Clone> Clone for CommandContextBuilder<S> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            root: self.root,
            arguments: self.arguments.clone(),
            nodes: self.nodes.clone(),
            command: self.command.clone(),
            child: self.child.clone(),
            range: self.range,
            modifier: self.modifier.clone(),
            forks: self.forks,
        }
    }
}

impl<S: fmt::Debug> fmt::Debug for CommandContextBuilder<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandContextBuilder")
            .field("source", &self.source)
            .field("root", &self.root)
            .field("arguments", &self.arguments)
            .field("nodes", &self.nodes)
            .field("has_command", &self.command.is_some())
            .field("range", &self.range)
            .field("forks", &self.forks)
            .field("child", &self.child)
            .finish()
    }
}

// ── Context ─────────────────────────────────────────────────────────────────

/// An immutable parsed command, as seen by commands and suggestion providers.
pub struct CommandContext<S> {
    source: S,
    input: Arc<str>,
    arguments: Arc<IndexMap<String, ParsedArgument>>,
    command: Option<Command<S>>,
    root: NodeId,
    nodes: Vec<ParsedNode>,
    range: StringRange,
    child: Option<Box<CommandContext<S>>>,
    modifier: Option<RedirectModifier<S>>,
    forks: bool,
}

impl<S> CommandContext<S> {
    /// The source this hop runs with.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// The whole input line.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// The node this hop started from.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Nodes matched in this hop.
    pub fn nodes(&self) -> &[ParsedNode] {
        &self.nodes
    }

    /// Whether this hop matched anything.
    pub fn has_nodes(&self) -> bool {
        !self.nodes.is_empty()
    }

    /// Input covered by this hop.
    pub fn range(&self) -> StringRange {
        self.range
    }

    /// The next redirect hop.
    pub fn child(&self) -> Option<&CommandContext<S>> {
        self.child.as_deref()
    }

    /// The final hop of the chain.
    pub fn last_child(&self) -> &CommandContext<S> {
        let mut result = self;
        while let Some(child) = result.child() {
            result = child;
        }
        result
    }

    /// The command this hop runs, if any.
    pub fn command(&self) -> Option<&Command<S>> {
        self.command.as_ref()
    }

    /// The modifier applied when continuing into the child hop.
    pub fn redirect_modifier(&self) -> Option<&RedirectModifier<S>> {
        self.modifier.as_ref()
    }

    /// Whether continuing into the child hop fans out.
    pub fn is_forked(&self) -> bool {
        self.forks
    }

    /// All parsed arguments of this hop.
    pub fn arguments(&self) -> &IndexMap<String, ParsedArgument> {
        &self.arguments
    }

    /// The raw parsed argument `name`.
    pub fn parsed_argument(&self, name: &str) -> Option<&ParsedArgument> {
        self.arguments.get(name)
    }

    /// Fetch argument `name` as a `T`.
    pub fn argument<T: Clone + 'static>(&self, name: &str) -> Result<T, ArgumentError> {
        let parsed = self
            .arguments
            .get(name)
            .ok_or_else(|| ArgumentError::Missing {
                name: name.to_string(),
            })?;
        parsed
            .value
            .downcast_ref::<T>()
            .cloned()
            .ok_or_else(|| ArgumentError::WrongType {
                name: name.to_string(),
                actual: parsed.value.type_name(),
                requested: type_name::<T>(),
            })
    }
}

impl<S: Clone> CommandContext<S> {
    /// This context with a different source.
    pub fn copy_for(&self, source: S) -> Self {
        Self {
            source,
            ..self.clone()
        }
    }
}

impl<S: Clone> Clone for CommandContext<S> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            input: Arc::clone(&self.input),
            arguments: Arc::clone(&self.arguments),
            command: self.command.clone(),
            root: self.root,
            nodes: self.nodes.clone(),
            range: self.range,
            child: self.child.clone(),
            modifier: self.modifier.clone(),
            forks: self.forks,
        }
    }
}

impl<S: PartialEq> PartialEq for CommandContext<S> {
    fn eq(&self, other: &Self) -> bool {
        self.arguments == other.arguments
            && self.root == other.root
            && self.nodes == other.nodes
            && same_command(self.command.as_ref(), other.command.as_ref())
            && self.source == other.source
            && self.child == other.child
    }
}

impl<S: fmt::Debug> fmt::Debug for CommandContext<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandContext")
            .field("source", &self.source)
            .field("input", &self.input)
            .field("arguments", &self.arguments)
            .field("nodes", &self.nodes)
            .field("has_command", &self.command.is_some())
            .field("range", &self.range)
            .field("forks", &self.forks)
            .field("child", &self.child)
            .finish()
    }
}
