//! The command tree.
//!
//! Nodes live in an arena owned by [`CommandTree`] and refer to each other by
//! [`NodeId`]. Parent → child edges are ownership edges; redirects are plain
//! ids, so a node may redirect to an ancestor (or the root) without creating
//! an ownership cycle.
//!
//! Nodes are added from detached [`NodeBuilder`]s. Adding a node whose name
//! is already taken at that level merges the two instead of duplicating:
//! children are merged recursively, and the existing node's command,
//! requirement and redirect are replaced only when the incoming builder
//! sets them.

use std::fmt;
use std::sync::Arc;

use cmdtree_diagnostics::{CommandSyntaxError, codes};
use futures::future::{BoxFuture, FutureExt, ready};
use indexmap::IndexMap;

use crate::arguments::ErasedArgument;
use crate::builder::NodeBuilder;
use crate::command::{Command, RedirectModifier, Requirement, same_command};
use crate::context::{CommandContext, CommandContextBuilder, ParsedArgument};
use crate::range::StringRange;
use crate::reader::{ARGUMENT_SEPARATOR, StringReader};
use crate::suggestion::{Suggestions, SuggestionsBuilder};

/// Handle to a node in a [`CommandTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// The root of every tree.
    pub const ROOT: NodeId = NodeId(0);

    /// Position in the arena.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Misconfiguration detected while building or extending a tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum TreeError {
    /// Children were added under a node that redirects.
    #[error("cannot add children to '{node}': it redirects elsewhere")]
    ChildOfRedirect {
        /// Name of the redirecting node.
        node: String,
    },
    /// A redirect was set on a node that already has children.
    #[error("cannot redirect '{node}': it already has children")]
    RedirectWithChildren {
        /// Name of the node with children.
        node: String,
    },
    /// The root node was asked for a builder.
    #[error("the root node has no builder representation")]
    RootHasNoBuilder,
    /// A node id does not belong to this tree.
    #[error("node {0} does not exist in this tree")]
    UnknownNode(NodeId),
}

/// What a node matches.
pub enum NodeKind<S> {
    /// The tree's entry point. Matches nothing itself.
    Root,
    /// A fixed word.
    Literal(String),
    /// A typed value.
    Argument {
        /// Key under which the parsed value is stored.
        name: String,
        /// The value's parser.
        argument: Arc<dyn ErasedArgument<S>>,
    },
}

impl<S> NodeKind<S> {
    /// Identity key among siblings: the literal text or argument name.
    pub fn name(&self) -> &str {
        match self {
            NodeKind::Root => "",
            NodeKind::Literal(literal) => literal,
            NodeKind::Argument { name, .. } => name,
        }
    }

    /// `literal`, `<name>`, or empty for the root.
    pub fn usage_text(&self) -> String {
        match self {
            NodeKind::Root => String::new(),
            NodeKind::Literal(literal) => literal.clone(),
            NodeKind::Argument { name, .. } => format!("<{name}>"),
        }
    }

    fn same_kind(&self, other: &Self) -> bool {
        match (self, other) {
            (NodeKind::Root, NodeKind::Root) => true,
            (NodeKind::Literal(a), NodeKind::Literal(b)) => a == b,
            (
                NodeKind::Argument { name, argument },
                NodeKind::Argument {
                    name: other_name,
                    argument: other_argument,
                },
            ) => name == other_name && argument.type_eq(other_argument.as_ref()),
            _ => false,
        }
    }
}

impl<S> Clone for NodeKind<S> {
    fn clone(&self) -> Self {
        match self {
            NodeKind::Root => NodeKind::Root,
            NodeKind::Literal(literal) => NodeKind::Literal(literal.clone()),
            NodeKind::Argument { name, argument } => NodeKind::Argument {
                name: name.clone(),
                argument: Arc::clone(argument),
            },
        }
    }
}

impl<S> fmt::Debug for NodeKind<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Root => f.write_str("<root>"),
            NodeKind::Literal(literal) => write!(f, "<literal {literal}>"),
            NodeKind::Argument { name, argument } => {
                write!(f, "<argument {name}:{}>", argument.describe())
            }
        }
    }
}

/// One node of a [`CommandTree`].
pub struct CommandNode<S> {
    kind: NodeKind<S>,
    literals: IndexMap<String, NodeId>,
    arguments: IndexMap<String, NodeId>,
    command: Option<Command<S>>,
    requirement: Option<Requirement<S>>,
    redirect: Option<NodeId>,
    modifier: Option<RedirectModifier<S>>,
    forks: bool,
}

impl<S> CommandNode<S> {
    fn root() -> Self {
        Self {
            kind: NodeKind::Root,
            literals: IndexMap::new(),
            arguments: IndexMap::new(),
            command: None,
            requirement: None,
            redirect: None,
            modifier: None,
            forks: false,
        }
    }

    /// What this node matches.
    pub fn kind(&self) -> &NodeKind<S> {
        &self.kind
    }

    /// Identity key among siblings.
    pub fn name(&self) -> &str {
        self.kind.name()
    }

    /// How this node appears in usage strings.
    pub fn usage_text(&self) -> String {
        self.kind.usage_text()
    }

    /// Children in parse order: literals sorted by text, then arguments in
    /// registration order.
    pub fn children(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.literals.values().chain(self.arguments.values()).copied()
    }

    /// The child keyed `name`.
    pub fn child(&self, name: &str) -> Option<NodeId> {
        self.literals
            .get(name)
            .or_else(|| self.arguments.get(name))
            .copied()
    }

    /// Number of children.
    pub fn child_count(&self) -> usize {
        self.literals.len() + self.arguments.len()
    }

    /// Whether the node has any children.
    pub fn has_children(&self) -> bool {
        self.child_count() > 0
    }

    /// The command run when input ends at this node.
    pub fn command(&self) -> Option<&Command<S>> {
        self.command.as_ref()
    }

    /// The access predicate, if one was set.
    pub fn requirement(&self) -> Option<&Requirement<S>> {
        self.requirement.as_ref()
    }

    /// Whether `source` may use this node.
    pub fn can_use(&self, source: &S) -> bool {
        self.requirement.as_ref().is_none_or(|requirement| requirement(source))
    }

    /// Where parsing continues after this node, if it redirects.
    pub fn redirect(&self) -> Option<NodeId> {
        self.redirect
    }

    /// Source mapping applied when following the redirect.
    pub fn redirect_modifier(&self) -> Option<&RedirectModifier<S>> {
        self.modifier.as_ref()
    }

    /// Whether following the redirect fans out.
    pub fn is_fork(&self) -> bool {
        self.forks
    }

    /// Sample inputs this node accepts.
    pub fn examples(&self) -> Vec<String> {
        match &self.kind {
            NodeKind::Root => Vec::new(),
            NodeKind::Literal(literal) => vec![literal.clone()],
            NodeKind::Argument { argument, .. } => argument.examples(),
        }
    }

    /// Consume this node's token from `reader`, recording it in `context`.
    ///
    /// A literal must be followed by a separator or the end of input; on
    /// failure the reader is left at the token start.
    pub fn parse(
        &self,
        id: NodeId,
        reader: &mut StringReader,
        context: &mut CommandContextBuilder<S>,
    ) -> Result<(), CommandSyntaxError> {
        let start = reader.cursor();
        match &self.kind {
            NodeKind::Root => Ok(()),
            NodeKind::Literal(literal) => {
                let end = start + literal.len();
                let matches = reader.remaining().starts_with(literal.as_str())
                    && reader.string()[end..]
                        .chars()
                        .next()
                        .is_none_or(|c| c == ARGUMENT_SEPARATOR);
                if !matches {
                    return Err(reader.syntax_error(
                        codes::LITERAL_INCORRECT,
                        &[("literal", literal.clone())],
                    ));
                }
                reader.set_cursor(end);
                context.with_node(id, self, StringRange::between(start, end));
                Ok(())
            }
            NodeKind::Argument { name, argument } => {
                let value = argument.parse(reader)?;
                let parsed = ParsedArgument::new(start, reader.cursor(), value);
                let range = parsed.range();
                context.with_argument(name.clone(), parsed);
                context.with_node(id, self, range);
                Ok(())
            }
        }
    }

    /// Completions this node offers for the token in `builder`.
    pub fn list_suggestions<'a>(
        &'a self,
        context: &'a CommandContext<S>,
        mut builder: SuggestionsBuilder,
    ) -> BoxFuture<'a, Suggestions> {
        match &self.kind {
            NodeKind::Root => ready(Suggestions::empty()).boxed(),
            NodeKind::Literal(literal) => {
                if literal.to_lowercase().starts_with(builder.remaining_lowercase()) {
                    builder.suggest(literal.as_str()).build_future()
                } else {
                    ready(Suggestions::empty()).boxed()
                }
            }
            NodeKind::Argument { argument, .. } => argument.list_suggestions(context, builder),
        }
    }
}

impl<S> fmt::Debug for CommandNode<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandNode")
            .field("kind", &self.kind)
            .field("children", &self.children().collect::<Vec<_>>())
            .field("has_command", &self.command.is_some())
            .field("redirect", &self.redirect)
            .field("forks", &self.forks)
            .finish()
    }
}

/// Arena of [`CommandNode`]s rooted at [`NodeId::ROOT`].
pub struct CommandTree<S> {
    nodes: Vec<CommandNode<S>>,
}

impl<S> Default for CommandTree<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> CommandTree<S> {
    /// A tree holding only the root.
    pub fn new() -> Self {
        Self {
            nodes: vec![CommandNode::root()],
        }
    }

    /// The root id.
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Look up a node.
    pub fn get(&self, id: NodeId) -> Option<&CommandNode<S>> {
        self.nodes.get(id.0)
    }

    /// Look up a node.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this tree.
    pub fn node(&self, id: NodeId) -> &CommandNode<S> {
        match self.nodes.get(id.0) {
            Some(node) => node,
            None => panic!("node {id} does not exist in this tree"),
        }
    }

    /// Number of nodes, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn check(&self, id: NodeId) -> Result<&CommandNode<S>, TreeError> {
        self.nodes.get(id.0).ok_or(TreeError::UnknownNode(id))
    }

    /// Children of `id` in parse order.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.node(id).children()
    }

    /// Whether `source` may use node `id`.
    pub fn can_use(&self, id: NodeId, source: &S) -> bool {
        self.node(id).can_use(source)
    }

    /// Insert `builder` (and its descendants) under `parent`, merging with
    /// any same-named child. Returns the id of the inserted or merged node.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        builder: NodeBuilder<S>,
    ) -> Result<NodeId, TreeError> {
        let parent_node = self.check(parent)?;
        if parent_node.redirect.is_some() {
            return Err(TreeError::ChildOfRedirect {
                node: parent_node.name().to_string(),
            });
        }
        let parts = builder.into_parts();
        if let Some(target) = parts.redirect {
            self.check(target)?;
        }

        let id = match parent_node.child(parts.kind.name()) {
            Some(existing) => {
                let node = &mut self.nodes[existing.0];
                if parts.redirect.is_some() && node.has_children() {
                    return Err(TreeError::RedirectWithChildren {
                        node: node.name().to_string(),
                    });
                }
                if parts.command.is_some() {
                    node.command = parts.command;
                }
                if parts.requirement.is_some() {
                    node.requirement = parts.requirement;
                }
                if parts.redirect.is_some() {
                    node.redirect = parts.redirect;
                    node.modifier = parts.modifier;
                    node.forks = parts.forks;
                }
                tracing::trace!(parent = %parent, node = %existing, "merged into existing child");
                existing
            }
            None => {
                let id = NodeId(self.nodes.len());
                let name = parts.kind.name().to_string();
                let is_literal = matches!(parts.kind, NodeKind::Literal(_));
                self.nodes.push(CommandNode {
                    kind: parts.kind,
                    literals: IndexMap::new(),
                    arguments: IndexMap::new(),
                    command: parts.command,
                    requirement: parts.requirement,
                    redirect: parts.redirect,
                    modifier: parts.modifier,
                    forks: parts.forks,
                });
                let parent_node = &mut self.nodes[parent.0];
                if is_literal {
                    parent_node.literals.insert(name, id);
                    parent_node.literals.sort_keys();
                } else {
                    parent_node.arguments.insert(name, id);
                }
                tracing::trace!(parent = %parent, node = %id, "added child");
                id
            }
        };

        for child in parts.children {
            self.add_child(id, child)?;
        }
        Ok(id)
    }

    /// Children worth trying for the next token: the literal child whose
    /// text equals that token, if any; otherwise every argument child.
    pub fn relevant_children(&self, id: NodeId, reader: &StringReader) -> Vec<NodeId> {
        let node = self.node(id);
        if !node.literals.is_empty() {
            let token = reader
                .remaining()
                .split(ARGUMENT_SEPARATOR)
                .next()
                .unwrap_or_default();
            if let Some(&literal) = node.literals.get(token) {
                return vec![literal];
            }
        }
        node.arguments.values().copied().collect()
    }

    /// A builder reproducing node `id`'s own configuration (not its
    /// children).
    pub fn create_builder(&self, id: NodeId) -> Result<NodeBuilder<S>, TreeError> {
        let node = self.check(id)?;
        if matches!(node.kind, NodeKind::Root) {
            return Err(TreeError::RootHasNoBuilder);
        }
        Ok(NodeBuilder::from_parts(
            node.kind.clone(),
            node.command.clone(),
            node.requirement.clone(),
            node.redirect,
            node.modifier.clone(),
            node.forks,
        ))
    }

    /// Structural equality of the subtree at `a` with the subtree at `b` of
    /// `other`: same kinds, same command identity, equal children in order.
    pub fn subtree_eq(&self, a: NodeId, other: &CommandTree<S>, b: NodeId) -> bool {
        let (left, right) = (self.node(a), other.node(b));
        left.kind.same_kind(&right.kind)
            && same_command(left.command(), right.command())
            && left.child_count() == right.child_count()
            && left
                .children()
                .zip(right.children())
                .all(|(x, y)| self.subtree_eq(x, other, y))
    }
}

impl<S> fmt::Debug for CommandTree<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.nodes).finish()
    }
}
