//! Fluent construction of detached nodes.
//!
//! ```ignore
//! dispatcher.register(
//!     literal("tp").then(
//!         argument("x", integer())
//!             .then(argument("y", integer()).executes(|ctx| teleport(ctx))),
//!     ),
//! )?;
//! ```
//!
//! Builders carry no tree invariants beyond "a node cannot both redirect and
//! have children"; merging happens when the builder is added to a
//! [`CommandTree`](crate::CommandTree).

use std::sync::Arc;

use cmdtree_diagnostics::CommandSyntaxError;

use crate::arguments::{ArgumentType, ErasedArgument};
use crate::command::{Command, RedirectModifier, Requirement};
use crate::context::CommandContext;
use crate::tree::{NodeId, NodeKind, TreeError};

/// A literal node matching `literal` exactly.
pub fn literal<S>(literal: impl Into<String>) -> NodeBuilder<S> {
    NodeBuilder::new(NodeKind::Literal(literal.into()))
}

/// An argument node storing its parsed value under `name`.
pub fn argument<S, T>(name: impl Into<String>, argument: T) -> NodeBuilder<S>
where
    S: Sync,
    T: ArgumentType,
{
    let argument: Arc<dyn ErasedArgument<S>> = Arc::new(argument);
    NodeBuilder::new(NodeKind::Argument {
        name: name.into(),
        argument,
    })
}

/// A detached literal or argument node, with its subtree.
pub struct NodeBuilder<S> {
    kind: NodeKind<S>,
    children: Vec<NodeBuilder<S>>,
    command: Option<Command<S>>,
    requirement: Option<Requirement<S>>,
    redirect: Option<NodeId>,
    modifier: Option<RedirectModifier<S>>,
    forks: bool,
}

/// A builder taken apart for insertion into a tree.
pub(crate) struct BuilderParts<S> {
    pub(crate) kind: NodeKind<S>,
    pub(crate) children: Vec<NodeBuilder<S>>,
    pub(crate) command: Option<Command<S>>,
    pub(crate) requirement: Option<Requirement<S>>,
    pub(crate) redirect: Option<NodeId>,
    pub(crate) modifier: Option<RedirectModifier<S>>,
    pub(crate) forks: bool,
}

impl<S> NodeBuilder<S> {
    fn new(kind: NodeKind<S>) -> Self {
        Self {
            kind,
            children: Vec::new(),
            command: None,
            requirement: None,
            redirect: None,
            modifier: None,
            forks: false,
        }
    }

    pub(crate) fn from_parts(
        kind: NodeKind<S>,
        command: Option<Command<S>>,
        requirement: Option<Requirement<S>>,
        redirect: Option<NodeId>,
        modifier: Option<RedirectModifier<S>>,
        forks: bool,
    ) -> Self {
        Self {
            command,
            requirement,
            redirect,
            modifier,
            forks,
            ..Self::new(kind)
        }
    }

    pub(crate) fn into_parts(self) -> BuilderParts<S> {
        BuilderParts {
            kind: self.kind,
            children: self.children,
            command: self.command,
            requirement: self.requirement,
            redirect: self.redirect,
            modifier: self.modifier,
            forks: self.forks,
        }
    }

    /// Add a child node.
    ///
    /// # Panics
    ///
    /// Panics if this builder already redirects. Use
    /// [`try_then`](Self::try_then) to get an error instead.
    pub fn then(self, child: NodeBuilder<S>) -> Self {
        match self.try_then(child) {
            Ok(builder) => builder,
            Err(err) => panic!("{err}"),
        }
    }

    /// Add a child node, failing if this builder already redirects.
    pub fn try_then(mut self, child: NodeBuilder<S>) -> Result<Self, TreeError> {
        if self.redirect.is_some() {
            return Err(TreeError::ChildOfRedirect {
                node: self.name().to_string(),
            });
        }
        self.children.push(child);
        Ok(self)
    }

    /// Run `f` when input ends at this node.
    pub fn executes<F>(self, f: F) -> Self
    where
        F: Fn(&CommandContext<S>) -> Result<i32, CommandSyntaxError> + Send + Sync + 'static,
    {
        self.executes_command(Arc::new(f))
    }

    /// Run a shared `command` when input ends at this node.
    pub fn executes_command(mut self, command: Command<S>) -> Self {
        self.command = Some(command);
        self
    }

    /// Only let sources satisfying `f` use this node.
    pub fn requires<F>(mut self, f: F) -> Self
    where
        F: Fn(&S) -> bool + Send + Sync + 'static,
    {
        self.requirement = Some(Arc::new(f));
        self
    }

    /// Continue parsing at `target`, keeping the source.
    ///
    /// # Panics
    ///
    /// Panics if this builder already has children.
    pub fn redirect(self, target: NodeId) -> Self {
        self.forward(target, None, false)
    }

    /// Continue parsing at `target`, mapping the source through `modifier`.
    ///
    /// # Panics
    ///
    /// Panics if this builder already has children.
    pub fn redirect_with<F>(self, target: NodeId, modifier: F) -> Self
    where
        S: 'static,
        F: Fn(&CommandContext<S>) -> Result<S, CommandSyntaxError> + Send + Sync + 'static,
    {
        let modifier: RedirectModifier<S> = Arc::new(move |context: &CommandContext<S>| {
            modifier(context).map(|source| vec![source])
        });
        self.forward(target, Some(modifier), false)
    }

    /// Continue at `target` once per source returned by `modifier`.
    ///
    /// # Panics
    ///
    /// Panics if this builder already has children.
    pub fn fork<F>(self, target: NodeId, modifier: F) -> Self
    where
        F: Fn(&CommandContext<S>) -> Result<Vec<S>, CommandSyntaxError> + Send + Sync + 'static,
    {
        self.forward(target, Some(Arc::new(modifier)), true)
    }

    /// General form of [`redirect`](Self::redirect) and [`fork`](Self::fork).
    ///
    /// # Panics
    ///
    /// Panics if this builder already has children. Use
    /// [`try_forward`](Self::try_forward) to get an error instead.
    pub fn forward(
        self,
        target: NodeId,
        modifier: Option<RedirectModifier<S>>,
        fork: bool,
    ) -> Self {
        match self.try_forward(target, modifier, fork) {
            Ok(builder) => builder,
            Err(err) => panic!("{err}"),
        }
    }

    /// Set the redirect, failing if this builder already has children.
    pub fn try_forward(
        mut self,
        target: NodeId,
        modifier: Option<RedirectModifier<S>>,
        fork: bool,
    ) -> Result<Self, TreeError> {
        if !self.children.is_empty() {
            return Err(TreeError::RedirectWithChildren {
                node: self.name().to_string(),
            });
        }
        self.redirect = Some(target);
        self.modifier = modifier;
        self.forks = fork;
        Ok(self)
    }

    /// What the node will match.
    pub fn kind(&self) -> &NodeKind<S> {
        &self.kind
    }

    /// The literal text or argument name.
    pub fn name(&self) -> &str {
        self.kind.name()
    }

    /// Children added so far.
    pub fn children(&self) -> &[NodeBuilder<S>] {
        &self.children
    }

    /// The command, if set.
    pub fn command(&self) -> Option<&Command<S>> {
        self.command.as_ref()
    }

    /// The requirement, if set.
    pub fn requirement(&self) -> Option<&Requirement<S>> {
        self.requirement.as_ref()
    }

    /// The redirect target, if set.
    pub fn redirect_target(&self) -> Option<NodeId> {
        self.redirect
    }

    /// The redirect modifier, if set.
    pub fn redirect_modifier(&self) -> Option<&RedirectModifier<S>> {
        self.modifier.as_ref()
    }

    /// Whether the redirect forks.
    pub fn is_fork(&self) -> bool {
        self.forks
    }
}

impl<S> std::fmt::Debug for NodeBuilder<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeBuilder")
            .field("kind", &self.kind)
            .field("children", &self.children)
            .field("has_command", &self.command.is_some())
            .field("redirect", &self.redirect)
            .field("forks", &self.forks)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arguments::integer;
    use crate::command::same_command;

    #[test]
    fn literal_builds_literal_kind() {
        let builder = literal::<()>("foo");
        assert!(matches!(builder.kind(), NodeKind::Literal(text) if text == "foo"));
        assert_eq!(builder.name(), "foo");
    }

    #[test]
    fn executes_sets_command() {
        let cmd = crate::command::command::<(), _>(|_| Ok(1));
        let builder = literal("foo").executes_command(Arc::clone(&cmd));
        assert!(same_command(builder.command(), Some(&cmd)));
    }

    #[test]
    fn then_collects_children() {
        let builder = literal::<()>("foo")
            .then(argument("bar", integer()))
            .then(argument("baz", integer()));
        assert_eq!(builder.children().len(), 2);
        assert_eq!(builder.children()[0].name(), "bar");
    }

    #[test]
    fn redirect_records_target() {
        let builder = literal::<()>("foo").redirect(NodeId::ROOT);
        assert_eq!(builder.redirect_target(), Some(NodeId::ROOT));
        assert!(builder.redirect_modifier().is_none());
        assert!(!builder.is_fork());
    }

    #[test]
    fn fork_records_modifier() {
        let builder = literal::<u8>("foo").fork(NodeId::ROOT, |ctx| Ok(vec![*ctx.source(); 2]));
        assert!(builder.is_fork());
        assert!(builder.redirect_modifier().is_some());
    }

    #[test]
    #[should_panic(expected = "already has children")]
    fn redirect_with_child_panics() {
        let _ = literal::<()>("foo")
            .then(literal("foot"))
            .redirect(NodeId::ROOT);
    }

    #[test]
    #[should_panic(expected = "redirects elsewhere")]
    fn then_with_redirect_panics() {
        let _ = literal::<()>("foo")
            .redirect(NodeId::ROOT)
            .then(literal("foot"));
    }

    #[test]
    fn try_variants_return_errors() {
        let err = literal::<()>("foo")
            .redirect(NodeId::ROOT)
            .try_then(literal("foot"))
            .err();
        assert_eq!(err, Some(TreeError::ChildOfRedirect { node: "foo".into() }));

        let err = literal::<()>("foo")
            .then(literal("foot"))
            .try_forward(NodeId::ROOT, None, false)
            .err();
        assert_eq!(err, Some(TreeError::RedirectWithChildren { node: "foo".into() }));
    }
}
