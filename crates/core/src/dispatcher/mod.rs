//! The command dispatcher.
//!
//! [`CommandDispatcher`] owns a [`CommandTree`] and implements the four
//! things a host does with it: parse input against the tree, execute the
//! parse, complete partial input, and describe the tree as usage strings.
//! Each lives in its own submodule; this module holds registration and
//! path lookups.

mod execute;
mod parse;
mod suggest;
mod usage;

pub use execute::Execution;
pub use parse::ParseResults;

use std::fmt;

use crate::builder::NodeBuilder;
use crate::command::ResultConsumer;
use crate::config::DispatcherConfig;
use crate::context::CommandContext;
use crate::tree::{CommandTree, NodeId, TreeError};

/// Parses, executes and completes commands against a registered tree.
pub struct CommandDispatcher<S> {
    tree: CommandTree<S>,
    config: DispatcherConfig,
    consumer: Option<ResultConsumer<S>>,
}

impl<S> Default for CommandDispatcher<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> CommandDispatcher<S> {
    /// A dispatcher with an empty tree and default configuration.
    pub fn new() -> Self {
        Self::with_config(DispatcherConfig::default())
    }

    /// A dispatcher with an empty tree.
    pub fn with_config(config: DispatcherConfig) -> Self {
        Self {
            tree: CommandTree::new(),
            config,
            consumer: None,
        }
    }

    /// A dispatcher over an existing tree.
    pub fn from_tree(tree: CommandTree<S>, config: DispatcherConfig) -> Self {
        Self {
            tree,
            config,
            consumer: None,
        }
    }

    /// The root node.
    pub fn root(&self) -> NodeId {
        self.tree.root()
    }

    /// The command tree.
    pub fn tree(&self) -> &CommandTree<S> {
        &self.tree
    }

    /// Active configuration.
    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Add a top-level command, merging with any same-named one.
    ///
    /// The returned id stays valid for the dispatcher's lifetime and can be
    /// used as a redirect target.
    pub fn register(&mut self, command: NodeBuilder<S>) -> Result<NodeId, TreeError> {
        let name = command.name().to_string();
        let id = self.tree.add_child(NodeId::ROOT, command)?;
        tracing::debug!(command = %name, node = %id, "registered command");
        Ok(id)
    }

    /// Add a node under an arbitrary registered node.
    pub fn register_under(
        &mut self,
        parent: NodeId,
        node: NodeBuilder<S>,
    ) -> Result<NodeId, TreeError> {
        self.tree.add_child(parent, node)
    }

    /// Observe every command completion during execution.
    pub fn set_consumer<F>(&mut self, consumer: F)
    where
        F: Fn(&CommandContext<S>, bool, i32) + Send + Sync + 'static,
    {
        self.consumer = Some(std::sync::Arc::new(consumer));
    }

    fn notify(&self, context: &CommandContext<S>, success: bool, result: i32) {
        if let Some(consumer) = &self.consumer {
            consumer(context, success, result);
        }
    }

    /// Names from the root down to `target`, or empty if `target` is not
    /// reachable through child edges.
    pub fn path(&self, target: NodeId) -> Vec<String> {
        let mut path = Vec::new();
        if self.find_path(self.root(), target, &mut path) {
            path
        } else {
            Vec::new()
        }
    }

    fn find_path(&self, node: NodeId, target: NodeId, path: &mut Vec<String>) -> bool {
        if node == target {
            return true;
        }
        for child in self.tree.children(node) {
            path.push(self.tree.node(child).name().to_string());
            if self.find_path(child, target, path) {
                return true;
            }
            path.pop();
        }
        false
    }

    /// Follow `path` from the root by child name.
    pub fn find_node<I>(&self, path: I) -> Option<NodeId>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        path.into_iter().try_fold(self.root(), |node, name| {
            self.tree.node(node).child(name.as_ref())
        })
    }
}

impl<S> fmt::Debug for CommandDispatcher<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDispatcher")
            .field("tree", &self.tree)
            .field("config", &self.config)
            .field("has_consumer", &self.consumer.is_some())
            .finish()
    }
}
