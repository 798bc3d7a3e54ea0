//! Host-supplied callbacks attached to nodes and dispatchers.
//!
//! All callbacks are reference-counted so that nodes, builders and contexts
//! can share them freely. Two commands are the same command only if they are
//! the same allocation ([`same_command`]).

use std::sync::Arc;

use cmdtree_diagnostics::CommandSyntaxError;

use crate::context::CommandContext;

/// The action run when a node terminates a parsed command.
///
/// The returned integer is the command's result; see
/// [`CommandDispatcher::execute`](crate::CommandDispatcher::execute) for how
/// results combine across redirects and forks.
pub type Command<S> =
    Arc<dyn Fn(&CommandContext<S>) -> Result<i32, CommandSyntaxError> + Send + Sync>;

/// Decides whether a source may use a node.
pub type Requirement<S> = Arc<dyn Fn(&S) -> bool + Send + Sync>;

/// Maps the source of a redirecting context to the source(s) the redirect
/// target runs with. Plain redirects must return exactly one source; forks
/// may return any number.
pub type RedirectModifier<S> =
    Arc<dyn Fn(&CommandContext<S>) -> Result<Vec<S>, CommandSyntaxError> + Send + Sync>;

/// Observes every command completion: `(context, success, result)`.
pub type ResultConsumer<S> = Arc<dyn Fn(&CommandContext<S>, bool, i32) + Send + Sync>;

/// Wrap a closure as a [`Command`].
pub fn command<S, F>(f: F) -> Command<S>
where
    F: Fn(&CommandContext<S>) -> Result<i32, CommandSyntaxError> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Identity comparison for optional commands.
pub fn same_command<S>(a: Option<&Command<S>>, b: Option<&Command<S>>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b)),
        (None, None) => true,
        _ => false,
    }
}
