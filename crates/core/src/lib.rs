//! Command tree parsing, dispatch and completion.
//!
//! Commands are registered as a tree of literal and typed-argument nodes
//! with [`literal`] and [`argument`] builders. A [`CommandDispatcher`] then
//! parses input against the tree ([`CommandDispatcher::parse`]), runs the
//! matched command ([`CommandDispatcher::execute`]), completes partial input
//! ([`CommandDispatcher::completion_suggestions`]) and renders usage strings
//! ([`CommandDispatcher::smart_usage`]).
//!
//! ```
//! use cmdtree_core::{CommandDispatcher, argument, arguments::{get_integer, integer}, literal};
//!
//! let mut dispatcher = CommandDispatcher::<()>::new();
//! dispatcher
//!     .register(literal("double").then(
//!         argument("n", integer()).executes(|ctx| Ok(get_integer(ctx, "n")? * 2)),
//!     ))
//!     .unwrap();
//! assert_eq!(dispatcher.execute_input("double 21", ()), Ok(42));
//! ```

#![warn(missing_docs)]

/// Built-in argument types and the traits custom ones implement.
pub mod arguments;
/// Fluent node builders.
pub mod builder;
/// Command, requirement and redirect callback types.
pub mod command;
pub mod config;
/// Parse contexts handed to commands.
pub mod context;
pub mod dispatcher;
pub mod range;
pub mod reader;
/// Completion candidates.
pub mod suggestion;
/// The arena-backed command tree.
pub mod tree;

// ── Convenience re-exports ──────────────────────────────────────────────────

// Dispatcher
pub use dispatcher::{CommandDispatcher, Execution, ParseResults};

// Tree
pub use builder::{NodeBuilder, argument, literal};
pub use tree::{CommandNode, CommandTree, NodeId, NodeKind, TreeError};

// Context
pub use context::{ArgumentError, ArgumentValue, CommandContext, CommandContextBuilder};

// Commands
pub use command::{Command, RedirectModifier, Requirement, ResultConsumer, command};

// Input and completion
pub use range::StringRange;
pub use reader::StringReader;
pub use suggestion::{Suggestion, Suggestions, SuggestionsBuilder};

// Arguments
pub use arguments::{ArgumentType, ErasedArgument};

// Configuration
pub use config::{DispatcherConfig, UsageSyntax};

// Errors (re-exported from the diagnostics crate)
pub use cmdtree_diagnostics::{CommandSyntaxError, codes};
