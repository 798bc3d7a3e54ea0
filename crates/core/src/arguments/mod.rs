//! Argument types: typed parsers attached to argument nodes.
//!
//! Host applications implement [`ArgumentType`] for their own value types;
//! the tree stores them type-erased behind [`ErasedArgument`], and parsed
//! values come back out through [`CommandContext::argument`].

mod boolean;
mod number;
mod string;

pub use self::boolean::{BoolArgument, boolean, get_bool};
pub use self::number::{
    DoubleArgument, FloatArgument, IntegerArgument, LongArgument, double, double_between,
    float, float_between, get_double, get_float, get_integer, get_long, integer,
    integer_between, long, long_between,
};
pub use self::string::{
    StringArgument, StringKind, escape_if_required, get_string, greedy_string, string, word,
};

use std::any::Any;
use std::fmt;

use cmdtree_diagnostics::CommandSyntaxError;
use futures::future::{BoxFuture, FutureExt, ready};

use crate::context::{ArgumentValue, CommandContext};
use crate::reader::StringReader;
use crate::suggestion::{Suggestions, SuggestionsBuilder};

/// A parser for one kind of argument value.
///
/// `Display` is used for diagnostics and tree dumps (e.g. `integer(0, 10)`);
/// `PartialEq` decides whether two argument nodes are the same node.
pub trait ArgumentType: fmt::Debug + fmt::Display + PartialEq + Send + Sync + 'static {
    /// The parsed value.
    type Value: Clone + PartialEq + fmt::Debug + Send + Sync + 'static;

    /// Consume one value from `reader`.
    ///
    /// On failure the reader's cursor may be anywhere; the dispatcher
    /// restores it. On success the cursor should sit at or after where it
    /// started; a value read without advancing is recorded over an empty
    /// range.
    fn parse(&self, reader: &mut StringReader) -> Result<Self::Value, CommandSyntaxError>;

    /// Offer completions for the partially typed value in `builder`.
    fn list_suggestions<'a, S: Sync + 'a>(
        &'a self,
        context: &'a CommandContext<S>,
        builder: SuggestionsBuilder,
    ) -> BoxFuture<'a, Suggestions> {
        let _ = (context, builder);
        ready(Suggestions::empty()).boxed()
    }

    /// Sample inputs this type accepts.
    fn examples(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Object-safe view of an [`ArgumentType`] for a fixed source type `S`.
///
/// Implemented for every `ArgumentType`; there is no need to implement it
/// by hand.
pub trait ErasedArgument<S>: Send + Sync {
    /// Parse one value and box it.
    fn parse(&self, reader: &mut StringReader) -> Result<ArgumentValue, CommandSyntaxError>;

    /// See [`ArgumentType::list_suggestions`].
    fn list_suggestions<'a>(
        &'a self,
        context: &'a CommandContext<S>,
        builder: SuggestionsBuilder,
    ) -> BoxFuture<'a, Suggestions>;

    /// See [`ArgumentType::examples`].
    fn examples(&self) -> Vec<String>;

    /// The concrete argument type.
    fn as_any(&self) -> &dyn Any;

    /// Whether `other` is the same concrete type with an equal configuration.
    fn type_eq(&self, other: &dyn ErasedArgument<S>) -> bool;

    /// Human-readable form, e.g. `integer(-100, 100)`.
    fn describe(&self) -> String;
}

impl<S: Sync, T: ArgumentType> ErasedArgument<S> for T {
    fn parse(&self, reader: &mut StringReader) -> Result<ArgumentValue, CommandSyntaxError> {
        ArgumentType::parse(self, reader).map(ArgumentValue::new)
    }

    fn list_suggestions<'a>(
        &'a self,
        context: &'a CommandContext<S>,
        builder: SuggestionsBuilder,
    ) -> BoxFuture<'a, Suggestions> {
        ArgumentType::list_suggestions(self, context, builder)
    }

    fn examples(&self) -> Vec<String> {
        ArgumentType::examples(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn type_eq(&self, other: &dyn ErasedArgument<S>) -> bool {
        other.as_any().downcast_ref::<T>() == Some(self)
    }

    fn describe(&self) -> String {
        self.to_string()
    }
}

impl<S> fmt::Debug for dyn ErasedArgument<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}
