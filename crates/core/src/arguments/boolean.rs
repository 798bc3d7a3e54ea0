use std::fmt;

use cmdtree_diagnostics::CommandSyntaxError;
use futures::future::BoxFuture;

use super::ArgumentType;
use crate::context::{ArgumentError, CommandContext};
use crate::reader::StringReader;
use crate::suggestion::{Suggestions, SuggestionsBuilder};

/// Accepts exactly `true` or `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoolArgument;

/// A [`BoolArgument`].
pub fn boolean() -> BoolArgument {
    BoolArgument
}

/// Fetch a boolean argument from `context`.
pub fn get_bool<S>(context: &CommandContext<S>, name: &str) -> Result<bool, ArgumentError> {
    context.argument::<bool>(name)
}

impl ArgumentType for BoolArgument {
    type Value = bool;

    fn parse(&self, reader: &mut StringReader) -> Result<bool, CommandSyntaxError> {
        reader.read_boolean()
    }

    fn list_suggestions<'a, S: Sync + 'a>(
        &'a self,
        _context: &'a CommandContext<S>,
        mut builder: SuggestionsBuilder,
    ) -> BoxFuture<'a, Suggestions> {
        for candidate in ["true", "false"] {
            if candidate.starts_with(builder.remaining_lowercase()) {
                builder.suggest(candidate);
            }
        }
        builder.build_future()
    }

    fn examples(&self) -> Vec<String> {
        vec!["true".into(), "false".into()]
    }
}

impl fmt::Display for BoolArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("bool()")
    }
}
