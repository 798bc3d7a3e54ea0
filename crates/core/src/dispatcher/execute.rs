//! Running a parsed command.

use cmdtree_diagnostics::{CommandSyntaxError, codes};
use serde::Serialize;

use super::{CommandDispatcher, ParseResults};
use crate::reader::StringReader;

/// Detailed outcome of [`CommandDispatcher::execute_detailed`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Execution {
    /// The command's result, or the number of successful branches if the
    /// execution forked.
    pub value: i32,
    /// Whether a fork was crossed.
    pub forked: bool,
    /// Failures of individual fork branches. Outside a fork any failure
    /// aborts execution instead.
    pub failures: Vec<CommandSyntaxError>,
}

impl<S: Clone> CommandDispatcher<S> {
    /// Parse and execute `input` on behalf of `source`.
    pub fn execute_input(&self, input: &str, source: S) -> Result<i32, CommandSyntaxError> {
        self.execute(&self.parse(input, source))
    }

    /// Parse and execute from the reader's current position.
    pub fn execute_reader(
        &self,
        reader: StringReader,
        source: S,
    ) -> Result<i32, CommandSyntaxError> {
        self.execute(&self.parse_reader(reader, source))
    }

    /// Execute a parse.
    ///
    /// Without forks the result is the sum of the results of the commands
    /// run (normally exactly one). Once a fork is crossed it is the number
    /// of commands that completed successfully, and branch failures no
    /// longer abort execution.
    pub fn execute(&self, parse: &ParseResults<S>) -> Result<i32, CommandSyntaxError> {
        self.execute_detailed(parse).map(|execution| execution.value)
    }

    /// [`execute`](Self::execute), also reporting fork branch failures.
    pub fn execute_detailed(
        &self,
        parse: &ParseResults<S>,
    ) -> Result<Execution, CommandSyntaxError> {
        let reader = parse.reader();
        if parse.has_leftover() {
            let mut errors = parse.errors().values();
            if let (Some(only), None) = (errors.next(), errors.next()) {
                return Err(only.clone());
            }
            let code = if parse.context().range().is_empty() {
                codes::DISPATCHER_UNKNOWN_COMMAND
            } else {
                codes::DISPATCHER_UNKNOWN_ARGUMENT
            };
            return Err(reader.syntax_error(code, &[]));
        }

        let original = parse.context().build(reader.string());
        let mut result = 0_i32;
        let mut successful_forks = 0_i32;
        let mut forked = false;
        let mut found_command = false;
        let mut failures = Vec::new();
        let mut contexts = vec![original.clone()];

        while !contexts.is_empty() {
            let mut next = Vec::new();
            for context in &contexts {
                if let Some(child) = context.child() {
                    forked |= context.is_forked();
                    if !child.has_nodes() {
                        continue;
                    }
                    found_command = true;
                    let Some(modifier) = context.redirect_modifier() else {
                        next.push(child.copy_for(context.source().clone()));
                        continue;
                    };
                    let sources = modifier(context).and_then(|sources| {
                        if context.is_forked() || sources.len() == 1 {
                            Ok(sources)
                        } else {
                            Err(reader.syntax_error_at(
                                codes::DISPATCHER_REDIRECT_ARITY,
                                &[("count", sources.len().to_string())],
                                child.range().start(),
                            ))
                        }
                    });
                    match sources {
                        Ok(sources) => {
                            next.extend(sources.into_iter().map(|source| child.copy_for(source)));
                        }
                        Err(err) => {
                            self.notify(context, false, 0);
                            if !forked {
                                return Err(err);
                            }
                            tracing::debug!(error = %err, "fork branch redirect failed");
                            failures.push(err);
                        }
                    }
                } else if let Some(command) = context.command() {
                    found_command = true;
                    match command(context) {
                        Ok(value) => {
                            result = result.wrapping_add(value);
                            self.notify(context, true, value);
                            successful_forks += 1;
                        }
                        Err(err) => {
                            self.notify(context, false, 0);
                            if !forked {
                                return Err(err);
                            }
                            tracing::debug!(error = %err, "fork branch command failed");
                            failures.push(err);
                        }
                    }
                }
            }
            contexts = next;
        }

        if !found_command {
            self.notify(&original, false, 0);
            return Err(reader.syntax_error(codes::DISPATCHER_UNKNOWN_COMMAND, &[]));
        }

        let value = if forked { successful_forks } else { result };
        tracing::debug!(value, forked, failures = failures.len(), "executed command");
        Ok(Execution {
            value,
            forked,
            failures,
        })
    }
}
