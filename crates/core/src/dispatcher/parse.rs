//! Backtracking descent over the tree.

use std::cmp::Reverse;

use cmdtree_diagnostics::{CommandSyntaxError, codes};
use indexmap::IndexMap;

use super::CommandDispatcher;
use crate::context::CommandContextBuilder;
use crate::reader::{ARGUMENT_SEPARATOR, StringReader};
use crate::tree::NodeId;

/// Outcome of [`CommandDispatcher::parse`].
///
/// Parsing never fails outright: whatever could be matched is in
/// [`context`](Self::context), the reader shows how far it got, and
/// [`errors`](Self::errors) records why each candidate at the stopping point
/// was rejected. [`CommandDispatcher::execute`] turns leftovers into errors.
#[derive(Debug, Clone)]
pub struct ParseResults<S> {
    context: CommandContextBuilder<S>,
    reader: StringReader,
    errors: IndexMap<NodeId, CommandSyntaxError>,
}

impl<S> ParseResults<S> {
    /// Matched nodes and arguments, as a chain of builders.
    pub fn context(&self) -> &CommandContextBuilder<S> {
        &self.context
    }

    /// The input, positioned where matching stopped.
    pub fn reader(&self) -> &StringReader {
        &self.reader
    }

    /// Why each candidate child at the stopping point failed.
    pub fn errors(&self) -> &IndexMap<NodeId, CommandSyntaxError> {
        &self.errors
    }

    /// Whether the whole input was matched.
    pub fn is_complete(&self) -> bool {
        !self.reader.can_read()
    }

    /// Whether anything other than whitespace is left unmatched.
    pub fn has_leftover(&self) -> bool {
        has_leftover(&self.reader)
    }
}

fn has_leftover(reader: &StringReader) -> bool {
    !reader.remaining().trim().is_empty()
}

impl<S: Clone> CommandDispatcher<S> {
    /// Parse `input` on behalf of `source`.
    pub fn parse(&self, input: &str, source: S) -> ParseResults<S> {
        self.parse_reader(StringReader::new(input), source)
    }

    /// Parse from the reader's current position.
    pub fn parse_reader(&self, reader: StringReader, source: S) -> ParseResults<S> {
        let context = CommandContextBuilder::new(source, self.root(), reader.cursor());
        let result = self.parse_nodes(self.root(), &reader, &context);
        tracing::debug!(
            input = reader.string(),
            stopped_at = result.reader.cursor(),
            errors = result.errors.len(),
            "parsed input"
        );
        result
    }

    fn parse_nodes(
        &self,
        node: NodeId,
        reader: &StringReader,
        context_so_far: &CommandContextBuilder<S>,
    ) -> ParseResults<S> {
        let source = context_so_far.source();
        let mut errors = IndexMap::new();
        let mut potentials = Vec::new();
        let mut original = reader.clone();
        original.skip_whitespace();

        for id in self.tree.relevant_children(node, &original) {
            let child = self.tree.node(id);
            if !child.can_use(source) {
                continue;
            }
            let mut context = context_so_far.clone();
            let mut reader = original.clone();
            let parsed = child.parse(id, &mut reader, &mut context).and_then(|()| {
                if reader.can_read() && reader.peek() != Some(ARGUMENT_SEPARATOR) {
                    Err(reader.syntax_error(codes::DISPATCHER_EXPECTED_ARGUMENT_SEPARATOR, &[]))
                } else {
                    Ok(())
                }
            });
            if let Err(err) = parsed {
                tracing::trace!(
                    node = %id,
                    cursor = original.cursor(),
                    error = %err,
                    "candidate rejected"
                );
                errors.insert(id, err);
                continue;
            }

            context.with_command(child.command().cloned());
            let needed = if child.redirect().is_some() { 1 } else { 2 };
            if !reader.can_read_n(needed) {
                potentials.push(ParseResults {
                    context,
                    reader,
                    errors: IndexMap::new(),
                });
                continue;
            }

            reader.skip_whitespace();
            if let Some(target) = child.redirect() {
                tracing::trace!(
                    from = %id,
                    to = %target,
                    cursor = reader.cursor(),
                    "following redirect"
                );
                let child_context =
                    CommandContextBuilder::new(source.clone(), target, reader.cursor());
                let parse = self.parse_nodes(target, &reader, &child_context);
                context.with_child(parse.context);
                return ParseResults {
                    context,
                    reader: parse.reader,
                    errors: parse.errors,
                };
            }
            potentials.push(self.parse_nodes(id, &reader, &context));
        }

        if potentials.is_empty() {
            return ParseResults {
                context: context_so_far.clone(),
                reader: original,
                errors,
            };
        }
        // Fully consumed input wins, then error-free, then the furthest
        // cursor; ties keep tree order.
        potentials.sort_by_key(|p| {
            (
                has_leftover(&p.reader),
                !p.errors.is_empty(),
                Reverse(p.reader.cursor()),
            )
        });
        potentials.swap_remove(0)
    }
}
