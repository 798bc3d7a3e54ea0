//! Completion of partial input.

use futures::future::{BoxFuture, FutureExt, join_all};

use super::{CommandDispatcher, ParseResults};
use crate::suggestion::{Suggestions, SuggestionsBuilder};

impl<S: Clone + Send + Sync> CommandDispatcher<S> {
    /// Completions for the end of the parsed input.
    pub fn completion_suggestions<'a>(
        &'a self,
        parse: &'a ParseResults<S>,
    ) -> BoxFuture<'a, Suggestions> {
        self.completion_suggestions_at(parse, parse.reader().total_length())
    }

    /// Completions for the token touching `cursor`.
    ///
    /// Every usable child of the node owning the cursor is asked for
    /// suggestions concurrently; the answers are merged into one set whose
    /// range covers the token being completed.
    pub fn completion_suggestions_at<'a>(
        &'a self,
        parse: &'a ParseResults<S>,
        cursor: usize,
    ) -> BoxFuture<'a, Suggestions> {
        async move {
            let full_input = parse.reader().string();
            let cursor = floor_char_boundary(full_input, cursor);
            let context = parse.context();
            let owner = context.find_suggestion_context(cursor);
            let start = owner.start.min(cursor);
            let truncated = &full_input[..cursor];
            let built = context.build(truncated);

            let source = context.source();
            let requests: Vec<_> = self
                .tree
                .children(owner.parent)
                .map(|id| self.tree.node(id))
                .filter(|node| node.can_use(source))
                .map(|node| {
                    node.list_suggestions(&built, SuggestionsBuilder::new(truncated, start))
                })
                .collect();
            tracing::trace!(
                parent = %owner.parent,
                start,
                candidates = requests.len(),
                "collecting suggestions"
            );

            let results = join_all(requests).await;
            Suggestions::merge(full_input, results)
        }
        .boxed()
    }
}

fn floor_char_boundary(input: &str, cursor: usize) -> usize {
    let mut cursor = cursor.min(input.len());
    while !input.is_char_boundary(cursor) {
        cursor -= 1;
    }
    cursor
}
