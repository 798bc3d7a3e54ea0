//! Shared test helpers for `cmdtree_core` integration tests.

#![allow(unreachable_pub)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use cmdtree_core::{Command, CommandDispatcher, StringRange, Suggestions, command};

// ─── Commands ────────────────────────────────────────────────────────────────

/// A command returning `value` that counts its invocations.
#[allow(dead_code)]
pub fn counting<S: 'static>(value: i32) -> (Command<S>, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let command = command(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(value)
    });
    (command, calls)
}

/// Number of times a [`counting`] command ran.
#[allow(dead_code)]
pub fn calls(counter: &AtomicUsize) -> usize {
    counter.load(Ordering::SeqCst)
}

// ─── Suggestions ─────────────────────────────────────────────────────────────

/// Complete `input` at `cursor` on behalf of `()`.
#[allow(dead_code)]
pub fn suggest_at(dispatcher: &CommandDispatcher<()>, input: &str, cursor: usize) -> Suggestions {
    let parse = dispatcher.parse(input, ());
    futures::executor::block_on(dispatcher.completion_suggestions_at(&parse, cursor))
}

/// Complete the end of `input` on behalf of `()`.
#[allow(dead_code)]
pub fn suggest(dispatcher: &CommandDispatcher<()>, input: &str) -> Suggestions {
    suggest_at(dispatcher, input, input.len())
}

/// Texts of every suggestion, in order.
#[allow(dead_code)]
pub fn texts(suggestions: &Suggestions) -> Vec<&str> {
    suggestions.list().iter().map(|s| s.text()).collect()
}

/// Assert the set's range, that every entry shares it, and the texts.
#[allow(dead_code)]
pub fn assert_suggestions(suggestions: &Suggestions, range: StringRange, expected: &[&str]) {
    assert_eq!(suggestions.range(), range, "range of {suggestions:?}");
    for suggestion in suggestions.list() {
        assert_eq!(suggestion.range(), range, "range of {suggestion:?}");
    }
    assert_eq!(texts(suggestions), expected);
}
