//! Completion suggestions and the builder that accumulates them.
//!
//! A [`Suggestion`] is a replacement for some [`StringRange`] of the input.
//! Argument types and literal nodes contribute suggestions through a
//! [`SuggestionsBuilder`]; the dispatcher then unifies everything into one
//! [`Suggestions`] set whose entries all share a single range.

use std::cmp::Ordering;

use futures::future::{BoxFuture, FutureExt, ready};
use indexmap::IndexSet;
use serde::Serialize;

use crate::range::StringRange;

/// One completion candidate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Suggestion {
    range: StringRange,
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    tooltip: Option<String>,
    /// Set for numeric suggestions, which sort by value among themselves.
    #[serde(skip)]
    value: Option<i32>,
}

impl Suggestion {
    /// A text suggestion replacing `range`.
    pub fn new(range: StringRange, text: impl Into<String>) -> Self {
        Self {
            range,
            text: text.into(),
            tooltip: None,
            value: None,
        }
    }

    /// A text suggestion with a tooltip.
    pub fn with_tooltip(
        range: StringRange,
        text: impl Into<String>,
        tooltip: impl Into<String>,
    ) -> Self {
        Self {
            tooltip: Some(tooltip.into()),
            ..Self::new(range, text)
        }
    }

    /// A numeric suggestion.
    pub fn integer(range: StringRange, value: i32, tooltip: Option<String>) -> Self {
        Self {
            range,
            text: value.to_string(),
            tooltip,
            value: Some(value),
        }
    }

    /// The range this suggestion replaces.
    pub fn range(&self) -> StringRange {
        self.range
    }

    /// The replacement text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Optional hover text.
    pub fn tooltip(&self) -> Option<&str> {
        self.tooltip.as_deref()
    }

    /// The numeric value of an integer suggestion.
    pub fn value(&self) -> Option<i32> {
        self.value
    }

    /// Replace this suggestion's range in `input` with its text.
    pub fn apply(&self, input: &str) -> String {
        if self.range.start() == 0 && self.range.end() == input.len() {
            return self.text.clone();
        }
        let mut result = String::with_capacity(input.len() + self.text.len());
        result.push_str(&input[..self.range.start()]);
        result.push_str(&self.text);
        if self.range.end() < input.len() {
            result.push_str(&input[self.range.end()..]);
        }
        result
    }

    /// Re-anchor onto the wider `range`, splicing in the parts of `command`
    /// that the original range left untouched.
    pub fn expand(&self, command: &str, range: StringRange) -> Self {
        if range == self.range {
            return self.clone();
        }
        let mut text = String::new();
        if range.start() < self.range.start() {
            text.push_str(&command[range.start()..self.range.start()]);
        }
        text.push_str(&self.text);
        if range.end() > self.range.end() {
            text.push_str(&command[self.range.end()..range.end()]);
        }
        Self {
            range,
            text,
            tooltip: self.tooltip.clone(),
            value: None,
        }
    }
}

/// A unified set of suggestions sharing one range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestions {
    range: StringRange,
    #[serde(rename = "suggestions")]
    list: Vec<Suggestion>,
}

impl Suggestions {
    /// Build a set directly from its parts.
    pub fn new(range: StringRange, list: Vec<Suggestion>) -> Self {
        Self { range, list }
    }

    /// The canonical empty set, anchored at offset 0.
    pub fn empty() -> Self {
        Self::new(StringRange::at(0), Vec::new())
    }

    /// The range every entry replaces.
    pub fn range(&self) -> StringRange {
        self.range
    }

    /// Entries in presentation order.
    pub fn list(&self) -> &[Suggestion] {
        &self.list
    }

    /// Whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Combine several sets computed against `command`.
    pub fn merge(command: &str, input: Vec<Suggestions>) -> Self {
        match input.len() {
            0 => Self::empty(),
            1 => input.into_iter().next().unwrap_or_else(Self::empty),
            _ => {
                let texts: IndexSet<Suggestion> =
                    input.into_iter().flat_map(|s| s.list).collect();
                Self::create(command, texts.into_iter().collect())
            }
        }
    }

    /// Unify `suggestions` onto the smallest range covering all of them,
    /// then deduplicate and sort.
    pub fn create(command: &str, suggestions: Vec<Suggestion>) -> Self {
        let Some(first) = suggestions.first() else {
            return Self::empty();
        };
        let (start, end) = suggestions.iter().fold(
            (first.range.start(), first.range.end()),
            |(start, end), s| (start.min(s.range.start()), end.max(s.range.end())),
        );
        let range = StringRange::between(start, end);
        let unique: IndexSet<Suggestion> = suggestions
            .iter()
            .map(|s| s.expand(command, range))
            .collect();
        Self::new(range, sort(unique.into_iter().collect()))
    }
}

/// Numeric suggestions sort by value, text suggestions case-insensitively;
/// the two runs are then interleaved by comparing their heads as text.
fn sort(list: Vec<Suggestion>) -> Vec<Suggestion> {
    let (mut numbers, mut texts): (Vec<_>, Vec<_>) =
        list.into_iter().partition(|s| s.value.is_some());
    numbers.sort_by_key(|s| s.value);
    texts.sort_by(|a, b| compare_ignore_case(&a.text, &b.text));

    let mut sorted = Vec::with_capacity(numbers.len() + texts.len());
    let mut numbers = numbers.into_iter().peekable();
    let mut texts = texts.into_iter().peekable();
    loop {
        let take_text = match (texts.peek(), numbers.peek()) {
            (Some(text), Some(number)) => {
                compare_ignore_case(&text.text, &number.text) != Ordering::Greater
            }
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => break,
        };
        let next = if take_text { texts.next() } else { numbers.next() };
        sorted.extend(next);
    }
    sorted
}

fn compare_ignore_case(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

/// Accumulates suggestions for the token starting at `start`.
///
/// `input` is the command text truncated at the completion cursor, so
/// [`remaining`](Self::remaining) is what the user has typed of the token
/// so far.
#[derive(Debug, Clone)]
pub struct SuggestionsBuilder {
    input: String,
    input_lowercase: String,
    start: usize,
    result: Vec<Suggestion>,
}

impl SuggestionsBuilder {
    /// Start a builder over `input` for the token at `start`.
    pub fn new(input: impl Into<String>, start: usize) -> Self {
        let input = input.into();
        Self {
            input_lowercase: input.to_lowercase(),
            input,
            start,
            result: Vec::new(),
        }
    }

    /// The (truncated) input.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Offset of the token being completed.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Text typed so far for the token.
    pub fn remaining(&self) -> &str {
        self.input.get(self.start..).unwrap_or_default()
    }

    /// Lower-cased [`remaining`](Self::remaining).
    pub fn remaining_lowercase(&self) -> &str {
        self.input_lowercase.get(self.start..).unwrap_or_default()
    }

    fn token_range(&self) -> StringRange {
        StringRange::between(self.start, self.input.len().max(self.start))
    }

    /// Offer `text`. Offering exactly what was typed is a no-op.
    pub fn suggest(&mut self, text: impl Into<String>) -> &mut Self {
        let text = text.into();
        if text != self.remaining() {
            self.result.push(Suggestion::new(self.token_range(), text));
        }
        self
    }

    /// Offer `text` with a tooltip.
    pub fn suggest_with_tooltip(
        &mut self,
        text: impl Into<String>,
        tooltip: impl Into<String>,
    ) -> &mut Self {
        let text = text.into();
        if text != self.remaining() {
            self.result
                .push(Suggestion::with_tooltip(self.token_range(), text, tooltip));
        }
        self
    }

    /// Offer a number.
    pub fn suggest_int(&mut self, value: i32) -> &mut Self {
        self.result
            .push(Suggestion::integer(self.token_range(), value, None));
        self
    }

    /// Absorb everything another builder collected.
    pub fn add(&mut self, other: &SuggestionsBuilder) -> &mut Self {
        self.result.extend(other.result.iter().cloned());
        self
    }

    /// A fresh builder over the same input starting at `start`.
    pub fn create_offset(&self, start: usize) -> Self {
        Self {
            input: self.input.clone(),
            input_lowercase: self.input_lowercase.clone(),
            start,
            result: Vec::new(),
        }
    }

    /// A fresh builder over the same input and start.
    pub fn restart(&self) -> Self {
        self.create_offset(self.start)
    }

    /// Finish into a unified, sorted set.
    pub fn build(&self) -> Suggestions {
        Suggestions::create(&self.input, self.result.clone())
    }

    /// [`build`](Self::build) wrapped in an already-completed future.
    pub fn build_future(&self) -> BoxFuture<'static, Suggestions> {
        ready(self.build()).boxed()
    }
}
