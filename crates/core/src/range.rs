//! Half-open byte ranges into command input.

use serde::{Deserialize, Serialize};

/// A half-open `[start, end)` span of input, in byte offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct StringRange {
    start: usize,
    end: usize,
}

impl StringRange {
    /// An empty range anchored at `pos`.
    pub const fn at(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    /// The range `[start, end)`.
    ///
    /// # Panics
    ///
    /// Panics if `start > end`.
    pub fn between(start: usize, end: usize) -> Self {
        assert!(start <= end, "range start {start} is past its end {end}");
        Self { start, end }
    }

    /// The smallest range covering both `a` and `b`.
    pub fn encompassing(a: Self, b: Self) -> Self {
        Self {
            start: a.start.min(b.start),
            end: a.end.max(b.end),
        }
    }

    /// Inclusive start offset.
    pub const fn start(self) -> usize {
        self.start
    }

    /// Exclusive end offset.
    pub const fn end(self) -> usize {
        self.end
    }

    /// Slice `input` by this range. Out-of-bounds ends are clamped.
    pub fn get(self, input: &str) -> &str {
        let end = self.end.min(input.len());
        let start = self.start.min(end);
        &input[start..end]
    }

    /// Whether the range covers no input.
    pub const fn is_empty(self) -> bool {
        self.start == self.end
    }

    /// Length in bytes.
    pub const fn len(self) -> usize {
        self.end - self.start
    }

    /// Whether `cursor` lies within the range, counting a cursor sitting
    /// right at `end` as inside (a cursor touching a token belongs to it).
    pub const fn touches(self, cursor: usize) -> bool {
        self.start <= cursor && cursor <= self.end
    }
}

impl std::fmt::Display for StringRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}
