//! Cursor-based reader over a single line of command input.
//!
//! [`StringReader`] owns a shared, immutable input string and a mutable byte
//! cursor. Both the tree parser and argument types pull tokens from it.
//! Cloning a reader is cheap (the text is reference-counted) and yields an
//! independent cursor, which is how speculative parse branches stay isolated.

use std::str::FromStr;
use std::sync::Arc;

use cmdtree_diagnostics::{CommandSyntaxError, codes};

/// Character that separates one node's token from the next.
pub const ARGUMENT_SEPARATOR: char = ' ';

const SYNTAX_ESCAPE: char = '\\';
const SYNTAX_QUOTE: char = '"';

/// An immutable input string plus a read position.
///
/// The cursor is a byte offset and always satisfies
/// `0 <= cursor <= string().len()`, landing on a UTF-8 character boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringReader {
    string: Arc<str>,
    cursor: usize,
}

impl StringReader {
    /// Create a reader positioned at the start of `input`.
    pub fn new(input: impl Into<Arc<str>>) -> Self {
        Self {
            string: input.into(),
            cursor: 0,
        }
    }

    /// Create a reader positioned at `cursor` (clamped to the input length).
    pub fn with_cursor(input: impl Into<Arc<str>>, cursor: usize) -> Self {
        let mut reader = Self::new(input);
        reader.set_cursor(cursor);
        reader
    }

    /// The full input.
    pub fn string(&self) -> &str {
        &self.string
    }

    /// The full input as a shared handle.
    pub fn shared_string(&self) -> Arc<str> {
        Arc::clone(&self.string)
    }

    /// Current byte offset.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Move the cursor. Offsets past the end are clamped to the input length.
    pub fn set_cursor(&mut self, cursor: usize) {
        self.cursor = cursor.min(self.string.len());
    }

    /// Bytes left to read.
    pub fn remaining_length(&self) -> usize {
        self.string.len() - self.cursor
    }

    /// Total input length in bytes.
    pub fn total_length(&self) -> usize {
        self.string.len()
    }

    /// Input already consumed.
    pub fn consumed(&self) -> &str {
        &self.string[..self.cursor]
    }

    /// Input not yet consumed.
    pub fn remaining(&self) -> &str {
        &self.string[self.cursor..]
    }

    /// Whether at least `length` more bytes can be read.
    pub fn can_read_n(&self, length: usize) -> bool {
        self.cursor + length <= self.string.len()
    }

    /// Whether at least one more character can be read.
    pub fn can_read(&self) -> bool {
        self.can_read_n(1)
    }

    /// The character under the cursor.
    pub fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    /// The character `offset` characters past the cursor.
    pub fn peek_at(&self, offset: usize) -> Option<char> {
        self.remaining().chars().nth(offset)
    }

    /// Consume and return the character under the cursor.
    pub fn read(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.cursor += c.len_utf8();
        Some(c)
    }

    /// Advance past the character under the cursor, if any.
    pub fn skip(&mut self) {
        self.read();
    }

    /// Advance past any whitespace.
    pub fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.skip();
        }
    }

    /// Build an error positioned at the current cursor.
    pub fn syntax_error(
        &self,
        code: &'static str,
        substitutions: &[(&str, String)],
    ) -> CommandSyntaxError {
        self.syntax_error_at(code, substitutions, self.cursor)
    }

    /// Build an error positioned at `cursor`.
    pub fn syntax_error_at(
        &self,
        code: &'static str,
        substitutions: &[(&str, String)],
        cursor: usize,
    ) -> CommandSyntaxError {
        CommandSyntaxError::new(code, substitutions).with_position(self.string.as_ref(), cursor)
    }

    // ── Numbers ─────────────────────────────────────────────────────────

    /// Read a 32-bit signed integer.
    pub fn read_int(&mut self) -> Result<i32, CommandSyntaxError> {
        self.read_number(codes::READER_EXPECTED_INT, codes::READER_INVALID_INT)
    }

    /// Read a 64-bit signed integer.
    pub fn read_long(&mut self) -> Result<i64, CommandSyntaxError> {
        self.read_number(codes::READER_EXPECTED_LONG, codes::READER_INVALID_LONG)
    }

    /// Read a double-precision number.
    pub fn read_double(&mut self) -> Result<f64, CommandSyntaxError> {
        self.read_number(codes::READER_EXPECTED_DOUBLE, codes::READER_INVALID_DOUBLE)
    }

    /// Read a single-precision number.
    pub fn read_float(&mut self) -> Result<f32, CommandSyntaxError> {
        self.read_number(codes::READER_EXPECTED_FLOAT, codes::READER_INVALID_FLOAT)
    }

    /// Accumulate number characters and parse them as `T`.
    ///
    /// An empty token fails at the token start; an unparseable one fails with
    /// the cursor left after the whole malformed token.
    fn read_number<T: FromStr>(
        &mut self,
        expected: &'static str,
        invalid: &'static str,
    ) -> Result<T, CommandSyntaxError> {
        let start = self.cursor;
        while let Some(c) = self.peek() {
            let previous = self.string[start..self.cursor].chars().next_back();
            if !is_allowed_number(c, previous) {
                break;
            }
            self.skip();
        }
        let number = &self.string[start..self.cursor];
        if number.is_empty() {
            return Err(self.syntax_error_at(expected, &[], start));
        }
        number
            .parse::<T>()
            .map_err(|_| self.syntax_error(invalid, &[("value", number.to_string())]))
    }

    // ── Strings ─────────────────────────────────────────────────────────

    /// Read a run of non-whitespace characters (possibly empty).
    pub fn read_unquoted_string(&mut self) -> String {
        let start = self.cursor;
        while self.peek().is_some_and(|c| !c.is_whitespace()) {
            self.skip();
        }
        self.string[start..self.cursor].to_string()
    }

    /// Read a `"`-delimited string, honouring `\"` and `\\` escapes.
    ///
    /// Returns an empty string at end of input. On failure the cursor is
    /// restored to the opening quote, which is also where the error points.
    pub fn read_quoted_string(&mut self) -> Result<String, CommandSyntaxError> {
        if !self.can_read() {
            return Ok(String::new());
        }
        let start = self.cursor;
        if self.peek() != Some(SYNTAX_QUOTE) {
            return Err(self.syntax_error(codes::READER_EXPECTED_START_OF_QUOTE, &[]));
        }
        self.skip();

        let mut result = String::new();
        let mut escaped = false;
        while let Some(c) = self.read() {
            if escaped {
                if c == SYNTAX_QUOTE || c == SYNTAX_ESCAPE {
                    result.push(c);
                    escaped = false;
                } else {
                    self.cursor = start;
                    return Err(self.syntax_error(
                        codes::READER_INVALID_ESCAPE,
                        &[("character", c.to_string())],
                    ));
                }
            } else if c == SYNTAX_ESCAPE {
                escaped = true;
            } else if c == SYNTAX_QUOTE {
                return Ok(result);
            } else {
                result.push(c);
            }
        }

        self.cursor = start;
        Err(self.syntax_error(codes::READER_EXPECTED_END_OF_QUOTE, &[]))
    }

    /// Read a quoted string if the next character is `"`, else an unquoted one.
    pub fn read_string(&mut self) -> Result<String, CommandSyntaxError> {
        if self.peek() == Some(SYNTAX_QUOTE) {
            self.read_quoted_string()
        } else {
            Ok(self.read_unquoted_string())
        }
    }

    /// Read exactly `true` or `false`.
    pub fn read_boolean(&mut self) -> Result<bool, CommandSyntaxError> {
        let start = self.cursor;
        let value = self.read_string()?;
        if value.is_empty() {
            self.cursor = start;
            return Err(self.syntax_error(codes::READER_EXPECTED_BOOL, &[]));
        }
        match value.as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(self.syntax_error(codes::READER_INVALID_BOOL, &[("value", value)])),
        }
    }

    /// Consume `c` or fail without moving the cursor.
    pub fn expect(&mut self, c: char) -> Result<(), CommandSyntaxError> {
        if self.peek() != Some(c) {
            return Err(self.syntax_error(
                codes::READER_EXPECTED_SYMBOL,
                &[("symbol", c.to_string())],
            ));
        }
        self.skip();
        Ok(())
    }
}

/// A leading `+` is not a sign; it is only accepted inside an exponent.
fn is_allowed_number(c: char, previous: Option<char>) -> bool {
    match c {
        '0'..='9' | '.' | '-' => true,
        'e' | 'E' => previous.is_some(),
        '+' => matches!(previous, Some('e' | 'E')),
        _ => false,
    }
}
