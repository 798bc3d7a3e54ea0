use std::fmt;

use cmdtree_diagnostics::CommandSyntaxError;

use super::ArgumentType;
use crate::context::{ArgumentError, CommandContext};
use crate::reader::StringReader;

/// How much input a [`StringArgument`] consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StringKind {
    /// One unquoted token.
    SingleWord,
    /// One unquoted token, or a `"`-quoted phrase.
    QuotablePhrase,
    /// Everything up to the end of the input.
    GreedyPhrase,
}

/// A string argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StringArgument {
    kind: StringKind,
}

impl StringArgument {
    /// A string argument of the given kind.
    pub const fn new(kind: StringKind) -> Self {
        Self { kind }
    }

    /// The consumption mode.
    pub const fn kind(&self) -> StringKind {
        self.kind
    }
}

/// A single unquoted word.
pub const fn word() -> StringArgument {
    StringArgument::new(StringKind::SingleWord)
}

/// A word or a quoted phrase.
pub const fn string() -> StringArgument {
    StringArgument::new(StringKind::QuotablePhrase)
}

/// The rest of the input, spaces and all.
pub const fn greedy_string() -> StringArgument {
    StringArgument::new(StringKind::GreedyPhrase)
}

/// Fetch a string argument from `context`.
pub fn get_string<S>(context: &CommandContext<S>, name: &str) -> Result<String, ArgumentError> {
    context.argument::<String>(name)
}

/// Quote `input` if it would not read back as a single unquoted token.
pub fn escape_if_required(input: &str) -> String {
    if input
        .chars()
        .any(|c| c.is_whitespace() || c == '"' || c == '\\')
    {
        escape(input)
    } else {
        input.to_string()
    }
}

fn escape(input: &str) -> String {
    let mut result = String::with_capacity(input.len() + 2);
    result.push('"');
    for c in input.chars() {
        if c == '\\' || c == '"' {
            result.push('\\');
        }
        result.push(c);
    }
    result.push('"');
    result
}

impl ArgumentType for StringArgument {
    type Value = String;

    fn parse(&self, reader: &mut StringReader) -> Result<String, CommandSyntaxError> {
        match self.kind {
            StringKind::GreedyPhrase => {
                let text = reader.remaining().to_string();
                reader.set_cursor(reader.total_length());
                Ok(text)
            }
            StringKind::SingleWord => Ok(reader.read_unquoted_string()),
            StringKind::QuotablePhrase => reader.read_string(),
        }
    }

    fn examples(&self) -> Vec<String> {
        let examples: &[&str] = match self.kind {
            StringKind::SingleWord => &["word", "words_with_underscores"],
            StringKind::QuotablePhrase => &["\"quoted phrase\"", "word", "\"\""],
            StringKind::GreedyPhrase => &["word", "words with spaces", "\"and symbols\""],
        };
        examples.iter().map(ToString::to_string).collect()
    }
}

impl fmt::Display for StringArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self.kind {
            StringKind::SingleWord => "word()",
            StringKind::QuotablePhrase => "string()",
            StringKind::GreedyPhrase => "greedyString()",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_word() {
        let mut reader = StringReader::new("hello world");
        assert_eq!(word().parse(&mut reader).unwrap(), "hello");
        assert_eq!(reader.cursor(), 5);
    }

    #[test]
    fn parse_string() {
        let mut reader = StringReader::new("\"hello world\"");
        assert_eq!(string().parse(&mut reader).unwrap(), "hello world");
        assert!(!reader.can_read());
    }

    #[test]
    fn parse_greedy_string() {
        let mut reader = StringReader::new("Hello world! This is a test.");
        assert_eq!(
            greedy_string().parse(&mut reader).unwrap(),
            "Hello world! This is a test."
        );
        assert!(!reader.can_read());
    }

    #[test]
    fn display() {
        assert_eq!(string().to_string(), "string()");
        assert_eq!(word().to_string(), "word()");
        assert_eq!(greedy_string().to_string(), "greedyString()");
    }

    // ── escape_if_required ──────────────────────────────────────────────

    #[test]
    fn escape_not_required() {
        assert_eq!(escape_if_required("hello"), "hello");
        assert_eq!(escape_if_required(""), "");
    }

    #[test]
    fn escape_multiple_words() {
        assert_eq!(escape_if_required("hello world"), "\"hello world\"");
    }

    #[test]
    fn escape_quote() {
        assert_eq!(
            escape_if_required("hello \"world\"!"),
            "\"hello \\\"world\\\"!\""
        );
        assert_eq!(escape_if_required("\""), "\"\\\"\"");
    }

    #[test]
    fn escape_backslash() {
        assert_eq!(escape_if_required("\\"), "\"\\\\\"");
    }

    #[test]
    fn escaped_text_reads_back() {
        let original = "say \"hi\" \\o/";
        let mut reader = StringReader::new(escape_if_required(original));
        assert_eq!(string().parse(&mut reader).unwrap(), original);
    }
}
