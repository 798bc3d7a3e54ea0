//! Diagnostics for the cmdtree command engine.
//!
//! Provides [`CommandSyntaxError`], the single error type produced while
//! reading, parsing, and executing command input, together with the catalog of
//! stable error codes in the [`codes`] module. Codes, one-line summaries,
//! message templates, and long-form explanations are generated at build time
//! from `catalog/diagnostics.json`.

#![warn(missing_docs)]

/// Diagnostic ID constants auto-generated from the catalog.
pub mod codes;

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;

/// Number of input characters shown before the `<--[HERE]` marker.
pub const CONTEXT_AMOUNT: usize = 10;

/// A syntax error raised while reading, parsing, or executing a command.
///
/// Every error carries a stable code from [`codes`] and a rendered message.
/// Errors raised against concrete input also carry that input and the cursor
/// position of the offending token, which [`Display`](std::fmt::Display)
/// renders as `<message> at position <cursor>: ...<context><--[HERE]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{message}{}", position_suffix(.input, .cursor))]
pub struct CommandSyntaxError {
    /// Stable diagnostic code (e.g., `"CMD1006"`).
    pub code: Cow<'static, str>,
    /// Human-readable message, rendered from the code's template.
    pub message: String,
    /// The full input the error was raised against, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    /// Byte offset into `input` where the offending token starts (or ends,
    /// for malformed numbers and booleans).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<usize>,
}

impl CommandSyntaxError {
    /// Create an error for `code`, rendering its catalog template with the
    /// given substitutions. The error has no position until
    /// [`with_position`](Self::with_position) is called.
    pub fn new(code: &'static str, substitutions: &[(&str, String)]) -> Self {
        let message = match message_template_for(code) {
            Some(template) => render_template(template, substitutions),
            None => code.to_string(),
        };
        Self {
            code: Cow::Borrowed(code),
            message,
            input: None,
            cursor: None,
        }
    }

    /// Shorthand for a [`codes::COMMAND_FAILED`] error with a host-supplied message.
    pub fn custom(message: impl Into<String>) -> Self {
        Self {
            code: Cow::Borrowed(codes::COMMAND_FAILED),
            message: message.into(),
            input: None,
            cursor: None,
        }
    }

    /// Attach the input and cursor position (builder pattern).
    pub fn with_position(mut self, input: impl Into<String>, cursor: usize) -> Self {
        self.input = Some(input.into());
        self.cursor = Some(cursor);
        self
    }

    /// The diagnostic code.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// The rendered message without position context.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The input this error was raised against, if any.
    pub fn input(&self) -> Option<&str> {
        self.input.as_deref()
    }

    /// The cursor position, if any.
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Whether this error carries the given code.
    pub fn is(&self, code: &str) -> bool {
        self.code == code
    }

    /// The input leading up to the cursor, followed by `<--[HERE]`.
    ///
    /// At most [`CONTEXT_AMOUNT`] characters are shown; longer prefixes are
    /// elided with `...`. Returns `None` when the error has no position.
    pub fn context(&self) -> Option<String> {
        let (input, cursor) = (self.input.as_deref()?, self.cursor?);
        Some(render_context(input, cursor))
    }

    /// Returns the human-readable explanation for this error's code, if available.
    pub fn explain(&self) -> Option<&'static str> {
        explain(&self.code)
    }
}

fn position_suffix(input: &Option<String>, cursor: &Option<usize>) -> String {
    match (input, cursor) {
        (Some(input), Some(cursor)) => {
            format!(" at position {cursor}: {}", render_context(input, *cursor))
        }
        _ => String::new(),
    }
}

fn render_context(input: &str, cursor: usize) -> String {
    let chars: Vec<char> = input.chars().collect();
    // Cursor is a byte offset; convert to a char index for slicing.
    let cursor_chars = input
        .char_indices()
        .take_while(|(offset, _)| *offset < cursor)
        .count();
    let mut out = String::new();
    if cursor_chars > CONTEXT_AMOUNT {
        out.push_str("...");
    }
    let from = cursor_chars.saturating_sub(CONTEXT_AMOUNT);
    out.extend(&chars[from..cursor_chars]);
    out.push_str("<--[HERE]");
    out
}

/// Returns the message template for a diagnostic code, if known.
///
/// Templates use `{key}` placeholders; see [`render_template`].
pub fn message_template_for(id: &str) -> Option<&'static str> {
    include!(concat!(env!("OUT_DIR"), "/generated_templates.rs"))
}

/// Returns the one-line summary for a diagnostic code, if known.
pub fn summary(id: &str) -> Option<&'static str> {
    include!(concat!(env!("OUT_DIR"), "/generated_summary.rs"))
}

/// Returns the human-readable explanation for a diagnostic code, if known.
///
/// Auto-generated from `catalog/diagnostics.json` at build time.
pub fn explain(id: &str) -> Option<&'static str> {
    include!(concat!(env!("OUT_DIR"), "/generated_explain.rs"))
}

/// Substitute `{key}` placeholders in `template`.
///
/// Unknown placeholders are left verbatim; an unterminated `{` ends
/// substitution and copies the rest of the template unchanged.
pub fn render_template(template: &str, substitutions: &[(&str, String)]) -> String {
    let substitution_map: HashMap<&str, &str> = substitutions
        .iter()
        .map(|(key, value)| (*key, value.as_str()))
        .collect();
    let mut rendered = String::with_capacity(template.len() + 16);
    let mut scan_from = 0usize;
    while let Some(open_rel) = template[scan_from..].find('{') {
        let open = scan_from + open_rel;
        rendered.push_str(&template[scan_from..open]);
        let after_open = open + 1;
        if let Some(close_rel) = template[after_open..].find('}') {
            let close = after_open + close_rel;
            let key = &template[after_open..close];
            if let Some(value) = substitution_map.get(key) {
                rendered.push_str(value);
            } else {
                rendered.push_str(&template[open..=close]);
            }
            scan_from = close + 1;
        } else {
            rendered.push_str(&template[open..]);
            return rendered;
        }
    }
    rendered.push_str(&template[scan_from..]);
    rendered
}
