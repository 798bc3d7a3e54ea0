//! Pretty error rendering using ariadne.
//!
//! Converts [`CommandSyntaxError`]s into ariadne [`Report`]s pointing at the
//! offending position of the command line. Falls back to structured JSON
//! when the output is piped or when the user explicitly requests it.

use std::io::{self, IsTerminal};

use ariadne::{Color, Config, Fmt, IndexType, Label, Report, ReportKind, Source};
use cmdtree_diagnostics::{CommandSyntaxError, summary};

/// Name shown for the command line in reports.
const INPUT_NAME: &str = "<input>";

// ── Output format ───────────────────────────────────────────────────────

/// Output format for results and errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Format {
    /// Coloured, annotated output (ariadne).
    Pretty,
    /// Machine-readable JSON.
    Json,
}

impl Format {
    /// Use the explicit choice, or detect from whether stdout is a TTY.
    pub(crate) fn resolve_or_detect(explicit: Option<&str>) -> Self {
        match explicit {
            Some("json") => Format::Json,
            Some("pretty") => Format::Pretty,
            // Default: pretty for interactive terminals, JSON for pipes
            _ => {
                if io::stdout().is_terminal() {
                    Format::Pretty
                } else {
                    Format::Json
                }
            }
        }
    }
}

// ── Pretty rendering ────────────────────────────────────────────────────

/// Render one error to stderr, annotated against `input` when it carries a
/// position.
pub(crate) fn render_error_pretty(input: &str, err: &CommandSyntaxError, kind: ReportKind<'_>) {
    let Some(cursor) = err.cursor() else {
        eprintln!("{}[{}]: {}", kind_label(&kind), err.code(), err.message());
        if let Some(explanation) = err.explain() {
            eprintln!("  = help: {explanation}");
        }
        return;
    };

    let span = token_span(input, cursor);
    let config = Config::default()
        .with_compact(false)
        .with_index_type(IndexType::Byte);
    let label = summary(err.code()).unwrap_or("here");

    let mut builder = Report::build(kind, (INPUT_NAME, span.clone()))
        .with_code(err.code())
        .with_message(err.message())
        .with_config(config)
        .with_label(
            Label::new((INPUT_NAME, span))
                .with_message(label)
                .with_color(Color::Red),
        );
    if let Some(explanation) = err.explain() {
        builder = builder.with_help(explanation);
    }
    builder
        .finish()
        .eprint((INPUT_NAME, Source::from(input)))
        .ok();
}

/// Clamp `cursor` into `input` and widen it to the character it points at.
fn token_span(input: &str, cursor: usize) -> std::ops::Range<usize> {
    let mut start = cursor.min(input.len());
    while !input.is_char_boundary(start) {
        start -= 1;
    }
    let end = input[start..]
        .chars()
        .next()
        .map_or(start, |c| start + c.len_utf8());
    start..end
}

fn kind_label(kind: &ReportKind<'_>) -> &'static str {
    match kind {
        ReportKind::Error => "error",
        ReportKind::Warning => "warning",
        _ => "note",
    }
}

// ── JSON rendering ──────────────────────────────────────────────────────

/// Print `value` as pretty JSON to stdout.
pub(crate) fn print_json(value: &serde_json::Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ── Summary line ────────────────────────────────────────────────────────

/// Print a coloured summary of an execution.
///
/// Example: `result 3 (forked, 1 branch failed)`
pub(crate) fn print_summary(value: i32, forked: bool, failures: usize) {
    let mut line = format!("result {}", value.fg(Color::Green));
    match (forked, failures) {
        (false, _) => {}
        (true, 0) => line.push_str(" (forked)"),
        (true, 1) => line.push_str(&format!(" (forked, {})", "1 branch failed".fg(Color::Red))),
        (true, n) => line.push_str(&format!(
            " (forked, {})",
            format!("{n} branches failed").fg(Color::Red)
        )),
    }
    eprintln!("{line}");
}
