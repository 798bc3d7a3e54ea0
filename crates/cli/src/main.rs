//! `cmdtree`: run, complete, and describe commands from the demo tree.

mod demo;
mod render;

use std::fs;
use std::io::{self, Read};
use std::process;

use anyhow::{Context, Result, bail};
use ariadne::{Color, Fmt, ReportKind};
use clap::Parser;
use cmdtree_core::{CommandDispatcher, DispatcherConfig};
use futures::executor::block_on;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use crate::demo::Session;
use crate::render::{Format, print_json, print_summary, render_error_pretty};

// ── CLI definition ──────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "cmdtree",
    version,
    about = "Command-tree playground: run, complete, and describe commands"
)]
struct Cli {
    /// Output mode: "pretty" for coloured terminal output, "json" for
    /// machine-readable JSON. Defaults to "pretty" when stdout is a TTY,
    /// "json" otherwise.
    #[arg(long, global = true, value_parser = ["pretty", "json"])]
    output: Option<String>,

    /// Player the command runs as.
    #[arg(long = "as", global = true, default_value = "alice")]
    player: String,

    /// Run with admin permissions.
    #[arg(long, global = true)]
    admin: bool,

    /// JSON file with dispatcher settings (usage syntax).
    #[arg(long, global = true)]
    config: Option<String>,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(clap::Subcommand, Debug)]
enum Cmd {
    /// Parse and execute a command line ("-" reads it from stdin).
    Run { input: String },

    /// List completions for a partial command line.
    Suggest {
        input: String,
        /// Byte offset to complete at. Defaults to the end of the input.
        #[arg(long)]
        cursor: Option<usize>,
    },

    /// Show usage for the command at PATH (the whole tree when omitted).
    Usage {
        path: Vec<String>,
        /// List every runnable path instead of the condensed form.
        #[arg(long)]
        all: bool,
    },

    /// Explain a diagnostic code (e.g., CMD1301).
    Explain { id: String },
}

// ── Main ────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let format = Format::resolve_or_detect(cli.output.as_deref());

    let config = load_config(cli.config.as_deref())?;
    let dispatcher = demo::dispatcher(config).context("building the demo command tree")?;
    let session = Session::new(cli.player, cli.admin);

    match cli.cmd {
        Cmd::Run { input } => cmd_run(&dispatcher, &read_input(&input)?, session, format)?,
        Cmd::Suggest { input, cursor } => {
            cmd_suggest(&dispatcher, &input, cursor, session, format)?;
        }
        Cmd::Usage { path, all } => cmd_usage(&dispatcher, &path, all, &session, format)?,
        Cmd::Explain { id } => cmd_explain(&id, format)?,
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&str>) -> Result<DispatcherConfig> {
    let Some(path) = path else {
        return Ok(DispatcherConfig::default());
    };
    let text = fs::read_to_string(path).with_context(|| format!("reading config {path}"))?;
    serde_json::from_str(&text).with_context(|| format!("parsing config {path}"))
}

fn read_input(input: &str) -> Result<String> {
    if input != "-" {
        return Ok(input.to_string());
    }
    let mut buf = String::new();
    io::stdin()
        .read_to_string(&mut buf)
        .context("reading command from stdin")?;
    Ok(buf.trim_end_matches(['\r', '\n']).to_string())
}

// ── Commands ────────────────────────────────────────────────────────────

fn cmd_run(
    dispatcher: &CommandDispatcher<Session>,
    input: &str,
    session: Session,
    format: Format,
) -> Result<()> {
    tracing::debug!(input, "running command");
    let parse = dispatcher.parse(input, session.clone());
    let execution = match dispatcher.execute_detailed(&parse) {
        Ok(execution) => execution,
        Err(err) => {
            match format {
                Format::Json => print_json(&serde_json::json!({ "ok": false, "error": err }))?,
                Format::Pretty => render_error_pretty(input, &err, ReportKind::Error),
            }
            process::exit(1);
        }
    };

    match format {
        Format::Json => print_json(&serde_json::json!({
            "ok": true,
            "result": execution.value,
            "forked": execution.forked,
            "output": session.transcript(),
            "failures": execution.failures,
        }))?,
        Format::Pretty => {
            // Command output to stdout, everything else to stderr.
            for line in session.transcript() {
                println!("{line}");
            }
            for failure in &execution.failures {
                render_error_pretty(failure.input().unwrap_or(input), failure, ReportKind::Warning);
            }
            print_summary(execution.value, execution.forked, execution.failures.len());
        }
    }
    Ok(())
}

fn cmd_suggest(
    dispatcher: &CommandDispatcher<Session>,
    input: &str,
    cursor: Option<usize>,
    session: Session,
    format: Format,
) -> Result<()> {
    let cursor = cursor.unwrap_or(input.len());
    if cursor > input.len() {
        bail!("cursor {cursor} is past the end of the input ({} bytes)", input.len());
    }
    let parse = dispatcher.parse(input, session);
    let suggestions = block_on(dispatcher.completion_suggestions_at(&parse, cursor));
    tracing::debug!(count = suggestions.list().len(), "collected suggestions");

    match format {
        Format::Json => print_json(&serde_json::to_value(&suggestions)?)?,
        Format::Pretty => {
            for suggestion in suggestions.list() {
                match suggestion.tooltip() {
                    Some(tooltip) => println!("{}  {}", suggestion.text(), tooltip.fg(Color::Cyan)),
                    None => println!("{}", suggestion.text()),
                }
            }
        }
    }
    Ok(())
}

fn cmd_usage(
    dispatcher: &CommandDispatcher<Session>,
    path: &[String],
    all: bool,
    session: &Session,
    format: Format,
) -> Result<()> {
    let Some(node) = dispatcher.find_node(path) else {
        bail!("no command at '{}'", path.join(" "));
    };

    let lines: Vec<String> = if all {
        dispatcher.all_usage(node, session, true)
    } else {
        dispatcher
            .smart_usage(node, session)
            .into_values()
            .collect()
    };
    let prefix = path.join(" ");
    let lines: Vec<String> = lines
        .into_iter()
        .map(|line| {
            if prefix.is_empty() {
                line
            } else {
                format!("{prefix} {line}")
            }
        })
        .collect();

    match format {
        Format::Json => print_json(&serde_json::json!({ "path": path, "usage": lines }))?,
        Format::Pretty => {
            for line in &lines {
                println!("{line}");
            }
        }
    }
    Ok(())
}

fn cmd_explain(id: &str, format: Format) -> Result<()> {
    match format {
        Format::Json => print_json(&serde_json::json!({
            "id": id,
            "summary": cmdtree_diagnostics::summary(id),
            "explanation": cmdtree_diagnostics::explain(id),
        }))?,
        Format::Pretty => {
            // Explanation is the expected output, so it goes to stdout.
            if let Some(text) = cmdtree_diagnostics::explain(id) {
                println!("{}: {}", id.fg(Color::Cyan), text);
            } else {
                println!("{id}: (no explanation available)");
            }
        }
    }
    Ok(())
}
