//! Output formatting shared by the non-interactive commands.
//!
//! Commands take an [`OutputMode`] and print through the helpers here, so a
//! script can switch between readable and machine output with one flag.
//!
//! Mode selection, first match wins:
//! 1. `--format`, then the hidden `--json`
//! 2. the `FORMAT` environment variable
//! 3. `output` in the config file
//! 4. pretty on a terminal, text otherwise

use clap::ValueEnum;
use serde::Serialize;
use std::fmt::Display;
use std::io::{self, IsTerminal, Write};
use tasklist_core::config::normalize_output_mode;
use tasklist_core::{ErrorCode, Filter, Stats, Task, ValidationError};

const RULE_WIDTH: usize = 48;
const KEY_WIDTH: usize = 12;
const TEXT_HEADER: &str = "id  status  title";

/// Heading line followed by a dashed rule.
pub fn pretty_section(w: &mut dyn Write, heading: &str) -> io::Result<()> {
    writeln!(w, "{heading}")?;
    writeln!(w, "{}", "-".repeat(RULE_WIDTH))
}

/// `Key:` padded to a fixed column, then the value.
pub fn pretty_kv(w: &mut dyn Write, key: &str, value: impl Display) -> io::Result<()> {
    let label = format!("{key}:");
    writeln!(w, "{label:<KEY_WIDTH$} {value}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Headed sections with check boxes.
    Pretty,
    /// One row per record, two-space separated.
    Text,
    /// Pretty-printed JSON documents.
    Json,
}

impl OutputMode {
    pub const fn is_json(self) -> bool {
        matches!(self, Self::Json)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Pretty => "pretty",
            Self::Text => "text",
            Self::Json => "json",
        }
    }

    fn parse_name(raw: &str) -> Option<Self> {
        match normalize_output_mode(raw)? {
            "json" => Some(Self::Json),
            "text" => Some(Self::Text),
            _ => Some(Self::Pretty),
        }
    }
}

fn pick_output_mode(
    flag: Option<OutputMode>,
    json_flag: bool,
    env: Option<&str>,
    config: Option<&str>,
    is_tty: bool,
) -> OutputMode {
    let fallback = if is_tty {
        OutputMode::Pretty
    } else {
        OutputMode::Text
    };

    // Unrecognised env/config values fall through to the next source.
    flag.or_else(|| json_flag.then_some(OutputMode::Json))
        .or_else(|| env.and_then(OutputMode::parse_name))
        .or_else(|| config.and_then(OutputMode::parse_name))
        .unwrap_or(fallback)
}

pub fn resolve_output_mode(
    flag: Option<OutputMode>,
    json_flag: bool,
    config: Option<&str>,
) -> OutputMode {
    let env = std::env::var("FORMAT").ok();
    pick_output_mode(
        flag,
        json_flag,
        env.as_deref(),
        config,
        io::stdout().is_terminal(),
    )
}

/// Serialize `value` as pretty JSON plus a trailing newline.
pub fn write_json<T: Serialize + ?Sized>(w: &mut dyn Write, value: &T) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *w, value).map_err(io::Error::other)?;
    writeln!(w)
}

/// `[x]` for completed tasks, `[ ]` otherwise.
pub const fn check_box(completed: bool) -> &'static str {
    if completed { "[x]" } else { "[ ]" }
}

const fn status_word(completed: bool) -> &'static str {
    if completed { "completed" } else { "pending" }
}

fn write_task_row(w: &mut dyn Write, task: &Task, mode: OutputMode) -> io::Result<()> {
    match mode {
        OutputMode::Pretty => writeln!(
            w,
            "{} #{:<4} {}",
            check_box(task.completed()),
            task.id().get(),
            task.title()
        ),
        OutputMode::Text | OutputMode::Json => writeln!(
            w,
            "{}  {}  {}",
            task.id(),
            status_word(task.completed()),
            task.title()
        ),
    }
}

/// Print the tasks visible under `filter`.
///
/// Pretty mode heads the list with the filter label and count and falls back
/// to the empty-state text. Text mode prints the header row only when there
/// is something under it. JSON mode prints an array.
pub fn render_task_view(
    w: &mut dyn Write,
    filter: Filter,
    tasks: &[Task],
    mode: OutputMode,
) -> io::Result<()> {
    match mode {
        OutputMode::Json => return write_json(w, tasks),
        OutputMode::Text if !tasks.is_empty() => writeln!(w, "{TEXT_HEADER}")?,
        OutputMode::Text => {}
        OutputMode::Pretty => {
            pretty_section(w, &format!("{} ({})", filter.label(), tasks.len()))?;
            if tasks.is_empty() {
                let (heading, hint) = filter.empty_message();
                writeln!(w, "{heading}")?;
                return writeln!(w, "{hint}");
            }
        }
    }

    for task in tasks {
        write_task_row(w, task, mode)?;
    }
    Ok(())
}

pub fn render_stats(w: &mut dyn Write, stats: &Stats, mode: OutputMode) -> io::Result<()> {
    match mode {
        OutputMode::Pretty => {
            pretty_kv(w, "Total Tasks", stats.total)?;
            pretty_kv(w, "Pending", stats.pending)?;
            pretty_kv(w, "Completed", stats.completed)
        }
        OutputMode::Text => writeln!(
            w,
            "total={} pending={} completed={}",
            stats.total, stats.pending, stats.completed
        ),
        OutputMode::Json => write_json(w, stats),
    }
}

/// A user-facing failure with a stable code and, when known, a hint.
#[derive(Debug, Clone, Serialize)]
pub struct CliError {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// `E####` code from [`ErrorCode`].
    pub error_code: &'static str,
}

impl CliError {
    /// Error tagged with `code`; the suggestion is the code's hint.
    pub fn coded(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            suggestion: code.hint().map(str::to_string),
            error_code: code.code(),
        }
    }
}

impl From<&ValidationError> for CliError {
    fn from(err: &ValidationError) -> Self {
        Self {
            message: err.to_string(),
            suggestion: Some(err.suggestion()),
            error_code: err.error_code().code(),
        }
    }
}

/// A failure already printed by [`fail`]; `main` exits without repeating it.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct Reported {
    message: String,
}

/// Print `value` to stdout: JSON in JSON mode, otherwise through `human`.
pub fn render<T: Serialize>(
    mode: OutputMode,
    value: &T,
    human: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    let mut out = io::stdout().lock();
    if mode.is_json() {
        write_json(&mut out, value)?;
    } else {
        human(value, &mut out)?;
    }
    Ok(())
}

fn write_error(w: &mut dyn Write, mode: OutputMode, error: &CliError) -> io::Result<()> {
    if mode.is_json() {
        return write_json(w, &serde_json::json!({ "error": error }));
    }
    writeln!(w, "error: {}", error.message)?;
    match &error.suggestion {
        Some(suggestion) => writeln!(w, "  suggestion: {suggestion}"),
        None => Ok(()),
    }
}

/// Print `error` to stderr in the requested mode.
fn render_error(mode: OutputMode, error: &CliError) -> anyhow::Result<()> {
    write_error(&mut io::stderr().lock(), mode, error)?;
    Ok(())
}

/// Print `error` and turn it into a [`Reported`] failure for the caller to return.
pub fn fail(mode: OutputMode, error: CliError) -> anyhow::Error {
    match render_error(mode, &error) {
        Ok(()) => Reported {
            message: error.message,
        }
        .into(),
        Err(err) => err,
    }
}
