//! `tl run`: replay a script of task operations against a fresh store.
//!
//! One command per line. Blank lines and lines starting with `#` are
//! skipped; a `#` later in the line is ordinary text:
//!
//! ```text
//! # weekly chores
//! add Buy milk
//! toggle 1
//! delete 2
//! filter pending
//! list
//! stats
//! ```
//!
//! `rm` and `ls` are aliases for `delete` and `list`.
//!
//! Malformed lines abort the run. Validation failures from `add` are
//! reported and the run continues, unless `--strict` is set.

use anyhow::Context;
use clap::Args;
use serde::Serialize;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tasklist_core::model::ParseFilterError;
use tasklist_core::{Action, ErrorCode, Filter, Outcome, Snapshot, Stats, Task, TaskId, TaskStore};
use tracing::{debug, info, warn};

use crate::output::{
    CliError, OutputMode, check_box, fail, render_stats, render_task_view, write_json,
};

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Script file to run; reads stdin when omitted or `-`.
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Stop at the first rejected `add`.
    #[arg(long)]
    pub strict: bool,
}

/// One parsed script line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptCommand {
    Apply(Action),
    List,
    Stats,
}

impl ScriptCommand {
    const fn verb(&self) -> &'static str {
        match self {
            Self::Apply(Action::Add(_)) => "add",
            Self::Apply(Action::Toggle(_)) => "toggle",
            Self::Apply(Action::Delete(_)) => "delete",
            Self::Apply(Action::SetFilter(_)) => "filter",
            Self::List => "list",
            Self::Stats => "stats",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScriptError {
    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),

    #[error("'{0}' is not a valid task id")]
    InvalidId(String),

    #[error(transparent)]
    InvalidFilter(#[from] ParseFilterError),

    #[error("'{0}' takes no arguments")]
    UnexpectedArgument(&'static str),
}

impl ScriptError {
    const fn error_code(&self) -> ErrorCode {
        match self {
            Self::UnknownCommand(_) | Self::MissingArgument(_) | Self::UnexpectedArgument(_) => {
                ErrorCode::InvalidScriptLine
            }
            Self::InvalidId(_) => ErrorCode::InvalidTaskId,
            Self::InvalidFilter(_) => ErrorCode::InvalidFilter,
        }
    }
}

fn parse_id(verb: &'static str, rest: &str) -> Result<TaskId, ScriptError> {
    if rest.is_empty() {
        return Err(ScriptError::MissingArgument(verb));
    }
    rest.parse::<TaskId>()
        .map_err(|_| ScriptError::InvalidId(rest.to_string()))
}

/// Parse one script line. `Ok(None)` for blank lines and comments.
///
/// The `add` title is everything after the verb; the store trims it.
pub fn parse_line(raw: &str) -> Result<Option<ScriptCommand>, ScriptError> {
    let line = raw.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (verb, rest) = line
        .split_once(char::is_whitespace)
        .unwrap_or((line, ""));
    let rest = rest.trim();

    let command = match verb.to_ascii_lowercase().as_str() {
        "add" => ScriptCommand::Apply(Action::Add(rest.to_string())),
        "toggle" => ScriptCommand::Apply(Action::Toggle(parse_id("toggle", rest)?)),
        "delete" | "rm" => ScriptCommand::Apply(Action::Delete(parse_id("delete", rest)?)),
        "filter" => {
            if rest.is_empty() {
                return Err(ScriptError::MissingArgument("filter"));
            }
            ScriptCommand::Apply(Action::SetFilter(rest.parse::<Filter>()?))
        }
        "list" | "ls" => {
            if !rest.is_empty() {
                return Err(ScriptError::UnexpectedArgument("list"));
            }
            ScriptCommand::List
        }
        "stats" => {
            if !rest.is_empty() {
                return Err(ScriptError::UnexpectedArgument("stats"));
            }
            ScriptCommand::Stats
        }
        other => return Err(ScriptError::UnknownCommand(other.to_string())),
    };
    Ok(Some(command))
}

/// Result of one executed line.
#[derive(Debug, Clone, Serialize)]
pub struct StepResult {
    pub line: usize,
    pub command: &'static str,
    pub ok: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task: Option<Task>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Filter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tasks: Option<Vec<Task>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<Stats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<CliError>,
}

impl StepResult {
    const fn new(line: usize, command: &'static str, message: String) -> Self {
        Self {
            line,
            command,
            ok: true,
            message,
            task: None,
            filter: None,
            tasks: None,
            stats: None,
            error: None,
        }
    }
}

/// Full JSON payload for `tl run --format json`.
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub results: Vec<StepResult>,
    pub snapshot: Snapshot,
}

/// Execute one parsed command against the store.
pub fn execute(store: &mut TaskStore, line: usize, command: ScriptCommand) -> StepResult {
    let verb = command.verb();
    match command {
        ScriptCommand::Apply(action) => match store.apply(action) {
            Ok(outcome) => {
                debug!(line, command = verb, changed = outcome.changed(), "step applied");
                let mut step = StepResult::new(line, verb, outcome.message());
                step.task = outcome.task().cloned();
                if let Outcome::FilterChanged(filter) = outcome {
                    step.filter = Some(filter);
                }
                step
            }
            Err(err) => {
                warn!(line, %err, "add rejected");
                let mut step = StepResult::new(line, verb, err.to_string());
                step.ok = false;
                step.error = Some(CliError::from(&err));
                step
            }
        },
        ScriptCommand::List => {
            let filter = store.filter();
            let tasks: Vec<Task> = store.filtered_view().into_iter().cloned().collect();
            let mut step = StepResult::new(line, verb, format!("{} task(s)", tasks.len()));
            step.filter = Some(filter);
            step.tasks = Some(tasks);
            step
        }
        ScriptCommand::Stats => {
            let stats = store.stats();
            let mut step = StepResult::new(
                line,
                verb,
                format!(
                    "{} total, {} pending, {} completed",
                    stats.total, stats.pending, stats.completed
                ),
            );
            step.stats = Some(stats);
            step
        }
    }
}

/// Print one step in pretty or text mode.
pub fn render_step(w: &mut dyn Write, step: &StepResult, mode: OutputMode) -> io::Result<()> {
    if let (Some(filter), Some(tasks)) = (step.filter, step.tasks.as_deref()) {
        return render_task_view(w, filter, tasks, mode);
    }
    if let Some(stats) = step.stats.as_ref() {
        return render_stats(w, stats, mode);
    }

    match mode {
        OutputMode::Pretty => {
            let mark = if step.ok { "✓" } else { "✗" };
            match step.task.as_ref() {
                Some(task) => writeln!(
                    w,
                    "{mark} {}: {} #{} {}",
                    step.message,
                    check_box(task.completed()),
                    task.id(),
                    task.title()
                ),
                None => writeln!(w, "{mark} {}", step.message),
            }
        }
        OutputMode::Text | OutputMode::Json => {
            let status = if step.ok { "ok" } else { "error" };
            match step.task.as_ref() {
                Some(task) => writeln!(
                    w,
                    "{status}  {}  {}  {}",
                    step.command,
                    task.id(),
                    step.message
                ),
                None => writeln!(w, "{status}  {}  {}", step.command, step.message),
            }
        }
    }
}

fn write_report(w: &mut dyn Write, results: Vec<StepResult>, store: &TaskStore) -> io::Result<()> {
    let report = RunReport {
        results,
        snapshot: store.snapshot(),
    };
    write_json(w, &report)
}

fn read_script(file: Option<&PathBuf>) -> anyhow::Result<String> {
    match file {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display())),
        _ => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read script from stdin")?;
            Ok(buf)
        }
    }
}

/// Execute `tl run`.
pub fn run_script(args: &RunArgs, output: OutputMode, mut store: TaskStore) -> anyhow::Result<()> {
    let script = read_script(args.file.as_ref())?;
    info!(lines = script.lines().count(), strict = args.strict, "running script");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut results = Vec::new();

    for (idx, raw) in script.lines().enumerate() {
        let line = idx + 1;
        let command = match parse_line(raw) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                return Err(fail(
                    output,
                    CliError::coded(err.error_code(), format!("line {line}: {err}")),
                ));
            }
        };

        let step = execute(&mut store, line, command);
        if !output.is_json() {
            render_step(&mut out, &step, output)?;
        }

        let failed = !step.ok;
        results.push(step);
        if failed && args.strict {
            if output.is_json() {
                write_report(&mut out, results, &store)?;
            }
            anyhow::bail!("script stopped at line {line} (--strict)");
        }
    }

    if output.is_json() {
        write_report(&mut out, results, &store)?;
    }

    Ok(())
}
