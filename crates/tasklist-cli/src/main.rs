#![forbid(unsafe_code)]

mod cmd;
mod output;
mod tui;

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::{CommandFactory, Parser, Subcommand};
use output::{CliError, OutputMode, Reported, fail, resolve_output_mode};
use std::env;
use std::process::ExitCode;
use tasklist_core::config::{LoadedConfig, load_config};
use tasklist_core::{ErrorCode, TaskStore};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "tl: a small terminal task list",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format for non-interactive commands.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Shorthand for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    /// Start with the example tasks, overriding config.
    #[arg(long, global = true, conflicts_with = "no_seed")]
    seed: bool,

    /// Start with an empty list, overriding config.
    #[arg(long, global = true)]
    no_seed: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl Cli {
    /// Seed choice from flags, if any was given.
    const fn seed_override(&self) -> Option<bool> {
        if self.no_seed {
            Some(false)
        } else if self.seed {
            Some(true)
        } else {
            None
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Interactive",
        about = "Open the interactive task list",
        long_about = "Open the full-screen task list. This is the default when no subcommand is given.",
        after_help = "EXAMPLES:\n    # Open the task list\n    tl\n\n    # Start from an empty list\n    tl tui --no-seed"
    )]
    Tui,

    #[command(
        next_help_heading = "Scripting",
        about = "Run a script of task operations",
        long_about = "Apply add/toggle/delete/filter commands from a file or stdin to a fresh list and print each result.",
        after_help = "EXAMPLES:\n    # Run a script file\n    tl run tasks.tl\n\n    # Pipe commands in\n    printf 'add Buy milk\\nlist\\n' | tl run\n\n    # Emit one JSON report\n    tl run tasks.tl --format json"
    )]
    Run(cmd::run::RunArgs),

    #[command(
        next_help_heading = "Setup",
        about = "Show the effective configuration",
        long_about = "Show the config file location and the settings after flags and environment are applied.",
        after_help = "EXAMPLES:\n    # Show configuration\n    tl config\n\n    # Emit machine-readable output\n    tl config --format json"
    )]
    Config,

    #[command(
        next_help_heading = "Setup",
        about = "Generate shell completions",
        long_about = "Generate shell completion scripts for tl.",
        after_help = "EXAMPLES:\n    # Bash completions\n    tl completions bash > ~/.local/share/bash-completion/completions/tl\n\n    # Zsh completions\n    tl completions zsh > ~/.zfunc/_tl"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("TASKLIST_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "tasklist_core=debug,tl=debug,info"
        } else {
            "tasklist_core=info,tl=info,warn"
        })
    });

    let format = env::var("TASKLIST_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn initial_store(seed: bool) -> TaskStore {
    if seed {
        TaskStore::seeded()
    } else {
        TaskStore::new()
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if !err.is::<Reported>() {
                eprintln!("Error: {err:?}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let loaded = match load_config() {
        Ok(loaded) => loaded,
        Err(err) => {
            let code = ErrorCode::ConfigParseError;
            let mode = resolve_output_mode(cli.format, cli.json, None);
            return Err(fail(
                mode,
                CliError::coded(code, format!("{}: {err:#}", code.message())),
            ));
        }
    };
    let LoadedConfig { config, .. } = &loaded;

    let output = resolve_output_mode(cli.format, cli.json, config.output.as_deref());
    let seed = cli.seed_override().unwrap_or(config.store.seed);
    debug!(?output, seed, "resolved session settings");

    match cli.command.unwrap_or(Commands::Tui) {
        Commands::Tui => tui::run_tui(initial_store(seed), &config.tui),
        Commands::Run(args) => cmd::run::run_script(&args, output, initial_store(seed)),
        Commands::Config => {
            let effective = cmd::config::EffectiveConfig::new(&loaded, output, seed);
            cmd::config::run_config(&effective, output)
        }
        Commands::Completions(args) => {
            cmd::completions::run_completions(args.shell, &mut Cli::command())
        }
    }
}
