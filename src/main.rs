//! spark-prompt: ask a question on the terminal and print the answer.
//!
//! The prompt is drawn on stderr so stdout carries only the result, e.g.
//! `branch=$(spark-prompt select --option main --option dev)`.
//! Exits with status 130 when the user cancels.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use spark_prompt::{
    EditorLimits, FsNamespace, Input, Outcome, PromptConfig, Prompter, Select, Traverse,
};

/// Exit status for a cancelled prompt (as for SIGINT).
const CANCELLED: u8 = 130;

#[derive(Parser, Debug)]
#[command(name = "spark-prompt", version, about = "Interactive terminal prompts")]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Write logs to this file (nothing is logged otherwise)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Text shown in front of the widget
    #[arg(long, global = true)]
    prompt: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Read a line (or several) of text
    Input {
        /// Multi-line editing; submit with Enter on an empty last line
        #[arg(long)]
        multi: bool,
        /// Hide the typed text
        #[arg(long)]
        conceal: bool,
        /// Value used when nothing is typed
        #[arg(long)]
        default: Option<String>,
        /// Maximum number of characters
        #[arg(long)]
        limit: Option<usize>,
        /// Initial text
        #[arg(long)]
        value: Option<String>,
    },
    /// Pick from a list
    Select {
        /// An option; repeat for each
        #[arg(long = "option", required = true)]
        options: Vec<String>,
        /// Allow picking several
        #[arg(long)]
        multi: bool,
        /// Rows visible at once
        #[arg(long, default_value_t = 6)]
        limit: usize,
        /// Index picked up front; repeat for each
        #[arg(long = "pick")]
        picks: Vec<usize>,
        /// Cycle focus past the ends
        #[arg(long)]
        wrap: bool,
    },
    /// Walk the filesystem and pick a path
    Path {
        /// Directory to start in
        #[arg(default_value = ".")]
        root: PathBuf,
        /// Only list directories
        #[arg(long)]
        dirs: bool,
    },
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    let _guard = match &cli.log_file {
        Some(path) => Some(setup_file_only_logging(path)?),
        None => None,
    };

    let config = PromptConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let prompter = Prompter::from_config(config)?;
    info!(command = ?cli.command, "starting prompt");

    let printed = match cli.command {
        Command::Input { multi, conceal, default, limit, value } => {
            let mut input = Input::new(cli.prompt.as_deref().unwrap_or("?"))
                .multiline(multi)
                .conceal(conceal)
                .limits(EditorLimits { chars: limit, lines: None });
            if let Some(default) = default {
                input = input.default_value(default);
            }
            if let Some(value) = value {
                input = input.value(value);
            }
            prompter.prompt(&mut input)?.committed()
        }
        Command::Select { options, multi, limit, picks, wrap } => {
            let mut select = Select::new(cli.prompt.as_deref().unwrap_or("?"), &options)
                .multi(multi)
                .limit(limit)
                .picks(picks)
                .wrap(wrap);
            prompter
                .prompt(&mut select)?
                .committed()
                .map(|indexes| indexes.iter().map(|&i| options[i].as_str()).collect::<Vec<_>>().join("\n"))
        }
        Command::Path { root, dirs } => {
            let namespace = FsNamespace::new(&root);
            let mut traverse = Traverse::new(cli.prompt.as_deref().unwrap_or("?"), namespace);
            if dirs {
                traverse = traverse.allow(|_, entry| entry.is_branch());
            }
            match prompter.prompt(&mut traverse)? {
                Outcome::Committed(trail) => Some(traverse.namespace().path(&trail).display().to_string()),
                Outcome::Cancelled => None,
            }
        }
    };

    match printed {
        Some(text) => {
            println!("{text}");
            Ok(ExitCode::SUCCESS)
        }
        None => {
            info!("prompt cancelled");
            Ok(ExitCode::from(CANCELLED))
        }
    }
}

/// File-only logging: the terminal belongs to the prompt.
fn setup_file_only_logging(log_path: &Path) -> Result<WorkerGuard> {
    let env_filter = EnvFilter::builder()
        .with_default_directive(Level::DEBUG.into())
        .from_env_lossy();

    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("Failed to open log file: {}", log_path.display()))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_ansi(false).with_writer(non_blocking))
        .init();

    Ok(guard)
}
