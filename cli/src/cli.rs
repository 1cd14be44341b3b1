//! CLI argument parsing with clap derive

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, OutputFlags};
use crate::commands;

/// Remove application stacks and track their progress
#[derive(Parser)]
#[command(
    name = "teardown",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(
        long,
        global = true,
        env = "NO_COLOR",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub no_color: bool,

    /// Log backend calls and poll progress to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Remove the app's stacks
    Remove(commands::RemoveArgs),
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self) -> Result<ExitCode> {
        let Cli {
            no_color,
            quiet,
            json,
            verbose: _,
            command,
        } = self;
        let app = AppContext::new(&OutputFlags {
            no_color,
            quiet,
            json,
        })?;
        match command {
            Command::Remove(args) => commands::remove::run(&app, &args).await,
        }
    }
}

/// Install the global `tracing` subscriber.
///
/// Events go to stderr so `--json` output on stdout stays parseable.
/// `RUST_LOG` wins over `--verbose`. Colours follow `--no-color`/`NO_COLOR`
/// and are off when stderr is not a terminal.
pub fn init_tracing(verbose: bool, no_color: bool) {
    use tracing_subscriber::EnvFilter;

    let default = if verbose { "teardown_cli=debug" } else { "warn" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_ansi(log_ansi(no_color, console::Term::stderr().is_term()))
        .with_target(false)
        .try_init();
}

fn log_ansi(no_color: bool, stderr_is_term: bool) -> bool {
    !no_color && stderr_is_term
}
