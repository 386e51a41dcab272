//! CLI argument parsing and command dispatch

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::commands;

/// Resource Locator - Generate the resource locator of a PHP project
#[derive(Parser, Debug)]
#[command(name = "resource-locator")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Use the given directory as the working directory
    #[arg(short = 'd', long, global = true, value_name = "DIR")]
    working_dir: Option<PathBuf>,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate the resource locator, as after an install or update
    Dump(commands::dump::DumpArgs),

    /// Resolve a logical path through the generated cache
    Locate(commands::locate::LocateArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level);

        if let Some(dir) = &self.working_dir {
            env::set_current_dir(dir)
                .with_context(|| format!("Invalid working directory: {}", dir.display()))?;
        }

        match self.command {
            Commands::Dump(args) => commands::dump::execute(args, &self.color),
            Commands::Locate(args) => commands::locate::execute(args),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}

/// Initialize `env_logger`; `RUST_LOG` wins over `--log-level` when set.
fn init_logging(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    // Ignore a second initialization
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_target(false)
        .try_init();
}
