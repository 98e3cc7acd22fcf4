//! toolsync CLI
//!
//! Resolves plugins and configuration for a multi-package repository and
//! applies them to every package manifest.

mod cli;
mod commands;
mod error;
mod session;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use error::Result;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Some(cmd) => execute_command(cmd).await,
        None => {
            println!("{} Plugin-driven workspace configuration", "toolsync".green().bold());
            println!();
            println!("Run {} for available commands.", "toolsync --help".cyan());
            Ok(())
        }
    }
}

/// `RUST_LOG` wins when set; otherwise `debug` with `--verbose`, `warn` without.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .try_init();
    if installed.is_ok() {
        tracing::debug!("Verbose mode enabled");
    }
}

async fn execute_command(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Prepare { input, dry_run } => commands::run_prepare(&input, dry_run).await,
        Commands::Plugins { input, json } => commands::run_plugins(&input, json).await,
        Commands::Config { input, json } => commands::run_config(&input, json).await,
    }
}
