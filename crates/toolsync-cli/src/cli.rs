//! CLI argument parsing using clap derive

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// toolsync - Compose tool configuration from plugins and apply it to every package
#[derive(Parser, Debug)]
#[command(name = "toolsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Resolve plugins and set up every package of the workspace
    ///
    /// Examples:
    ///   toolsync prepare                      # Use toolsync.json if present
    ///   toolsync prepare --plugin prettier    # Add a built-in plugin
    ///   toolsync prepare --dry-run            # Show what would change
    Prepare {
        #[command(flatten)]
        input: ResolveArgs,

        /// Preview changes without writing manifests
        #[arg(long)]
        dry_run: bool,
    },

    /// List the plugins a resolution ends up with
    Plugins {
        #[command(flatten)]
        input: ResolveArgs,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Print the resolved configuration
    Config {
        #[command(flatten)]
        input: ResolveArgs,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },
}

/// Inputs shared by every command that resolves plugins
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveArgs {
    /// Plugin to load, by name or short id (repeatable)
    #[arg(short, long = "plugin", value_name = "PLUGIN")]
    pub plugins: Vec<String>,

    /// Config file to load (JSON, TOML or YAML)
    #[arg(short, long, value_name = "FILE", env = "TOOLSYNC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Workspace root (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,
}
