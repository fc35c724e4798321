//! CLI argument definitions for voxflow.
//!
//! All `clap` structures live here so that `main.rs` stays focused on
//! dispatching subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// voxflow -- voice commands and workflows for web UIs.
#[derive(Parser)]
#[command(
    name = "voxflow",
    version,
    about = "voxflow -- voice command and workflow engine",
    long_about = "Parses spoken commands into intents, matches them against registered UI \
                  actions and builds multi-step workflows, optionally planned by an LLM."
)]
pub struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, short, global = true, default_value = "config/voxflow.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Read commands from stdin, one per line, and execute them.
    Run {
        /// Skip the LLM planner even when an API key is configured.
        #[arg(long)]
        no_llm: bool,
    },

    /// Parse a command and print the intent as JSON.
    Parse {
        /// The command text.
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Print the registered action that best matches a command.
    Match {
        /// The command text.
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// List the static workflows from the configuration.
    Workflows,

    /// Show configuration and credential status.
    Status,
}
