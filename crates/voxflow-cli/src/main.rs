//! CLI entry point for voxflow.
//!
//! This binary provides the `voxflow` command: an interactive voice command
//! loop over stdin plus one-shot inspection subcommands.

mod app;
mod catalog;
mod cli;
mod commands;
mod config;
mod console;
mod repl;

use anyhow::Result;
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::config::VoxflowConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Credentials may live in .env; load it before anything reads them.
    let dotenv = dotenvy::dotenv().ok();

    let config = VoxflowConfig::load(&cli.config)?;
    init_tracing(&config.general.log_level);

    if let Some(path) = dotenv {
        debug!(path = %path.display(), "loaded .env");
    }
    info!(
        path = %cli.config.display(),
        found = cli.config.exists(),
        "configuration loaded"
    );

    match cli.command {
        Commands::Run { no_llm } => repl::cmd_run(config, no_llm).await,
        Commands::Parse { text } => commands::cmd_parse(&config, &text.join(" ")),
        Commands::Match { text } => commands::cmd_match(&config, &text.join(" ")),
        Commands::Workflows => commands::cmd_workflows(&config),
        Commands::Status => commands::cmd_status(&config, &cli.config),
    }
}

/// Initialize the tracing subscriber with the given default log level.
fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
