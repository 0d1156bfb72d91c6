//! Auto-router command-line application library

pub mod cli;
pub mod commands;
pub mod snapshot;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};

/// Install the log subscriber on stderr so stdout carries only JSON
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(log_level)
            .with_context(|| format!("Invalid log level '{}'", log_level))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

/// Run the command-line application
pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level)?;

    tracing::debug!("Starting auto-router v{}", env!("CARGO_PKG_VERSION"));

    let config = snapshot::load_config(cli.config.as_deref())?;

    match &cli.command {
        Command::Route(args) => {
            let value = commands::route(args, &config).await?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        Command::Batch(args) => {
            for line in commands::batch(args, &config).await? {
                println!("{}", serde_json::to_string(&line)?);
            }
        }
    }

    Ok(())
}
