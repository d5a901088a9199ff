//! Intraday trader CLI application.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::Path;
use trader_config::{load_config, AppConfig, ConfigError};
use trader_monitor::setup_logging;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logging comes up before the config is validated so a bad file can
    // still be reported; flags win over the file.
    let loaded = load_config(&cli.config);
    let file_logging = loaded.as_ref().ok().map(|c| &c.logging);
    let level = cli
        .log_level
        .map(|l| l.as_str().to_string())
        .or_else(|| file_logging.map(|l| l.level.clone()))
        .unwrap_or_else(|| "info".to_string());
    let json = cli.json_logs || file_logging.is_some_and(|l| l.format == "json");
    let log_file = file_logging.and_then(|l| l.file.clone());

    let _guard = setup_logging(&level, json, log_file.as_deref())
        .context("Failed to set up logging")?;

    match cli.command {
        Commands::ValidateConfig => cli::commands::validate::run(&cli.config, loaded).await,
        Commands::Run(args) => cli::commands::run::run(args, required(loaded, &cli.config)?).await,
        Commands::Paper(args) => {
            cli::commands::paper::run(args, required(loaded, &cli.config)?).await
        }
        Commands::Signals(args) => {
            cli::commands::signals::run(args, required(loaded, &cli.config)?).await
        }
    }
}

fn required(
    loaded: Result<AppConfig, ConfigError>,
    path: &Path,
) -> Result<AppConfig> {
    loaded.with_context(|| format!("Failed to load configuration from {}", path.display()))
}
