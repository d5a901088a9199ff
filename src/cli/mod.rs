//! CLI definitions.

pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "trader")]
#[command(author, version, about = "Intraday EMA/Bollinger mean-reversion trader")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml", env = "TRADER_CONFIG")]
    pub config: PathBuf,

    /// Log level, overrides `logging.level` from the configuration
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Trade through Alpaca during market hours
    Run(RunArgs),
    /// Trade against an in-memory paper account
    Paper(PaperArgs),
    /// Generate signals from a CSV file of bars
    Signals(SignalsArgs),
    /// Validate configuration
    ValidateConfig,
}

#[derive(clap::Args)]
pub struct RunArgs {
    /// Start immediately and keep trading until interrupted, ignoring the
    /// session schedule
    #[arg(long)]
    pub now: bool,

    /// Symbols to trade (comma-separated), overrides the screener
    #[arg(short = 'S', long, value_delimiter = ',')]
    pub symbols: Vec<String>,
}

#[derive(clap::Args)]
pub struct PaperArgs {
    /// Symbols to trade (comma-separated)
    #[arg(short = 'S', long, value_delimiter = ',', required = true)]
    pub symbols: Vec<String>,

    /// Initial capital
    #[arg(long, default_value = "100000")]
    pub capital: f64,
}

#[derive(clap::Args)]
pub struct SignalsArgs {
    /// Data file (CSV)
    #[arg(short, long)]
    pub data: PathBuf,

    /// Symbol the bars belong to
    #[arg(short, long, default_value = "DATA")]
    pub symbol: String,

    /// Write the chart document to the artifacts directory instead of
    /// printing it
    #[arg(long)]
    pub write: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_paper_symbols() {
        let cli = Cli::try_parse_from(["trader", "paper", "-S", "AAPL,MSFT", "--capital", "5000"])
            .unwrap();
        match cli.command {
            Commands::Paper(args) => {
                assert_eq!(args.symbols, vec!["AAPL", "MSFT"]);
                assert_eq!(args.capital, 5000.0);
            }
            _ => panic!("expected paper command"),
        }
        assert!(cli.log_level.is_none());
    }

    #[test]
    fn test_paper_requires_symbols() {
        assert!(Cli::try_parse_from(["trader", "paper"]).is_err());
    }

    #[test]
    fn test_parse_run_flags() {
        let cli = Cli::try_parse_from(["trader", "-l", "debug", "--json-logs", "run", "--now"])
            .unwrap();
        assert_eq!(cli.log_level.map(LogLevel::as_str), Some("debug"));
        assert!(cli.json_logs);
        match cli.command {
            Commands::Run(args) => {
                assert!(args.now);
                assert!(args.symbols.is_empty());
            }
            _ => panic!("expected run command"),
        }
    }
}
