//! Configuration structures.

use config::ConfigError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use trader_core::traits::StrategyConfig;
use trader_core::types::Timeframe;
use trader_signals::EmaBollingerConfig;

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub alpaca: AlpacaSettings,
    #[serde(default)]
    pub tiingo: TiingoSettings,
    #[serde(default)]
    pub trading: TradingSettings,
    #[serde(default)]
    pub strategy: EmaBollingerConfig,
}

impl AppConfig {
    /// Check cross-field constraints serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.strategy
            .validate()
            .map_err(|e| ConfigError::Message(format!("strategy: {}", e)))?;

        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ConfigError::Message(format!(
                "logging.format must be \"pretty\" or \"json\", got {:?}",
                self.logging.format
            )));
        }

        let t = &self.trading;
        if t.size_fraction <= Decimal::ZERO || t.size_fraction > Decimal::ONE {
            return Err(ConfigError::Message(
                "trading.size_fraction must be in (0, 1]".into(),
            ));
        }
        if t.poll_interval_secs == 0 {
            return Err(ConfigError::Message(
                "trading.poll_interval_secs must be positive".into(),
            ));
        }
        if t.universe_size == 0 && t.symbols.is_empty() {
            return Err(ConfigError::Message(
                "trading.universe_size must be positive when no symbols are listed".into(),
            ));
        }
        Ok(())
    }
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "intraday-trader".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
    /// Daily-rolling log file
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

/// Alpaca API configuration. Credentials are read from the named
/// environment variables, never from the file itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlpacaSettings {
    pub api_key_env: String,
    pub api_secret_env: String,
    pub paper: bool,
}

impl Default for AlpacaSettings {
    fn default() -> Self {
        Self {
            api_key_env: "ALPACA_API_KEY".to_string(),
            api_secret_env: "ALPACA_API_SECRET".to_string(),
            paper: true,
        }
    }
}

/// Tiingo API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TiingoSettings {
    pub api_key_env: String,
}

impl Default for TiingoSettings {
    fn default() -> Self {
        Self {
            api_key_env: "TIINGO_API_KEY".to_string(),
        }
    }
}

/// Trading loop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TradingSettings {
    pub poll_interval_secs: u64,
    pub timeframe: Timeframe,
    /// Fraction of buying power committed per entry
    pub size_fraction: Decimal,
    /// How many most-active symbols to trade
    pub universe_size: usize,
    /// Directory for chart documents and their index
    pub artifacts_dir: PathBuf,
    /// Fixed symbols to trade instead of asking the screener
    pub symbols: Vec<String>,
}

impl TradingSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

impl Default for TradingSettings {
    fn default() -> Self {
        Self {
            poll_interval_secs: 300,
            timeframe: Timeframe::Minute5,
            size_fraction: dec!(0.1),
            universe_size: 10,
            artifacts_dir: PathBuf::from("public/chart_data"),
            symbols: Vec::new(),
        }
    }
}
