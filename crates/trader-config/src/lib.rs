//! Configuration management.
//!
//! A TOML file layered with `TRADER__<SECTION>__<KEY>` environment
//! overrides, e.g. `TRADER__TRADING__SIZE_FRACTION=0.05` or
//! `TRADER__TRADING__SYMBOLS=AAPL,MSFT`.

mod settings;

pub use settings::{
    AlpacaSettings, AppConfig, AppSettings, LoggingConfig, TiingoSettings, TradingSettings,
};
pub use config::ConfigError;

use config::{Config, Environment, File};
use std::path::Path;

/// Load configuration from file and environment, then validate it.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from(path).required(true))
        .add_source(
            Environment::with_prefix("TRADER")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("trading.symbols")
                .try_parsing(true),
        )
        .build()?;

    let app: AppConfig = config.try_deserialize()?;
    app.validate()?;
    Ok(app)
}

/// Render a configuration as TOML.
pub fn to_toml(config: &AppConfig) -> Result<String, toml::ser::Error> {
    toml::to_string_pretty(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write;
    use trader_core::types::Timeframe;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_partial_file_fills_defaults() {
        let file = write_config(
            r#"
            [trading]
            size_fraction = 0.05
            symbols = ["AAPL", "MSFT"]

            [strategy]
            ema_fast_period = 9
            "#,
        );

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.trading.size_fraction, dec!(0.05));
        assert_eq!(config.trading.symbols, vec!["AAPL", "MSFT"]);
        assert_eq!(config.trading.timeframe, Timeframe::Minute5);
        assert_eq!(config.strategy.ema_fast_period, 9);
        assert_eq!(config.strategy.ema_slow_period, 26);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.alpaca.api_key_env, "ALPACA_API_KEY");
    }

    #[test]
    fn test_invalid_strategy_rejected() {
        let file = write_config(
            r#"
            [strategy]
            ema_fast_period = 30
            ema_slow_period = 20
            "#,
        );
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn test_missing_file_rejected() {
        assert!(load_config(Path::new("/no/such/trader.toml")).is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = AppConfig::default();
        let rendered = to_toml(&config).unwrap();
        assert!(rendered.contains("[trading]"));
        assert!(rendered.contains("[strategy]"));

        let back: AppConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(back.trading.poll_interval_secs, 300);
        assert_eq!(back.strategy, config.strategy);
    }
}
