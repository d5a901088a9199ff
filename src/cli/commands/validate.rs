//! Validate configuration command.

use anyhow::Result;
use rust_decimal::Decimal;
use std::path::Path;
use trader_config::{to_toml, AppConfig, ConfigError};

pub async fn run(config_path: &Path, loaded: Result<AppConfig, ConfigError>) -> Result<()> {
    println!("Validating configuration: {:?}", config_path);

    match loaded {
        Ok(config) => {
            println!("Configuration is valid!");
            println!();
            println!("App: {}", config.app.name);
            println!("Environment: {}", config.app.environment);
            println!("Log level: {}", config.logging.level);
            println!("Alpaca paper mode: {}", config.alpaca.paper);
            println!("Poll interval: {}s", config.trading.poll_interval_secs);
            println!("Timeframe: {}", config.trading.timeframe);
            println!(
                "Position size: {}% of buying power",
                config.trading.size_fraction * Decimal::ONE_HUNDRED
            );
            if config.trading.symbols.is_empty() {
                println!("Universe: top {} most active", config.trading.universe_size);
            } else {
                println!("Universe: {}", config.trading.symbols.join(", "));
            }
            println!(
                "Strategy: EMA {}/{}, Bollinger {} x{}, ATR {}",
                config.strategy.ema_fast_period,
                config.strategy.ema_slow_period,
                config.strategy.bollinger_period,
                config.strategy.bollinger_std_dev,
                config.strategy.atr_period
            );
            println!();
            println!("Effective configuration:");
            println!("{}", to_toml(&config)?);
        }
        Err(e) => {
            println!("Configuration error: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}
