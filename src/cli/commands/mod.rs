//! CLI command implementations.

pub mod paper;
pub mod run;
pub mod signals;
pub mod validate;

use anyhow::{Context, Result};
use std::sync::Arc;
use trader_config::AppConfig;
use trader_core::traits::Brokerage;
use trader_data::{TiingoClient, TiingoConfig};
use trader_engine::{Collaborators, TraderSettings};
use trader_monitor::JsonFileSink;
use trader_risk::PositionSizer;
use trader_signals::EmaBollingerStrategy;

/// Wire the Tiingo feed, chart sink and strategy around `broker`.
pub(crate) fn collaborators(config: &AppConfig, broker: Arc<dyn Brokerage>) -> Result<Collaborators> {
    let tiingo = TiingoConfig::from_env_var(&config.tiingo.api_key_env)
        .context("Tiingo credentials")?;
    let market_data = TiingoClient::new(tiingo).context("Failed to create Tiingo client")?;
    let strategy = EmaBollingerStrategy::new(config.strategy.clone())?;

    Ok(Collaborators {
        market_data: Arc::new(market_data),
        broker,
        artifacts: Arc::new(JsonFileSink::new(&config.trading.artifacts_dir)),
        strategy: Arc::new(strategy),
    })
}

pub(crate) fn trader_settings(config: &AppConfig) -> TraderSettings {
    TraderSettings {
        poll_interval: config.trading.poll_interval(),
        timeframe: config.trading.timeframe,
        sizer: PositionSizer::new(config.trading.size_fraction),
    }
}
