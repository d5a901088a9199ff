//! Paper trading command implementation.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::info;
use trader_broker::{PaperBrokerage, PaperMarketFeed};
use trader_config::AppConfig;
use trader_engine::{Orchestrator, Universe};

use crate::cli::PaperArgs;

pub async fn run(args: PaperArgs, config: AppConfig) -> Result<()> {
    let capital = Decimal::try_from(args.capital)
        .with_context(|| format!("Invalid capital {}", args.capital))?;
    if capital <= Decimal::ZERO {
        anyhow::bail!("Capital must be positive, got {}", capital);
    }

    info!(symbols = ?args.symbols, capital = %capital, "Starting paper trading");

    let broker = Arc::new(PaperBrokerage::new(capital));
    let mut collaborators = super::collaborators(&config, broker.clone())?;
    collaborators.market_data = Arc::new(PaperMarketFeed::new(
        collaborators.market_data.clone(),
        broker.clone(),
    ));
    let mut orchestrator = Orchestrator::new(
        collaborators,
        Universe::Fixed(args.symbols),
        super::trader_settings(&config),
    );

    let started = orchestrator.start_trading().await;
    info!(traders = started, "Paper trading running, press Ctrl-C to stop");

    tokio::signal::ctrl_c().await.context("Failed to listen for Ctrl-C")?;
    orchestrator.shutdown().await;

    println!("Final cash: ${}", broker.cash().round_dp(2));
    Ok(())
}
