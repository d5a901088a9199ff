//! Offline signal generation over a CSV file.

use anyhow::{Context, Result};
use tracing::info;
use trader_config::AppConfig;
use trader_core::traits::SignalStrategy;
use trader_data::load_csv;
use trader_monitor::JsonFileSink;
use trader_signals::EmaBollingerStrategy;

use crate::cli::SignalsArgs;

pub async fn run(args: SignalsArgs, config: AppConfig) -> Result<()> {
    let path = args.data.to_string_lossy();
    let bars = load_csv(&path).with_context(|| format!("Failed to load bars from {}", path))?;
    info!(bars = bars.len(), file = %path, "Loaded bars");

    let strategy = EmaBollingerStrategy::new(config.strategy.clone())?;
    let signals = strategy.generate(&bars);

    let trades = signals.iter().filter(|s| s.decision.is_trade()).count();
    info!(signals = signals.len(), trades, "Generated signals");

    if args.write {
        let symbol = args.symbol.trim().to_uppercase();
        let sink = JsonFileSink::new(&config.trading.artifacts_dir);
        let written = sink.save_signals(&symbol, &signals).await?;
        sink.save_index(std::slice::from_ref(&symbol)).await?;
        println!("Wrote {} signals to {}", signals.len(), written.display());
    } else {
        println!("{}", serde_json::to_string_pretty(&signals)?);
    }

    Ok(())
}
