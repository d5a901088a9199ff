//! Live trading command implementation.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use trader_broker::{AlpacaClient, AlpacaConfig, MarketClock};
use trader_config::AppConfig;
use trader_engine::{Orchestrator, Universe};

use crate::cli::RunArgs;

/// Shortest pause between clock checks, so a clock that still reports the
/// session right at its boundary is not polled in a tight loop.
const MIN_CLOCK_WAIT: Duration = Duration::from_secs(30);
/// Pause before retrying after the clock could not be read.
const CLOCK_RETRY_SECS: i64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionAction {
    Start,
    Stop,
    Keep,
}

/// What to do with the traders given the broker clock, and when to look at
/// the clock again.
fn plan_session(clock: &MarketClock, running: bool) -> (SessionAction, DateTime<Utc>) {
    match (clock.is_open, running) {
        (true, false) => (SessionAction::Start, clock.next_close),
        (true, true) => (SessionAction::Keep, clock.next_close),
        (false, true) => (SessionAction::Stop, clock.next_open),
        (false, false) => (SessionAction::Keep, clock.next_open),
    }
}

fn wait_until(at: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
    (at - now).to_std().unwrap_or(Duration::ZERO).max(MIN_CLOCK_WAIT)
}

pub async fn run(args: RunArgs, config: AppConfig) -> Result<()> {
    let alpaca = AlpacaConfig::from_env_vars(
        &config.alpaca.api_key_env,
        &config.alpaca.api_secret_env,
        config.alpaca.paper,
    )
    .context("Alpaca credentials")?;
    let alpaca = Arc::new(AlpacaClient::new(alpaca).context("Failed to create Alpaca client")?);

    let collaborators = super::collaborators(&config, alpaca.clone())?;

    let symbols = if args.symbols.is_empty() {
        config.trading.symbols.clone()
    } else {
        args.symbols
    };
    let universe = if symbols.is_empty() {
        Universe::MostActive {
            screener: alpaca.clone(),
            top: config.trading.universe_size,
        }
    } else {
        Universe::Fixed(symbols)
    };

    info!(
        broker = alpaca.config().base_url(),
        paper = config.alpaca.paper,
        "Starting intraday trader"
    );

    let mut orchestrator = Orchestrator::new(collaborators, universe, super::trader_settings(&config));

    if args.now {
        orchestrator.start_trading().await;
        tokio::signal::ctrl_c().await.context("Failed to listen for Ctrl-C")?;
        info!("Interrupted");
    } else {
        loop {
            let next_check = match alpaca.clock().await {
                Ok(clock) => {
                    let (action, next_check) = plan_session(&clock, orchestrator.is_running());
                    match action {
                        SessionAction::Start => {
                            orchestrator.start_trading().await;
                        }
                        SessionAction::Stop => orchestrator.stop_trading(),
                        SessionAction::Keep => {}
                    }
                    info!(is_open = clock.is_open, next_check = %next_check, "Waiting for next session change");
                    next_check
                }
                Err(e) => {
                    error!("Error fetching market clock: {}", e);
                    Utc::now() + ChronoDuration::seconds(CLOCK_RETRY_SECS)
                }
            };

            tokio::select! {
                _ = tokio::time::sleep(wait_until(next_check, Utc::now())) => {}
                result = tokio::signal::ctrl_c() => {
                    result.context("Failed to listen for Ctrl-C")?;
                    info!("Interrupted");
                    break;
                }
            }
        }
    }

    orchestrator.shutdown().await;
    info!("Trader stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn clock(is_open: bool) -> MarketClock {
        MarketClock {
            timestamp: Utc.with_ymd_and_hms(2024, 5, 6, 15, 0, 0).unwrap(),
            is_open,
            next_open: Utc.with_ymd_and_hms(2024, 5, 7, 13, 30, 0).unwrap(),
            next_close: Utc.with_ymd_and_hms(2024, 5, 6, 20, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_plan_open_session() {
        let open = clock(true);
        assert_eq!(plan_session(&open, false), (SessionAction::Start, open.next_close));
        assert_eq!(plan_session(&open, true), (SessionAction::Keep, open.next_close));
    }

    #[test]
    fn test_plan_closed_session() {
        let closed = clock(false);
        assert_eq!(plan_session(&closed, true), (SessionAction::Stop, closed.next_open));
        assert_eq!(plan_session(&closed, false), (SessionAction::Keep, closed.next_open));
    }

    #[test]
    fn test_wait_until_has_floor() {
        let now = Utc.with_ymd_and_hms(2024, 5, 6, 15, 0, 0).unwrap();
        assert_eq!(wait_until(now + ChronoDuration::hours(1), now), Duration::from_secs(3600));
        assert_eq!(wait_until(now, now), MIN_CLOCK_WAIT);
        assert_eq!(wait_until(now - ChronoDuration::hours(1), now), MIN_CLOCK_WAIT);
    }
}
