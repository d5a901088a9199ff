//! Per-symbol position lifecycle manager.

use chrono::{DateTime, Datelike, Duration as ChronoDuration, Utc, Weekday};
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, info_span, warn, Instrument};
use trader_core::traits::{ArtifactSink, Brokerage, MarketData, SignalStrategy};
use trader_core::types::{Bar, OrderId, Position, Signal, Timeframe};
use trader_risk::{bracket_order, PositionSizer, Sizing};

use crate::ScheduledTask;

/// Shared collaborators of every manager.
#[derive(Clone)]
pub struct Collaborators {
    pub market_data: Arc<dyn MarketData>,
    pub broker: Arc<dyn Brokerage>,
    pub artifacts: Arc<dyn ArtifactSink>,
    pub strategy: Arc<dyn SignalStrategy>,
}

/// Tunables of a position manager.
#[derive(Debug, Clone)]
pub struct TraderSettings {
    /// Delay between the end of one cycle and the start of the next
    pub poll_interval: Duration,
    /// Bar sampling interval requested from market data
    pub timeframe: Timeframe,
    /// Entry sizing
    pub sizer: PositionSizer,
}

impl Default for TraderSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5 * 60),
            timeframe: Timeframe::Minute5,
            sizer: PositionSizer::default(),
        }
    }
}

/// What one polling cycle did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    MarketClosed,
    NoSignals,
    Hold,
    /// A position exists but all of its shares are committed to open orders
    PositionUnavailable,
    PositionClosed,
    /// A position exists and already agrees with the signal
    NoAction,
    InsufficientCapital,
    /// Trade signal without usable prices or exit levels
    InvalidSignal,
    OrderSubmitted(OrderId),
    OrderRejected,
}

/// Start of the bar window for a cycle at `now`: the previous Friday on
/// Sundays and Mondays, otherwise the day before.
pub fn previous_trading_day(now: DateTime<Utc>) -> DateTime<Utc> {
    let days_back = match now.weekday() {
        Weekday::Sun => 2,
        Weekday::Mon => 3,
        _ => 1,
    };
    now - ChronoDuration::days(days_back)
}

enum Step {
    Polling,
    Evaluating(Vec<Bar>),
    Deciding(Signal),
    Managing(Signal, Position),
    Entering(Signal),
    Done(CycleOutcome),
}

/// Cycle logic for a single symbol.
///
/// Holds no trading state between cycles: the position is fetched from the
/// broker every time and the strategy reruns over the full bar window.
pub struct PositionManager {
    symbol: String,
    collaborators: Collaborators,
    settings: TraderSettings,
}

impl PositionManager {
    pub fn new(
        symbol: impl Into<String>,
        collaborators: Collaborators,
        settings: TraderSettings,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            collaborators,
            settings,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Run one cycle against the current time.
    pub async fn run_cycle(&self) -> CycleOutcome {
        self.run_cycle_at(Utc::now()).await
    }

    /// Run one cycle as if the time were `now`.
    pub async fn run_cycle_at(&self, now: DateTime<Utc>) -> CycleOutcome {
        let span = info_span!("trader", symbol = %self.symbol);
        async move {
            let mut step = Step::Polling;
            loop {
                step = match step {
                    Step::Polling => self.poll(now).await,
                    Step::Evaluating(bars) => self.evaluate(bars).await,
                    Step::Deciding(signal) => self.decide(signal).await,
                    Step::Managing(signal, position) => self.manage(signal, position).await,
                    Step::Entering(signal) => self.enter(signal).await,
                    Step::Done(outcome) => {
                        info!(outcome = ?outcome, "Cycle complete");
                        return outcome;
                    }
                };
            }
        }
        .instrument(span)
        .await
    }

    async fn poll(&self, now: DateTime<Utc>) -> Step {
        let c = &self.collaborators;
        if !c.broker.is_market_open().await {
            info!("Market is closed, skipping update");
            return Step::Done(CycleOutcome::MarketClosed);
        }

        let start = previous_trading_day(now);
        let bars = c
            .market_data
            .get_bars(&self.symbol, start, now, self.settings.timeframe)
            .await;
        Step::Evaluating(bars)
    }

    async fn evaluate(&self, bars: Vec<Bar>) -> Step {
        let c = &self.collaborators;
        let mut signals = c.strategy.generate(&bars);

        if signals.is_empty() {
            info!(bars = bars.len(), "No signals found, skipping update");
            return Step::Done(CycleOutcome::NoSignals);
        }

        info!(count = signals.len(), "Found signals, writing chart data");
        c.artifacts.write_signals(&self.symbol, &signals).await;

        match signals.pop() {
            Some(signal) if signal.decision.is_trade() => Step::Deciding(signal),
            _ => Step::Done(CycleOutcome::Hold),
        }
    }

    async fn decide(&self, signal: Signal) -> Step {
        match self.collaborators.broker.fetch_position(&self.symbol).await {
            Some(position) if !position.has_available() => {
                warn!("Position has zero available quantity to manage, skipping");
                Step::Done(CycleOutcome::PositionUnavailable)
            }
            Some(position) => Step::Managing(signal, position),
            None => Step::Entering(signal),
        }
    }

    async fn manage(&self, signal: Signal, position: Position) -> Step {
        if !position.is_opposed_by(signal.decision) {
            info!(
                decision = %signal.decision,
                side = ?position.side,
                "Position already aligned with signal"
            );
            return Step::Done(CycleOutcome::NoAction);
        }

        info!(decision = %signal.decision, side = ?position.side, "Closing opposed position");
        self.collaborators.broker.close_position(&self.symbol).await;
        Step::Done(CycleOutcome::PositionClosed)
    }

    async fn enter(&self, signal: Signal) -> Step {
        let c = &self.collaborators;

        let close = match (signal.exit_levels(), Decimal::try_from(signal.close())) {
            (Some(_), Ok(close)) => close,
            _ => {
                error!(signal = ?signal, "Trade signal without usable levels");
                return Step::Done(CycleOutcome::InvalidSignal);
            }
        };

        info!(decision = %signal.decision, close = %close, "Entering position");
        c.broker.cancel_all_orders(&self.symbol).await;

        let buying_power = c.broker.get_buying_power().await;
        let quantity = match self.settings.sizer.calculate(buying_power, close) {
            Sizing::Shares(quantity) => quantity,
            Sizing::InsufficientCapital { allocation, price } => {
                warn!(
                    buying_power = %buying_power,
                    allocation = %allocation,
                    close = %price,
                    "Insufficient buying power, skipping trade"
                );
                return Step::Done(CycleOutcome::InsufficientCapital);
            }
        };

        let order = match bracket_order(&self.symbol, &signal, quantity) {
            Ok(order) => order,
            Err(e) => {
                error!("Could not build bracket order: {}", e);
                return Step::Done(CycleOutcome::InvalidSignal);
            }
        };

        match c.broker.place_order(order).await {
            Some(id) => {
                info!(order_id = %id, quantity = %quantity, "Position entered");
                Step::Done(CycleOutcome::OrderSubmitted(id))
            }
            None => {
                error!("Position NOT entered");
                Step::Done(CycleOutcome::OrderRejected)
            }
        }
    }
}

/// A [`PositionManager`] plus the schedule that drives it.
pub struct Trader {
    manager: Arc<PositionManager>,
    poll_interval: Duration,
    task: Option<ScheduledTask>,
}

impl Trader {
    pub fn new(
        symbol: impl Into<String>,
        collaborators: Collaborators,
        settings: TraderSettings,
    ) -> Self {
        let poll_interval = settings.poll_interval;
        Self {
            manager: Arc::new(PositionManager::new(symbol, collaborators, settings)),
            poll_interval,
            task: None,
        }
    }

    pub fn symbol(&self) -> &str {
        self.manager.symbol()
    }

    pub fn manager(&self) -> &PositionManager {
        &self.manager
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_cancelled())
    }

    /// Begin polling. The first cycle runs right away. No-op if already
    /// running.
    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }
        info!(symbol = %self.symbol(), "Starting trading");

        let manager = Arc::clone(&self.manager);
        self.task = Some(ScheduledTask::spawn_repeating(self.poll_interval, move || {
            let manager = Arc::clone(&manager);
            async move {
                manager.run_cycle().await;
            }
        }));
    }

    /// Stop scheduling cycles. A cycle already running is left to finish.
    pub fn stop(&mut self) -> Option<ScheduledTask> {
        let task = self.task.take()?;
        info!(symbol = %self.symbol(), "Stopping trading");
        task.cancel();
        Some(task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_previous_trading_day() {
        // 2024-05-05 is a Sunday
        let sunday = Utc.with_ymd_and_hms(2024, 5, 5, 15, 0, 0).unwrap();
        let monday = Utc.with_ymd_and_hms(2024, 5, 6, 15, 0, 0).unwrap();
        let tuesday = Utc.with_ymd_and_hms(2024, 5, 7, 15, 0, 0).unwrap();
        let saturday = Utc.with_ymd_and_hms(2024, 5, 11, 15, 0, 0).unwrap();
        let friday = Utc.with_ymd_and_hms(2024, 5, 3, 15, 0, 0).unwrap();

        assert_eq!(previous_trading_day(sunday), friday);
        assert_eq!(previous_trading_day(monday), friday);
        assert_eq!(previous_trading_day(tuesday), monday);
        assert_eq!(previous_trading_day(saturday).weekday(), Weekday::Fri);
    }

    #[test]
    fn test_default_settings() {
        let settings = TraderSettings::default();
        assert_eq!(settings.poll_interval, Duration::from_secs(300));
        assert_eq!(settings.timeframe, Timeframe::Minute5);
    }
}
