//! EMA trend / Bollinger Band reversion strategy.
//!
//! Enters against a short-term band break only when the preceding bars
//! agree on the trend: a close under the lower band in an uptrend is a
//! buy, a close over the upper band in a downtrend is a sell. Exit levels
//! are placed at a multiple of ATR from the close.

use serde::{Deserialize, Serialize};
use trader_core::{
    error::StrategyError,
    traits::{SignalStrategy, StrategyConfig},
    types::{Bar, Decision, Signal, Trend},
};

use crate::{annotate, apply_trend};

/// Configuration for the EMA/Bollinger strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmaBollingerConfig {
    /// Fast EMA period
    pub ema_fast_period: usize,
    /// Slow EMA period
    pub ema_slow_period: usize,
    /// Bollinger Bands period
    pub bollinger_period: usize,
    /// Bollinger Bands standard deviation multiplier
    pub bollinger_std_dev: f64,
    /// ATR period
    pub atr_period: usize,
    /// Number of preceding signals that must agree on the trend
    pub trend_lookback: usize,
    /// Stop-loss distance in ATRs
    pub stop_loss_coef: f64,
    /// Take-profit distance as a multiple of the stop-loss distance
    pub take_profit_ratio: f64,
}

impl Default for EmaBollingerConfig {
    fn default() -> Self {
        Self {
            ema_fast_period: 13,
            ema_slow_period: 26,
            bollinger_period: 13,
            bollinger_std_dev: 2.0,
            atr_period: 7,
            trend_lookback: 7,
            stop_loss_coef: 1.1,
            take_profit_ratio: 1.5,
        }
    }
}

impl StrategyConfig for EmaBollingerConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        if self.ema_fast_period == 0 || self.ema_slow_period == 0 {
            return Err(StrategyError::InvalidConfig(
                "EMA periods must be greater than 0".into(),
            ));
        }
        if self.ema_fast_period >= self.ema_slow_period {
            return Err(StrategyError::InvalidConfig(
                "Fast EMA period must be less than slow EMA period".into(),
            ));
        }
        if self.bollinger_period < 2 {
            return Err(StrategyError::InvalidConfig(
                "Bollinger period must be at least 2".into(),
            ));
        }
        if self.bollinger_std_dev <= 0.0 {
            return Err(StrategyError::InvalidConfig(
                "Bollinger std dev must be positive".into(),
            ));
        }
        if self.atr_period == 0 {
            return Err(StrategyError::InvalidConfig(
                "ATR period must be greater than 0".into(),
            ));
        }
        if self.trend_lookback == 0 {
            return Err(StrategyError::InvalidConfig(
                "Trend lookback must be greater than 0".into(),
            ));
        }
        if self.stop_loss_coef <= 0.0 || self.take_profit_ratio <= 0.0 {
            return Err(StrategyError::InvalidConfig(
                "Stop-loss coefficient and take-profit ratio must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// EMA trend / Bollinger Band strategy.
///
/// Stateless: every call to [`SignalStrategy::generate`] runs a fresh fold.
#[derive(Debug, Clone)]
pub struct EmaBollingerStrategy {
    config: EmaBollingerConfig,
}

impl EmaBollingerStrategy {
    /// Create a strategy from a validated configuration.
    pub fn new(config: EmaBollingerConfig) -> Result<Self, StrategyError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EmaBollingerConfig {
        &self.config
    }

    fn decide(&self, signal: &mut Signal) {
        let (Some(high), Some(low), Some(atr)) =
            (signal.bollinger_high, signal.bollinger_low, signal.atr)
        else {
            return;
        };

        let close = signal.close();
        let stop_distance = atr * self.config.stop_loss_coef;
        let target_distance = stop_distance * self.config.take_profit_ratio;

        match signal.trend {
            Trend::Bull if close < low => {
                signal.decision = Decision::Buy;
                signal.stop_loss = Some(close - stop_distance);
                signal.take_profit = Some(close + target_distance);
            }
            Trend::Bear if close > high => {
                signal.decision = Decision::Sell;
                signal.stop_loss = Some(close + stop_distance);
                signal.take_profit = Some(close - target_distance);
            }
            _ => {}
        }
    }
}

impl Default for EmaBollingerStrategy {
    fn default() -> Self {
        Self {
            config: EmaBollingerConfig::default(),
        }
    }
}

impl SignalStrategy for EmaBollingerStrategy {
    fn name(&self) -> &str {
        "EMA Bollinger"
    }

    fn generate(&self, bars: &[Bar]) -> Vec<Signal> {
        let lookback = self.config.trend_lookback;
        let mut signals = annotate(bars, &self.config);
        apply_trend(&mut signals, lookback);

        for signal in signals.iter_mut().skip(lookback) {
            self.decide(signal);
        }

        tracing::debug!(
            bars = bars.len(),
            signals = signals.len(),
            trades = signals.iter().filter(|s| s.decision.is_trade()).count(),
            "Generated signals"
        );
        signals
    }
}
