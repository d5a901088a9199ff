//! Trend classification from the EMA spread of preceding signals.

use trader_core::types::{Signal, Trend};

/// Classify a window of signals.
///
/// Bull when the fast EMA sits above the slow EMA on every signal, bear
/// when it sits below on every signal. A single undefined EMA makes the
/// whole window trendless.
pub fn classify_trend(window: &[Signal]) -> Trend {
    let mut bull = true;
    let mut bear = true;

    for signal in window {
        let (Some(fast), Some(slow)) = (signal.ema_fast, signal.ema_slow) else {
            return Trend::None;
        };
        bull &= fast > slow;
        bear &= fast < slow;
    }

    match (bull, bear) {
        (true, false) => Trend::Bull,
        (false, true) => Trend::Bear,
        _ => Trend::None,
    }
}

/// Set the trend of every signal from the `lookback` signals before it.
/// The first `lookback` signals keep [`Trend::None`].
pub fn apply_trend(signals: &mut [Signal], lookback: usize) {
    if lookback == 0 {
        return;
    }
    for i in lookback..signals.len() {
        signals[i].trend = classify_trend(&signals[i - lookback..i]);
    }
}
