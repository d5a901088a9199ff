//! Incremental indicator fold over a bar sequence.

use trader_core::traits::StreamingIndicator;
use trader_core::types::{Bar, Signal};
use trader_indicators::{StreamingAtr, StreamingBollinger, StreamingEma};

use crate::EmaBollingerConfig;

/// Running indicator state for one pass over a bar sequence.
///
/// Lives only for the duration of a single [`annotate`] call.
#[derive(Debug, Clone)]
pub struct IndicatorFold {
    ema_fast: StreamingEma,
    ema_slow: StreamingEma,
    bollinger: StreamingBollinger,
    atr: StreamingAtr,
}

impl IndicatorFold {
    pub fn new(config: &EmaBollingerConfig) -> Self {
        Self {
            ema_fast: StreamingEma::new(config.ema_fast_period),
            ema_slow: StreamingEma::new(config.ema_slow_period),
            bollinger: StreamingBollinger::new(config.bollinger_period, config.bollinger_std_dev),
            atr: StreamingAtr::new(config.atr_period),
        }
    }

    /// Advance every indicator by one bar and return the annotated hold
    /// signal. Flat bars leave the state untouched and yield nothing.
    pub fn push(&mut self, bar: Bar) -> Option<Signal> {
        if bar.is_flat() {
            return None;
        }

        let bands = self.bollinger.update(bar.close);
        let mut signal = Signal::hold(bar);
        signal.ema_fast = self.ema_fast.update(bar.close);
        signal.ema_slow = self.ema_slow.update(bar.close);
        signal.bollinger_high = bands.map(|b| b.upper);
        signal.bollinger_low = bands.map(|b| b.lower);
        signal.atr = self.atr.update(bar);
        Some(signal)
    }
}

/// Annotate `bars` with indicator values. Trend and decision are left at
/// their defaults.
pub fn annotate(bars: &[Bar], config: &EmaBollingerConfig) -> Vec<Signal> {
    let mut fold = IndicatorFold::new(config);
    bars.iter().filter_map(|bar| fold.push(*bar)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn bar(i: i64, open: f64, close: f64) -> Bar {
        let ts = Utc.with_ymd_and_hms(2024, 5, 7, 13, 30, 0).unwrap() + Duration::minutes(5 * i);
        Bar::new(ts, open, open.max(close) + 0.25, open.min(close) - 0.25, close, 1_000.0)
    }

    #[test]
    fn test_flat_bars_are_skipped() {
        let bars: Vec<Bar> = (0..10).map(|i| bar(i, 50.0, 50.0)).collect();
        assert!(annotate(&bars, &EmaBollingerConfig::default()).is_empty());
    }

    #[test]
    fn test_flat_bar_does_not_advance_state() {
        let config = EmaBollingerConfig {
            ema_fast_period: 2,
            ema_slow_period: 3,
            bollinger_period: 2,
            atr_period: 1,
            ..Default::default()
        };
        let bars = vec![
            bar(0, 9.5, 10.0),
            bar(1, 12.0, 12.0),
            bar(2, 10.5, 11.0),
        ];

        let signals = annotate(&bars, &config);
        assert_eq!(signals.len(), 2);
        assert_eq!(signals[1].bar.timestamp, bars[2].timestamp);
        // Second informative bar seeds the fast EMA from 10 and 11 only
        assert_eq!(signals[1].ema_fast, Some(10.5));
        assert_eq!(signals[1].ema_slow, None);
    }

    #[test]
    fn test_warmup_leaves_values_undefined() {
        let config = EmaBollingerConfig::default();
        let bars: Vec<Bar> = (0..30)
            .map(|i| bar(i, 100.0 + i as f64, 100.5 + i as f64))
            .collect();

        let signals = annotate(&bars, &config);
        assert_eq!(signals.len(), 30);

        assert!(signals[11].ema_fast.is_none());
        assert!(signals[12].ema_fast.is_some());
        assert!(signals[12].bollinger_low.is_some());
        assert!(signals[6].atr.is_none());
        assert!(signals[7].atr.is_some());
        assert!(signals[24].ema_slow.is_none());
        assert!(signals[25].ema_slow.is_some());
    }
}
