//! Annotated trade signals.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Bar;

/// Trend classification of a trailing window of signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Bull,
    Bear,
    #[default]
    None,
}

/// What to do with the bar a signal annotates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Buy,
    Sell,
    #[default]
    Hold,
}

impl Decision {
    /// True for buy and sell.
    pub fn is_trade(&self) -> bool {
        !matches!(self, Decision::Hold)
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Buy => write!(f, "buy"),
            Decision::Sell => write!(f, "sell"),
            Decision::Hold => write!(f, "hold"),
        }
    }
}

/// A bar annotated with indicator values, trend and decision.
///
/// Field names follow the JSON layout consumed by the chart front end.
/// Indicator values stay `None` through their warm-up period and are left
/// out of the serialized document rather than written as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    #[serde(flatten)]
    pub bar: Bar,
    pub trend: Trend,
    #[serde(rename = "signal")]
    pub decision: Decision,
    #[serde(rename = "sl", default, skip_serializing_if = "Option::is_none")]
    pub stop_loss: Option<f64>,
    #[serde(rename = "tp", default, skip_serializing_if = "Option::is_none")]
    pub take_profit: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ema_fast: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ema_slow: Option<f64>,
    #[serde(rename = "bb_high", default, skip_serializing_if = "Option::is_none")]
    pub bollinger_high: Option<f64>,
    #[serde(rename = "bb_low", default, skip_serializing_if = "Option::is_none")]
    pub bollinger_low: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub atr: Option<f64>,
}

impl Signal {
    /// An unannotated hold signal for a bar.
    pub fn hold(bar: Bar) -> Self {
        Self {
            bar,
            trend: Trend::None,
            decision: Decision::Hold,
            stop_loss: None,
            take_profit: None,
            ema_fast: None,
            ema_slow: None,
            bollinger_high: None,
            bollinger_low: None,
            atr: None,
        }
    }

    /// Closing price of the underlying bar.
    #[inline]
    pub fn close(&self) -> f64 {
        self.bar.close
    }

    /// Stop-loss and take-profit levels, present only on trade decisions.
    pub fn exit_levels(&self) -> Option<(f64, f64)> {
        match (self.decision, self.stop_loss, self.take_profit) {
            (Decision::Hold, _, _) => None,
            (_, Some(sl), Some(tp)) => Some((sl, tp)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn bar() -> Bar {
        let ts = Utc.with_ymd_and_hms(2024, 3, 4, 14, 30, 0).unwrap();
        Bar::new(ts, 10.0, 10.5, 9.5, 10.2, 1200.0)
    }

    #[test]
    fn test_hold_signal_omits_indicators() {
        let json = serde_json::to_value(Signal::hold(bar())).unwrap();

        assert_eq!(json["signal"], "hold");
        assert_eq!(json["trend"], "none");
        assert_eq!(json["close"], 10.2);
        assert!(json.get("ema_fast").is_none());
        assert!(json.get("sl").is_none());
        assert!(json.get("bb_low").is_none());
    }

    #[test]
    fn test_signal_json_field_names() {
        let mut signal = Signal::hold(bar());
        signal.decision = Decision::Buy;
        signal.trend = Trend::Bull;
        signal.stop_loss = Some(9.0);
        signal.take_profit = Some(12.0);
        signal.bollinger_low = Some(10.3);
        signal.bollinger_high = Some(11.0);

        let json = serde_json::to_value(&signal).unwrap();
        assert_eq!(json["signal"], "buy");
        assert_eq!(json["trend"], "bull");
        assert_eq!(json["sl"], 9.0);
        assert_eq!(json["tp"], 12.0);
        assert_eq!(json["bb_low"], 10.3);
        assert_eq!(json["bb_high"], 11.0);

        let back: Signal = serde_json::from_value(json).unwrap();
        assert_eq!(back, signal);
    }

    #[test]
    fn test_exit_levels() {
        let mut signal = Signal::hold(bar());
        signal.stop_loss = Some(9.0);
        signal.take_profit = Some(12.0);
        assert_eq!(signal.exit_levels(), None);

        signal.decision = Decision::Sell;
        assert_eq!(signal.exit_levels(), Some((9.0, 12.0)));

        signal.take_profit = None;
        assert_eq!(signal.exit_levels(), None);
    }
}
