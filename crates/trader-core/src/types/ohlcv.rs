//! OHLCV (Open, High, Low, Close, Volume) bar type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One sampling interval of price data.
///
/// Uses f64 for fast indicator calculations. The timestamp serializes
/// under `date`, which is what the charting client reads.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Start of the interval
    #[serde(rename = "date")]
    pub timestamp: DateTime<Utc>,
    /// Opening price
    pub open: f64,
    /// Highest price
    pub high: f64,
    /// Lowest price
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Trading volume
    pub volume: f64,
}

impl Bar {
    /// Create a new bar.
    pub fn new(
        timestamp: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Calculate the bar's range (high - low).
    #[inline]
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// A bar that opened and closed at the same price carries no
    /// directional information and is skipped by the indicator fold.
    #[inline]
    pub fn is_flat(&self) -> bool {
        self.open == self.close
    }

    /// Calculate the true range (used for ATR).
    pub fn true_range(&self, prev_close: Option<f64>) -> f64 {
        match prev_close {
            Some(pc) => {
                let hl = self.high - self.low;
                let hc = (self.high - pc).abs();
                let lc = (self.low - pc).abs();
                hl.max(hc).max(lc)
            }
            None => self.range(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 4, 14, 30, 0).unwrap()
    }

    #[test]
    fn test_bar_true_range() {
        let bar = Bar::new(ts(), 100.0, 110.0, 95.0, 105.0, 1000000.0);

        // Without previous close
        assert!((bar.true_range(None) - 15.0).abs() < 0.001);

        // With previous close that creates gap
        assert!((bar.true_range(Some(90.0)) - 20.0).abs() < 0.001);
    }

    #[test]
    fn test_flat_bar() {
        assert!(Bar::new(ts(), 10.0, 11.0, 9.0, 10.0, 5.0).is_flat());
        assert!(!Bar::new(ts(), 10.0, 11.0, 9.0, 10.5, 5.0).is_flat());
    }

    #[test]
    fn test_bar_serializes_date_key() {
        let bar = Bar::new(ts(), 1.0, 2.0, 0.5, 1.5, 10.0);
        let json = serde_json::to_value(bar).unwrap();

        assert_eq!(json["date"], "2024-03-04T14:30:00Z");
        assert!(json.get("timestamp").is_none());
    }
}
