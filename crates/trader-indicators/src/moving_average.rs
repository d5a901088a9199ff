//! Moving average indicators.

use trader_core::traits::StreamingIndicator;

/// Streaming Exponential Moving Average (EMA).
///
/// The first value, emitted on the `period`-th input, is the simple mean of
/// the inputs so far; after that each input is blended in with weight
/// `2 / (period + 1)`.
#[derive(Debug, Clone)]
pub struct StreamingEma {
    period: usize,
    multiplier: f64,
    current: Option<f64>,
    count: usize,
    sum: f64,
}

impl StreamingEma {
    /// Create a new streaming EMA.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        let multiplier = 2.0 / (period as f64 + 1.0);
        Self {
            period,
            multiplier,
            current: None,
            count: 0,
            sum: 0.0,
        }
    }
}

impl StreamingIndicator for StreamingEma {
    type Input = f64;
    type Output = f64;

    fn update(&mut self, value: f64) -> Option<f64> {
        self.count += 1;

        self.current = match self.current {
            Some(ema) => Some(value * self.multiplier + ema * (1.0 - self.multiplier)),
            None => {
                // Accumulating for the seed SMA
                self.sum += value;
                (self.count == self.period).then(|| self.sum / self.period as f64)
            }
        };
        self.current
    }

    fn is_ready(&self) -> bool {
        self.count >= self.period
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_streaming_ema() {
        let mut ema = StreamingEma::new(3);

        assert!(!ema.is_ready());
        assert!(ema.update(1.0).is_none());
        assert!(ema.update(2.0).is_none());

        // Third value triggers first output
        let first = ema.update(3.0).unwrap();
        assert!((first - 2.0).abs() < 1e-10); // SMA of first 3
        assert!(ema.is_ready());

        // mult = 2/(3+1) = 0.5 -> 4 * 0.5 + 2 * 0.5 = 3.0
        let second = ema.update(4.0).unwrap();
        assert!((second - 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_period_one_tracks_input() {
        let mut ema = StreamingEma::new(1);
        assert_eq!(ema.update(5.0), Some(5.0));
        assert_eq!(ema.update(7.0), Some(7.0));
    }

    #[test]
    fn test_fast_ema_leads_slow_on_rising_prices() {
        let mut fast = StreamingEma::new(3);
        let mut slow = StreamingEma::new(6);
        let mut last = (None, None);

        for i in 0..20 {
            let price = 100.0 + i as f64;
            last = (fast.update(price), slow.update(price));
        }

        let (fast, slow) = (last.0.unwrap(), last.1.unwrap());
        assert!(fast > slow);
    }

    #[test]
    #[should_panic(expected = "Period must be greater than 0")]
    fn test_zero_period_rejected() {
        StreamingEma::new(0);
    }
}
