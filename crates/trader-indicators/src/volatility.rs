//! Volatility indicators.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use trader_core::traits::StreamingIndicator;
use trader_core::types::Bar;

/// Bollinger Bands output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BollingerOutput {
    /// Upper band
    pub upper: f64,
    /// Middle band (SMA)
    pub middle: f64,
    /// Lower band
    pub lower: f64,
}

/// Streaming Bollinger Bands.
///
/// Consists of a middle band (SMA) with upper and lower bands at a
/// multiple of the population standard deviation of the same window.
#[derive(Debug, Clone)]
pub struct StreamingBollinger {
    period: usize,
    std_dev_multiplier: f64,
    window: VecDeque<f64>,
}

impl StreamingBollinger {
    /// Create Bollinger Bands with custom parameters.
    pub fn new(period: usize, std_dev_multiplier: f64) -> Self {
        assert!(period > 1, "Period must be greater than 1");
        assert!(
            std_dev_multiplier > 0.0,
            "Std dev multiplier must be positive"
        );
        Self {
            period,
            std_dev_multiplier,
            window: VecDeque::with_capacity(period),
        }
    }
}

impl StreamingIndicator for StreamingBollinger {
    type Input = f64;
    type Output = BollingerOutput;

    fn update(&mut self, price: f64) -> Option<BollingerOutput> {
        if self.window.len() == self.period {
            self.window.pop_front();
        }
        self.window.push_back(price);

        if !self.is_ready() {
            return None;
        }

        let period_f64 = self.period as f64;
        let mean: f64 = self.window.iter().sum::<f64>() / period_f64;
        let variance: f64 =
            self.window.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / period_f64;
        let band = self.std_dev_multiplier * variance.sqrt();

        Some(BollingerOutput {
            upper: mean + band,
            middle: mean,
            lower: mean - band,
        })
    }

    fn is_ready(&self) -> bool {
        self.window.len() >= self.period
    }
}

/// Streaming Average True Range (ATR).
///
/// The first bar only seeds the previous close. The first value is the
/// mean of the first `period` true ranges; later values use Wilder's
/// smoothing.
#[derive(Debug, Clone)]
pub struct StreamingAtr {
    period: usize,
    prev_close: Option<f64>,
    ranges_seen: usize,
    sum: f64,
    current: Option<f64>,
}

impl StreamingAtr {
    /// Create a new ATR indicator.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self {
            period,
            prev_close: None,
            ranges_seen: 0,
            sum: 0.0,
            current: None,
        }
    }
}

impl StreamingIndicator for StreamingAtr {
    type Input = Bar;
    type Output = f64;

    fn update(&mut self, bar: Bar) -> Option<f64> {
        let Some(prev_close) = self.prev_close.replace(bar.close) else {
            return None;
        };

        let tr = bar.true_range(Some(prev_close));
        self.ranges_seen += 1;
        let period_f64 = self.period as f64;

        self.current = match self.current {
            Some(atr) => Some((atr * (period_f64 - 1.0) + tr) / period_f64),
            None => {
                self.sum += tr;
                (self.ranges_seen == self.period).then(|| self.sum / period_f64)
            }
        };
        self.current
    }

    fn is_ready(&self) -> bool {
        self.current.is_some()
    }
}
