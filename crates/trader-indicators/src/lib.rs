//! Streaming technical indicators.
//!
//! Each indicator consumes one input per step and reports `None` until its
//! warm-up has elapsed:
//! - Exponential moving average (SMA-seeded)
//! - Bollinger Bands (population standard deviation)
//! - Average True Range (Wilder smoothing)

pub mod moving_average;
pub mod volatility;

pub use moving_average::StreamingEma;
pub use volatility::{BollingerOutput, StreamingAtr, StreamingBollinger};
