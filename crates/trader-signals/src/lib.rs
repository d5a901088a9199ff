//! Signal generation.
//!
//! Folds a bar sequence through fast/slow EMAs, Bollinger Bands and ATR,
//! classifies the trend of each bar from the EMA spread of the bars before
//! it, and marks mean-reversion entries in the direction of the trend:
//! - buy when the trend is bull and the close drops under the lower band
//! - sell when the trend is bear and the close rises over the upper band

mod ema_bollinger;
mod fold;
mod trend;

pub use ema_bollinger::{EmaBollingerConfig, EmaBollingerStrategy};
pub use fold::{annotate, IndicatorFold};
pub use trend::{apply_trend, classify_trend};
