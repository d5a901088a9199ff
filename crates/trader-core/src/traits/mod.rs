//! Core traits for the trading system.

mod artifacts;
mod broker;
mod data_source;
mod indicator;
mod strategy;

pub use artifacts::ArtifactSink;
pub use broker::{Brokerage, Screener};
pub use data_source::MarketData;
pub use indicator::StreamingIndicator;
pub use strategy::{SignalStrategy, StrategyConfig};
