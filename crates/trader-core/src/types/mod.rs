//! Core data types for the trading system.

mod ohlcv;
mod order;
mod position;
mod signal;
mod timeframe;

pub use ohlcv::Bar;
pub use order::{OrderClass, OrderId, OrderRequest, OrderType, Side, StopLossLeg, TakeProfitLeg, TimeInForce};
pub use position::{Position, PositionSide};
pub use signal::{Decision, Signal, Trend};
pub use timeframe::Timeframe;
