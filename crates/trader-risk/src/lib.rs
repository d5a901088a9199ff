//! Risk management for trading.
//!
//! Sizes entries from a fixed fraction of buying power and turns trade
//! signals into bracket orders with exchange-friendly price precision.

mod bracket;
mod position_sizer;

pub use bracket::{bracket_order, price_precision, round_price, BracketError};
pub use position_sizer::{PositionSizer, Sizing};
