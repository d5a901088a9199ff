//! Core types and traits for the intraday trader.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (Bar, Timeframe)
//! - Annotated trade signals
//! - Order requests and broker positions
//! - Collaborator traits for brokerage, market data, chart artifacts and
//!   signal strategies

pub mod types;
pub mod traits;
pub mod error;

pub use error::{TradingError, TradingResult};
pub use types::*;
pub use traits::*;
