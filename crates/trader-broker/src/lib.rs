//! Brokerage integrations.
//!
//! [`AlpacaClient`] talks to the Alpaca REST API (paper or live) and also
//! serves the most-actives screener and the market clock.
//! [`PaperBrokerage`] keeps everything in memory and fills its exit legs
//! from prices marked by [`PaperMarketFeed`].

mod alpaca;
mod paper;

pub use alpaca::{AlpacaClient, AlpacaConfig, MarketClock};
pub use paper::{PaperBrokerage, PaperMarketFeed};
