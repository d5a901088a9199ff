//! Bracket order construction from trade signals.

use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;
use trader_core::types::{Decision, OrderRequest, Side, Signal};

/// Reasons a signal cannot be turned into a bracket order.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BracketError {
    #[error("Signal is a hold")]
    NotATrade,

    #[error("Trade signal is missing stop-loss or take-profit")]
    MissingExitLevels,

    #[error("Price {0} is not representable as a decimal")]
    InvalidPrice(f64),
}

/// Decimal places to quote a security at: sub-dollar prices get four,
/// everything else two.
pub fn price_precision(close: Decimal) -> u32 {
    if close < Decimal::ONE {
        4
    } else {
        2
    }
}

/// Convert an indicator price to a decimal rounded half away from zero.
pub fn round_price(value: f64, decimal_places: u32) -> Result<Decimal, BracketError> {
    let price = Decimal::try_from(value).map_err(|_| BracketError::InvalidPrice(value))?;
    Ok(price.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointAwayFromZero))
}

/// Build a good-til-canceled limit entry at the signal's close with
/// take-profit and stop-loss legs at the signal's exit levels.
pub fn bracket_order(
    symbol: &str,
    signal: &Signal,
    quantity: Decimal,
) -> Result<OrderRequest, BracketError> {
    let side = match signal.decision {
        Decision::Buy => Side::Buy,
        Decision::Sell => Side::Sell,
        Decision::Hold => return Err(BracketError::NotATrade),
    };
    let (stop_loss, take_profit) = signal
        .exit_levels()
        .ok_or(BracketError::MissingExitLevels)?;

    let close = Decimal::try_from(signal.close())
        .map_err(|_| BracketError::InvalidPrice(signal.close()))?;
    let dp = price_precision(close);

    Ok(OrderRequest::bracket(
        symbol,
        side,
        quantity,
        round_price(signal.close(), dp)?,
        round_price(take_profit, dp)?,
        round_price(stop_loss, dp)?,
    ))
}
