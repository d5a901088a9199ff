//! Broker-owned position snapshot.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Decision;

/// Direction of an open position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionSide {
    Long,
    Short,
}

/// A position in a single security, as reported by the broker.
///
/// The trader never caches one of these between polls; every cycle asks the
/// broker again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Symbol
    pub symbol: String,
    /// Long or short
    pub side: PositionSide,
    /// Number of shares held (always non-negative)
    pub quantity: Decimal,
    /// Shares not already committed to open exit orders
    pub available_qty: Decimal,
    /// Average entry price
    pub avg_entry_price: Decimal,
}

impl Position {
    /// Create a new position with its whole quantity available.
    pub fn new(
        symbol: impl Into<String>,
        side: PositionSide,
        quantity: Decimal,
        avg_entry_price: Decimal,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            quantity,
            available_qty: quantity,
            avg_entry_price,
        }
    }

    /// Check if this is a long position.
    pub fn is_long(&self) -> bool {
        self.side == PositionSide::Long
    }

    /// Check if this is a short position.
    pub fn is_short(&self) -> bool {
        self.side == PositionSide::Short
    }

    /// Whether any shares can be acted on right now.
    pub fn has_available(&self) -> bool {
        self.available_qty != Decimal::ZERO
    }

    /// A buy signal against a short, or a sell signal against a long.
    pub fn is_opposed_by(&self, decision: Decision) -> bool {
        matches!(
            (decision, self.side),
            (Decision::Buy, PositionSide::Short) | (Decision::Sell, PositionSide::Long)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_position_sides() {
        let position = Position::new("AAPL", PositionSide::Long, dec!(100), dec!(150.00));
        assert!(position.is_long());
        assert!(!position.is_short());
        assert!(position.has_available());
    }

    #[test]
    fn test_zero_available() {
        let mut position = Position::new("AAPL", PositionSide::Short, dec!(10), dec!(20));
        position.available_qty = Decimal::ZERO;
        assert!(!position.has_available());
    }

    #[test]
    fn test_opposing_decisions() {
        let long = Position::new("AAPL", PositionSide::Long, dec!(1), dec!(1));
        let short = Position::new("AAPL", PositionSide::Short, dec!(1), dec!(1));

        assert!(long.is_opposed_by(Decision::Sell));
        assert!(!long.is_opposed_by(Decision::Buy));
        assert!(short.is_opposed_by(Decision::Buy));
        assert!(!short.is_opposed_by(Decision::Sell));
        assert!(!long.is_opposed_by(Decision::Hold));
    }
}
