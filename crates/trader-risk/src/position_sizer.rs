//! Position sizing from a fraction of buying power.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Outcome of sizing an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sizing {
    /// Whole shares to buy or sell
    Shares(Decimal),
    /// The allocated capital does not cover a single share
    InsufficientCapital { allocation: Decimal, price: Decimal },
}

/// Position sizer allocating a fixed fraction of buying power per entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionSizer {
    size_fraction: Decimal,
}

impl Default for PositionSizer {
    fn default() -> Self {
        Self {
            size_fraction: dec!(0.1),
        }
    }
}

impl PositionSizer {
    /// Create a new position sizer.
    pub fn new(size_fraction: Decimal) -> Self {
        assert!(
            size_fraction > Decimal::ZERO && size_fraction <= Decimal::ONE,
            "Size fraction must be in (0, 1]"
        );
        Self { size_fraction }
    }

    pub fn size_fraction(&self) -> Decimal {
        self.size_fraction
    }

    /// Calculate position size: `floor(size_fraction * buying_power / price)`.
    pub fn calculate(&self, buying_power: Decimal, price: Decimal) -> Sizing {
        let allocation = buying_power * self.size_fraction;

        if price <= Decimal::ZERO || allocation < price {
            return Sizing::InsufficientCapital { allocation, price };
        }

        // Round down to whole shares
        Sizing::Shares((allocation / price).floor())
    }
}
