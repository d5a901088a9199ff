//! Brokerage and screener capability traits.

use crate::types::{OrderId, OrderRequest, Position};
use async_trait::async_trait;
use rust_decimal::Decimal;

/// Account, position and order operations the trader needs from a broker.
///
/// Every method fails closed: implementations log transport or parse
/// failures and return the neutral value (`false`, `None`, zero, or a
/// no-op) instead of an error, so a bad response can never stop a polling
/// loop.
#[async_trait]
pub trait Brokerage: Send + Sync {
    /// Check if the market is currently open.
    async fn is_market_open(&self) -> bool;

    /// Get the open position for a symbol, if any.
    async fn fetch_position(&self, symbol: &str) -> Option<Position>;

    /// Liquidate the whole position in a symbol.
    async fn close_position(&self, symbol: &str);

    /// Cancel every open order for a symbol.
    async fn cancel_all_orders(&self, symbol: &str);

    /// Get the current buying power.
    async fn get_buying_power(&self) -> Decimal;

    /// Submit an order.
    ///
    /// # Returns
    /// The broker's order ID, or `None` if the order was not accepted
    async fn place_order(&self, request: OrderRequest) -> Option<OrderId>;

    /// Get the broker name.
    fn name(&self) -> &str;
}

/// Source of the tradable symbol universe.
#[async_trait]
pub trait Screener: Send + Sync {
    /// The `top` most actively traded symbols, most active first.
    ///
    /// Returns an empty list on failure.
    async fn most_active(&self, top: usize) -> Vec<String>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    struct ClosedBroker;

    #[async_trait]
    impl Brokerage for ClosedBroker {
        async fn is_market_open(&self) -> bool {
            false
        }
        async fn fetch_position(&self, _symbol: &str) -> Option<Position> {
            None
        }
        async fn close_position(&self, _symbol: &str) {}
        async fn cancel_all_orders(&self, _symbol: &str) {}
        async fn get_buying_power(&self) -> Decimal {
            Decimal::ZERO
        }
        async fn place_order(&self, _request: OrderRequest) -> Option<OrderId> {
            None
        }
        fn name(&self) -> &str {
            "closed"
        }
    }

    #[tokio::test]
    async fn test_brokerage_is_object_safe() {
        let broker: Arc<dyn Brokerage> = Arc::new(ClosedBroker);
        assert!(!broker.is_market_open().await);
        assert_eq!(broker.get_buying_power().await, Decimal::ZERO);
        assert_eq!(broker.name(), "closed");
    }
}
