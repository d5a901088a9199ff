//! Order types and structures.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Order side (buy or sell).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// Order type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    /// Limit order - execute at specified price or better
    Limit,
}

/// Time in force for orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimeInForce {
    /// Valid for the trading day only
    #[default]
    Day,
    /// Good til canceled
    #[serde(rename = "gtc")]
    GTC,
}

/// How the legs of an order relate to each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderClass {
    /// Single leg
    #[default]
    Simple,
    /// Entry with attached take-profit and stop-loss legs
    Bracket,
}

/// Take-profit leg of a bracket order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TakeProfitLeg {
    pub limit_price: Decimal,
}

/// Stop-loss leg of a bracket order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopLossLeg {
    pub stop_price: Decimal,
    pub stop_limit_price: Decimal,
}

/// Order request for submitting new orders.
///
/// Built fresh for each entry decision and not retained after submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    /// Symbol to trade
    pub symbol: String,
    /// Whole shares to trade
    pub quantity: Decimal,
    /// Buy or sell
    pub side: Side,
    /// Type of order
    pub order_type: OrderType,
    /// Time in force
    pub time_in_force: TimeInForce,
    /// Leg structure
    pub order_class: OrderClass,
    /// Limit price of the entry leg
    pub limit_price: Option<Decimal>,
    /// Take-profit leg (bracket orders)
    pub take_profit: Option<TakeProfitLeg>,
    /// Stop-loss leg (bracket orders)
    pub stop_loss: Option<StopLossLeg>,
}

impl OrderRequest {
    /// Create a good-til-canceled limit entry with attached take-profit and
    /// stop-loss legs. The stop leg uses the same price as its stop limit.
    pub fn bracket(
        symbol: impl Into<String>,
        side: Side,
        quantity: Decimal,
        limit_price: Decimal,
        take_profit: Decimal,
        stop_loss: Decimal,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            quantity,
            side,
            order_type: OrderType::Limit,
            time_in_force: TimeInForce::GTC,
            order_class: OrderClass::Bracket,
            limit_price: Some(limit_price),
            take_profit: Some(TakeProfitLeg {
                limit_price: take_profit,
            }),
            stop_loss: Some(StopLossLeg {
                stop_price: stop_loss,
                stop_limit_price: stop_loss,
            }),
        }
    }
}

/// Broker-assigned identifier of an accepted order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub String);

impl OrderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_order_request_bracket() {
        let request =
            OrderRequest::bracket("AAPL", Side::Sell, dec!(12), dec!(150.25), dec!(147.10), dec!(152.35));

        assert_eq!(request.order_type, OrderType::Limit);
        assert_eq!(request.order_class, OrderClass::Bracket);
        assert_eq!(request.time_in_force, TimeInForce::GTC);
        assert_eq!(request.limit_price, Some(dec!(150.25)));
        assert_eq!(request.take_profit.unwrap().limit_price, dec!(147.10));

        let stop = request.stop_loss.unwrap();
        assert_eq!(stop.stop_price, dec!(152.35));
        assert_eq!(stop.stop_limit_price, dec!(152.35));
    }

    #[test]
    fn test_enum_wire_names() {
        assert_eq!(serde_json::to_value(TimeInForce::GTC).unwrap(), "gtc");
        assert_eq!(serde_json::to_value(OrderClass::Bracket).unwrap(), "bracket");
        assert_eq!(serde_json::to_value(Side::Sell).unwrap(), "sell");
    }
}
