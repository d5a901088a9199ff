//! In-memory paper brokerage for simulation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use trader_core::error::BrokerError;
use trader_core::traits::{Brokerage, MarketData};
use trader_core::types::{Bar, OrderId, OrderRequest, Position, PositionSide, Side, Timeframe};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// The open exit legs of a filled bracket.
#[derive(Debug, Clone)]
struct ExitOrder {
    id: OrderId,
    symbol: String,
    quantity: Decimal,
    take_profit: Option<Decimal>,
    stop_loss: Option<Decimal>,
}

impl ExitOrder {
    /// Price the legs fill at when `price` is marked against a position on
    /// `side`. Stops fill at their stop price.
    fn triggered_at(&self, side: PositionSide, price: Decimal) -> Option<Decimal> {
        let (target_hit, stop_hit) = match side {
            PositionSide::Long => (
                self.take_profit.is_some_and(|tp| price >= tp),
                self.stop_loss.is_some_and(|sl| price <= sl),
            ),
            PositionSide::Short => (
                self.take_profit.is_some_and(|tp| price <= tp),
                self.stop_loss.is_some_and(|sl| price >= sl),
            ),
        };

        if target_hit {
            self.take_profit
        } else if stop_hit {
            self.stop_loss
        } else {
            None
        }
    }
}

#[derive(Debug, Default)]
struct PaperAccount {
    cash: Decimal,
    positions: HashMap<String, Position>,
    exit_orders: Vec<ExitOrder>,
    marks: HashMap<String, Decimal>,
}

/// Cash returned when `position` is closed at `price`. A short gets its
/// collateral back plus or minus the move against the entry.
fn settlement(position: &Position, price: Decimal) -> Decimal {
    match position.side {
        PositionSide::Long => position.quantity * price,
        PositionSide::Short => position.quantity * (position.avg_entry_price * Decimal::TWO - price),
    }
}

/// Paper brokerage for simulation.
///
/// Limit entries fill immediately at their limit price. The take-profit
/// and stop-loss legs of a filled bracket stay open and hold the position's
/// shares, so the position reports no available quantity until those legs
/// either fill or are canceled. Legs fill when a price is marked through
/// them with [`mark`](Self::mark); [`PaperMarketFeed`] marks every fetched
/// window's last close. Closing a position settles it at the last mark, or
/// at its entry price if none was seen.
pub struct PaperBrokerage {
    account: Mutex<PaperAccount>,
}

impl PaperBrokerage {
    /// Create a new paper brokerage with initial capital.
    pub fn new(initial_capital: Decimal) -> Self {
        Self {
            account: Mutex::new(PaperAccount {
                cash: initial_capital,
                ..Default::default()
            }),
        }
    }

    fn account(&self) -> MutexGuard<'_, PaperAccount> {
        self.account.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fill an order at its limit price.
    pub fn execute(&self, request: &OrderRequest) -> Result<OrderId, BrokerError> {
        let price = request.limit_price.ok_or_else(|| {
            BrokerError::OrderRejected("paper fills need a limit price".into())
        })?;
        if request.quantity <= Decimal::ZERO {
            return Err(BrokerError::OrderRejected(format!(
                "invalid quantity {}",
                request.quantity
            )));
        }

        let mut account = self.account();
        if account.positions.contains_key(&request.symbol) {
            return Err(BrokerError::OrderRejected(format!(
                "position already open in {}",
                request.symbol
            )));
        }

        let cost = price * request.quantity;
        if cost > account.cash {
            return Err(BrokerError::OrderRejected(format!(
                "insufficient buying power: need {}, have {}",
                cost, account.cash
            )));
        }
        account.cash -= cost;

        let side = match request.side {
            Side::Buy => PositionSide::Long,
            Side::Sell => PositionSide::Short,
        };
        let mut position = Position::new(&request.symbol, side, request.quantity, price);

        if request.take_profit.is_some() || request.stop_loss.is_some() {
            position.available_qty = Decimal::ZERO;
            account.exit_orders.push(ExitOrder {
                id: OrderId::new(Uuid::new_v4().to_string()),
                symbol: request.symbol.clone(),
                quantity: request.quantity,
                take_profit: request.take_profit.as_ref().map(|leg| leg.limit_price),
                stop_loss: request.stop_loss.as_ref().map(|leg| leg.stop_price),
            });
        }
        account.positions.insert(request.symbol.clone(), position);

        Ok(OrderId::new(Uuid::new_v4().to_string()))
    }

    /// Remove a position and settle it at the last marked price.
    pub fn liquidate(&self, symbol: &str) -> Result<Position, BrokerError> {
        let mut account = self.account();
        let position = account
            .positions
            .remove(symbol)
            .ok_or_else(|| BrokerError::PositionNotFound(symbol.to_string()))?;

        let price = account
            .marks
            .get(symbol)
            .copied()
            .unwrap_or(position.avg_entry_price);
        account.cash += settlement(&position, price);
        account.exit_orders.retain(|o| o.symbol != symbol);
        Ok(position)
    }

    /// Record the latest price of `symbol` and fill any exit leg it crosses.
    /// Returns the exit price when the position was closed.
    pub fn mark(&self, symbol: &str, price: Decimal) -> Option<Decimal> {
        let mut account = self.account();
        account.marks.insert(symbol.to_string(), price);

        let side = account.positions.get(symbol)?.side;
        let exit = account
            .exit_orders
            .iter()
            .filter(|o| o.symbol == symbol)
            .find_map(|o| o.triggered_at(side, price))?;

        let position = account.positions.remove(symbol)?;
        account.cash += settlement(&position, exit);
        account.exit_orders.retain(|o| o.symbol != symbol);
        info!(symbol = %symbol, price = %exit, "Paper exit leg filled");
        Some(exit)
    }

    /// Current cash balance.
    pub fn cash(&self) -> Decimal {
        self.account().cash
    }

    /// Open exit orders for `symbol`.
    pub fn open_orders(&self, symbol: &str) -> Vec<OrderId> {
        self.account()
            .exit_orders
            .iter()
            .filter(|o| o.symbol == symbol)
            .map(|o| o.id.clone())
            .collect()
    }
}

#[async_trait]
impl Brokerage for PaperBrokerage {
    async fn is_market_open(&self) -> bool {
        true // Paper trading is always open
    }

    async fn fetch_position(&self, symbol: &str) -> Option<Position> {
        self.account().positions.get(symbol).cloned()
    }

    async fn close_position(&self, symbol: &str) {
        match self.liquidate(symbol) {
            Ok(position) => info!(symbol = %symbol, quantity = %position.quantity, "Paper position closed"),
            Err(e) => warn!(symbol = %symbol, "Paper close failed: {}", e),
        }
    }

    async fn cancel_all_orders(&self, symbol: &str) {
        let mut account = self.account();
        let released: Decimal = account
            .exit_orders
            .iter()
            .filter(|o| o.symbol == symbol)
            .map(|o| o.quantity)
            .sum();
        account.exit_orders.retain(|o| o.symbol != symbol);

        if let Some(position) = account.positions.get_mut(symbol) {
            position.available_qty = (position.available_qty + released).min(position.quantity);
        }
    }

    async fn get_buying_power(&self) -> Decimal {
        self.cash()
    }

    async fn place_order(&self, request: OrderRequest) -> Option<OrderId> {
        match self.execute(&request) {
            Ok(id) => {
                info!(
                    symbol = %request.symbol,
                    order_id = %id,
                    "Paper fill: {} {} @ {:?}",
                    request.side,
                    request.quantity,
                    request.limit_price
                );
                Some(id)
            }
            Err(e) => {
                warn!(symbol = %request.symbol, "Paper order rejected: {}", e);
                None
            }
        }
    }

    fn name(&self) -> &str {
        "Paper Brokerage"
    }
}

/// Market data that also marks the paper broker with each window's last
/// close, so bracket legs fill as prices move.
pub struct PaperMarketFeed {
    inner: Arc<dyn MarketData>,
    broker: Arc<PaperBrokerage>,
}

impl PaperMarketFeed {
    pub fn new(inner: Arc<dyn MarketData>, broker: Arc<PaperBrokerage>) -> Self {
        Self { inner, broker }
    }
}

#[async_trait]
impl MarketData for PaperMarketFeed {
    async fn get_bars(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        timeframe: Timeframe,
    ) -> Vec<Bar> {
        let bars = self.inner.get_bars(symbol, start, end, timeframe).await;
        if let Some(last) = bars.last() {
            match Decimal::try_from(last.close) {
                Ok(price) => {
                    self.broker.mark(symbol, price);
                }
                Err(_) => debug!(symbol = %symbol, close = last.close, "Unmarkable close"),
            }
        }
        bars
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
