//! Alpaca broker integration for paper and live trading.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{header, Client, Response, StatusCode};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use trader_core::error::BrokerError;
use trader_core::traits::{Brokerage, Screener};
use trader_core::types::{
    OrderClass, OrderId, OrderRequest, OrderType, Position, PositionSide, Side, TimeInForce,
};
use tracing::{debug, error, info};

const DEFAULT_KEY_VAR: &str = "ALPACA_API_KEY";
const DEFAULT_SECRET_VAR: &str = "ALPACA_API_SECRET";

/// Alpaca API configuration.
#[derive(Clone)]
pub struct AlpacaConfig {
    pub api_key: String,
    pub api_secret: String,
    pub paper: bool,
}

impl std::fmt::Debug for AlpacaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlpacaConfig")
            .field("api_key", &"<redacted>")
            .field("api_secret", &"<redacted>")
            .field("paper", &self.paper)
            .finish()
    }
}

impl AlpacaConfig {
    /// Create config directly with key and secret.
    pub fn new(api_key: String, api_secret: String, paper: bool) -> Self {
        Self {
            api_key,
            api_secret,
            paper,
        }
    }

    /// Load credentials from the default `ALPACA_API_KEY` / `ALPACA_API_SECRET`
    /// environment variables.
    pub fn from_env(paper: bool) -> Result<Self, BrokerError> {
        Self::from_env_vars(DEFAULT_KEY_VAR, DEFAULT_SECRET_VAR, paper)
    }

    /// Load credentials from the named environment variables.
    pub fn from_env_vars(key_var: &str, secret_var: &str, paper: bool) -> Result<Self, BrokerError> {
        let api_key = std::env::var(key_var)
            .map_err(|_| BrokerError::Configuration(format!("{key_var} not set")))?;
        let api_secret = std::env::var(secret_var)
            .map_err(|_| BrokerError::Configuration(format!("{secret_var} not set")))?;

        Ok(Self::new(api_key, api_secret, paper))
    }

    pub fn base_url(&self) -> &str {
        if self.paper {
            "https://paper-api.alpaca.markets"
        } else {
            "https://api.alpaca.markets"
        }
    }

    pub fn data_url(&self) -> &str {
        "https://data.alpaca.markets"
    }
}

/// Market clock as reported by the broker.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MarketClock {
    pub timestamp: DateTime<Utc>,
    pub is_open: bool,
    pub next_open: DateTime<Utc>,
    pub next_close: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct AlpacaAccount {
    buying_power: String,
}

#[derive(Debug, Deserialize)]
struct AlpacaPosition {
    symbol: String,
    qty: String,
    qty_available: String,
    avg_entry_price: String,
    side: PositionSide,
}

#[derive(Debug, Deserialize)]
struct AlpacaOrder {
    id: String,
    symbol: String,
}

#[derive(Debug, Deserialize)]
struct AlpacaMessage {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MostActive {
    symbol: String,
}

#[derive(Debug, Deserialize)]
struct MostActivesResponse {
    most_actives: Vec<MostActive>,
}

#[derive(Debug, Serialize)]
struct TakeProfitBody {
    limit_price: String,
}

#[derive(Debug, Serialize)]
struct StopLossBody {
    stop_price: String,
    stop_limit_price: String,
}

#[derive(Debug, Serialize)]
struct CreateOrderRequest {
    symbol: String,
    qty: String,
    side: Side,
    #[serde(rename = "type")]
    order_type: OrderType,
    time_in_force: TimeInForce,
    order_class: OrderClass,
    #[serde(skip_serializing_if = "Option::is_none")]
    limit_price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    take_profit: Option<TakeProfitBody>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop_loss: Option<StopLossBody>,
}

impl From<&OrderRequest> for CreateOrderRequest {
    fn from(request: &OrderRequest) -> Self {
        Self {
            symbol: request.symbol.clone(),
            qty: request.quantity.to_string(),
            side: request.side,
            order_type: request.order_type,
            time_in_force: request.time_in_force,
            order_class: request.order_class,
            limit_price: request.limit_price.map(|p| p.to_string()),
            take_profit: request.take_profit.as_ref().map(|leg| TakeProfitBody {
                limit_price: leg.limit_price.to_string(),
            }),
            stop_loss: request.stop_loss.as_ref().map(|leg| StopLossBody {
                stop_price: leg.stop_price.to_string(),
                stop_limit_price: leg.stop_limit_price.to_string(),
            }),
        }
    }
}

fn parse_decimal(field: &str, value: &str) -> Result<Decimal, BrokerError> {
    value
        .parse()
        .map_err(|_| BrokerError::InvalidResponse(format!("{field}: {value:?}")))
}

fn parse_position(p: AlpacaPosition) -> Result<Position, BrokerError> {
    // Short quantities come back negative
    let quantity = parse_decimal("qty", &p.qty)?.abs();
    let available_qty = parse_decimal("qty_available", &p.qty_available)?.abs();
    let avg_entry_price = parse_decimal("avg_entry_price", &p.avg_entry_price)?;

    Ok(Position {
        symbol: p.symbol,
        side: p.side,
        quantity,
        available_qty,
        avg_entry_price,
    })
}

async fn ensure_success(resp: Response) -> Result<Response, BrokerError> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status();
    let text = resp.text().await.unwrap_or_default();
    Err(BrokerError::ApiError(format!("{}: {}", status, text)))
}

/// Alpaca REST client.
///
/// Inherent methods surface every failure as a [`BrokerError`]; the
/// [`Brokerage`] and [`Screener`] impls log those and fall back to neutral
/// values.
pub struct AlpacaClient {
    config: AlpacaConfig,
    client: Client,
}

impl AlpacaClient {
    /// Create a new Alpaca client.
    pub fn new(config: AlpacaConfig) -> Result<Self, BrokerError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            "APCA-API-KEY-ID",
            header::HeaderValue::from_str(&config.api_key)
                .map_err(|e| BrokerError::Configuration(e.to_string()))?,
        );
        headers.insert(
            "APCA-API-SECRET-KEY",
            header::HeaderValue::from_str(&config.api_secret)
                .map_err(|e| BrokerError::Configuration(e.to_string()))?,
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| BrokerError::Connection(e.to_string()))?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &AlpacaConfig {
        &self.config
    }

    async fn get(&self, url: &str) -> Result<Response, BrokerError> {
        self.client
            .get(url)
            .send()
            .await
            .map_err(|e| BrokerError::Connection(e.to_string()))
    }

    async fn delete(&self, url: &str) -> Result<Response, BrokerError> {
        self.client
            .delete(url)
            .send()
            .await
            .map_err(|e| BrokerError::Connection(e.to_string()))
    }

    /// Get the market clock.
    pub async fn clock(&self) -> Result<MarketClock, BrokerError> {
        let url = format!("{}/v2/clock", self.config.base_url());
        let resp = ensure_success(self.get(&url).await?).await?;

        resp.json()
            .await
            .map_err(|e| BrokerError::InvalidResponse(e.to_string()))
    }

    /// Get the open position in `symbol`, if any.
    pub async fn get_position(&self, symbol: &str) -> Result<Option<Position>, BrokerError> {
        let url = format!("{}/v2/positions/{}", self.config.base_url(), symbol);
        let resp = self.get(&url).await?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let resp = ensure_success(resp).await?;

        let body: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| BrokerError::InvalidResponse(e.to_string()))?;

        if let Ok(AlpacaMessage { message: Some(msg) }) = serde_json::from_value(body.clone()) {
            if msg == "position does not exist" {
                return Ok(None);
            }
        }

        let p: AlpacaPosition = serde_json::from_value(body)
            .map_err(|e| BrokerError::InvalidResponse(e.to_string()))?;
        parse_position(p).map(Some)
    }

    /// Liquidate the position in `symbol` at market.
    pub async fn liquidate(&self, symbol: &str) -> Result<(), BrokerError> {
        let url = format!("{}/v2/positions/{}", self.config.base_url(), symbol);
        let resp = self.delete(&url).await?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Err(BrokerError::PositionNotFound(symbol.to_string()));
        }
        ensure_success(resp).await?;
        info!(symbol = %symbol, "Requested position close");
        Ok(())
    }

    async fn open_orders(&self) -> Result<Vec<AlpacaOrder>, BrokerError> {
        let url = format!("{}/v2/orders", self.config.base_url());
        let resp = self
            .client
            .get(&url)
            .query(&[("status", "open")])
            .send()
            .await
            .map_err(|e| BrokerError::Connection(e.to_string()))?;

        ensure_success(resp)
            .await?
            .json()
            .await
            .map_err(|e| BrokerError::InvalidResponse(e.to_string()))
    }

    /// Cancel a single order by id.
    pub async fn cancel_order(&self, order_id: &str) -> Result<(), BrokerError> {
        let url = format!("{}/v2/orders/{}", self.config.base_url(), order_id);
        ensure_success(self.delete(&url).await?).await?;
        debug!(order_id = %order_id, "Order canceled");
        Ok(())
    }

    /// Cancel every open order for `symbol`. Returns how many were canceled.
    ///
    /// A failed cancel does not stop the others from being attempted.
    pub async fn cancel_orders_for(&self, symbol: &str) -> Result<usize, BrokerError> {
        let orders = self.open_orders().await?;
        let mut canceled = 0;

        for order in orders.iter().filter(|o| o.symbol == symbol) {
            match self.cancel_order(&order.id).await {
                Ok(()) => canceled += 1,
                Err(e) => error!(symbol = %symbol, order_id = %order.id, "Failed to cancel order: {}", e),
            }
        }
        Ok(canceled)
    }

    /// Current account buying power.
    pub async fn buying_power(&self) -> Result<Decimal, BrokerError> {
        let url = format!("{}/v2/account", self.config.base_url());
        let account: AlpacaAccount = ensure_success(self.get(&url).await?)
            .await?
            .json()
            .await
            .map_err(|e| BrokerError::InvalidResponse(e.to_string()))?;

        parse_decimal("buying_power", &account.buying_power)
    }

    /// Submit an order and return the broker's id for it.
    pub async fn submit_order(&self, request: &OrderRequest) -> Result<OrderId, BrokerError> {
        let url = format!("{}/v2/orders", self.config.base_url());
        let body = CreateOrderRequest::from(request);

        debug!("Submitting order: {:?}", body);

        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| BrokerError::Connection(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(BrokerError::OrderRejected(format!("{}: {}", status, text)));
        }

        let order: AlpacaOrder = resp
            .json()
            .await
            .map_err(|e| BrokerError::InvalidResponse(e.to_string()))?;

        info!(
            symbol = %order.symbol,
            order_id = %order.id,
            "Order submitted: {} {} @ {:?}",
            request.side,
            request.quantity,
            request.limit_price
        );
        Ok(OrderId::new(order.id))
    }

    /// Most active symbols by trade count.
    pub async fn most_actives(&self, top: usize) -> Result<Vec<String>, BrokerError> {
        let url = format!(
            "{}/v1beta1/screener/stocks/most-actives",
            self.config.data_url()
        );
        let resp = self
            .client
            .get(&url)
            .query(&[("by", "trades".to_string()), ("top", top.to_string())])
            .send()
            .await
            .map_err(|e| BrokerError::Connection(e.to_string()))?;

        let data: MostActivesResponse = ensure_success(resp)
            .await?
            .json()
            .await
            .map_err(|e| BrokerError::InvalidResponse(e.to_string()))?;

        Ok(data.most_actives.into_iter().map(|m| m.symbol).collect())
    }
}

#[async_trait]
impl Brokerage for AlpacaClient {
    async fn is_market_open(&self) -> bool {
        match self.clock().await {
            Ok(clock) => clock.is_open,
            Err(e) => {
                error!("Error fetching market clock: {}", e);
                false
            }
        }
    }

    async fn fetch_position(&self, symbol: &str) -> Option<Position> {
        self.get_position(symbol).await.unwrap_or_else(|e| {
            error!(symbol = %symbol, "Error fetching position: {}", e);
            None
        })
    }

    async fn close_position(&self, symbol: &str) {
        if let Err(e) = self.liquidate(symbol).await {
            error!(symbol = %symbol, "Error closing position: {}", e);
        }
    }

    async fn cancel_all_orders(&self, symbol: &str) {
        match self.cancel_orders_for(symbol).await {
            Ok(n) => info!(symbol = %symbol, canceled = n, "Canceled open orders"),
            Err(e) => error!(symbol = %symbol, "Error fetching open orders: {}", e),
        }
    }

    async fn get_buying_power(&self) -> Decimal {
        self.buying_power().await.unwrap_or_else(|e| {
            error!("Error fetching buying power: {}", e);
            Decimal::ZERO
        })
    }

    async fn place_order(&self, request: OrderRequest) -> Option<OrderId> {
        match self.submit_order(&request).await {
            Ok(id) => Some(id),
            Err(e) => {
                error!(symbol = %request.symbol, "Error placing order: {}", e);
                None
            }
        }
    }

    fn name(&self) -> &str {
        if self.config.paper {
            "Alpaca Paper"
        } else {
            "Alpaca Live"
        }
    }
}

#[async_trait]
impl Screener for AlpacaClient {
    async fn most_active(&self, top: usize) -> Vec<String> {
        match self.most_actives(top).await {
            Ok(symbols) => {
                info!(?symbols, "Fetched most active stocks");
                symbols
            }
            Err(e) => {
                error!("Error fetching most active stocks: {}", e);
                Vec::new()
            }
        }
    }
}
