//! Tiingo IEX intraday price client.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use trader_core::error::DataError;
use trader_core::traits::MarketData;
use trader_core::types::{Bar, Timeframe};
use tracing::{debug, error, info};

const DEFAULT_BASE_URL: &str = "https://api.tiingo.com";
const DEFAULT_TOKEN_VAR: &str = "TIINGO_API_KEY";

/// Tiingo API configuration.
#[derive(Clone)]
pub struct TiingoConfig {
    pub api_key: String,
    pub base_url: String,
}

impl std::fmt::Debug for TiingoConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TiingoConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl TiingoConfig {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Load the API token from `TIINGO_API_KEY`.
    pub fn from_env() -> Result<Self, DataError> {
        Self::from_env_var(DEFAULT_TOKEN_VAR)
    }

    /// Load the API token from the named environment variable.
    pub fn from_env_var(token_var: &str) -> Result<Self, DataError> {
        let api_key = std::env::var(token_var)
            .map_err(|_| DataError::Configuration(format!("{token_var} not set")))?;
        Ok(Self::new(api_key))
    }
}

/// Client for Tiingo's IEX price endpoint.
pub struct TiingoClient {
    config: TiingoConfig,
    client: Client,
}

impl TiingoClient {
    pub fn new(config: TiingoConfig) -> Result<Self, DataError> {
        let client = Client::builder()
            .build()
            .map_err(|e| DataError::ConnectionError(e.to_string()))?;
        Ok(Self { config, client })
    }

    fn prices_url(&self, symbol: &str) -> String {
        format!("{}/iex/{}/prices", self.config.base_url, symbol)
    }

    /// Query parameters for a price request. Only the calendar dates of
    /// `start` and `end` are sent.
    fn query(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        timeframe: Timeframe,
    ) -> Vec<(&'static str, String)> {
        vec![
            ("startDate", start.format("%Y-%m-%d").to_string()),
            ("endDate", end.format("%Y-%m-%d").to_string()),
            ("resampleFreq", timeframe.resample_freq().to_string()),
            ("columns", "open,high,low,close,volume".to_string()),
            ("token", self.config.api_key.clone()),
        ]
    }

    /// Fetch bars between the calendar dates of `start` and `end`.
    pub async fn fetch_bars(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        timeframe: Timeframe,
    ) -> Result<Vec<Bar>, DataError> {
        let url = self.prices_url(symbol);
        debug!(symbol = %symbol, %start, %end, %timeframe, "Requesting Tiingo prices");

        let resp = self
            .client
            .get(&url)
            .query(&self.query(start, end, timeframe))
            .send()
            .await
            .map_err(|e| DataError::ConnectionError(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(DataError::ApiError(format!("{}: {}", status, text)));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| DataError::ConnectionError(e.to_string()))?;
        parse_bars(&body)
    }
}

fn parse_bars(body: &str) -> Result<Vec<Bar>, DataError> {
    serde_json::from_str(body).map_err(|e| DataError::ParseError(e.to_string()))
}

#[async_trait]
impl MarketData for TiingoClient {
    async fn get_bars(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        timeframe: Timeframe,
    ) -> Vec<Bar> {
        match self.fetch_bars(symbol, start, end, timeframe).await {
            Ok(bars) => {
                info!(symbol = %symbol, count = bars.len(), "Fetched bars");
                bars
            }
            Err(e) => {
                error!(symbol = %symbol, "Error fetching bars: {}", e);
                Vec::new()
            }
        }
    }

    fn name(&self) -> &str {
        "Tiingo IEX"
    }
}
