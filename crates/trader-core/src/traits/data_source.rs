//! Market data capability trait.

use crate::types::{Bar, Timeframe};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Trait for historical bar sources.
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Fetch historical bars.
    ///
    /// # Arguments
    /// * `symbol` - The symbol to fetch
    /// * `start` - Start of the date range
    /// * `end` - End of the date range
    /// * `timeframe` - The bar sampling interval
    ///
    /// # Returns
    /// Bars ordered from oldest to newest. Any fetch or parse failure is
    /// logged and yields an empty vector.
    async fn get_bars(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        timeframe: Timeframe,
    ) -> Vec<Bar>;

    /// Get the data source name.
    fn name(&self) -> &str;
}
