//! CSV data source.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use trader_core::error::DataError;
use trader_core::traits::MarketData;
use trader_core::types::{Bar, Timeframe};
use tracing::{error, warn};

/// CSV record format.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(alias = "Date", alias = "timestamp", alias = "Timestamp")]
    date: String,
    #[serde(alias = "Open")]
    open: f64,
    #[serde(alias = "High")]
    high: f64,
    #[serde(alias = "Low")]
    low: f64,
    #[serde(alias = "Close", alias = "Adj Close")]
    close: f64,
    #[serde(alias = "Volume", default)]
    volume: f64,
}

/// Bars read from a CSV file with a header row.
///
/// The whole file is one symbol's history; the symbol and timeframe passed
/// to [`MarketData::get_bars`] are not checked against it.
pub struct CsvDataSource {
    path: PathBuf,
}

impl CsvDataSource {
    /// Create a new CSV data source.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DataError::Configuration(format!(
                "CSV file not found: {}",
                path.display()
            )));
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// Load all bars from the file, sorted by timestamp.
    pub fn load(&self) -> Result<Vec<Bar>, DataError> {
        read_bars(&self.path)
    }
}

fn read_bars(path: &Path) -> Result<Vec<Bar>, DataError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| DataError::ParseError(e.to_string()))?;

    let mut bars = Vec::new();

    for result in reader.deserialize() {
        let record: CsvRecord = result.map_err(|e| DataError::ParseError(e.to_string()))?;

        bars.push(Bar::new(
            parse_timestamp(&record.date)?,
            record.open,
            record.high,
            record.low,
            record.close,
            record.volume,
        ));
    }

    bars.sort_by_key(|b| b.timestamp);
    Ok(bars)
}

/// Parse RFC 3339, common date/datetime layouts, or unix seconds/millis.
fn parse_timestamp(date_str: &str) -> Result<DateTime<Utc>, DataError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(date_str) {
        return Ok(dt.with_timezone(&Utc));
    }

    let datetime_formats = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];
    for format in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, format) {
            return Ok(dt.and_utc());
        }
    }

    let date_formats = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
    for format in date_formats {
        if let Ok(d) = NaiveDate::parse_from_str(date_str, format) {
            return Ok(d.and_time(chrono::NaiveTime::MIN).and_utc());
        }
    }

    // Assume milliseconds if > 10 digits
    if let Ok(ts) = date_str.parse::<i64>() {
        let parsed = if ts > 10_000_000_000 {
            DateTime::from_timestamp_millis(ts)
        } else {
            DateTime::from_timestamp(ts, 0)
        };
        if let Some(dt) = parsed {
            return Ok(dt);
        }
    }

    Err(DataError::ParseError(format!(
        "Could not parse date: {}",
        date_str
    )))
}

#[async_trait]
impl MarketData for CsvDataSource {
    async fn get_bars(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        _timeframe: Timeframe,
    ) -> Vec<Bar> {
        // File IO stays off the runtime thread
        let path = self.path.clone();
        let loaded = tokio::task::spawn_blocking(move || read_bars(&path))
            .await
            .unwrap_or_else(|e| Err(DataError::ConnectionError(format!("CSV reader task failed: {}", e))));

        match loaded {
            Ok(bars) => {
                let in_range: Vec<Bar> = bars
                    .into_iter()
                    .filter(|b| b.timestamp >= start && b.timestamp <= end)
                    .collect();
                if in_range.is_empty() {
                    warn!(symbol = %symbol, path = %self.path.display(), "No CSV bars in requested range");
                }
                in_range
            }
            Err(e) => {
                error!(symbol = %symbol, path = %self.path.display(), "Error reading CSV bars: {}", e);
                Vec::new()
            }
        }
    }

    fn name(&self) -> &str {
        "CSV"
    }
}
