//! Chart data written for the charting front end.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, error};
use trader_core::error::TradingResult;
use trader_core::traits::ArtifactSink;
use trader_core::types::Signal;

/// Name of the symbol index document.
pub const INDEX_FILE: &str = "filelist.txt";

/// Document name holding the signals of `symbol`.
pub fn index_entry(symbol: &str) -> String {
    format!("marketdata_{}.json", symbol)
}

/// Writes one JSON document per symbol plus a newline-delimited index of
/// those documents into a directory. Every write replaces the previous
/// contents.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    dir: PathBuf,
}

impl JsonFileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write the signal document for `symbol`.
    pub async fn save_signals(&self, symbol: &str, signals: &[Signal]) -> TradingResult<PathBuf> {
        let path = self.dir.join(index_entry(symbol));
        let body = serde_json::to_vec(signals)?;

        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(&path, body).await?;
        Ok(path)
    }

    /// Write the index listing the documents of `symbols`.
    pub async fn save_index(&self, symbols: &[String]) -> TradingResult<PathBuf> {
        let path = self.dir.join(INDEX_FILE);
        let body = symbols
            .iter()
            .map(|s| index_entry(s))
            .collect::<Vec<_>>()
            .join("\n");

        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(&path, body).await?;
        Ok(path)
    }
}

#[async_trait]
impl ArtifactSink for JsonFileSink {
    async fn write_signals(&self, symbol: &str, signals: &[Signal]) {
        match self.save_signals(symbol, signals).await {
            Ok(path) => debug!(symbol = %symbol, path = %path.display(), "Wrote chart data"),
            Err(e) => error!(symbol = %symbol, "Error writing chart data: {}", e),
        }
    }

    async fn write_index(&self, symbols: &[String]) {
        if let Err(e) = self.save_index(symbols).await {
            error!("Error writing file list: {}", e);
        }
    }
}
