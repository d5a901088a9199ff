//! Sink for chart artifacts.

use crate::types::Signal;
use async_trait::async_trait;

/// Destination for the per-cycle signal documents read by the charting
/// client. Writes replace whatever was there before; failures are logged,
/// never returned.
#[async_trait]
pub trait ArtifactSink: Send + Sync {
    /// Replace the annotated signal document for a symbol.
    async fn write_signals(&self, symbol: &str, signals: &[Signal]);

    /// Replace the index of per-symbol documents.
    async fn write_index(&self, symbols: &[String]);
}
