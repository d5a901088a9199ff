//! Signal strategy trait definitions.

use crate::error::StrategyError;
use crate::types::{Bar, Signal};

/// Configuration trait for strategies.
pub trait StrategyConfig: Send + Sync + Clone + 'static {
    /// Validate the configuration.
    fn validate(&self) -> Result<(), StrategyError>;
}

/// A pure function from a bar sequence to an annotated signal sequence.
///
/// Implementations take `&self` and must not keep state between calls:
/// the same bars always produce the same signals.
pub trait SignalStrategy: Send + Sync {
    /// Get the unique name of this strategy.
    fn name(&self) -> &str;

    /// Annotate a bar sequence, oldest first.
    fn generate(&self, bars: &[Bar]) -> Vec<Signal>;
}
