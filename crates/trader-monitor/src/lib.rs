//! Logging setup and chart data artifacts.

mod artifacts;
mod logging;

pub use artifacts::{index_entry, JsonFileSink, INDEX_FILE};
pub use logging::setup_logging;
