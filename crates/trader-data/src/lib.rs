//! Market data sources.

mod csv_source;
mod tiingo;

pub use csv_source::CsvDataSource;
pub use tiingo::{TiingoClient, TiingoConfig};

use trader_core::error::DataError;
use trader_core::types::Bar;

/// Load every bar from a CSV file, oldest first.
pub fn load_csv(path: &str) -> Result<Vec<Bar>, DataError> {
    CsvDataSource::new(path)?.load()
}
