//! Monthly price-index series and the providers that supply them.

mod month;
mod provider;
mod series;
pub mod sgs;

pub use month::YearMonth;
pub use provider::{JsonFileIndexProvider, StaticIndexProvider};
pub use series::{IndexEntry, IndexSeries};
pub use sgs::parse_sgs_series;

use crate::error::IndexError;

/// Result type for index operations.
pub type Result<T> = std::result::Result<T, IndexError>;

/// Source of an index series.
///
/// Implementations are read once per calculator; the calculator keeps the
/// returned series for its lifetime.
pub trait IndexSeriesProvider {
    /// Read the full available series.
    fn series(&self) -> Result<IndexSeries>;
}
