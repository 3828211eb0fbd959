//! Synchronous index series providers.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::series::IndexSeries;
use super::{IndexSeriesProvider, Result};
use crate::error::IndexError;

/// Provider backed by a series already held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticIndexProvider {
    series: IndexSeries,
}

impl StaticIndexProvider {
    pub fn new(series: IndexSeries) -> Self {
        Self { series }
    }
}

impl IndexSeriesProvider for StaticIndexProvider {
    fn series(&self) -> Result<IndexSeries> {
        Ok(self.series.clone())
    }
}

/// Provider reading a series previously saved as JSON.
#[derive(Debug, Clone)]
pub struct JsonFileIndexProvider {
    path: PathBuf,
}

impl JsonFileIndexProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write a series in the format this provider reads.
    pub fn save(&self, series: &IndexSeries) -> Result<()> {
        let content = serde_json::to_string_pretty(series)
            .map_err(|e| IndexError::Parse(e.to_string()))?;
        fs::write(&self.path, content)
            .map_err(|e| IndexError::Unavailable(format!("{}: {}", self.path.display(), e)))
    }
}

impl IndexSeriesProvider for JsonFileIndexProvider {
    fn series(&self) -> Result<IndexSeries> {
        let content = fs::read_to_string(&self.path)
            .map_err(|e| IndexError::Unavailable(format!("{}: {}", self.path.display(), e)))?;
        let series: IndexSeries =
            serde_json::from_str(&content).map_err(|e| IndexError::Parse(e.to_string()))?;

        debug!("Loaded {} index months from {}", series.len(), self.path.display());
        Ok(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::YearMonth;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn sample_series() -> IndexSeries {
        IndexSeries::from_entries([
            (YearMonth::new(2024, 1).unwrap(), dec!(0.42)),
            (YearMonth::new(2024, 2).unwrap(), dec!(0.83)),
        ])
        .unwrap()
    }

    #[test]
    fn test_static_provider() {
        let provider = StaticIndexProvider::new(sample_series());
        assert_eq!(provider.series().unwrap(), sample_series());
    }

    #[test]
    fn test_json_file_provider_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let provider = JsonFileIndexProvider::new(dir.path().join("ipca.json"));

        provider.save(&sample_series()).unwrap();
        assert_eq!(provider.series().unwrap(), sample_series());
    }

    #[test]
    fn test_json_file_provider_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let provider = JsonFileIndexProvider::new(dir.path().join("missing.json"));

        assert!(matches!(provider.series(), Err(IndexError::Unavailable(_))));
    }
}
