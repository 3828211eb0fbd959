//! Configuration structures for the correction pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::index::sgs::IPCA_SGS_URL;

/// Main configuration for precor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrecorConfig {
    /// Index series source configuration.
    pub index: IndexConfig,

    /// Requisition extraction configuration.
    pub extraction: ExtractionConfig,

    /// Output formatting configuration.
    pub output: OutputConfig,
}

/// What to do when the index series cannot be fetched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchFailurePolicy {
    /// Abort the run.
    #[default]
    Fail,
    /// Log a warning and continue without correction.
    Degrade,
}

/// Index series source configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// SGS endpoint returning the monthly series as JSON.
    pub source_url: String,

    /// HTTP timeout in seconds.
    pub timeout_secs: u64,

    /// Behaviour when the fetch fails.
    pub on_fetch_failure: FetchFailurePolicy,

    /// Read the series from this file instead of fetching it.
    pub cache_file: Option<PathBuf>,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            source_url: IPCA_SGS_URL.to_string(),
            timeout_secs: 30,
            on_fetch_failure: FetchFailurePolicy::Fail,
            cache_file: None,
        }
    }
}

/// Requisition extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Check CPF check digits and warn on mismatch.
    pub validate_cpf: bool,

    /// Minimum text length to consider a PDF readable.
    pub min_text_length: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            validate_cpf: true,
            min_text_length: 50,
        }
    }
}

/// Output formatting configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Currency symbol placed before formatted amounts.
    pub currency_symbol: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            currency_symbol: "R$".to_string(),
        }
    }
}

impl PrecorConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}
