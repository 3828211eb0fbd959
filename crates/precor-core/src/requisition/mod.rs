//! Requisition field extraction module.

mod parser;
pub mod rules;

pub use parser::{ParseResult, RequisitionParser};

use crate::error::ExtractionError;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Trait for requisition text parsers.
pub trait RequisitionExtractor {
    /// Extract requisition fields from plain text.
    fn parse(&self, text: &str) -> Result<ParseResult>;
}
