//! Core library for payment-requisition value correction.
//!
//! This crate provides:
//! - PDF text extraction
//! - Requisition field extraction (letter number, beneficiary, CPF, gross value, base date)
//! - Monthly index series (IPCA) and their providers
//! - The indexation calculator: per-month compounding with cent rounding and
//!   a fixed 3% withholding

pub mod error;
pub mod models;
pub mod pdf;
pub mod index;
pub mod requisition;
pub mod correction;

pub use error::{PrecorError, Result};
pub use models::config::{FetchFailurePolicy, PrecorConfig};
pub use models::correction::{AsOfMonth, CorrectionResult, CorrectionStep};
pub use models::requisition::RequisitionFields;
pub use pdf::{PdfContent, PdfExtractor, PdfProcessor};
pub use index::{IndexSeries, IndexSeriesProvider, YearMonth};
pub use requisition::{ParseResult, RequisitionExtractor, RequisitionParser};
pub use correction::IndexationCalculator;
