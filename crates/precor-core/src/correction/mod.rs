//! Monetary correction by a monthly price index.

mod calculator;

pub use calculator::{round_currency, IndexationCalculator, NET_FACTOR, WITHHOLDING_RATE};

use crate::error::CorrectionError;

/// Result type for correction operations.
pub type Result<T> = std::result::Result<T, CorrectionError>;
