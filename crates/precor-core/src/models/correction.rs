//! Correction result records.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::index::YearMonth;

/// Running value after one month of compounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrectionStep {
    /// Index month applied.
    pub month: YearMonth,
    /// Percentage applied.
    pub percent: Decimal,
    /// Value after applying and rounding.
    pub value: Decimal,
}

/// Outcome of a correction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrectionResult {
    /// Corrected gross value, 2 decimal places.
    pub corrected_gross_value: Decimal,

    /// Net value after withholding, 2 decimal places.
    pub final_net_value: Decimal,

    /// Last index month applied, if any.
    pub last_applied_month: Option<YearMonth>,

    /// Month compounding started from.
    pub base_month: YearMonth,

    /// Per-month audit trail, ascending by month.
    pub steps: Vec<CorrectionStep>,
}

/// Month a correction is valid as of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "month", rename_all = "snake_case")]
pub enum AsOfMonth {
    /// At least one index month was applied; holds the last one.
    Indexed(YearMonth),
    /// No index data covers the base month; holds the base month.
    NoIndexAvailable(YearMonth),
}

impl AsOfMonth {
    pub fn month(&self) -> YearMonth {
        match self {
            Self::Indexed(month) | Self::NoIndexAvailable(month) => *month,
        }
    }
}

impl CorrectionResult {
    /// Whether any index month was applied.
    pub fn is_corrected(&self) -> bool {
        self.last_applied_month.is_some()
    }

    pub fn as_of_month(&self) -> AsOfMonth {
        match self.last_applied_month {
            Some(month) => AsOfMonth::Indexed(month),
            None => AsOfMonth::NoIndexAvailable(self.base_month),
        }
    }
}
