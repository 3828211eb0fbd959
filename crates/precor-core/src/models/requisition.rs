//! Fields extracted from a payment-requisition notice.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ExtractionError;

/// Data read from a requisition PDF.
///
/// Every field is optional because any of them may be missing from a
/// given notice; the correction only needs the gross value and base date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequisitionFields {
    /// Official letter number (número do ofício).
    pub letter_number: Option<String>,

    /// Beneficiary full name.
    pub beneficiary_name: Option<String>,

    /// Beneficiary CPF, digits only.
    pub beneficiary_cpf: Option<String>,

    /// Gross requisition value.
    pub gross_value: Option<Decimal>,

    /// Calculation base date as printed (DD/MM/YYYY).
    pub base_date: Option<String>,
}

impl RequisitionFields {
    /// Gross value and base date, or the first one that is missing.
    pub fn require_correction_input(&self) -> Result<(Decimal, &str), ExtractionError> {
        let gross_value = self
            .gross_value
            .ok_or_else(|| ExtractionError::MissingField("gross_value".to_string()))?;
        let base_date = self
            .base_date
            .as_deref()
            .ok_or_else(|| ExtractionError::MissingField("base_date".to_string()))?;

        Ok((gross_value, base_date))
    }

    /// Names of fields that were not found.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.letter_number.is_none() {
            missing.push("letter_number");
        }
        if self.beneficiary_name.is_none() {
            missing.push("beneficiary_name");
        }
        if self.beneficiary_cpf.is_none() {
            missing.push("beneficiary_cpf");
        }
        if self.gross_value.is_none() {
            missing.push("gross_value");
        }
        if self.base_date.is_none() {
            missing.push("base_date");
        }
        missing
    }
}
