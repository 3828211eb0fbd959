//! Base date extraction.

use chrono::NaiveDate;

use super::patterns::BASE_DATE;
use super::{ExtractionMatch, FieldExtractor};

/// Extracts the calculation base date as printed (DD/MM/YYYY).
pub struct BaseDateExtractor;

impl BaseDateExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BaseDateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for BaseDateExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        let caps = BASE_DATE.captures(text)?;
        let date_text = caps.get(1)?;

        // Keep the printed text; an impossible date is still reported so the
        // caller can flag it.
        let confidence = if parse_dmy_date(date_text.as_str()).is_some() { 0.95 } else { 0.3 };

        Some(
            ExtractionMatch::new(date_text.as_str().to_string(), confidence, date_text.as_str())
                .with_position(date_text.start(), date_text.end()),
        )
    }
}

/// Parse DD/MM/YYYY.
pub fn parse_dmy_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%d/%m/%Y").ok()
}
