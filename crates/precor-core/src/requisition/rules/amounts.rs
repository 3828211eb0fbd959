//! Amount extraction and formatting in Brazilian notation.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::GROSS_VALUE;
use super::{ExtractionMatch, FieldExtractor};
use crate::correction::round_currency;

/// Extracts the labelled gross requisition value.
pub struct GrossValueExtractor;

impl GrossValueExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GrossValueExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for GrossValueExtractor {
    type Output = ExtractionMatch<Decimal>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        let caps = GROSS_VALUE.captures(text)?;
        let amount = parse_brl_amount(caps[1].trim_end_matches('.'))?;
        let full_match = caps.get(0)?;

        Some(
            ExtractionMatch::new(amount, 0.95, full_match.as_str())
                .with_position(full_match.start(), full_match.end()),
        )
    }
}

/// Parse a Brazilian-formatted amount (e.g. "650.266,04").
///
/// Dots are thousands separators and the comma is the decimal separator.
/// Anything besides digits and well-placed separators is rejected.
pub fn parse_brl_amount(s: &str) -> Option<Decimal> {
    let s = s.trim();
    if !s.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',') {
        return None;
    }

    let (integer_part, fraction) = match s.split_once(',') {
        Some((integer_part, fraction)) => (integer_part, Some(fraction)),
        None => (s, None),
    };

    if let Some(fraction) = fraction {
        if fraction.is_empty() || !fraction.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
    }

    let mut groups = integer_part.split('.');
    let lead = groups.next()?;
    if lead.is_empty() || (integer_part.contains('.') && lead.len() > 3) {
        return None;
    }
    if !groups.all(|g| g.len() == 3) {
        return None;
    }

    let mut normalized = integer_part.replace('.', "");
    if let Some(fraction) = fraction {
        normalized.push('.');
        normalized.push_str(fraction);
    }

    Decimal::from_str(&normalized).ok()
}

/// Format an amount in Brazilian style (650.266,04).
pub fn format_brl_amount(amount: Decimal) -> String {
    let rounded = round_currency(amount);
    let s = format!("{:.2}", rounded.abs());

    let (integer_part, decimal_part) = match s.split_once('.') {
        Some(parts) => parts,
        None => return s,
    };

    // Add thousand separators
    let chars: Vec<char> = integer_part.chars().collect();
    let mut formatted = String::new();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            formatted.push('.');
        }
        formatted.push(*c);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    format!("{}{},{}", sign, formatted, decimal_part)
}

/// Format an amount with a currency symbol (R$ 650.266,04).
pub fn format_brl_currency(amount: Decimal, symbol: &str) -> String {
    format!("{} {}", symbol, format_brl_amount(amount))
}
