//! CPF (Brazilian individual taxpayer number) extraction and validation.

use super::patterns::BENEFICIARY_CPF;
use super::{ExtractionMatch, FieldExtractor};

/// Extracts the beneficiary CPF.
pub struct CpfExtractor {
    validate: bool,
}

impl CpfExtractor {
    /// Create a new CPF extractor.
    pub fn new() -> Self {
        Self { validate: true }
    }

    /// Set whether to lower confidence on check-digit mismatch.
    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }
}

impl Default for CpfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for CpfExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        let caps = BENEFICIARY_CPF.captures(text)?;
        let cpf = clean_cpf(&caps[1]);
        if cpf.is_empty() {
            return None;
        }

        let confidence = if self.validate && !validate_cpf(&cpf) { 0.4 } else { 0.95 };
        let full_match = caps.get(1)?;

        Some(
            ExtractionMatch::new(cpf, confidence, full_match.as_str())
                .with_position(full_match.start(), full_match.end()),
        )
    }
}

/// Strip everything except digits.
pub fn clean_cpf(cpf: &str) -> String {
    cpf.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Validate a CPF using its two mod-11 check digits.
///
/// Sequences of a single repeated digit pass the checksum but are not
/// issued, so they are rejected.
pub fn validate_cpf(cpf: &str) -> bool {
    let digits: Vec<u32> = cpf.chars().filter_map(|c| c.to_digit(10)).collect();

    if digits.len() != 11 || digits.iter().all(|&d| d == digits[0]) {
        return false;
    }

    check_digit(&digits[..9]) == digits[9] && check_digit(&digits[..10]) == digits[10]
}

fn check_digit(digits: &[u32]) -> u32 {
    let weight_start = digits.len() as u32 + 1;
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, d)| d * (weight_start - i as u32))
        .sum();

    let remainder = (sum * 10) % 11;
    if remainder == 10 { 0 } else { remainder }
}

/// Format CPF as 000.000.000-00.
pub fn format_cpf(cpf: &str) -> String {
    let digits = clean_cpf(cpf);

    if digits.len() != 11 {
        return cpf.to_string();
    }

    format!(
        "{}.{}.{}-{}",
        &digits[0..3],
        &digits[3..6],
        &digits[6..9],
        &digits[9..11]
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_cpf_valid() {
        assert!(validate_cpf("52998224725"));
        assert!(validate_cpf("529.982.247-25"));
        assert!(validate_cpf("11144477735"));
    }

    #[test]
    fn test_validate_cpf_invalid() {
        assert!(!validate_cpf("52998224724")); // Wrong second digit
        assert!(!validate_cpf("52998224715")); // Wrong first digit
        assert!(!validate_cpf("11111111111")); // Repeated digit
        assert!(!validate_cpf("5299822472")); // Too short
        assert!(!validate_cpf("529982247250")); // Too long
    }

    #[test]
    fn test_clean_and_format_cpf() {
        assert_eq!(clean_cpf("529.982.247-25"), "52998224725");
        assert_eq!(format_cpf("52998224725"), "529.982.247-25");
        assert_eq!(format_cpf("123"), "123");
    }

    #[test]
    fn test_extract_cpf() {
        let text = "III - BENEFICIÁRIO\nNome: MARIA DA SILVA\nCPF: 529.982.247-25\n";
        let result = CpfExtractor::new().extract(text).unwrap();

        assert_eq!(result.value, "52998224725");
        assert!(result.confidence > 0.9);
    }

    #[test]
    fn test_extract_invalid_cpf_keeps_value() {
        let text = "III - BENEFICIÁRIO\nNome: MARIA DA SILVA\nCPF: 52998224724\n";
        let result = CpfExtractor::new().extract(text).unwrap();

        assert_eq!(result.value, "52998224724");
        assert!(result.confidence < 0.5);
    }
}
