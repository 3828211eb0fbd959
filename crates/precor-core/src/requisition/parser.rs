//! Rule-based requisition parser.

use std::time::Instant;

use tracing::{debug, info};

use crate::error::ExtractionError;
use crate::models::requisition::RequisitionFields;

use super::rules::{
    patterns::{BENEFICIARY_NAME, LETTER_NUMBER},
    BaseDateExtractor, CpfExtractor, FieldExtractor, GrossValueExtractor,
};
use super::{RequisitionExtractor, Result};

/// Result of requisition extraction.
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Extracted fields.
    pub fields: RequisitionFields,
    /// Extraction warnings.
    pub warnings: Vec<String>,
    /// Overall confidence (0.0 - 1.0).
    pub confidence: f32,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Parser for payment-requisition notices.
pub struct RequisitionParser {
    /// Whether to check CPF check digits.
    validate_cpf: bool,
}

impl RequisitionParser {
    /// Create a new parser with default settings.
    pub fn new() -> Self {
        Self { validate_cpf: true }
    }

    /// Set CPF validation.
    pub fn with_cpf_validation(mut self, validate: bool) -> Self {
        self.validate_cpf = validate;
        self
    }

    fn extract_letter_number(&self, text: &str) -> Option<String> {
        LETTER_NUMBER
            .captures(text)
            .map(|caps| caps[1].trim().to_string())
    }

    fn extract_beneficiary_name(&self, text: &str) -> Option<String> {
        BENEFICIARY_NAME
            .captures(text)
            .map(|caps| caps[1].trim().to_string())
            .filter(|name| !name.is_empty())
    }
}

impl Default for RequisitionParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Replace non-breaking spaces, which PDF text extraction often emits.
fn normalize_text(text: &str) -> String {
    text.replace('\u{00a0}', " ")
}

impl RequisitionExtractor for RequisitionParser {
    fn parse(&self, text: &str) -> Result<ParseResult> {
        let start = Instant::now();

        if text.trim().is_empty() {
            return Err(ExtractionError::NoData);
        }

        let text = normalize_text(text);
        let mut warnings = Vec::new();
        let mut value_issues = 0;

        info!("Parsing requisition from {} characters of text", text.len());

        let letter_number = self.extract_letter_number(&text);
        let beneficiary_name = self.extract_beneficiary_name(&text);

        let cpf = CpfExtractor::new()
            .with_validation(self.validate_cpf)
            .extract(&text);
        if let Some(m) = &cpf {
            if self.validate_cpf && m.confidence < 0.5 {
                warnings.push(format!("CPF {} has invalid check digits", m.value));
                value_issues += 1;
            }
        }

        let gross_value = GrossValueExtractor::new().extract(&text);

        let base_date = BaseDateExtractor::new().extract(&text);
        if let Some(m) = &base_date {
            if m.confidence < 0.5 {
                warnings.push(format!("Base date {} is not a valid calendar date", m.value));
                value_issues += 1;
            }
        }

        let fields = RequisitionFields {
            letter_number,
            beneficiary_name,
            beneficiary_cpf: cpf.map(|m| m.value),
            gross_value: gross_value.map(|m| m.value),
            base_date: base_date.map(|m| m.value),
        };

        let missing = fields.missing_fields();
        if missing.len() == 5 {
            return Err(ExtractionError::NoData);
        }
        for field in &missing {
            warnings.push(format!("Could not extract {}", field));
        }

        let confidence = (1.0 - 0.2 * missing.len() as f32 - 0.1 * value_issues as f32).max(0.0);

        debug!(
            "Extracted requisition {:?} with confidence {:.2}",
            fields.letter_number, confidence
        );

        Ok(ParseResult {
            fields,
            warnings,
            confidence,
            processing_time_ms: start.elapsed().as_millis() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    const NOTICE: &str = "
        PODER JUDICIÁRIO
        REQUISIÇÃO DE PAGAMENTO
        Definitivo OFÍCIO Nº: 2024.0001234/RPV
        I - PROCESSO
        II - REQUERIDO
        III - BENEFICIÁRIO
        Nome: MARIA DA SILVA SANTOS
        CPF: 529.982.247-25
        IV - VALORES
        Valor bruto da requisição: R$\u{00a0}650.266,04
        Data base do cálculo: 01/01/2024
    ";

    #[test]
    fn test_parse_full_notice() {
        let result = RequisitionParser::new().parse(NOTICE).unwrap();

        assert_eq!(
            result.fields,
            RequisitionFields {
                letter_number: Some("2024.0001234/RPV".to_string()),
                beneficiary_name: Some("MARIA DA SILVA SANTOS".to_string()),
                beneficiary_cpf: Some("52998224725".to_string()),
                gross_value: Some(dec!(650266.04)),
                base_date: Some("01/01/2024".to_string()),
            }
        );
        assert!(result.warnings.is_empty());
        assert_eq!(result.confidence, 1.0);
    }

    #[test]
    fn test_parse_missing_fields_warns() {
        let text = "Valor bruto da requisição: R$ 1.000,00\n";
        let result = RequisitionParser::new().parse(text).unwrap();

        assert_eq!(result.fields.gross_value, Some(dec!(1000.00)));
        assert_eq!(result.fields.base_date, None);
        assert_eq!(result.warnings.len(), 4);
        assert!(result.warnings.contains(&"Could not extract base_date".to_string()));
        assert!(result.confidence < 0.3);
    }

    #[test]
    fn test_parse_invalid_cpf_warns() {
        let text = NOTICE.replace("529.982.247-25", "529.982.247-24");
        let result = RequisitionParser::new().parse(&text).unwrap();

        assert_eq!(result.fields.beneficiary_cpf.as_deref(), Some("52998224724"));
        assert_eq!(result.warnings.len(), 1);

        let unchecked = RequisitionParser::new().with_cpf_validation(false).parse(&text).unwrap();
        assert!(unchecked.warnings.is_empty());
    }

    #[test]
    fn test_parse_empty_text() {
        assert!(matches!(RequisitionParser::new().parse("   \n"), Err(ExtractionError::NoData)));
        assert!(matches!(
            RequisitionParser::new().parse("unrelated document"),
            Err(ExtractionError::NoData)
        ));
    }
}
