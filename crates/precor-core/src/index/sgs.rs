//! Decoder for the Central Bank of Brazil SGS JSON format.
//!
//! The SGS endpoint (`bcdata.sgs.<code>/dados?formato=json`) returns a flat
//! array of records such as `{"data": "01/01/2024", "valor": "0.42"}`.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use super::month::YearMonth;
use super::series::IndexSeries;
use super::Result;
use crate::error::IndexError;

/// SGS series code for monthly IPCA.
pub const IPCA_SERIES_CODE: u32 = 433;

/// Default SGS URL for monthly IPCA.
pub const IPCA_SGS_URL: &str = "https://api.bcb.gov.br/dados/serie/bcdata.sgs.433/dados?formato=json";

#[derive(Debug, Deserialize)]
struct SgsRecord {
    data: String,
    valor: String,
}

/// Decode an SGS JSON response into an index series.
pub fn parse_sgs_series(body: &[u8]) -> Result<IndexSeries> {
    let records: Vec<SgsRecord> =
        serde_json::from_slice(body).map_err(|e| IndexError::Parse(e.to_string()))?;

    let mut series = IndexSeries::new();
    for record in &records {
        let date = NaiveDate::parse_from_str(record.data.trim(), "%d/%m/%Y")
            .map_err(|_| IndexError::Parse(format!("invalid date '{}'", record.data)))?;
        let percent = Decimal::from_str(record.valor.trim())
            .map_err(|_| IndexError::Parse(format!("invalid value '{}' for {}", record.valor, record.data)))?;

        series.push(YearMonth::from_date(date), percent)?;
    }

    debug!("Decoded {} SGS records", series.len());
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_sgs_series() {
        let body = br#"[
            {"data": "01/01/2024", "valor": "0.42"},
            {"data": "01/02/2024", "valor": "0.83"},
            {"data": "01/03/2024", "valor": "-0.02"}
        ]"#;

        let series = parse_sgs_series(body).unwrap();

        assert_eq!(series.len(), 3);
        assert_eq!(series.get(YearMonth::new(2024, 2).unwrap()), Some(dec!(0.83)));
        assert_eq!(series.get(YearMonth::new(2024, 3).unwrap()), Some(dec!(-0.02)));
    }

    #[test]
    fn test_parse_normalizes_day() {
        let body = br#"[{"data": "15/06/2023", "valor": "-0.08"}]"#;
        let series = parse_sgs_series(body).unwrap();

        assert_eq!(series.get(YearMonth::new(2023, 6).unwrap()), Some(dec!(-0.08)));
    }

    #[test]
    fn test_parse_rejects_duplicates() {
        let body = br#"[
            {"data": "01/01/2024", "valor": "0.42"},
            {"data": "20/01/2024", "valor": "0.42"}
        ]"#;

        assert!(matches!(parse_sgs_series(body), Err(IndexError::DuplicateMonth(_))));
    }

    #[test]
    fn test_parse_rejects_bad_records() {
        assert!(parse_sgs_series(br#"[{"data": "2024-01-01", "valor": "0.42"}]"#).is_err());
        assert!(parse_sgs_series(br#"[{"data": "01/01/2024", "valor": "n/a"}]"#).is_err());
        assert!(parse_sgs_series(b"<html>error</html>").is_err());
    }

    #[test]
    fn test_parse_empty_array() {
        let series = parse_sgs_series(b"[]").unwrap();
        assert!(series.is_empty());
    }
}
