//! Month-by-month compounding of a gross value against an index series.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use super::Result;
use crate::error::CorrectionError;
use crate::index::{IndexSeries, IndexSeriesProvider, YearMonth};
use crate::models::correction::{CorrectionResult, CorrectionStep};
use crate::models::requisition::RequisitionFields;

/// Flat withholding deducted from the corrected gross value.
pub const WITHHOLDING_RATE: Decimal = dec!(0.03);

/// Share of the corrected gross value paid out.
pub const NET_FACTOR: Decimal = dec!(0.97);

const ONE_HUNDRED: Decimal = dec!(100);

/// Round to cents, ties away from zero.
pub fn round_currency(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Applies a fixed monthly index series to gross values.
///
/// The series is read once at construction and never modified, so a single
/// calculator can serve any number of threads.
#[derive(Debug, Clone)]
pub struct IndexationCalculator {
    series: IndexSeries,
}

impl IndexationCalculator {
    /// Create a calculator bound to `series`. An empty series is rejected.
    pub fn new(series: IndexSeries) -> Result<Self> {
        if series.is_empty() {
            return Err(CorrectionError::InvalidConfiguration(
                "index series is empty".to_string(),
            ));
        }
        Ok(Self { series })
    }

    /// Read the series from `provider` and build a calculator from it.
    pub fn from_provider(provider: &dyn IndexSeriesProvider) -> Result<Self> {
        let series = provider
            .series()
            .map_err(|e| CorrectionError::InvalidConfiguration(e.to_string()))?;
        Self::new(series)
    }

    /// Calculator without index data. Every result reports
    /// [`AsOfMonth::NoIndexAvailable`](crate::models::correction::AsOfMonth).
    pub fn uncorrected() -> Self {
        Self {
            series: IndexSeries::new(),
        }
    }

    /// True when built with [`IndexationCalculator::uncorrected`].
    pub fn is_degraded(&self) -> bool {
        self.series.is_empty()
    }

    pub fn series(&self) -> &IndexSeries {
        &self.series
    }

    /// Correct `gross_value` from the month of `base_date` (DD/MM/YYYY).
    pub fn calculate(&self, gross_value: Decimal, base_date: &str) -> Result<CorrectionResult> {
        let date = parse_base_date(base_date)?;
        self.calculate_date(gross_value, date)
    }

    /// Correct `gross_value` from the month of `base_date`.
    pub fn calculate_date(&self, gross_value: Decimal, base_date: NaiveDate) -> Result<CorrectionResult> {
        if gross_value <= Decimal::ZERO {
            return Err(CorrectionError::InvalidInput(format!(
                "gross value must be positive, got {}",
                gross_value
            )));
        }

        let base_month = YearMonth::from_date(base_date);
        let relevant = self.series.since(base_month);

        let mut value = gross_value;
        let mut steps = Vec::with_capacity(relevant.len());

        for entry in relevant {
            let multiplier = Decimal::ONE + entry.percent / ONE_HUNDRED;
            let product = value.checked_mul(multiplier).ok_or_else(|| {
                CorrectionError::InvalidInput(format!("value overflow at {}", entry.month))
            })?;
            value = round_currency(product);

            steps.push(CorrectionStep {
                month: entry.month,
                percent: entry.percent,
                value,
            });
        }

        let corrected_gross_value = round_currency(value);
        let final_net_value = round_currency(corrected_gross_value * NET_FACTOR);

        Ok(CorrectionResult {
            corrected_gross_value,
            final_net_value,
            last_applied_month: steps.last().map(|s| s.month),
            base_month,
            steps,
        })
    }

    /// Correct the gross value and base date found in a requisition.
    pub fn calculate_fields(&self, fields: &RequisitionFields) -> crate::Result<CorrectionResult> {
        let (gross_value, base_date) = fields.require_correction_input()?;
        Ok(self.calculate(gross_value, base_date)?)
    }
}

/// Parse a DD/MM/YYYY date with a four-digit year.
fn parse_base_date(s: &str) -> Result<NaiveDate> {
    let invalid = || CorrectionError::InvalidInput(format!("invalid base date '{}', expected DD/MM/YYYY", s));

    let s = s.trim();
    let parts: Vec<&str> = s.split('/').collect();
    if parts.len() != 3
        || parts[2].len() != 4
        || !parts.iter().all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()))
    {
        return Err(invalid());
    }

    NaiveDate::parse_from_str(s, "%d/%m/%Y").map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::StaticIndexProvider;
    use crate::models::correction::AsOfMonth;
    use pretty_assertions::assert_eq;

    fn month(year: i32, month: u32) -> YearMonth {
        YearMonth::new(year, month).unwrap()
    }

    fn calculator(entries: &[((i32, u32), Decimal)]) -> IndexationCalculator {
        let series = IndexSeries::from_entries(
            entries.iter().map(|&((y, m), p)| (month(y, m), p)),
        )
        .unwrap();
        IndexationCalculator::new(series).unwrap()
    }

    #[test]
    fn test_two_month_compounding() {
        let calc = calculator(&[((2024, 1), dec!(0.42)), ((2024, 2), dec!(0.50))]);

        let result = calc.calculate(dec!(1000.00), "01/01/2024").unwrap();

        assert_eq!(result.corrected_gross_value, dec!(1009.22));
        // 1009.22 * 0.97 = 978.9434
        assert_eq!(result.final_net_value, dec!(978.94));
        assert_eq!(result.last_applied_month, Some(month(2024, 2)));
        assert_eq!(
            result.steps.iter().map(|s| s.value).collect::<Vec<_>>(),
            vec![dec!(1004.20), dec!(1009.22)]
        );
    }

    #[test]
    fn test_base_month_after_series() {
        let calc = calculator(&[((2023, 1), dec!(0.10))]);

        let result = calc.calculate(dec!(500.00), "01/06/2024").unwrap();

        assert_eq!(result.corrected_gross_value, dec!(500.00));
        assert_eq!(result.final_net_value, dec!(485.00));
        assert_eq!(result.last_applied_month, None);
        assert!(result.steps.is_empty());
        assert_eq!(result.as_of_month(), AsOfMonth::NoIndexAvailable(month(2024, 6)));
    }

    #[test]
    fn test_uncovered_gross_is_rounded() {
        let calc = calculator(&[((2023, 1), dec!(0.10))]);

        let result = calc.calculate(dec!(123.455), "10/02/2024").unwrap();

        assert_eq!(result.corrected_gross_value, dec!(123.46));
    }

    #[test]
    fn test_day_is_ignored() {
        let calc = calculator(&[((2024, 1), dec!(0.42)), ((2024, 2), dec!(0.50))]);

        let first = calc.calculate(dec!(1000.00), "01/01/2024").unwrap();
        let last = calc.calculate(dec!(1000.00), "31/01/2024").unwrap();

        assert_eq!(first, last);
        assert_eq!(last.base_month, month(2024, 1));
    }

    #[test]
    fn test_months_before_base_are_skipped() {
        let calc = calculator(&[
            ((2023, 12), dec!(10.00)),
            ((2024, 1), dec!(0.42)),
            ((2024, 2), dec!(0.50)),
        ]);

        let result = calc.calculate(dec!(1000.00), "15/01/2024").unwrap();

        assert_eq!(result.corrected_gross_value, dec!(1009.22));
        assert_eq!(result.steps.len(), 2);
    }

    #[test]
    fn test_rounds_half_up_each_step() {
        // 100.00 * 1.00005 = 100.005 -> 100.01, then 0% keeps it.
        let calc = calculator(&[((2024, 1), dec!(0.005)), ((2024, 2), dec!(0))]);

        let result = calc.calculate(dec!(100.00), "01/01/2024").unwrap();

        assert_eq!(result.steps[0].value, dec!(100.01));
        assert_eq!(result.corrected_gross_value, dec!(100.01));
    }

    #[test]
    fn test_per_step_rounding_differs_from_end_rounding() {
        // Unrounded: 10.00 * 1.0004 * 1.0004 = 10.0080016 -> 10.01.
        // Per step: 10.004 -> 10.00, 10.004 -> 10.00.
        let calc = calculator(&[((2024, 1), dec!(0.04)), ((2024, 2), dec!(0.04))]);

        let result = calc.calculate(dec!(10.00), "01/01/2024").unwrap();

        assert_eq!(result.corrected_gross_value, dec!(10.00));
    }

    #[test]
    fn test_source_order_does_not_matter() {
        let ordered = calculator(&[
            ((2024, 1), dec!(0.42)),
            ((2024, 2), dec!(0.83)),
            ((2024, 3), dec!(0.16)),
            ((2024, 4), dec!(0.38)),
        ]);
        let shuffled = calculator(&[
            ((2024, 3), dec!(0.16)),
            ((2024, 1), dec!(0.42)),
            ((2024, 4), dec!(0.38)),
            ((2024, 2), dec!(0.83)),
        ]);

        let a = ordered.calculate(dec!(650266.04), "01/01/2024").unwrap();
        let b = shuffled.calculate(dec!(650266.04), "01/01/2024").unwrap();

        assert_eq!(a, b);
        assert_eq!(b.last_applied_month, Some(month(2024, 4)));
    }

    #[test]
    fn test_non_negative_index_never_decreases_value() {
        let calc = calculator(&[
            ((2024, 1), dec!(0.00)),
            ((2024, 2), dec!(0.01)),
            ((2024, 3), dec!(1.25)),
        ]);

        for gross in [dec!(0.01), dec!(1.00), dec!(999.99), dec!(650266.04)] {
            let result = calc.calculate(gross, "01/01/2024").unwrap();
            assert!(result.corrected_gross_value >= gross);
        }
    }

    #[test]
    fn test_negative_index_reduces_value() {
        let calc = calculator(&[((2024, 1), dec!(-0.50))]);

        let result = calc.calculate(dec!(1000.00), "01/01/2024").unwrap();

        assert_eq!(result.corrected_gross_value, dec!(995.00));
    }

    #[test]
    fn test_net_is_rounded_from_corrected_gross() {
        let calc = calculator(&[((2024, 1), dec!(0.42)), ((2024, 2), dec!(0.83)), ((2024, 3), dec!(0.16))]);

        for gross in [dec!(1.15), dec!(333.33), dec!(650266.04)] {
            let result = calc.calculate(gross, "01/01/2024").unwrap();
            assert_eq!(
                result.final_net_value,
                round_currency(result.corrected_gross_value * dec!(0.97))
            );
        }
    }

    #[test]
    fn test_empty_series_is_invalid_configuration() {
        let result = IndexationCalculator::new(IndexSeries::new());
        assert!(matches!(result, Err(CorrectionError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_from_provider() {
        let series = IndexSeries::from_entries([(month(2024, 1), dec!(0.42))]).unwrap();
        let calc = IndexationCalculator::from_provider(&StaticIndexProvider::new(series)).unwrap();
        assert_eq!(calc.series().len(), 1);

        let empty = IndexationCalculator::from_provider(&StaticIndexProvider::default());
        assert!(matches!(empty, Err(CorrectionError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_rejects_non_positive_gross() {
        let calc = calculator(&[((2024, 1), dec!(0.42))]);

        assert!(matches!(
            calc.calculate(dec!(-10), "01/01/2024"),
            Err(CorrectionError::InvalidInput(_))
        ));
        assert!(matches!(
            calc.calculate(Decimal::ZERO, "01/01/2024"),
            Err(CorrectionError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_rejects_malformed_dates() {
        let calc = calculator(&[((2024, 1), dec!(0.42))]);

        for date in ["2024-01-01", "01/13/2024", "32/01/2024", "01/01/24", "01-01-2024", "", "aa/bb/cccc"] {
            assert!(
                matches!(calc.calculate(dec!(100), date), Err(CorrectionError::InvalidInput(_))),
                "accepted {:?}",
                date
            );
        }
    }

    #[test]
    fn test_uncorrected_calculator() {
        let calc = IndexationCalculator::uncorrected();
        assert!(calc.is_degraded());

        let result = calc.calculate(dec!(1000.00), "01/01/2024").unwrap();
        assert_eq!(result.corrected_gross_value, dec!(1000.00));
        assert_eq!(result.final_net_value, dec!(970.00));
        assert_eq!(result.as_of_month(), AsOfMonth::NoIndexAvailable(month(2024, 1)));
    }

    #[test]
    fn test_calculate_fields() {
        let calc = calculator(&[((2024, 1), dec!(0.42)), ((2024, 2), dec!(0.50))]);
        let fields = RequisitionFields {
            gross_value: Some(dec!(1000.00)),
            base_date: Some("01/01/2024".to_string()),
            ..Default::default()
        };

        let result = calc.calculate_fields(&fields).unwrap();
        assert_eq!(result.corrected_gross_value, dec!(1009.22));

        let missing = calc.calculate_fields(&RequisitionFields::default());
        assert!(matches!(missing, Err(crate::PrecorError::Extraction(_))));
    }

    #[test]
    fn test_calculator_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<IndexationCalculator>();
    }
}
