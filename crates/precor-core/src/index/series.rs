//! Monthly index series.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::month::YearMonth;
use super::Result;
use crate::error::IndexError;

/// One month of an index series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Month the value refers to.
    pub month: YearMonth,
    /// Monthly change in percent (0.42 means 0.42%).
    pub percent: Decimal,
}

/// A set of monthly percentage changes, at most one per month.
///
/// Entries keep the order in which the source delivered them; consumers that
/// need chronological order must sort.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<IndexEntry>", into = "Vec<IndexEntry>")]
pub struct IndexSeries {
    entries: Vec<IndexEntry>,
}

impl IndexSeries {
    /// Create an empty series.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a series from (month, percent) pairs.
    pub fn from_entries<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (YearMonth, Decimal)>,
    {
        let mut series = Self::new();
        for (month, percent) in entries {
            series.push(month, percent)?;
        }
        Ok(series)
    }

    /// Build a series from dated values; each date is reduced to its month.
    pub fn from_dated_values<I>(values: I) -> Result<Self>
    where
        I: IntoIterator<Item = (NaiveDate, Decimal)>,
    {
        Self::from_entries(
            values
                .into_iter()
                .map(|(date, percent)| (YearMonth::from_date(date), percent)),
        )
    }

    /// Add a month. Fails if the month is already present.
    pub fn push(&mut self, month: YearMonth, percent: Decimal) -> Result<()> {
        if self.get(month).is_some() {
            return Err(IndexError::DuplicateMonth(month.to_string()));
        }
        self.entries.push(IndexEntry { month, percent });
        Ok(())
    }

    /// Value for a given month.
    pub fn get(&self, month: YearMonth) -> Option<Decimal> {
        self.entries
            .iter()
            .find(|e| e.month == month)
            .map(|e| e.percent)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in source order.
    pub fn iter(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries.iter()
    }

    /// Entries from `month` onwards (inclusive), sorted ascending.
    pub fn since(&self, month: YearMonth) -> Vec<IndexEntry> {
        let mut selected: Vec<IndexEntry> = self
            .entries
            .iter()
            .filter(|e| e.month >= month)
            .copied()
            .collect();
        selected.sort_by_key(|e| e.month);
        selected
    }

    /// Earliest month in the series.
    pub fn first_month(&self) -> Option<YearMonth> {
        self.entries.iter().map(|e| e.month).min()
    }

    /// Latest month in the series.
    pub fn last_month(&self) -> Option<YearMonth> {
        self.entries.iter().map(|e| e.month).max()
    }
}

impl TryFrom<Vec<IndexEntry>> for IndexSeries {
    type Error = IndexError;

    fn try_from(entries: Vec<IndexEntry>) -> Result<Self> {
        Self::from_entries(entries.into_iter().map(|e| (e.month, e.percent)))
    }
}

impl From<IndexSeries> for Vec<IndexEntry> {
    fn from(series: IndexSeries) -> Self {
        series.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn month(year: i32, month: u32) -> YearMonth {
        YearMonth::new(year, month).unwrap()
    }

    #[test]
    fn test_rejects_duplicate_month() {
        let result = IndexSeries::from_entries([
            (month(2024, 1), dec!(0.42)),
            (month(2024, 1), dec!(0.50)),
        ]);

        assert!(matches!(result, Err(IndexError::DuplicateMonth(m)) if m == "01/2024"));
    }

    #[test]
    fn test_dated_values_normalize_to_month() {
        let series = IndexSeries::from_dated_values([(
            NaiveDate::from_ymd_opt(2024, 5, 17).unwrap(),
            dec!(0.46),
        )])
        .unwrap();

        assert_eq!(series.get(month(2024, 5)), Some(dec!(0.46)));
    }

    #[test]
    fn test_since_sorts_ascending() {
        let series = IndexSeries::from_entries([
            (month(2024, 3), dec!(0.16)),
            (month(2023, 12), dec!(0.56)),
            (month(2024, 1), dec!(0.42)),
            (month(2024, 2), dec!(0.83)),
        ])
        .unwrap();

        let months: Vec<String> = series
            .since(month(2024, 1))
            .iter()
            .map(|e| e.month.to_string())
            .collect();

        assert_eq!(months, vec!["01/2024", "02/2024", "03/2024"]);
        assert_eq!(series.first_month(), Some(month(2023, 12)));
        assert_eq!(series.last_month(), Some(month(2024, 3)));
    }

    #[test]
    fn test_json_round_trip() {
        let series = IndexSeries::from_entries([
            (month(2024, 2), dec!(0.83)),
            (month(2024, 1), dec!(0.42)),
        ])
        .unwrap();

        let json = serde_json::to_string(&series).unwrap();
        assert_eq!(
            json,
            r#"[{"month":"02/2024","percent":"0.83"},{"month":"01/2024","percent":"0.42"}]"#
        );

        let restored: IndexSeries = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, series);
    }

    #[test]
    fn test_json_with_duplicates_is_rejected() {
        let json = r#"[{"month":"01/2024","percent":"0.42"},{"month":"01/2024","percent":"0.10"}]"#;
        assert!(serde_json::from_str::<IndexSeries>(json).is_err());
    }
}
