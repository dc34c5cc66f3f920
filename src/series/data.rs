//! Value objects exchanged with the engine
//!
//! Everything here is created fresh per request and never persisted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::sanitize::serialize_f64;

/// One row of an investor's return/contribution history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnObservation {
    pub date: NaiveDate,

    /// Cumulative fund return since inception (0.25 = +25%). NaN when missing.
    pub cumulative_return: f64,

    /// Historical asset value; `None` on projection rows or blanks
    pub asset_value: Option<f64>,

    /// Amount contributed on this date (0 when none)
    pub contribution: f64,
}

impl ReturnObservation {
    pub fn new(
        date: NaiveDate,
        cumulative_return: f64,
        asset_value: Option<f64>,
        contribution: f64,
    ) -> Self {
        Self {
            date,
            cumulative_return,
            asset_value,
            contribution,
        }
    }

    /// Asset value usable for valuation (present and finite)
    pub fn valued_asset(&self) -> Option<f64> {
        self.asset_value.filter(|v| v.is_finite())
    }

    /// Whether this row is a real cashflow event
    pub fn has_contribution(&self) -> bool {
        self.contribution != 0.0 && !self.contribution.is_nan()
    }
}

/// Dated cashflow: negative for contributions, positive for the terminal value
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CashflowEntry {
    pub date: NaiveDate,
    #[serde(serialize_with = "serialize_f64")]
    pub amount: f64,
}

/// Fees accrued on one contribution up to the valuation date
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeeAccrual {
    pub contribution_date: NaiveDate,
    #[serde(serialize_with = "serialize_f64")]
    pub contribution: f64,
    /// Gross return earned since the contribution date
    #[serde(serialize_with = "serialize_f64")]
    pub realized_return: f64,
    pub holding_days: i64,
    #[serde(serialize_with = "serialize_f64")]
    pub management_fee_amount: f64,
    #[serde(serialize_with = "serialize_f64")]
    pub performance_fee_amount: f64,
}

/// Inclusive date window `[start, end]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(EngineError::invalid_input(format!(
                "window start {} is after window end {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// A named cumulative-return series; `None` marks a missing cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledSeries {
    pub label: String,
    pub values: Vec<Option<f64>>,
}

impl LabeledSeries {
    pub fn new(label: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            label: label.into(),
            values,
        }
    }
}

/// Several series aligned on one shared date axis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesTable {
    pub dates: Vec<NaiveDate>,
    pub series: Vec<LabeledSeries>,
}

impl SeriesTable {
    pub fn new(dates: Vec<NaiveDate>) -> Self {
        Self {
            dates,
            series: Vec::new(),
        }
    }

    /// Builder-style helper for adding a series
    pub fn with_series(mut self, label: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        self.series.push(LabeledSeries::new(label, values));
        self
    }

    pub fn get(&self, label: &str) -> Option<&LabeledSeries> {
        self.series.iter().find(|s| s.label == label)
    }

    /// Check the date axis is strictly ascending and every series is aligned to it
    pub fn validate(&self) -> Result<()> {
        ensure_strictly_ascending(self.dates.iter().copied())?;
        for s in &self.series {
            if s.values.len() != self.dates.len() {
                return Err(EngineError::invalid_input(format!(
                    "series '{}' has {} values for {} dates",
                    s.label,
                    s.values.len(),
                    self.dates.len()
                )));
            }
        }
        Ok(())
    }
}

/// Dates must be strictly increasing; duplicates are a caller error
pub fn ensure_strictly_ascending<I>(dates: I) -> Result<()>
where
    I: IntoIterator<Item = NaiveDate>,
{
    let mut prev: Option<NaiveDate> = None;
    for date in dates {
        if let Some(p) = prev {
            if date == p {
                return Err(EngineError::invalid_input(format!(
                    "duplicate observation date {}",
                    date
                )));
            }
            if date < p {
                return Err(EngineError::invalid_input(format!(
                    "observation dates out of order: {} follows {}",
                    date, p
                )));
            }
        }
        prev = Some(date);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_duplicate_dates_rejected() {
        let err = ensure_strictly_ascending(vec![d(2024, 1, 1), d(2024, 1, 1)]).unwrap_err();
        assert!(err.is_invalid_input());
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_out_of_order_rejected() {
        let err = ensure_strictly_ascending(vec![d(2024, 2, 1), d(2024, 1, 1)]).unwrap_err();
        assert!(err.to_string().contains("out of order"));
        assert!(ensure_strictly_ascending(vec![d(2024, 1, 1), d(2024, 2, 1)]).is_ok());
    }

    #[test]
    fn test_window() {
        assert!(DateWindow::new(d(2024, 3, 1), d(2024, 1, 1)).is_err());
        let window = DateWindow::new(d(2024, 1, 1), d(2024, 3, 1)).unwrap();
        assert!(window.contains(d(2024, 1, 1)));
        assert!(window.contains(d(2024, 3, 1)));
        assert!(!window.contains(d(2024, 3, 2)));
    }

    #[test]
    fn test_table_alignment() {
        let table = SeriesTable::new(vec![d(2024, 1, 1), d(2024, 1, 2)])
            .with_series("A", vec![Some(0.0), Some(0.1)])
            .with_series("B", vec![Some(0.0)]);
        assert!(table.validate().is_err());
        assert!(table.get("A").is_some());
        assert!(table.get("C").is_none());
    }

    #[test]
    fn test_observation_helpers() {
        let row = ReturnObservation::new(d(2024, 1, 1), 0.1, Some(f64::NAN), 0.0);
        assert_eq!(row.valued_asset(), None);
        assert!(!row.has_contribution());

        let row = ReturnObservation::new(d(2024, 1, 1), 0.1, Some(500.0), -200.0);
        assert_eq!(row.valued_asset(), Some(500.0));
        assert!(row.has_contribution());
    }
}
