//! Index rebasing
//!
//! Normalizes cumulative-return series to a common baseline inside a date
//! window and derives the fund's after-fee curve from its rebased values.

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::Result;
use crate::fees::{fee_rule, FeeParameters};
use crate::sanitize::{finite, sanitize_opt_list};
use crate::series::{DateWindow, SeriesTable};

/// Label of the series that drives the after-fee curve
pub const FUND_BEFORE_FEE: &str = "Fund (Before Fee)";

/// Label of the derived after-fee series
pub const FUND_AFTER_FEE: &str = "Fund (After Fee)";

/// Rebased series on a shared date axis; `series_matrix[i]` belongs to `series_labels[i]`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RebasedResult {
    pub dates: Vec<NaiveDate>,
    pub series_labels: Vec<String>,
    pub series_matrix: Vec<Vec<Option<f64>>>,
}

impl RebasedResult {
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn series(&self, label: &str) -> Option<&[Option<f64>]> {
        self.series_labels
            .iter()
            .position(|l| l == label)
            .map(|idx| self.series_matrix[idx].as_slice())
    }

    /// Back to a table, e.g. to rebase again over a narrower window
    pub fn to_table(&self) -> SeriesTable {
        self.series_labels
            .iter()
            .zip(&self.series_matrix)
            .fold(SeriesTable::new(self.dates.clone()), |table, (label, values)| {
                table.with_series(label.clone(), values.clone())
            })
    }
}

/// Rebase one series on its first present value: `(1+R_t)/(1+R_base) - 1`.
///
/// Points before the baseline, and missing points after it, stay `None`.
pub fn rebase_values(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let Some(base_idx) = values.iter().position(|v| v.is_some_and(f64::is_finite)) else {
        return vec![None; values.len()];
    };
    let base = values[base_idx].unwrap_or(f64::NAN);

    values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            if i < base_idx {
                return None;
            }
            v.and_then(|r| finite((1.0 + r) / (1.0 + base) - 1.0))
        })
        .collect()
}

/// Rebase every series of `table` inside `window`.
///
/// When the table has a [`FUND_BEFORE_FEE`] series, a [`FUND_AFTER_FEE`]
/// series is appended: at each row the fee rule is applied to the rebased
/// fund value over the days elapsed since the first row of the window.
/// A window with no rows yields an empty result.
pub fn compute_rebased_series(
    table: &SeriesTable,
    window: DateWindow,
    fee_params: &FeeParameters,
) -> Result<RebasedResult> {
    table.validate()?;

    let rows: Vec<usize> = table
        .dates
        .iter()
        .enumerate()
        .filter(|(_, date)| window.contains(**date))
        .map(|(i, _)| i)
        .collect();

    let Some(&first_row) = rows.first() else {
        log::info!("no rows between {} and {}", window.start, window.end);
        return Ok(RebasedResult::default());
    };

    let dates: Vec<NaiveDate> = rows.iter().map(|&i| table.dates[i]).collect();
    let mut series_labels = Vec::with_capacity(table.series.len() + 1);
    let mut series_matrix = Vec::with_capacity(table.series.len() + 1);

    for series in &table.series {
        let windowed: Vec<Option<f64>> = rows.iter().map(|&i| series.values[i]).collect();
        series_labels.push(series.label.clone());
        series_matrix.push(rebase_values(&windowed));
    }

    if let Some(fund_idx) = series_labels.iter().position(|l| l == FUND_BEFORE_FEE) {
        let window_start = table.dates[first_row];
        let after_fee: Vec<Option<f64>> = series_matrix[fund_idx]
            .iter()
            .zip(&dates)
            .map(|(value, date)| {
                let elapsed = (*date - window_start).num_days();
                value.map(|v| fee_rule(v, elapsed, fee_params).net_investor_return)
            })
            .collect();
        series_labels.push(FUND_AFTER_FEE.to_string());
        series_matrix.push(sanitize_opt_list(&after_fee));
    }

    log::debug!(
        "rebased {} series over {} rows ({} to {})",
        series_labels.len(),
        dates.len(),
        window.start,
        window.end
    );

    Ok(RebasedResult {
        dates,
        series_labels,
        series_matrix,
    })
}
