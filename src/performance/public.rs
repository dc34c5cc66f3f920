//! Gross headline metrics for the public fund page (no investor fees)

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::Result;
use crate::fees::DAYS_PER_YEAR;
use crate::sanitize::serialize_opt_f64;
use crate::series::ensure_strictly_ascending;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PublicMetrics {
    #[serde(serialize_with = "serialize_opt_f64")]
    pub ytd_return: Option<f64>,
    #[serde(serialize_with = "serialize_opt_f64")]
    pub locked_in_return: Option<f64>,
}

/// Annualized gross returns from a `(date, cumulative_return)` fund series.
///
/// Rows on or before `as_of` are history, later rows are projections. Both
/// spans are measured from/to `as_of` itself rather than the nearest row.
pub fn compute_public_metrics(points: &[(NaiveDate, f64)], as_of: NaiveDate) -> Result<PublicMetrics> {
    ensure_strictly_ascending(points.iter().map(|(date, _)| *date))?;

    let split = points.partition_point(|(date, _)| *date <= as_of);
    let (history, future) = points.split_at(split);

    let (Some(&(first_date, first_ret)), Some(&(_, current_ret))) = (history.first(), history.last())
    else {
        return Ok(PublicMetrics {
            ytd_return: None,
            locked_in_return: None,
        });
    };

    let hist_days = (as_of - first_date).num_days();
    let ytd_return = (hist_days > 0).then(|| {
        ((1.0 + current_ret) / (1.0 + first_ret)).powf(DAYS_PER_YEAR / hist_days as f64) - 1.0
    });

    let locked_in_return = future.last().and_then(|&(future_date, future_ret)| {
        let days = (future_date - as_of).num_days();
        (days > 0).then(|| {
            ((1.0 + future_ret) / (1.0 + current_ret)).powf(DAYS_PER_YEAR / days as f64) - 1.0
        })
    });

    Ok(PublicMetrics {
        ytd_return,
        locked_in_return,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_public_metrics() {
        let points = vec![
            (d(2023, 1, 1), 0.0),
            (d(2023, 7, 1), 0.04),
            (d(2024, 1, 1), 0.10),
            (d(2025, 1, 1), 0.21),
        ];
        let metrics = compute_public_metrics(&points, d(2024, 1, 1)).unwrap();
        assert!((metrics.ytd_return.unwrap() - 0.10).abs() < 1e-12);
        // 1.21 / 1.10 = 1.1 over 366 days
        let expected = 1.1_f64.powf(365.0 / 366.0) - 1.0;
        assert!((metrics.locked_in_return.unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_no_history() {
        let points = vec![(d(2025, 1, 1), 0.1)];
        let metrics = compute_public_metrics(&points, d(2024, 1, 1)).unwrap();
        assert_eq!(metrics.ytd_return, None);
        assert_eq!(metrics.locked_in_return, None);
    }

    #[test]
    fn test_no_projection() {
        let points = vec![(d(2023, 1, 1), 0.0), (d(2023, 6, 1), 0.05)];
        let metrics = compute_public_metrics(&points, d(2023, 12, 1)).unwrap();
        assert!(metrics.ytd_return.is_some());
        assert_eq!(metrics.locked_in_return, None);
    }
}
