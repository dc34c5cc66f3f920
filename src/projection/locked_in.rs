//! Monthly compounding of a locked-in annual return

use chrono::{Local, Months, NaiveDate};
use serde::Serialize;

use crate::error::{EngineError, Result};
use crate::sanitize::{serialize_f64, serialize_f64_seq};

/// Series label used when the projection is charted
pub const PROJECTION_LABEL: &str = "Projection (After Fee)";

/// Projected NAV trajectory, one point per month including month zero
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionResult {
    pub label: &'static str,
    pub dates: Vec<NaiveDate>,
    #[serde(serialize_with = "serialize_f64_seq")]
    pub values: Vec<f64>,
    #[serde(serialize_with = "serialize_f64")]
    pub annual_net_return: f64,
    #[serde(serialize_with = "serialize_f64")]
    pub monthly_rate: f64,
}

impl ProjectionResult {
    pub fn months(&self) -> usize {
        self.values.len().saturating_sub(1)
    }

    pub fn final_value(&self) -> Option<f64> {
        self.values.last().copied()
    }
}

/// Project `nav` forward from today's date
pub fn project_locked_in(
    nav: f64,
    annual_net_return: f64,
    horizon_years: f64,
) -> Result<ProjectionResult> {
    project_locked_in_from(Local::now().date_naive(), nav, annual_net_return, horizon_years)
}

/// Project `nav` forward from `start`.
///
/// The annual rate becomes the exact monthly rate `(1+r)^(1/12) - 1` and the
/// horizon is rounded to whole months. Month `m` is dated `start + m months`
/// (clamped to the end of shorter months).
pub fn project_locked_in_from(
    start: NaiveDate,
    nav: f64,
    annual_net_return: f64,
    horizon_years: f64,
) -> Result<ProjectionResult> {
    if !horizon_years.is_finite() || horizon_years < 0.0 {
        return Err(EngineError::invalid_input(format!(
            "projection horizon must be a non-negative number of years, got {}",
            horizon_years
        )));
    }

    let months = (horizon_years * 12.0).round() as u32;
    let monthly_rate = (1.0 + annual_net_return).powf(1.0 / 12.0) - 1.0;

    if start.checked_add_months(Months::new(months)).is_none() {
        return Err(EngineError::invalid_input(format!(
            "projection of {} years from {} runs past the supported calendar",
            horizon_years, start
        )));
    }

    let mut dates = Vec::with_capacity(months as usize + 1);
    let mut values = Vec::with_capacity(months as usize + 1);

    for m in 0..=months {
        let date = start.checked_add_months(Months::new(m)).ok_or_else(|| {
            EngineError::invalid_input(format!("{} plus {} months is out of range", start, m))
        })?;
        dates.push(date);
        values.push(nav * (1.0 + monthly_rate).powi(m as i32));
    }

    log::debug!(
        "projected {:.2} over {} months at {:.6} monthly",
        nav,
        months,
        monthly_rate
    );

    Ok(ProjectionResult {
        label: PROJECTION_LABEL,
        dates,
        values,
        annual_net_return,
        monthly_rate,
    })
}
