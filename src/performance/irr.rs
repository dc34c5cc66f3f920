//! Internal Rate of Return for irregular cashflows (XIRR)
//!
//! Solves `Σ cf_i / (1+r)^(t_i/365) = 0` with `t_i` the ACT/365 day count
//! from the first date, using Newton-Raphson.

use chrono::NaiveDate;

use crate::error::{EngineError, Result};
use crate::fees::DAYS_PER_YEAR;
use crate::series::CashflowEntry;

/// Derivative magnitude below which the Newton step is considered undefined
pub const DERIVATIVE_FLOOR: f64 = 1e-20;

/// Lowest rate an iterate may take (-99.99%)
pub const RATE_FLOOR: f64 = -0.9999;

/// Solver settings.
///
/// Defaults match the classic Newton root-finder defaults: start at 10%,
/// stop once a step moves the rate by less than `1.48e-8`, give up after
/// 50 iterations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct XirrConfig {
    pub initial_guess: f64,
    pub tolerance: f64,
    pub max_iterations: u32,
}

impl Default for XirrConfig {
    fn default() -> Self {
        Self {
            initial_guess: 0.10,
            tolerance: 1.48e-8,
            max_iterations: 50,
        }
    }
}

/// Annualized IRR for cashflows on the given dates, default solver settings
pub fn xirr(cashflows: &[f64], dates: &[NaiveDate]) -> Result<f64> {
    xirr_with(cashflows, dates, &XirrConfig::default())
}

/// Annualized IRR for a dated cashflow series
pub fn xirr_entries(entries: &[CashflowEntry], config: &XirrConfig) -> Result<f64> {
    let cashflows: Vec<f64> = entries.iter().map(|e| e.amount).collect();
    let dates: Vec<NaiveDate> = entries.iter().map(|e| e.date).collect();
    xirr_with(&cashflows, &dates, config)
}

/// Annualized IRR with explicit solver settings.
///
/// # Errors
/// * `InvalidInput` - lengths differ, fewer than two cashflows, or all zero
/// * `Convergence` - no sign change, derivative underflow, a non-finite
///   iterate, a rate pinned below -99.99%, or `max_iterations` exceeded
pub fn xirr_with(cashflows: &[f64], dates: &[NaiveDate], config: &XirrConfig) -> Result<f64> {
    if cashflows.len() != dates.len() {
        return Err(EngineError::invalid_input(format!(
            "{} cashflows but {} dates",
            cashflows.len(),
            dates.len()
        )));
    }
    if cashflows.len() < 2 {
        return Err(EngineError::invalid_input(
            "at least two cashflows are needed for an IRR",
        ));
    }
    if cashflows.iter().all(|&cf| cf == 0.0) {
        return Err(EngineError::invalid_input("all cashflows are zero"));
    }

    // Check if there's at least one sign change (required for IRR to exist)
    let has_positive = cashflows.iter().any(|&cf| cf > 0.0);
    let has_negative = cashflows.iter().any(|&cf| cf < 0.0);
    if !has_positive || !has_negative {
        return Err(EngineError::Convergence {
            reason: "cashflows never change sign".to_string(),
            iterations: 0,
        });
    }

    let first = dates[0];
    let years: Vec<f64> = dates
        .iter()
        .map(|d| (*d - first).num_days() as f64 / DAYS_PER_YEAR)
        .collect();

    let mut rate = config.initial_guess;

    for iteration in 1..=config.max_iterations {
        let (npv, dnpv) = npv_and_derivative(cashflows, &years, rate);

        if !npv.is_finite() || !dnpv.is_finite() {
            return Err(EngineError::Convergence {
                reason: format!("NPV is not finite at rate {}", rate),
                iterations: iteration,
            });
        }
        if dnpv.abs() < DERIVATIVE_FLOOR {
            return Err(EngineError::Convergence {
                reason: format!("derivative underflow at rate {}", rate),
                iterations: iteration,
            });
        }

        let candidate = rate - npv / dnpv;
        let new_rate = if candidate <= RATE_FLOOR {
            if rate <= RATE_FLOOR {
                return Err(EngineError::Convergence {
                    reason: "rate diverged below -99.99%".to_string(),
                    iterations: iteration,
                });
            }
            RATE_FLOOR
        } else {
            candidate
        };

        if (new_rate - rate).abs() < config.tolerance {
            log::debug!("xirr converged to {:.10} in {} iterations", new_rate, iteration);
            return Ok(new_rate);
        }

        rate = new_rate;
    }

    Err(EngineError::Convergence {
        reason: format!("no convergence, last rate {}", rate),
        iterations: config.max_iterations,
    })
}

/// NPV and its derivative with respect to rate, `years` being each flow's time in years
fn npv_and_derivative(cashflows: &[f64], years: &[f64], rate: f64) -> (f64, f64) {
    let base = 1.0 + rate;
    let mut npv = 0.0;
    let mut dnpv = 0.0;

    for (&cf, &t) in cashflows.iter().zip(years) {
        let discount = base.powf(t);
        npv += cf / discount;
        if t != 0.0 {
            dnpv -= t * cf / (discount * base);
        }
    }

    (npv, dnpv)
}
