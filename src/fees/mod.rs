//! Hurdle / catch-up fee structure
//!
//! A single pure fee rule shared by every caller: per-contribution dollar
//! fees, per-time-step after-fee series, the forward locked-in return and
//! the compensation curve.

mod params;
mod rule;
mod curve;

pub use params::FeeParameters;
pub use rule::{fee_rule, annualized_rate_over, FeeAmounts, FeeOutcome, DAYS_PER_YEAR};
pub use curve::{compensation_curve, CurveResult, MAX_CURVE_POINTS, MAX_CURVE_RETURN};
