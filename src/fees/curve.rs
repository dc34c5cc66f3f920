//! Compensation curve: how a one-year gross return splits between investor and fund

use serde::Serialize;

use super::{fee_rule, FeeParameters};
use crate::error::{EngineError, Result};
use crate::sanitize::serialize_f64_seq;

/// Upper end of the swept gross return range (150%)
pub const MAX_CURVE_RETURN: f64 = 1.5;

/// Largest number of points a curve may hold
pub const MAX_CURVE_POINTS: usize = 1_000_000;

/// Three aligned sequences ready for plotting
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurveResult {
    #[serde(rename = "return", serialize_with = "serialize_f64_seq")]
    pub gross_return: Vec<f64>,
    #[serde(serialize_with = "serialize_f64_seq")]
    pub investor_share: Vec<f64>,
    #[serde(serialize_with = "serialize_f64_seq")]
    pub fund_fee: Vec<f64>,
}

impl CurveResult {
    pub fn len(&self) -> usize {
        self.gross_return.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gross_return.is_empty()
    }

    /// Same curve with every value expressed in percent
    pub fn as_percent(&self) -> CurveResult {
        let scale = |v: &Vec<f64>| v.iter().map(|x| x * 100.0).collect();
        CurveResult {
            gross_return: scale(&self.gross_return),
            investor_share: scale(&self.investor_share),
            fund_fee: scale(&self.fund_fee),
        }
    }
}

/// Sweep gross annual returns from 0 to 150% in `step` increments.
///
/// Each point is one year of the fee rule, so the hurdle and management fee
/// apply at their annual values. Both shares are clamped at zero.
pub fn compensation_curve(params: &FeeParameters, step: f64) -> Result<CurveResult> {
    if !step.is_finite() || step <= 0.0 {
        return Err(EngineError::invalid_input(format!(
            "curve step must be a positive number, got {}",
            step
        )));
    }

    let points = (MAX_CURVE_RETURN / step + 1e-9).floor() + 1.0;
    if points > MAX_CURVE_POINTS as f64 {
        return Err(EngineError::invalid_input(format!(
            "curve step {} yields more than {} points",
            step, MAX_CURVE_POINTS
        )));
    }
    let points = points as usize;
    let mut curve = CurveResult {
        gross_return: Vec::with_capacity(points),
        investor_share: Vec::with_capacity(points),
        fund_fee: Vec::with_capacity(points),
    };

    for i in 0..points {
        let gross = i as f64 * step;
        let outcome = fee_rule(gross, 365, params);
        curve.gross_return.push(gross);
        curve.investor_share.push(outcome.net_investor_return.max(0.0));
        curve.fund_fee.push(outcome.total_fee_rate().max(0.0));
    }

    log::debug!("compensation curve: {} points, step {}", points, step);
    Ok(curve)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> FeeParameters {
        FeeParameters::new(0.05, 0.02, 0.2)
    }

    #[test]
    fn test_curve_spans_zero_to_150_percent() {
        let curve = compensation_curve(&params(), 0.01).unwrap();
        assert_eq!(curve.len(), 151);
        assert_eq!(curve.gross_return[0], 0.0);
        assert!((curve.gross_return[150] - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_curve_values() {
        let curve = compensation_curve(&params(), 0.01).unwrap();

        // 0% gross: investor would be -2%, clamped; fund keeps the 2% fee
        assert_eq!(curve.investor_share[0], 0.0);
        assert!((curve.fund_fee[0] - 0.02).abs() < 1e-12);

        // 100% gross: investor max(5%, 80%) - 2% = 78%, fund 2% + 20%
        assert!((curve.investor_share[100] - 0.78).abs() < 1e-9);
        assert!((curve.fund_fee[100] - 0.22).abs() < 1e-9);
    }

    #[test]
    fn test_curve_is_clamped() {
        let harsh = FeeParameters::new(0.0, 0.5, 0.9);
        let curve = compensation_curve(&harsh, 0.05).unwrap();
        assert!(curve.investor_share.iter().all(|&v| v >= 0.0));
        assert!(curve.fund_fee.iter().all(|&v| v >= 0.0));
    }

    #[test]
    fn test_invalid_step() {
        assert!(compensation_curve(&params(), 0.0).is_err());
        assert!(compensation_curve(&params(), -0.1).is_err());
        assert!(compensation_curve(&params(), f64::NAN).is_err());
    }

    #[test]
    fn test_tiny_step_rejected() {
        let err = compensation_curve(&params(), 1e-300).unwrap_err();
        assert!(err.is_invalid_input());
        assert!(compensation_curve(&params(), 1e-12).unwrap_err().is_invalid_input());

        let curve = compensation_curve(&params(), 1e-5).unwrap();
        assert!(curve.len() > 100_000 && curve.len() <= MAX_CURVE_POINTS);
    }

    #[test]
    fn test_percent_view() {
        let curve = compensation_curve(&params(), 0.5).unwrap();
        let pct = curve.as_percent();
        assert_eq!(pct.len(), 4);
        assert!((pct.gross_return[3] - 150.0).abs() < 1e-9);
        assert!((pct.fund_fee[0] - 2.0).abs() < 1e-9);
    }
}
