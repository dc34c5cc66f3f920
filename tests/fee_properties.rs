//! Property checks for the fee rule, the compensation curve and XIRR

use chrono::{Days, NaiveDate};
use fund_performance::fees::{compensation_curve, fee_rule, FeeParameters};
use fund_performance::performance::xirr;
use fund_performance::rebase::rebase_values;
use proptest::prelude::*;

fn fee_params() -> impl Strategy<Value = FeeParameters> {
    (0.0..1.0f64, 0.0..0.05f64, 0.0..0.99f64)
        .prop_map(|(h, m, p)| FeeParameters::new(h, m, p))
}

proptest! {
    #[test]
    fn net_return_never_decreases_with_gross(
        params in fee_params(),
        days in 1i64..1500,
        a in -0.9..3.0f64,
        b in -0.9..3.0f64,
    ) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let net_lo = fee_rule(lo, days, &params).net_investor_return;
        let net_hi = fee_rule(hi, days, &params).net_investor_return;
        prop_assert!(net_lo <= net_hi + 1e-12);
    }

    #[test]
    fn clearing_the_hurdle_keeps_at_least_the_hurdle(
        params in fee_params(),
        days in 0i64..1500,
        gross in -0.9..3.0f64,
    ) {
        let outcome = fee_rule(gross, days, &params);
        if outcome.cleared_hurdle() {
            prop_assert!(outcome.investor_share_before_management >= outcome.hurdle_over_period);
            prop_assert!(outcome.performance_fee_rate_applied >= 0.0);
        } else {
            prop_assert_eq!(outcome.performance_fee_rate_applied, 0.0);
        }
        let total = outcome.investor_share_before_management + outcome.performance_fee_rate_applied;
        prop_assert!((total - gross).abs() < 1e-12);
    }

    #[test]
    fn curve_values_are_never_negative(params in fee_params(), step in 0.005..0.5f64) {
        let curve = compensation_curve(&params, step).unwrap();
        prop_assert!(!curve.is_empty());
        prop_assert!(curve.investor_share.iter().all(|v| *v >= 0.0));
        prop_assert!(curve.fund_fee.iter().all(|v| *v >= 0.0));
    }

    #[test]
    fn xirr_recovers_compounded_rate(
        rate in -0.2..0.8f64,
        days in 30u64..730,
        amount in 100.0..1_000_000.0f64,
    ) {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let end = start.checked_add_days(Days::new(days)).unwrap();
        let inflow = amount * (1.0 + rate).powf(days as f64 / 365.0);

        let solved = xirr(&[-amount, inflow], &[start, end]).unwrap();
        prop_assert!((solved - rate).abs() < 1e-6);
    }

    #[test]
    fn rebased_series_starts_at_zero(values in proptest::collection::vec(proptest::option::of(-0.5..2.0f64), 1..40)) {
        let rebased = rebase_values(&values);
        prop_assert_eq!(rebased.len(), values.len());
        if let Some(first) = values.iter().position(Option::is_some) {
            prop_assert_eq!(rebased[first], Some(0.0));
            prop_assert!(rebased[..first].iter().all(Option::is_none));
        }
    }
}
