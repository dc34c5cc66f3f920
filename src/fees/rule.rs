//! The hurdle fee rule
//!
//! For a gross holding-period return `R` over `T` days:
//! - hurdle over the period `h = (1+H)^(T/365) - 1`
//! - management drag `m = (1+Mg)^(T/365) - 1`
//! - above the hurdle the investor keeps `max(h, (1-Pf)·R)`, otherwise all of `R`
//! - the management drag is taken from the investor share in both cases

use super::FeeParameters;

/// ACT/365 day count, no leap adjustment
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Compound an annual rate over `elapsed_days`: `(1+rate)^(days/365) - 1`
pub fn annualized_rate_over(annual_rate: f64, elapsed_days: i64) -> f64 {
    (1.0 + annual_rate).powf(elapsed_days as f64 / DAYS_PER_YEAR) - 1.0
}

/// Rate-form result of applying the fee rule to one holding-period return
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeeOutcome {
    pub gross_return: f64,
    pub elapsed_days: i64,

    /// Hurdle compounded over the holding period
    pub hurdle_over_period: f64,

    /// Investor share before the management drag
    pub investor_share_before_management: f64,

    /// Management drag compounded over the holding period
    pub management_fee_rate_applied: f64,

    /// Part of the gross return retained as performance fee
    pub performance_fee_rate_applied: f64,

    /// `investor_share_before_management - management_fee_rate_applied`
    pub net_investor_return: f64,
}

/// Dollar-form fees for a principal amount
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeeAmounts {
    pub management_fee: f64,
    pub performance_fee: f64,
    pub net_investor_amount: f64,
}

impl FeeAmounts {
    pub fn total(&self) -> f64 {
        self.management_fee + self.performance_fee
    }
}

impl FeeOutcome {
    /// Whether the gross return cleared the period hurdle
    pub fn cleared_hurdle(&self) -> bool {
        self.gross_return > self.hurdle_over_period
    }

    /// Management plus performance fee, as a rate
    pub fn total_fee_rate(&self) -> f64 {
        self.management_fee_rate_applied + self.performance_fee_rate_applied
    }

    /// Scale the rate-form outcome by a principal
    pub fn amounts(&self, principal: f64) -> FeeAmounts {
        FeeAmounts {
            management_fee: self.management_fee_rate_applied * principal,
            performance_fee: self.performance_fee_rate_applied * principal,
            net_investor_amount: self.net_investor_return * principal,
        }
    }
}

/// Apply the fee rule to a gross return earned over `elapsed_days`.
///
/// A missing (NaN) gross return never clears the hurdle, so it carries no
/// performance fee; the NaN still propagates into the investor share.
pub fn fee_rule(gross_return: f64, elapsed_days: i64, params: &FeeParameters) -> FeeOutcome {
    let hurdle = annualized_rate_over(params.hurdle_rate, elapsed_days);
    let drag = annualized_rate_over(params.management_fee, elapsed_days);

    let (share, performance_fee) = if gross_return > hurdle {
        let share = hurdle.max((1.0 - params.performance_fee) * gross_return);
        (share, gross_return - share)
    } else {
        (gross_return, 0.0)
    };

    FeeOutcome {
        gross_return,
        elapsed_days,
        hurdle_over_period: hurdle,
        investor_share_before_management: share,
        management_fee_rate_applied: drag,
        performance_fee_rate_applied: performance_fee,
        net_investor_return: share - drag,
    }
}
