//! Output structures for investor performance

use chrono::NaiveDate;
use serde::Serialize;

use crate::sanitize::{serialize_f64, serialize_opt_f64};
use crate::series::{CashflowEntry, FeeAccrual};

/// Realized performance of one investor at a valuation date.
///
/// Any optional metric is `None` when it cannot be computed for the inputs;
/// it never means zero.
#[derive(Debug, Clone, Serialize)]
pub struct PerformanceResult {
    /// Date of the observation used as "today"
    pub valuation_date: NaiveDate,

    /// Asset value at the valuation date net of all accrued fees
    #[serde(serialize_with = "serialize_f64")]
    pub nav: f64,

    #[serde(serialize_with = "serialize_f64")]
    pub total_management_fee: f64,

    #[serde(serialize_with = "serialize_f64")]
    pub total_performance_fee: f64,

    #[serde(serialize_with = "serialize_f64")]
    pub total_fees: f64,

    /// Money-weighted annual return of contributions against the NAV
    #[serde(serialize_with = "serialize_opt_f64")]
    pub irr: Option<f64>,

    /// Annualized gross return since the first contribution
    #[serde(serialize_with = "serialize_opt_f64")]
    pub ytd_return: Option<f64>,

    /// Annualized after-fee return already earned for the forward period
    #[serde(serialize_with = "serialize_opt_f64")]
    pub locked_in_return: Option<f64>,

    /// Contributions (negative) followed by the terminal NAV (positive)
    pub cashflow_points: Vec<CashflowEntry>,

    /// Per-contribution fee detail
    pub fee_accruals: Vec<FeeAccrual>,
}

/// Chart payload: contributions plus the split of the terminal value
#[derive(Debug, Clone, Serialize)]
pub struct CashflowChart {
    pub valuation_date: NaiveDate,
    #[serde(serialize_with = "serialize_opt_f64")]
    pub xirr: Option<f64>,
    pub contributions: Vec<ChartPoint>,
    pub terminal: TerminalSplit,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartPoint {
    pub date: NaiveDate,
    #[serde(serialize_with = "serialize_f64")]
    pub value: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TerminalSplit {
    #[serde(serialize_with = "serialize_f64")]
    pub investor_share: f64,
    #[serde(serialize_with = "serialize_f64")]
    pub perf_fee: f64,
    #[serde(serialize_with = "serialize_f64")]
    pub mgmt_fee: f64,
}

impl PerformanceResult {
    /// Contribution cashflows only (the terminal NAV entry excluded)
    pub fn contributions(&self) -> &[CashflowEntry] {
        let n = self.cashflow_points.len().saturating_sub(1);
        &self.cashflow_points[..n]
    }

    pub fn cashflow_chart(&self) -> CashflowChart {
        CashflowChart {
            valuation_date: self.valuation_date,
            xirr: self.irr,
            contributions: self
                .contributions()
                .iter()
                .map(|cf| ChartPoint {
                    date: cf.date,
                    value: cf.amount,
                })
                .collect(),
            terminal: TerminalSplit {
                investor_share: self.nav,
                perf_fee: self.total_performance_fee,
                mgmt_fee: self.total_management_fee,
            },
        }
    }
}
