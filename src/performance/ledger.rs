//! Contribution ledger: fees, NAV, IRR and headline returns for one investor

use chrono::NaiveDate;

use super::irr::{xirr_entries, XirrConfig};
use super::result::PerformanceResult;
use crate::error::{EngineError, Result};
use crate::fees::{fee_rule, FeeParameters, DAYS_PER_YEAR};
use crate::series::{ensure_strictly_ascending, CashflowEntry, FeeAccrual, ReturnObservation};

/// Walks an investor's contribution history and values it at a date
#[derive(Debug, Clone)]
pub struct LedgerProcessor {
    params: FeeParameters,
    solver: XirrConfig,
}

impl LedgerProcessor {
    pub fn new(params: FeeParameters) -> Self {
        Self {
            params,
            solver: XirrConfig::default(),
        }
    }

    /// Override the IRR solver settings
    pub fn with_solver(mut self, solver: XirrConfig) -> Self {
        self.solver = solver;
        self
    }

    /// Value the ledger as of `as_of`.
    ///
    /// "Today" is the latest observation on or before `as_of` with a usable
    /// asset value; a same-day row without one falls back to an earlier row.
    ///
    /// # Errors
    /// * `InvalidInput` - dates not strictly ascending
    /// * `NoValidData` - no valued observation on or before `as_of`
    pub fn process(
        &self,
        observations: &[ReturnObservation],
        as_of: NaiveDate,
    ) -> Result<PerformanceResult> {
        ensure_strictly_ascending(observations.iter().map(|o| o.date))?;

        let today_row = observations
            .iter()
            .rev()
            .find(|o| o.date <= as_of && o.valued_asset().is_some())
            .ok_or(EngineError::NoValidData { as_of })?;
        let last_row = observations
            .last()
            .ok_or(EngineError::NoValidData { as_of })?;

        let today = today_row.date;
        let ret_today = today_row.cumulative_return;
        let asset_today = today_row.valued_asset().unwrap_or(f64::NAN);

        log::info!(
            "valuing ledger as of {} using row {} (ret {}, assets {})",
            as_of,
            today,
            ret_today,
            asset_today
        );

        let contributions: Vec<&ReturnObservation> = observations
            .iter()
            .take_while(|o| o.date <= today)
            .filter(|o| o.has_contribution())
            .collect();

        let mut cashflow_points = Vec::with_capacity(contributions.len() + 1);
        let mut fee_accruals = Vec::with_capacity(contributions.len());

        for entry in &contributions {
            let realized_return = (1.0 + ret_today) / (1.0 + entry.cumulative_return) - 1.0;
            let holding_days = (today - entry.date).num_days();
            let fees = fee_rule(realized_return, holding_days, &self.params)
                .amounts(entry.contribution);

            log::debug!(
                "contribution {} on {}: R={:.4} T={} mgmt={:.2} perf={:.2}",
                entry.contribution,
                entry.date,
                realized_return,
                holding_days,
                fees.management_fee,
                fees.performance_fee
            );

            fee_accruals.push(FeeAccrual {
                contribution_date: entry.date,
                contribution: entry.contribution,
                realized_return,
                holding_days,
                management_fee_amount: fees.management_fee,
                performance_fee_amount: fees.performance_fee,
            });
            cashflow_points.push(CashflowEntry {
                date: entry.date,
                amount: -entry.contribution,
            });
        }

        let total_management_fee: f64 = fee_accruals.iter().map(|a| a.management_fee_amount).sum();
        let total_performance_fee: f64 =
            fee_accruals.iter().map(|a| a.performance_fee_amount).sum();
        let total_fees = total_management_fee + total_performance_fee;
        let nav = asset_today - total_fees;

        cashflow_points.push(CashflowEntry {
            date: today,
            amount: nav,
        });

        let irr = match xirr_entries(&cashflow_points, &self.solver) {
            Ok(rate) => Some(rate),
            Err(e) => {
                log::warn!("IRR unavailable for valuation at {}: {}", today, e);
                None
            }
        };

        let ytd_return = contributions.first().and_then(|first| {
            let span = (today - first.date).num_days();
            let cumulative = (1.0 + ret_today) / (1.0 + first.cumulative_return) - 1.0;
            annualize(cumulative, span)
        });

        let locked_in_return = self.locked_in_return(ret_today, today, last_row);

        log::info!(
            "NAV {:.2} after fees {:.2} (mgmt {:.2}, perf {:.2}), irr {:?}",
            nav,
            total_fees,
            total_management_fee,
            total_performance_fee,
            irr
        );

        Ok(PerformanceResult {
            valuation_date: today,
            nav,
            total_management_fee,
            total_performance_fee,
            total_fees,
            irr,
            ytd_return,
            locked_in_return,
            cashflow_points,
            fee_accruals,
        })
    }

    /// Annualized after-fee return between today and the last (projected) row.
    ///
    /// The gross forward return is annualized first, so the fee rule runs over
    /// one year: annual hurdle, annual management drag.
    fn locked_in_return(
        &self,
        ret_today: f64,
        today: NaiveDate,
        last_row: &ReturnObservation,
    ) -> Option<f64> {
        let span = (last_row.date - today).num_days();
        let forward = (1.0 + last_row.cumulative_return) / (1.0 + ret_today) - 1.0;
        let gross_annual = annualize(forward, span)?;
        Some(fee_rule(gross_annual, 365, &self.params).net_investor_return)
    }
}

/// `(1+r)^(365/days) - 1`, undefined for non-positive spans
fn annualize(cumulative: f64, days: i64) -> Option<f64> {
    if days <= 0 {
        return None;
    }
    Some((1.0 + cumulative).powf(DAYS_PER_YEAR / days as f64) - 1.0)
}

/// Value an investor's ledger as of `as_of` with default solver settings
pub fn compute_performance(
    observations: &[ReturnObservation],
    fee_params: &FeeParameters,
    as_of: NaiveDate,
) -> Result<PerformanceResult> {
    LedgerProcessor::new(*fee_params).process(observations, as_of)
}
