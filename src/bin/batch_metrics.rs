//! Compute performance for every investor in the directory
//!
//! Runs the ledger for each configured investor in parallel and prints one
//! JSON document with a summary row per investor. A failing investor is
//! reported in its row and does not stop the batch.
//! Accepts config via environment variables:
//!   INVESTORS_FILE (default investors.json), DATA_DIR, AS_OF, YEAR
//! Set SUMMARY_ONLY=1 to drop the per-contribution fee detail

use fund_performance::investors::InvestorDirectory;
use fund_performance::series::{parse_date, FeeAccrual};
use fund_performance::sanitize::{serialize_f64, serialize_opt_f64};
use fund_performance::{compute_performance, EngineError};
use chrono::{Local, NaiveDate};
use rayon::prelude::*;
use serde::Serialize;
use std::env;
use std::process::ExitCode;
use std::time::Instant;

#[derive(Serialize)]
struct BatchResponse {
    as_of: NaiveDate,
    investor_count: usize,
    failed_count: usize,
    totals: BatchTotals,
    investors: Vec<InvestorRow>,
    execution_time_ms: u64,
}

#[derive(Serialize, Default)]
struct BatchTotals {
    #[serde(serialize_with = "serialize_f64")]
    nav: f64,
    #[serde(serialize_with = "serialize_f64")]
    management_fees: f64,
    #[serde(serialize_with = "serialize_f64")]
    performance_fees: f64,
}

#[derive(Serialize)]
struct InvestorRow {
    investor: String,
    name: Option<String>,
    currency: String,
    valuation_date: Option<NaiveDate>,
    #[serde(serialize_with = "serialize_opt_f64")]
    nav: Option<f64>,
    #[serde(serialize_with = "serialize_opt_f64")]
    total_fees: Option<f64>,
    #[serde(serialize_with = "serialize_opt_f64")]
    irr: Option<f64>,
    #[serde(serialize_with = "serialize_opt_f64")]
    ytd_return: Option<f64>,
    #[serde(serialize_with = "serialize_opt_f64")]
    locked_in_return: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    fee_accruals: Vec<FeeAccrual>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip)]
    management_fee: f64,
    #[serde(skip)]
    performance_fee: f64,
}

impl InvestorRow {
    fn failed(investor: &str, name: Option<String>, currency: String, err: &EngineError) -> Self {
        Self {
            investor: investor.to_string(),
            name,
            currency,
            valuation_date: None,
            nav: None,
            total_fees: None,
            irr: None,
            ytd_return: None,
            locked_in_return: None,
            fee_accruals: Vec::new(),
            error: Some(err.to_string()),
            management_fee: 0.0,
            performance_fee: 0.0,
        }
    }
}

fn evaluate(
    directory: &InvestorDirectory,
    investor: &str,
    year: Option<&str>,
    as_of: NaiveDate,
    summary_only: bool,
) -> InvestorRow {
    let (name, currency) = match directory.lookup(investor) {
        Ok(cfg) => (cfg.name.clone(), cfg.currency.clone()),
        Err(err) => return InvestorRow::failed(investor, None, "USD".to_string(), &err),
    };

    let outcome = directory.fee_parameters(investor).and_then(|params| {
        let observations = directory.load_ledger(investor, year)?;
        compute_performance(&observations, &params, as_of)
    });

    match outcome {
        Ok(result) => InvestorRow {
            investor: investor.to_string(),
            name,
            currency,
            valuation_date: Some(result.valuation_date),
            nav: Some(result.nav),
            total_fees: Some(result.total_fees),
            irr: result.irr,
            ytd_return: result.ytd_return,
            locked_in_return: result.locked_in_return,
            management_fee: result.total_management_fee,
            performance_fee: result.total_performance_fee,
            fee_accruals: if summary_only { Vec::new() } else { result.fee_accruals },
            error: None,
        },
        Err(err) => {
            log::warn!("{}: {}", investor, err);
            InvestorRow::failed(investor, name, currency, &err)
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let start = Instant::now();

    // Read config from environment or use defaults
    let investors_file = env::var("INVESTORS_FILE").unwrap_or_else(|_| "investors.json".to_string());

    let as_of: NaiveDate = env::var("AS_OF")
        .ok()
        .and_then(|s| parse_date(&s))
        .unwrap_or_else(|| Local::now().date_naive());

    let year: Option<String> = env::var("YEAR").ok();
    let summary_only = env::var("SUMMARY_ONLY").is_ok();

    let directory = match InvestorDirectory::load(&investors_file) {
        Ok(dir) => dir,
        Err(err) => {
            eprintln!("error: loading {}: {}", investors_file, err);
            return ExitCode::from(err.exit_code());
        }
    };
    let directory = match env::var("DATA_DIR") {
        Ok(data_dir) => directory.with_data_dir(data_dir),
        Err(_) => directory,
    };

    log::info!("evaluating {} investors as of {}", directory.len(), as_of);

    let investors: Vec<InvestorRow> = directory
        .ids()
        .par_iter()
        .map(|id| evaluate(&directory, id, year.as_deref(), as_of, summary_only))
        .collect();

    let totals = investors
        .iter()
        .filter(|row| row.error.is_none())
        .fold(BatchTotals::default(), |mut acc, row| {
            acc.nav += row.nav.unwrap_or(0.0);
            acc.management_fees += row.management_fee;
            acc.performance_fees += row.performance_fee;
            acc
        });
    let failed_count = investors.iter().filter(|row| row.error.is_some()).count();

    let response = BatchResponse {
        as_of,
        investor_count: investors.len(),
        failed_count,
        totals,
        investors,
        execution_time_ms: start.elapsed().as_millis() as u64,
    };

    match serde_json::to_string_pretty(&response) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::from(1)
        }
    }
}
