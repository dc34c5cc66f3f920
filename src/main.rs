//! Fund Performance CLI
//!
//! Command-line interface for investor metrics, index rebasing, locked-in
//! projections and the fee compensation curve. Every command prints JSON.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use fund_performance::investors::InvestorDirectory;
use fund_performance::performance::compute_public_metrics;
use fund_performance::rebase::FUND_BEFORE_FEE;
use fund_performance::series::{load_index_table, load_observations, parse_date};
use fund_performance::{
    compensation_curve, compute_performance, compute_rebased_series, project_locked_in,
    project_locked_in_from, DateWindow, EngineError, FeeParameters,
};

#[derive(Parser, Debug)]
#[command(name = "fund_performance", about = "Fee and performance computation for fund investors")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug, Clone, Copy)]
struct FeeArgs {
    #[arg(long, default_value_t = 0.50)]
    hurdle_rate: f64,
    #[arg(long, default_value_t = 0.02)]
    management_fee: f64,
    #[arg(long, default_value_t = 0.25)]
    performance_fee: f64,
}

impl From<FeeArgs> for FeeParameters {
    fn from(args: FeeArgs) -> Self {
        FeeParameters::new(args.hurdle_rate, args.management_fee, args.performance_fee)
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Investor metrics from a ledger CSV or the investor directory
    Metrics {
        /// Ledger CSV (Date, Ret, Historical Asset Value, Contribution)
        #[arg(short, long, conflicts_with = "investor")]
        file: Option<PathBuf>,
        /// Investor directory JSON
        #[arg(long, default_value = "investors.json")]
        investors: PathBuf,
        /// Investor identifier to look up in the directory
        #[arg(long)]
        investor: Option<String>,
        /// Year selecting a "<year>-Link" entry
        #[arg(long)]
        year: Option<String>,
        /// Valuation date (defaults to today)
        #[arg(long, value_parser = parse_date_arg)]
        as_of: Option<NaiveDate>,
        /// Print the cashflow chart payload instead of the full result
        #[arg(long)]
        chart: bool,
        #[command(flatten)]
        fees: FeeArgs,
    },
    /// Rebase index series over a date window
    Rebase {
        /// Index CSV (Date, fund and three benchmark columns)
        #[arg(short, long, conflicts_with = "investor")]
        file: Option<PathBuf>,
        #[arg(long, default_value = "investors.json")]
        investors: PathBuf,
        /// Use this investor's sheet, fees and fiscal year start
        #[arg(long)]
        investor: Option<String>,
        #[arg(long)]
        year: Option<String>,
        #[arg(long, value_parser = parse_date_arg)]
        start: Option<NaiveDate>,
        #[arg(long, value_parser = parse_date_arg)]
        end: Option<NaiveDate>,
        #[command(flatten)]
        fees: FeeArgs,
    },
    /// Project a NAV forward at a fixed annual net return, or an investor's
    /// NAV one quarter ahead at their locked-in return
    Project {
        #[arg(long, required_unless_present = "investor")]
        nav: Option<f64>,
        #[arg(long, required_unless_present = "investor")]
        rate: Option<f64>,
        #[arg(long, default_value_t = 1.0)]
        years: f64,
        #[arg(long, value_parser = parse_date_arg)]
        start: Option<NaiveDate>,
        #[arg(long, default_value = "investors.json")]
        investors: PathBuf,
        #[arg(long, conflicts_with_all = ["nav", "rate"])]
        investor: Option<String>,
        #[arg(long)]
        year: Option<String>,
        /// Valuation date for the investor's metrics (defaults to today)
        #[arg(long, value_parser = parse_date_arg)]
        as_of: Option<NaiveDate>,
    },
    /// Investor share and fund fee across gross returns of 0-150%
    Curve {
        #[arg(long, default_value_t = 0.01)]
        step: f64,
        /// Express the curve in percent
        #[arg(long)]
        percent: bool,
        #[command(flatten)]
        fees: FeeArgs,
    },
    /// Gross YTD and locked-in returns from an index CSV
    Public {
        #[arg(short, long)]
        file: PathBuf,
        #[arg(long, value_parser = parse_date_arg)]
        as_of: Option<NaiveDate>,
    },
}

fn parse_date_arg(s: &str) -> Result<NaiveDate, String> {
    parse_date(s).ok_or_else(|| format!("unrecognised date: {}", s))
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn load_directory(path: &Path) -> anyhow::Result<InvestorDirectory> {
    InvestorDirectory::load(path).with_context(|| format!("loading {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Metrics {
            file,
            investors,
            investor,
            year,
            as_of,
            chart,
            fees,
        } => {
            let as_of = as_of.unwrap_or_else(today);
            let (observations, params) = match (file, investor) {
                (Some(path), _) => {
                    let obs = load_observations(&path)
                        .with_context(|| format!("loading ledger {}", path.display()))?;
                    (obs, FeeParameters::from(fees))
                }
                (None, Some(id)) => {
                    let directory = load_directory(&investors)?;
                    let params = directory.fee_parameters(&id)?;
                    let obs = directory
                        .load_ledger(&id, year.as_deref())
                        .with_context(|| format!("loading ledger for {}", id))?;
                    (obs, params)
                }
                (None, None) => bail!("either --file or --investor is required"),
            };

            let result = compute_performance(&observations, &params, as_of)?;
            if chart {
                print_json(&result.cashflow_chart())
            } else {
                print_json(&result)
            }
        }
        Command::Rebase {
            file,
            investors,
            investor,
            year,
            start,
            end,
            fees,
        } => {
            let end = end.unwrap_or_else(today);
            match (file, investor) {
                (Some(path), _) => {
                    let table = load_index_table(&path)
                        .with_context(|| format!("loading index table {}", path.display()))?;
                    let Some(&first) = table.dates.first() else {
                        bail!("{} has no dated rows", path.display());
                    };
                    let window = DateWindow::new(start.unwrap_or(first), end)?;
                    print_json(&compute_rebased_series(&table, window, &fees.into())?)
                }
                (None, Some(id)) => {
                    let directory = load_directory(&investors)?;
                    let series = directory
                        .fund_series(&id, year.as_deref(), start, end)
                        .with_context(|| format!("rebasing series for {}", id))?;
                    print_json(&series)
                }
                (None, None) => bail!("either --file or --investor is required"),
            }
        }
        Command::Project {
            nav,
            rate,
            years,
            start,
            investors,
            investor,
            year,
            as_of,
        } => {
            let result = match (investor, nav, rate) {
                (Some(id), _, _) => {
                    let directory = load_directory(&investors)?;
                    directory.locked_in_projection(
                        &id,
                        year.as_deref(),
                        as_of.unwrap_or_else(today),
                        start.unwrap_or_else(today),
                    )?
                }
                (None, Some(nav), Some(rate)) => match start {
                    Some(start) => project_locked_in_from(start, nav, rate, years)?,
                    None => project_locked_in(nav, rate, years)?,
                },
                _ => bail!("--nav and --rate are required without --investor"),
            };
            print_json(&result)
        }
        Command::Curve {
            step,
            percent,
            fees,
        } => {
            let curve = compensation_curve(&fees.into(), step)?;
            if percent {
                print_json(&curve.as_percent())
            } else {
                print_json(&curve)
            }
        }
        Command::Public { file, as_of } => {
            let table = load_index_table(&file)
                .with_context(|| format!("loading index table {}", file.display()))?;
            let fund = table
                .get(FUND_BEFORE_FEE)
                .with_context(|| format!("{} has no fund column", file.display()))?;
            let points: Vec<(NaiveDate, f64)> = table
                .dates
                .iter()
                .zip(&fund.values)
                .filter_map(|(date, value)| value.map(|v| (*date, v)))
                .collect();
            let metrics = compute_public_metrics(&points, as_of.unwrap_or_else(today))?;
            print_json(&metrics)
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {:#}", err);
            let code = err
                .downcast_ref::<EngineError>()
                .map(EngineError::exit_code)
                .unwrap_or(1);
            ExitCode::from(code)
        }
    }
}
