//! Investor directory: per-investor fee terms and data sources
//!
//! Loaded from a JSON file keyed by investor identifier (email):
//!
//! ```json
//! {
//!   "investor@example.com": {
//!     "name": "Jane Investor",
//!     "performance_file": "jane-data.csv",
//!     "2024-Link": "https://example.com/sheet.csv",
//!     "Fiscal_year_start": "2024-10-01",
//!     "fees": { "hurdle_rate": 0.5, "management_fee": 0.02, "performance_fee": 0.25 }
//!   }
//! }
//! ```
//!
//! The engine itself never reads this file; callers resolve fee parameters
//! and sheets here and pass them in explicitly. Remote links are fetched
//! over HTTP.

use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::fees::FeeParameters;
use crate::performance::compute_performance;
use crate::projection::{project_locked_in_from, ProjectionResult};
use crate::rebase::{compute_rebased_series, RebasedResult};
use crate::series::{
    load_index_table_from_reader, load_observations_from_reader, parse_date, DateWindow,
    ReturnObservation, SeriesTable,
};

/// Horizon of an investor's locked-in projection (one quarter)
pub const INVESTOR_PROJECTION_YEARS: f64 = 0.25;

fn default_hurdle_rate() -> f64 { 0.50 }
fn default_management_fee() -> f64 { 0.02 }
fn default_performance_fee() -> f64 { 0.25 }
fn default_currency() -> String { "USD".to_string() }

/// Fee terms as written in the directory; each field defaults independently
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct FeeConfig {
    #[serde(default = "default_hurdle_rate")]
    pub hurdle_rate: f64,
    #[serde(default = "default_management_fee")]
    pub management_fee: f64,
    #[serde(default = "default_performance_fee")]
    pub performance_fee: f64,
}

impl Default for FeeConfig {
    fn default() -> Self {
        Self {
            hurdle_rate: default_hurdle_rate(),
            management_fee: default_management_fee(),
            performance_fee: default_performance_fee(),
        }
    }
}

impl From<FeeConfig> for FeeParameters {
    fn from(cfg: FeeConfig) -> Self {
        FeeParameters::new(cfg.hurdle_rate, cfg.management_fee, cfg.performance_fee)
    }
}

/// One investor's entry
#[derive(Debug, Clone, Deserialize)]
pub struct InvestorConfig {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub performance_file: Option<String>,

    /// Remote sheet used when no year-specific link applies
    #[serde(default)]
    pub link: Option<String>,

    #[serde(default = "default_currency")]
    pub currency: String,

    #[serde(default)]
    pub join_date: Option<String>,

    #[serde(rename = "Fiscal_year_start", default)]
    pub fiscal_year_start: Option<String>,

    #[serde(default)]
    pub fees: FeeConfig,

    /// Remaining keys, including `"<year>-Link"` entries
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl InvestorConfig {
    pub fn fee_parameters(&self) -> FeeParameters {
        self.fees.into()
    }

    /// Link registered for a specific year (`"2024-Link"`)
    pub fn year_link(&self, year: &str) -> Option<&str> {
        self.extra
            .get(&format!("{}-Link", year))
            .and_then(|v| v.as_str())
            .filter(|s| !s.trim().is_empty())
    }

    pub fn fiscal_year_start_date(&self) -> Option<NaiveDate> {
        self.fiscal_year_start.as_deref().and_then(parse_date)
    }
}

/// Where an investor's sheet lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeriesSource {
    Local(PathBuf),
    Remote(String),
}

impl SeriesSource {
    /// Open the sheet; remote sheets are downloaded in full
    pub fn open(&self) -> Result<Box<dyn Read>> {
        match self {
            SeriesSource::Local(path) => {
                log::info!("reading sheet {}", path.display());
                Ok(Box::new(std::fs::File::open(path)?))
            }
            SeriesSource::Remote(url) => {
                log::info!("fetching sheet {}", url);
                let response = reqwest::blocking::get(url.as_str())?.error_for_status()?;
                Ok(Box::new(Cursor::new(response.bytes()?.to_vec())))
            }
        }
    }
}

/// Rebased index series for one investor, with the fiscal year start echoed back
#[derive(Debug, Clone, Serialize)]
pub struct InvestorSeries {
    #[serde(flatten)]
    pub rebased: RebasedResult,
    pub fiscal_year_start: Option<String>,
}

/// All configured investors plus the directory their local sheets live in
#[derive(Debug, Clone)]
pub struct InvestorDirectory {
    investors: HashMap<String, InvestorConfig>,
    data_dir: PathBuf,
}

impl InvestorDirectory {
    /// Load from a JSON file; local sheets are resolved next to it
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let data_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Self::from_reader(file, data_dir)
    }

    pub fn from_reader<R: Read>(reader: R, data_dir: impl Into<PathBuf>) -> Result<Self> {
        let investors: HashMap<String, InvestorConfig> = serde_json::from_reader(reader)?;
        log::debug!("loaded {} investors", investors.len());
        Ok(Self {
            investors,
            data_dir: data_dir.into(),
        })
    }

    /// Resolve local sheets under `data_dir` instead
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    pub fn len(&self) -> usize {
        self.investors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.investors.is_empty()
    }

    /// Investor identifiers in sorted order
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.investors.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn lookup(&self, investor: &str) -> Result<&InvestorConfig> {
        self.investors
            .get(investor)
            .ok_or_else(|| EngineError::UnknownInvestor {
                investor: investor.to_string(),
            })
    }

    pub fn fee_parameters(&self, investor: &str) -> Result<FeeParameters> {
        Ok(self.lookup(investor)?.fee_parameters())
    }

    /// Resolve the sheet for an investor: year link, then `link`, then the
    /// local performance file (derived from the identifier when not set)
    pub fn source_for(&self, investor: &str, year: Option<&str>) -> Result<SeriesSource> {
        let cfg = self.lookup(investor)?;

        if let Some(link) = year.and_then(|y| cfg.year_link(y)) {
            return Ok(SeriesSource::Remote(link.to_string()));
        }
        if let Some(link) = cfg.link.as_deref().filter(|l| !l.trim().is_empty()) {
            return Ok(SeriesSource::Remote(link.to_string()));
        }

        let file = cfg
            .performance_file
            .clone()
            .unwrap_or_else(|| format!("{}-data.csv", investor.replace(['@', '.'], "-")));
        Ok(SeriesSource::Local(self.data_dir.join(file)))
    }

    /// Load an investor's contribution ledger
    pub fn load_ledger(&self, investor: &str, year: Option<&str>) -> Result<Vec<ReturnObservation>> {
        load_observations_from_reader(self.source_for(investor, year)?.open()?)
    }

    /// Load an investor's sheet as an index table (fund plus benchmarks)
    pub fn load_index_table(&self, investor: &str, year: Option<&str>) -> Result<SeriesTable> {
        load_index_table_from_reader(self.source_for(investor, year)?.open()?)
    }

    /// Rebase an investor's index sheet with their own fees.
    ///
    /// `start` defaults to the investor's fiscal year start, then to the
    /// first date of the sheet.
    pub fn fund_series(
        &self,
        investor: &str,
        year: Option<&str>,
        start: Option<NaiveDate>,
        end: NaiveDate,
    ) -> Result<InvestorSeries> {
        let cfg = self.lookup(investor)?;
        let table = self.load_index_table(investor, year)?;

        let start = start
            .or_else(|| cfg.fiscal_year_start_date())
            .or_else(|| table.dates.first().copied());
        let rebased = match start {
            Some(start) => {
                let window = DateWindow::new(start, end)?;
                compute_rebased_series(&table, window, &cfg.fee_parameters())?
            }
            None => RebasedResult::default(),
        };

        Ok(InvestorSeries {
            rebased,
            fiscal_year_start: cfg.fiscal_year_start.clone(),
        })
    }

    /// Project an investor's NAV at `as_of` forward one quarter at their
    /// locked-in return; a missing locked-in return projects flat
    pub fn locked_in_projection(
        &self,
        investor: &str,
        year: Option<&str>,
        as_of: NaiveDate,
        start: NaiveDate,
    ) -> Result<ProjectionResult> {
        let params = self.fee_parameters(investor)?;
        let observations = self.load_ledger(investor, year)?;
        let metrics = compute_performance(&observations, &params, as_of)?;
        let rate = metrics.locked_in_return.unwrap_or(0.0);

        project_locked_in_from(start, metrics.nav, rate, INVESTOR_PROJECTION_YEARS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIRECTORY: &str = r#"{
        "a@example.com": {
            "name": "Alice",
            "performance_file": "alice.csv",
            "2024-Link": "https://example.com/2024.csv",
            "Fiscal_year_start": "2024-10-01",
            "fees": { "hurdle_rate": 0.08 }
        },
        "b@example.com": {
            "link": "https://example.com/b.csv",
            "currency": "EUR"
        },
        "c@example.com": {}
    }"#;

    fn directory() -> InvestorDirectory {
        InvestorDirectory::from_reader(DIRECTORY.as_bytes(), "static").unwrap()
    }

    #[test]
    fn test_fee_defaults() {
        let dir = directory();
        let params = dir.fee_parameters("a@example.com").unwrap();
        assert_eq!(params, FeeParameters::new(0.08, 0.02, 0.25));

        let params = dir.fee_parameters("c@example.com").unwrap();
        assert_eq!(params, FeeParameters::new(0.5, 0.02, 0.25));
    }

    #[test]
    fn test_unknown_investor() {
        let err = directory().lookup("z@example.com").unwrap_err();
        assert!(matches!(err, EngineError::UnknownInvestor { .. }));
    }

    #[test]
    fn test_source_resolution() {
        let dir = directory();
        assert_eq!(
            dir.source_for("a@example.com", Some("2024")).unwrap(),
            SeriesSource::Remote("https://example.com/2024.csv".to_string())
        );
        assert_eq!(
            dir.source_for("a@example.com", Some("2023")).unwrap(),
            SeriesSource::Local(PathBuf::from("static").join("alice.csv"))
        );
        assert_eq!(
            dir.source_for("b@example.com", None).unwrap(),
            SeriesSource::Remote("https://example.com/b.csv".to_string())
        );
        assert_eq!(
            dir.source_for("c@example.com", None).unwrap(),
            SeriesSource::Local(PathBuf::from("static").join("c-example-com-data.csv"))
        );
    }

    #[test]
    fn test_investor_fields() {
        let dir = directory();
        let a = dir.lookup("a@example.com").unwrap();
        assert_eq!(a.currency, "USD");
        assert_eq!(a.fiscal_year_start_date(), NaiveDate::from_ymd_opt(2024, 10, 1));
        assert_eq!(dir.lookup("b@example.com").unwrap().currency, "EUR");
        assert_eq!(dir.ids(), vec!["a@example.com", "b@example.com", "c@example.com"]);
    }

    #[test]
    fn test_unreachable_remote_sheet() {
        let dir = InvestorDirectory::from_reader(
            r#"{ "r@example.com": { "link": "http://127.0.0.1:9/sheet.csv" } }"#.as_bytes(),
            "static",
        )
        .unwrap();
        let err = dir.load_ledger("r@example.com", None).unwrap_err();
        assert!(matches!(err, EngineError::Http(_)));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_missing_local_sheet() {
        let err = directory().load_ledger("c@example.com", None).unwrap_err();
        assert!(matches!(err, EngineError::Io(_)));
    }
}
