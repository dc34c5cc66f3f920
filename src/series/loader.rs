//! Load performance sheets from CSV
//!
//! Two layouts are supported:
//! - investor ledgers: `Date, Ret, Historical Asset Value, Contribution`
//! - index sheets: `Date` followed by the fund and three benchmark columns

use std::io::Read;
use std::path::Path;

use csv::{Reader, ReaderBuilder, StringRecord};

use super::coerce::{parse_cell, parse_date};
use super::data::{LabeledSeries, ReturnObservation, SeriesTable};
use crate::error::{EngineError, Result};

/// Labels assigned to the four numeric columns of an index sheet, in order
pub const INDEX_SERIES_LABELS: [&str; 4] =
    ["Fund (Before Fee)", "Bourse Index", "Gold Index", "Dollar Index"];

const COL_DATE: &str = "Date";
const COL_RETURN: &str = "Ret";
const COL_ASSET_VALUE: &str = "Historical Asset Value";
const COL_CONTRIBUTION: &str = "Contribution";

fn column_index(headers: &StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .ok_or_else(|| EngineError::invalid_input(format!("missing column '{}'", name)))
}

fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(|field| field.trim().is_empty())
}

fn ledger_reader<R: Read>(reader: R) -> Reader<R> {
    ReaderBuilder::new().flexible(true).from_reader(reader)
}

/// Load an investor ledger from a CSV file
pub fn load_observations<P: AsRef<Path>>(path: P) -> Result<Vec<ReturnObservation>> {
    let file = std::fs::File::open(path.as_ref())?;
    log::info!("loading ledger from {}", path.as_ref().display());
    load_observations_from_reader(file)
}

/// Load an investor ledger from any reader (e.g., string buffer, network stream).
///
/// Rows come back sorted by date. Duplicate dates are kept as-is and rejected
/// later by the engine.
pub fn load_observations_from_reader<R: Read>(reader: R) -> Result<Vec<ReturnObservation>> {
    let mut csv_reader = ledger_reader(reader);
    let headers = csv_reader.headers()?.clone();

    let date_idx = column_index(&headers, COL_DATE)?;
    let ret_idx = column_index(&headers, COL_RETURN)?;
    let asset_idx = column_index(&headers, COL_ASSET_VALUE)?;
    let contrib_idx = column_index(&headers, COL_CONTRIBUTION)?;

    let mut observations = Vec::new();

    for (row, result) in csv_reader.records().enumerate() {
        let record = result?;
        if is_blank(&record) {
            continue;
        }

        let raw_date = record.get(date_idx).unwrap_or("");
        let date = parse_date(raw_date).ok_or_else(|| {
            EngineError::invalid_input(format!("row {}: unparseable date '{}'", row + 1, raw_date))
        })?;

        let cell = |idx: usize| record.get(idx).and_then(parse_cell);

        observations.push(ReturnObservation {
            date,
            cumulative_return: cell(ret_idx).unwrap_or(f64::NAN),
            asset_value: cell(asset_idx),
            contribution: cell(contrib_idx).unwrap_or(0.0),
        });
    }

    observations.sort_by_key(|o| o.date);
    log::debug!("loaded {} ledger rows", observations.len());
    Ok(observations)
}

/// Load an index sheet from a CSV file
pub fn load_index_table<P: AsRef<Path>>(path: P) -> Result<SeriesTable> {
    let file = std::fs::File::open(path.as_ref())?;
    log::info!("loading index sheet from {}", path.as_ref().display());
    load_index_table_from_reader(file)
}

/// Load an index sheet from any reader.
///
/// Rows whose date cannot be parsed are dropped. Numeric cells that cannot be
/// coerced become missing values.
pub fn load_index_table_from_reader<R: Read>(reader: R) -> Result<SeriesTable> {
    let mut csv_reader = ledger_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let width = INDEX_SERIES_LABELS.len() + 1;
    if headers.len() < width {
        return Err(EngineError::invalid_input(format!(
            "index sheet needs a date column and {} series columns, found {} columns",
            INDEX_SERIES_LABELS.len(),
            headers.len()
        )));
    }

    let mut rows: Vec<(chrono::NaiveDate, Vec<Option<f64>>)> = Vec::new();
    let mut dropped = 0usize;

    for result in csv_reader.records() {
        let record = result?;
        if is_blank(&record) {
            continue;
        }
        let Some(date) = record.get(0).and_then(parse_date) else {
            dropped += 1;
            continue;
        };
        let values = (1..width)
            .map(|idx| record.get(idx).and_then(parse_cell))
            .collect();
        rows.push((date, values));
    }

    if dropped > 0 {
        log::warn!("dropped {} index rows with unparseable dates", dropped);
    }

    rows.sort_by_key(|(date, _)| *date);

    let dates = rows.iter().map(|(date, _)| *date).collect();
    let series = INDEX_SERIES_LABELS
        .iter()
        .enumerate()
        .map(|(col, label)| {
            LabeledSeries::new(*label, rows.iter().map(|(_, values)| values[col]).collect())
        })
        .collect();

    Ok(SeriesTable { dates, series })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const LEDGER: &str = "\
Date,Ret,Historical Asset Value,Contribution
01-Feb-24,5%,\"1,050.00\",0
01-Jan-24,0.0,\"1,000.00\",\"1,000\"
,,,
01-Mar-24,0.12,,
";

    #[test]
    fn test_load_ledger_sorts_and_coerces() {
        let rows = load_observations_from_reader(LEDGER.as_bytes()).unwrap();
        assert_eq!(rows.len(), 3);

        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(rows[0].contribution, 1000.0);
        assert_eq!(rows[0].asset_value, Some(1000.0));

        assert!((rows[1].cumulative_return - 0.05).abs() < 1e-12);
        assert_eq!(rows[1].asset_value, Some(1050.0));

        assert_eq!(rows[2].asset_value, None);
        assert_eq!(rows[2].contribution, 0.0);
    }

    #[test]
    fn test_missing_column() {
        let csv = "Date,Ret,Contribution\n01-Jan-24,0.0,100\n";
        let err = load_observations_from_reader(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("Historical Asset Value"));
    }

    #[test]
    fn test_bad_ledger_date_is_error() {
        let csv = "Date,Ret,Historical Asset Value,Contribution\nsoon,0.0,100,100\n";
        let err = load_observations_from_reader(csv.as_bytes()).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_load_index_table() {
        let csv = "\
Date,Fund,Bourse,Gold,Dollar
02-Jan-24,1%,2%,,0.5%
bad,9,9,9,9
01-Jan-24,0%,0%,0%,0%
";
        let table = load_index_table_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(table.dates.len(), 2);
        assert_eq!(table.dates[0], NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(table.series.len(), 4);
        assert_eq!(table.series[0].label, "Fund (Before Fee)");
        assert_eq!(table.series[2].values, vec![Some(0.0), None]);
        assert!(table.validate().is_ok());
    }

    #[test]
    fn test_index_table_too_narrow() {
        let csv = "Date,Fund\n01-Jan-24,0.1\n";
        assert!(load_index_table_from_reader(csv.as_bytes()).is_err());
    }
}
