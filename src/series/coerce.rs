//! Coercion of raw spreadsheet cells
//!
//! Sheets exported from spreadsheets carry percent strings ("12.5%"),
//! grouping separators ("1,250.00"), non-breaking spaces and blanks.

use chrono::NaiveDate;

/// Date formats tried in order; two-digit-year variants come first
const DATE_FORMATS: &[&str] = &[
    "%d-%b-%y",
    "%d-%b-%Y",
    "%d/%m/%y",
    "%d/%m/%Y",
    "%d-%m-%y",
    "%d-%m-%Y",
    "%Y-%m-%d",
    "%d %b %Y",
];

/// Parse a numeric cell. Returns `None` for blanks, garbage and non-finite values.
///
/// A trailing `%` divides by 100.
pub fn parse_cell(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| *c != '\u{00A0}' && *c != ',')
        .collect();
    let is_pct = cleaned.ends_with('%');
    let number = cleaned.trim_end_matches('%').trim();
    if number.is_empty() {
        return None;
    }

    let value: f64 = number.parse().ok()?;
    let value = if is_pct { value / 100.0 } else { value };
    value.is_finite().then_some(value)
}

/// Parse a date cell, day-first
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}
