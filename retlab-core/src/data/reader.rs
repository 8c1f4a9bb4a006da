//! CSV → [`TimeSeriesTable`] reader shared by the price loader, the market
//! reference and the CSV-text helper.
//!
//! The header named `Date` (any case) becomes the index; every other header
//! is renamed with [`standardise_colnames`]. Cells are numeric or missing.

use crate::error::{AnalysisError, Result};
use crate::naming::standardise_colnames;
use crate::table::TimeSeriesTable;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, Trim};
use std::collections::HashSet;
use std::io::Read;
use tracing::warn;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
const MISSING_MARKERS: &[&str] = &["", "nan", "na", "n/a", "null", "none"];

/// Parse a calendar date, discarding any time component.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
}

/// Parse one cell: a number, or one of the missing markers.
fn parse_cell(raw: &str) -> std::result::Result<Option<f64>, String> {
    let s = raw.trim();
    if MISSING_MARKERS.iter().any(|m| s.eq_ignore_ascii_case(m)) {
        return Ok(None);
    }
    s.parse::<f64>()
        .map(|v| if v.is_nan() { None } else { Some(v) })
        .map_err(|_| format!("non-numeric value '{s}'"))
}

/// Read a date-indexed table from CSV text.
///
/// Duplicate dates keep their first occurrence. `source_name` only labels
/// error messages and logs.
pub fn read_table<R: Read>(rdr: R, source_name: &str) -> Result<TimeSeriesTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(rdr);

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    let date_pos = headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case("date"))
        .ok_or_else(|| {
            AnalysisError::invalid(format!("{source_name}: no 'Date' column in header"))
        })?;

    let value_headers: Vec<&str> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != date_pos)
        .map(|(_, h)| h.as_str())
        .collect();
    let names = standardise_colnames(&value_headers)?;

    let mut index = Vec::new();
    let mut data: Vec<Vec<Option<f64>>> = vec![Vec::new(); names.len()];
    let mut seen = HashSet::new();
    let mut duplicates = 0usize;

    for record in reader.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let parse_err = |message: String| AnalysisError::Parse {
            source_name: source_name.to_string(),
            line,
            message,
        };

        let raw_date = record.get(date_pos).unwrap_or("");
        let date =
            parse_date(raw_date).ok_or_else(|| parse_err(format!("invalid date '{raw_date}'")))?;
        if !seen.insert(date) {
            duplicates += 1;
            continue;
        }
        index.push(date);

        let cells = record
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != date_pos)
            .map(|(_, c)| c);
        for (col, raw) in data.iter_mut().zip(cells) {
            let value = parse_cell(raw).map_err(|m| parse_err(m))?;
            col.push(value);
        }
    }

    if duplicates > 0 {
        warn!(source = source_name, duplicates, "dropped rows with duplicate dates");
    }

    TimeSeriesTable::new(index, names.into_iter().zip(data).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn parses_common_date_formats() {
        assert_eq!(parse_date("2020-10-13"), Some(d("2020-10-13")));
        assert_eq!(parse_date("2020/10/13"), Some(d("2020-10-13")));
        assert_eq!(parse_date("10/13/2020"), Some(d("2020-10-13")));
        assert_eq!(parse_date("2020-10-13 16:00:00"), Some(d("2020-10-13")));
        assert_eq!(parse_date("not a date"), None);
    }

    #[test]
    fn missing_markers_become_none() {
        for raw in ["", "NaN", "nan", "NA", "null"] {
            assert_eq!(parse_cell(raw).unwrap(), None, "marker {raw:?}");
        }
        assert_eq!(parse_cell("1.5").unwrap(), Some(1.5));
        assert!(parse_cell("abc").is_err());
    }

    #[test]
    fn reads_and_normalizes_columns() {
        let text = "Date,Open,Adj Close,Volume\n\
                    2020-10-13,125.27,121.09,262330500\n\
                    2020-10-12,120.06,124.40,240226800\n";
        let t = read_table(text.as_bytes(), "aapl_prc.csv").unwrap();
        let labels: Vec<&str> = t.columns().iter().map(|c| c.as_str()).collect();
        assert_eq!(labels, vec!["open", "adj_close", "volume"]);
        assert_eq!(t.index(), &[d("2020-10-12"), d("2020-10-13")]);
        assert_eq!(t.value(d("2020-10-13"), "adj_close"), Some(121.09));
    }

    #[test]
    fn keeps_first_duplicate_date() {
        let text = "Date,close\n2020-01-02,1.0\n2020-01-02,2.0\n";
        let t = read_table(text.as_bytes(), "dup.csv").unwrap();
        assert_eq!(t.height(), 1);
        assert_eq!(t.column("close").unwrap(), &[Some(1.0)]);
    }

    #[test]
    fn missing_date_column_is_invalid_input() {
        let err = read_table("close\n1.0\n".as_bytes(), "x.csv").unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidInput(_)));
    }

    #[test]
    fn bad_date_reports_line() {
        let text = "Date,close\n2020-01-02,1.0\nyesterday,2.0\n";
        match read_table(text.as_bytes(), "x.csv").unwrap_err() {
            AnalysisError::Parse { line, message, .. } => {
                assert_eq!(line, 3);
                assert!(message.contains("yesterday"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
