//! Build tables from inline CSV text.
//!
//! Handy for fixtures: the text may be indented and padded for alignment,
//!
//! ```text
//!     date       , aapl     , mkt
//!     2020-10-12 ,          , 0.0153
//!     2020-10-13 , -0.026608, -0.0041
//! ```
//!
//! and parses exactly as the equivalent file would.

use crate::data::read_table;
use crate::error::{AnalysisError, Result};
use crate::table::TimeSeriesTable;
use csv::{ReaderBuilder, Trim, Writer};

/// Rewrite padded CSV text as plain CSV: the whole text and every field
/// are trimmed, blank lines are dropped.
pub fn normalize_csv_text(text: &str) -> Result<String> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.trim().as_bytes());
    let mut writer = Writer::from_writer(vec![]);

    for record in reader.records() {
        let record = record?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        writer.write_record(&record)?;
    }

    let data = writer
        .into_inner()
        .map_err(|e| AnalysisError::invalid(format!("flush CSV text: {e}")))?;
    String::from_utf8(data).map_err(|e| AnalysisError::invalid(format!("CSV text is not UTF-8: {e}")))
}

/// Parse padded CSV text into a table (see [`read_table`]).
pub fn csv_to_table(text: &str) -> Result<TimeSeriesTable> {
    let cleaned = normalize_csv_text(text)?;
    read_table(cleaned.as_bytes(), "<inline csv>")
}
