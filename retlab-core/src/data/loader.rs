//! Per-ticker price loading.
//!
//! The [`PriceSource`] trait abstracts over where a ticker's price table
//! comes from, so the builders can be exercised against in-memory sources.
//! [`CsvPriceStore`] is the file-backed implementation:
//! `{data_dir}/{ticker lower-case}{suffix}`.

use super::reader::read_table;
use crate::error::{AnalysisError, Result};
use crate::table::TimeSeriesTable;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default file name suffix for per-ticker price files.
pub const DEFAULT_PRICE_SUFFIX: &str = "_prc.csv";

/// Source of per-ticker price tables.
pub trait PriceSource {
    /// Load every field available for `ticker` (any case).
    fn load(&self, ticker: &str) -> Result<TimeSeriesTable>;
}

/// Price files on local disk, one CSV per ticker.
#[derive(Debug, Clone)]
pub struct CsvPriceStore {
    data_dir: PathBuf,
    suffix: String,
}

impl CsvPriceStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            suffix: DEFAULT_PRICE_SUFFIX.to_string(),
        }
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the price file for `ticker`. File names are lower case.
    pub fn path_for(&self, ticker: &str) -> PathBuf {
        self.data_dir
            .join(format!("{}{}", ticker.trim().to_lowercase(), self.suffix))
    }
}

impl PriceSource for CsvPriceStore {
    fn load(&self, ticker: &str) -> Result<TimeSeriesTable> {
        let path = self.path_for(ticker);
        if !path.is_file() {
            return Err(AnalysisError::NotFound {
                ticker: ticker.to_string(),
                path,
            });
        }
        let file = File::open(&path)?;
        let table = read_table(BufReader::new(file), &path.display().to_string())?;
        debug!(
            ticker,
            rows = table.height(),
            columns = table.width(),
            "loaded price file"
        );
        Ok(table)
    }
}

impl<S: PriceSource + ?Sized> PriceSource for &S {
    fn load(&self, ticker: &str) -> Result<TimeSeriesTable> {
        (**self).load(ticker)
    }
}
