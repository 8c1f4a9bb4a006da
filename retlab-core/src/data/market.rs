//! Market reference series.
//!
//! The reference CSV holds daily factor returns keyed by date (one shared
//! file per project). Only its `mkt` column is used: it is already a
//! return, so no differencing is applied.

use super::reader::read_table;
use crate::error::{AnalysisError, Result};
use crate::naming::MKT;
use crate::table::{DateSeries, TimeSeriesTable};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::debug;

/// The market return series and the table it came from.
#[derive(Debug, Clone)]
pub struct MarketReference {
    path: PathBuf,
    table: TimeSeriesTable,
}

impl MarketReference {
    /// Load the reference CSV at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(AnalysisError::ReferenceNotFound {
                path: path.to_path_buf(),
            });
        }
        let file = File::open(path)?;
        let table = read_table(BufReader::new(file), &path.display().to_string())?;
        Self::from_table(path.to_path_buf(), table)
    }

    /// Wrap an already-parsed reference table; it must carry `mkt`.
    pub fn from_table(path: PathBuf, table: TimeSeriesTable) -> Result<Self> {
        table.require_column(MKT)?;
        debug!(
            path = %path.display(),
            rows = table.height(),
            "loaded market reference"
        );
        Ok(Self { path, table })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every column of the reference file.
    pub fn table(&self) -> &TimeSeriesTable {
        &self.table
    }

    /// The daily market return series, labeled `mkt`.
    pub fn mkt(&self) -> Result<DateSeries> {
        self.table.series(MKT)
    }
}
