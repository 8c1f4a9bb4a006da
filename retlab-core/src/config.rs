//! Project configuration: where the data lives and which tickers to analyse.
//!
//! Passed explicitly to [`Pipeline::new`](crate::pipeline::Pipeline::new);
//! nothing in the crate reads global state.

use crate::data::{CsvPriceStore, TickerUniverse, DEFAULT_PRICE_SUFFIX};
use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Serializable project configuration.
///
/// ```toml
/// data_dir = "data"
/// market_csv = "data/ff_daily.csv"
/// price_file_suffix = "_prc.csv"
///
/// [tickers]
/// AAPL = "Apple Inc."
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Directory holding one price CSV per ticker.
    pub data_dir: PathBuf,
    /// Market reference CSV (must contain a `mkt` column).
    pub market_csv: PathBuf,
    /// Appended to the lower-case ticker to form a price file name.
    pub price_file_suffix: String,
    /// Tickers covered by "all tickers" requests.
    pub tickers: TickerUniverse,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            market_csv: PathBuf::from("data").join("ff_daily.csv"),
            price_file_suffix: DEFAULT_PRICE_SUFFIX.to_string(),
            tickers: TickerUniverse::default(),
        }
    }
}

impl ProjectConfig {
    /// Load from a TOML file. Relative paths resolve against the file's
    /// directory.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AnalysisError::Config(format!("read {}: {e}", path.display())))?;
        let config = Self::from_toml(&content)?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(config.resolved_against(base))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| AnalysisError::Config(format!("parse config TOML: {e}")))
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| AnalysisError::Config(format!("serialize config: {e}")))
    }

    /// Same configuration with relative paths joined onto `base`.
    pub fn resolved_against(mut self, base: &Path) -> Self {
        if self.data_dir.is_relative() {
            self.data_dir = base.join(&self.data_dir);
        }
        if self.market_csv.is_relative() {
            self.market_csv = base.join(&self.market_csv);
        }
        self
    }

    pub fn price_store(&self) -> CsvPriceStore {
        CsvPriceStore::new(&self.data_dir).with_suffix(&self.price_file_suffix)
    }
}
