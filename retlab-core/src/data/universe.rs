//! Ticker universe: symbol to company name.
//!
//! The universe only decides which tickers an "all tickers" analysis
//! covers. Symbols are stored upper case; files and columns use the
//! lower-case form.

use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// A fixed mapping of ticker symbol to display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, String>",
    into = "BTreeMap<String, String>"
)]
pub struct TickerUniverse {
    tickers: BTreeMap<String, String>,
}

impl TickerUniverse {
    /// Build a universe, upper-casing every symbol.
    pub fn new<I, S, N>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, N)>,
        S: AsRef<str>,
        N: Into<String>,
    {
        let tickers = entries
            .into_iter()
            .map(|(sym, name)| (sym.as_ref().trim().to_uppercase(), name.into()))
            .collect();
        Self { tickers }
    }

    /// Load a universe from a TOML file of `SYMBOL = "Name"` pairs.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AnalysisError::Config(format!("read universe file: {e}")))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let raw: BTreeMap<String, String> = toml::from_str(content)
            .map_err(|e| AnalysisError::Config(format!("parse universe TOML: {e}")))?;
        Ok(Self::new(raw))
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(&self.tickers)
            .map_err(|e| AnalysisError::Config(format!("serialize universe: {e}")))
    }

    /// Sorted upper-case symbols.
    pub fn tickers(&self) -> Vec<&str> {
        self.tickers.keys().map(|s| s.as_str()).collect()
    }

    /// Company name for `symbol` (any case).
    pub fn name(&self, symbol: &str) -> Option<&str> {
        self.tickers
            .get(&symbol.trim().to_uppercase())
            .map(|s| s.as_str())
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.name(symbol).is_some()
    }

    pub fn len(&self) -> usize {
        self.tickers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tickers.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl From<BTreeMap<String, String>> for TickerUniverse {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self::new(map)
    }
}

impl From<TickerUniverse> for BTreeMap<String, String> {
    fn from(u: TickerUniverse) -> Self {
        u.tickers
    }
}

impl Default for TickerUniverse {
    /// The 23 large-cap US names the project analyses.
    fn default() -> Self {
        Self::new([
            ("AAL", "American Airlines Group Inc"),
            ("AAPL", "Apple Inc."),
            ("ABBV", "AbbVie Inc."),
            ("BABA", "Alibaba Group Holding Limited"),
            ("BAC", "Bank of America Corporation"),
            ("CSCO", "Cisco Systems, Inc."),
            ("DAL", "Delta Air Lines, Inc."),
            ("DIS", "The Walt Disney Company"),
            ("FB", "Facebook, Inc."),
            ("GE", "General Electric Company"),
            ("INTC", "Intel Corporation"),
            ("JNJ", "Johnson & Johnson"),
            ("KO", "The Coca-Cola Company"),
            ("MSFT", "Microsoft Corporation"),
            ("NVDA", "NVIDIA Corporation"),
            ("ORCL", "Oracle Corporation"),
            ("PFE", "Pfizer Inc."),
            ("PG", "The Procter & Gamble Company"),
            ("PYPL", "PayPal Holdings, Inc."),
            ("T", "AT&T Inc. (T)"),
            ("TSLA", "Tesla, Inc."),
            ("TSM", "Taiwan Semiconductor Manufacturing Company Limited"),
            ("V", "Visa Inc."),
        ])
    }
}
