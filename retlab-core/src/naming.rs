//! Column labels and price field identifiers.
//!
//! Every column label in a [`TimeSeriesTable`](crate::table::TimeSeriesTable)
//! is a [`ColumnName`]: lower-case with spaces replaced by underscores.
//! Selecting columns goes through this type (or [`PriceField`]) so that a
//! mistyped label fails at parse time instead of silently matching nothing.

use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Label of the market return column.
pub const MKT: &str = "mkt";

/// A validated, normalized column label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ColumnName(String);

impl ColumnName {
    /// Apply the naming rule: lower-case, spaces become underscores.
    pub fn normalize(raw: &str) -> Result<Self> {
        let name = normalize_str(raw.trim());
        if name.is_empty() {
            return Err(AnalysisError::invalid("empty column name"));
        }
        Ok(Self(name))
    }

    /// Accept an already-normalized label, rejecting anything else.
    pub fn parse(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(AnalysisError::invalid("empty column name"));
        }
        if normalize_str(s) != s {
            return Err(AnalysisError::invalid(format!(
                "column name '{s}' is not normalized (expected '{}')",
                normalize_str(s)
            )));
        }
        Ok(Self(s.to_string()))
    }

    /// Label for a ticker column: the case-folded symbol.
    pub fn ticker(symbol: &str) -> Result<Self> {
        let sym = symbol.trim();
        if sym.is_empty() {
            return Err(AnalysisError::invalid("empty ticker symbol"));
        }
        Self::normalize(sym)
    }

    pub fn mkt() -> Self {
        Self(MKT.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_mkt(&self) -> bool {
        self.0 == MKT
    }
}

fn normalize_str(s: &str) -> String {
    s.to_lowercase().replace(' ', "_")
}

impl fmt::Display for ColumnName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ColumnName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ColumnName {
    type Error = AnalysisError;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<ColumnName> for String {
    fn from(c: ColumnName) -> Self {
        c.0
    }
}

impl FromStr for ColumnName {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Rename raw source headers according to the naming rule.
///
/// - A header that is already normalized is kept as is.
/// - A header whose normalized form collides with another source header
///   gets a `_` prefix.
/// - Otherwise the normalized form is used.
///
/// Two headers that end up with the same final label are rejected rather
/// than letting one overwrite the other.
pub fn standardise_colnames(headers: &[&str]) -> Result<Vec<ColumnName>> {
    let originals: HashSet<&str> = headers.iter().copied().collect();
    let mut seen: HashSet<String> = HashSet::with_capacity(headers.len());
    let mut out = Vec::with_capacity(headers.len());

    for &raw in headers {
        let new_name = normalize_str(raw);
        let label = if new_name == raw {
            new_name
        } else if originals.contains(new_name.as_str()) {
            format!("_{new_name}")
        } else {
            new_name
        };
        if label.is_empty() {
            return Err(AnalysisError::invalid("empty column name"));
        }
        if !seen.insert(label.clone()) {
            return Err(AnalysisError::invalid(format!(
                "duplicate column '{label}' after renaming header '{raw}'"
            )));
        }
        out.push(ColumnName(label));
    }

    Ok(out)
}

/// The price field to extract when building a price matrix.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PriceField {
    Open,
    High,
    Low,
    Close,
    /// Split/dividend-adjusted close.
    #[default]
    AdjClose,
    Volume,
    Other(ColumnName),
}

impl PriceField {
    pub fn column(&self) -> ColumnName {
        match self {
            Self::Open => ColumnName("open".into()),
            Self::High => ColumnName("high".into()),
            Self::Low => ColumnName("low".into()),
            Self::Close => ColumnName("close".into()),
            Self::AdjClose => ColumnName("adj_close".into()),
            Self::Volume => ColumnName("volume".into()),
            Self::Other(c) => c.clone(),
        }
    }
}

impl FromStr for PriceField {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        let name = ColumnName::normalize(s)?;
        Ok(match name.as_str() {
            "open" => Self::Open,
            "high" => Self::High,
            "low" => Self::Low,
            "close" => Self::Close,
            "adj_close" => Self::AdjClose,
            "volume" => Self::Volume,
            _ => Self::Other(name),
        })
    }
}

impl fmt::Display for PriceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column())
    }
}
