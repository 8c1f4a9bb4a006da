//! Structured error types shared by every stage of the pipeline.
//!
//! These are designed to be displayable in CLI context without further
//! wrapping. Undefined aggregates (all-missing averages) are not errors;
//! they surface as `f64::NAN` or `None` cells instead.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("no price file for ticker '{ticker}' (expected {})", path.display())]
    NotFound { ticker: String, path: PathBuf },

    #[error("market reference file not found: {}", path.display())]
    ReferenceNotFound { path: PathBuf },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("parse error in {source_name} line {line}: {message}")]
    Parse {
        source_name: String,
        line: u64,
        message: String,
    },

    #[error("config error: {0}")]
    Config(String),

    #[error("export error: {0}")]
    Export(String),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AnalysisError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// True for the two "backing file is absent" variants.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::ReferenceNotFound { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
