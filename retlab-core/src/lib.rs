//! RetLab Core: price tables, returns, abnormal returns and statistics.
//!
//! This crate contains the whole analysis:
//! - Date-indexed tables with missing cells and the two join flavours
//! - Price CSV loading with column-name standardisation
//! - Price matrix, simple returns joined with the market, abnormal returns
//! - Yearly averages, equal-weighted portfolios and annualized returns
//! - Export to CSV and Parquet, plain-text rendering for inspection

pub mod answers;
pub mod config;
pub mod csv_text;
pub mod data;
pub mod error;
pub mod export;
pub mod naming;
pub mod pipeline;
pub mod pprint;
pub mod stats;
pub mod table;

pub use answers::{AnswerPeriod, ProjectAnswers};
pub use config::ProjectConfig;
pub use error::{AnalysisError, Result};
pub use naming::{ColumnName, PriceField, MKT};
pub use pipeline::Pipeline;
pub use table::{DateSeries, TimeSeriesTable};
