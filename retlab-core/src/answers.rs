//! The four project questions, answered from the configured universe.
//!
//! Q1: which ticker has the highest average daily return in a given year?
//! Q2: annualized return of the equal-weighted portfolio of all tickers.
//! Q3: annualized return of the Q1 ticker.
//! Q4: annualized abnormal return of the Q1 ticker.

use crate::error::{AnalysisError, Result};
use crate::naming::{PriceField, MKT};
use crate::pipeline::{compute_abnormal_returns, Pipeline};
use crate::stats::{annualized_return, equal_weighted_returns, yearly_average};
use crate::table::TimeSeriesTable;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Parameters of the question set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnswerPeriod {
    /// Year used to rank tickers by average daily return.
    pub rank_year: i32,
    /// First day of the annualization window (inclusive).
    pub start: NaiveDate,
    /// Last day of the annualization window (inclusive).
    pub end: NaiveDate,
}

impl Default for AnswerPeriod {
    fn default() -> Self {
        Self {
            rank_year: 2020,
            start: NaiveDate::from_ymd_opt(2010, 1, 1).unwrap_or_default(),
            end: NaiveDate::from_ymd_opt(2020, 12, 31).unwrap_or_default(),
        }
    }
}

/// Answers to the four questions, plus provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectAnswers {
    pub period: AnswerPeriod,
    /// Upper-case ticker with the highest average daily return in `rank_year`.
    pub q1_top_ticker: String,
    /// That ticker's average daily return in `rank_year`.
    pub q1_average_return: f64,
    pub q2_ew_annualized: f64,
    pub q3_top_annualized: f64,
    pub q4_top_abnormal_annualized: f64,
    /// BLAKE3 digest of the return table the answers were computed from.
    pub dataset_hash: String,
}

impl ProjectAnswers {
    /// Load every universe ticker and answer the questions.
    pub fn compute(pipeline: &Pipeline, period: AnswerPeriod) -> Result<Self> {
        let prices = pipeline.universe_price_matrix(&PriceField::AdjClose)?;
        let returns = pipeline.returns(&prices)?;
        Self::from_returns(&returns, period)
    }

    /// Answer the questions from a return table (ticker columns + `mkt`).
    pub fn from_returns(returns: &TimeSeriesTable, period: AnswerPeriod) -> Result<Self> {
        let tickers: Vec<&str> = returns
            .columns()
            .iter()
            .filter(|c| !c.is_mkt())
            .map(|c| c.as_str())
            .collect();

        let (top, top_avg) = top_average(returns, &tickers, period.rank_year)?;
        info!(ticker = %top, average = top_avg, year = period.rank_year, "Q1");

        let ew = equal_weighted_returns(returns, &tickers)?;
        let q2 = annualized_return(&ew, period.start, period.end)?;

        let q3 = annualized_return(&returns.series(&top)?, period.start, period.end)?;

        let abnormal = compute_abnormal_returns(returns)?;
        let q4 = annualized_return(&abnormal.series(&top)?, period.start, period.end)?;

        Ok(Self {
            period,
            q1_top_ticker: top.to_uppercase(),
            q1_average_return: top_avg,
            q2_ew_annualized: q2,
            q3_top_annualized: q3,
            q4_top_abnormal_annualized: q4,
            dataset_hash: returns.content_hash(),
        })
    }
}

/// Ticker column with the highest defined average in `year`.
///
/// Undefined (`NaN`) averages are skipped; ties keep the first column.
fn top_average(table: &TimeSeriesTable, tickers: &[&str], year: i32) -> Result<(String, f64)> {
    let mut best: Option<(&str, f64)> = None;
    for &tic in tickers {
        if tic == MKT {
            continue;
        }
        let avg = yearly_average(table, tic, year)?;
        if avg.is_nan() {
            continue;
        }
        if best.map_or(true, |(_, b)| avg > b) {
            best = Some((tic, avg));
        }
    }
    best.map(|(t, a)| (t.to_string(), a)).ok_or_else(|| {
        AnalysisError::invalid(format!("no ticker has observations in {year}"))
    })
}
