//! Price matrix: one column per ticker on the union of trading dates.

use crate::data::PriceSource;
use crate::error::{AnalysisError, Result};
use crate::naming::{ColumnName, PriceField};
use crate::table::TimeSeriesTable;
use std::collections::HashSet;
use tracing::{debug, info};

/// Case-fold `tickers` and drop repeats, keeping first occurrences.
pub fn dedupe_tickers<S: AsRef<str>>(tickers: &[S]) -> Result<Vec<ColumnName>> {
    if tickers.is_empty() {
        return Err(AnalysisError::invalid("ticker list is empty"));
    }
    let mut seen = HashSet::with_capacity(tickers.len());
    let mut out = Vec::with_capacity(tickers.len());
    for t in tickers {
        let label = ColumnName::ticker(t.as_ref())?;
        if seen.insert(label.clone()) {
            out.push(label);
        } else {
            debug!(ticker = t.as_ref(), "ignoring duplicate ticker");
        }
    }
    Ok(out)
}

/// Build the price matrix for `tickers` from `field`.
///
/// Each ticker contributes one column, labeled with its lower-case symbol,
/// holding only `field`. The index is every date on which at least one
/// ticker has a non-missing `field`; a ticker without a quote on such a
/// date gets a missing cell. Column order follows `tickers`.
pub fn build_price_matrix<P, S>(source: &P, tickers: &[S], field: &PriceField) -> Result<TimeSeriesTable>
where
    P: PriceSource + ?Sized,
    S: AsRef<str>,
{
    let labels = dedupe_tickers(tickers)?;
    let field_col = field.column();

    let mut series = Vec::with_capacity(labels.len());
    for label in labels {
        let table = source.load(label.as_str())?;
        let prices = table
            .series(field_col.as_str())
            .map_err(|_| {
                AnalysisError::invalid(format!(
                    "price field '{field_col}' not found for ticker '{label}'"
                ))
            })?
            .drop_missing()
            .renamed(label);
        series.push(prices);
    }

    let matrix = TimeSeriesTable::outer_join(series)?;
    info!(
        tickers = matrix.width(),
        dates = matrix.height(),
        field = %field_col,
        "built price matrix"
    );
    Ok(matrix)
}
