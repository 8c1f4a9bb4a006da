//! Abnormal returns: ticker return minus market return.

use crate::error::{AnalysisError, Result};
use crate::naming::{ColumnName, MKT};
use crate::table::TimeSeriesTable;

/// Subtract `mkt` from every other column of `returns`, dropping `mkt`.
///
/// A missing operand on either side leaves the cell missing.
pub fn compute_abnormal_returns(returns: &TimeSeriesTable) -> Result<TimeSeriesTable> {
    let mkt = returns.column(MKT).ok_or_else(|| {
        AnalysisError::invalid("return table has no 'mkt' column")
    })?;

    let columns: Vec<(ColumnName, Vec<Option<f64>>)> = returns
        .columns()
        .iter()
        .filter(|name| !name.is_mkt())
        .map(|name| {
            let cells = returns.column(name.as_str()).unwrap_or_default();
            let diff = cells
                .iter()
                .zip(mkt)
                .map(|(r, m)| Some((*r)? - (*m)?))
                .collect();
            (name.clone(), diff)
        })
        .collect();

    TimeSeriesTable::new(returns.index().to_vec(), columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn col(s: &str) -> ColumnName {
        ColumnName::parse(s).unwrap()
    }

    fn ret_df() -> TimeSeriesTable {
        TimeSeriesTable::new(
            vec![
                d("2020-10-12"),
                d("2020-10-13"),
                d("2020-10-14"),
                d("2020-10-15"),
                d("2020-10-16"),
            ],
            vec![
                (
                    col("aapl"),
                    vec![None, Some(-0.026608), Some(0.000826), Some(-0.004043), Some(-0.014002)],
                ),
                (
                    col("tsla"),
                    vec![None, None, Some(0.032800), Some(-0.026903), Some(-0.020518)],
                ),
                (
                    col("mkt"),
                    vec![Some(0.0153), Some(-0.0041), Some(-0.0065), Some(-0.0008), Some(-0.0006)],
                ),
            ],
        )
        .unwrap()
    }

    #[test]
    fn subtracts_market_and_drops_it() {
        let aret = compute_abnormal_returns(&ret_df()).unwrap();
        let labels: Vec<&str> = aret.columns().iter().map(|c| c.as_str()).collect();
        assert_eq!(labels, vec!["aapl", "tsla"]);
        assert_eq!(aret.index(), ret_df().index());

        let expected = [
            ("2020-10-13", "aapl", -0.022508),
            ("2020-10-14", "aapl", 0.007326),
            ("2020-10-15", "aapl", -0.003243),
            ("2020-10-16", "aapl", -0.013402),
            ("2020-10-14", "tsla", 0.039300),
            ("2020-10-15", "tsla", -0.026103),
            ("2020-10-16", "tsla", -0.019918),
        ];
        for (date, tic, want) in expected {
            let got = aret.value(d(date), tic).unwrap();
            assert!((got - want).abs() < 1e-9, "{tic} {date}: {got} vs {want}");
        }
    }

    #[test]
    fn missing_operand_propagates() {
        let aret = compute_abnormal_returns(&ret_df()).unwrap();
        assert_eq!(aret.value(d("2020-10-12"), "aapl"), None);
        assert_eq!(aret.value(d("2020-10-13"), "tsla"), None);

        let no_mkt_cell = TimeSeriesTable::new(
            vec![d("2020-01-02")],
            vec![(col("a"), vec![Some(0.01)]), (col("mkt"), vec![None])],
        )
        .unwrap();
        let aret = compute_abnormal_returns(&no_mkt_cell).unwrap();
        assert_eq!(aret.column("a").unwrap(), &[None]);
    }

    #[test]
    fn only_mkt_yields_no_columns() {
        let t = TimeSeriesTable::new(vec![d("2020-01-02")], vec![(col("mkt"), vec![Some(0.01)])])
            .unwrap();
        let aret = compute_abnormal_returns(&t).unwrap();
        assert_eq!(aret.width(), 0);
        assert_eq!(aret.height(), 1);
    }

    #[test]
    fn missing_mkt_is_invalid_input() {
        let t = TimeSeriesTable::new(vec![d("2020-01-02")], vec![(col("a"), vec![Some(0.01)])])
            .unwrap();
        let err = compute_abnormal_returns(&t).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidInput(_)));
    }
}
