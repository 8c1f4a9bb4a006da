//! Aggregate statistics: pure functions over already-built tables.
//!
//! Missing cells are skipped, never read as zero. An average over no
//! observations is `NaN` (or a `None` cell), which callers must handle;
//! an annualization window with no observations is an error.

use crate::error::{AnalysisError, Result};
use crate::naming::ColumnName;
use crate::table::{DateSeries, TimeSeriesTable};
use chrono::{Datelike, NaiveDate};

/// Trading days per year used for annualization.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Mean of the present values; `NaN` when there are none.
fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        f64::NAN
    } else {
        sum / n as f64
    }
}

/// Average of column `col` over the rows dated in calendar year `year`.
///
/// Missing cells are excluded. Returns `NaN` when the year has no
/// observations for `col`.
pub fn yearly_average(table: &TimeSeriesTable, col: &str, year: i32) -> Result<f64> {
    let cells = table.require_column(col)?;
    Ok(mean(
        table
            .index()
            .iter()
            .zip(cells)
            .filter(|(d, _)| d.year() == year)
            .filter_map(|(_, v)| *v),
    ))
}

/// Row-wise mean across `tickers`, ignoring missing cells per row.
///
/// The result shares the table's index. A row where every listed column
/// is missing has a missing value.
pub fn equal_weighted_returns<S: AsRef<str>>(
    table: &TimeSeriesTable,
    tickers: &[S],
) -> Result<DateSeries> {
    if tickers.is_empty() {
        return Err(AnalysisError::invalid("portfolio ticker list is empty"));
    }
    let columns = tickers
        .iter()
        .map(|t| table.require_column(t.as_ref()))
        .collect::<Result<Vec<_>>>()?;

    let values = (0..table.height())
        .map(|i| {
            let m = mean(columns.iter().filter_map(|c| c[i]));
            if m.is_nan() {
                None
            } else {
                Some(m)
            }
        })
        .collect();

    DateSeries::new(ColumnName::parse("ew")?, table.index().to_vec(), values)
}

/// Present observations of `series` with `start <= date <= end`.
fn window(series: &DateSeries, start: NaiveDate, end: NaiveDate) -> Result<Vec<f64>> {
    if start > end {
        return Err(AnalysisError::invalid(format!(
            "start {start} is after end {end}"
        )));
    }
    let obs: Vec<f64> = series.between(start, end).filter_map(|(_, v)| v).collect();
    if obs.is_empty() {
        return Err(AnalysisError::invalid(format!(
            "'{}' has no observations between {start} and {end}",
            series.name()
        )));
    }
    Ok(obs)
}

/// Gross compounded return minus one over `[start, end]`.
pub fn cumulative_return(series: &DateSeries, start: NaiveDate, end: NaiveDate) -> Result<f64> {
    let obs = window(series, start, end)?;
    Ok(obs.iter().map(|r| 1.0 + r).product::<f64>() - 1.0)
}

/// Annualized return over `[start, end]`: `tot_ret^(252/N) - 1`.
///
/// `tot_ret` is the product of `1 + r` and `N` the count of non-missing
/// observations, both taken only from dates inside the range. A range
/// with no observations is an error.
pub fn annualized_return(series: &DateSeries, start: NaiveDate, end: NaiveDate) -> Result<f64> {
    let obs = window(series, start, end)?;
    let n = obs.len() as f64;
    let tot_ret: f64 = obs.iter().map(|r| 1.0 + r).product();
    Ok(tot_ret.powf(TRADING_DAYS_PER_YEAR / n) - 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn col(s: &str) -> ColumnName {
        ColumnName::parse(s).unwrap()
    }

    #[test]
    fn yearly_average_per_year() {
        let t = TimeSeriesTable::new(
            vec![d("1999-10-13"), d("1999-10-14"), d("2020-10-15"), d("2020-10-16")],
            vec![
                (col("tic1"), vec![Some(-1.0), Some(1.0), Some(0.0), Some(1.0)]),
                (col("tic2"), vec![None, Some(0.032), Some(-0.02), Some(-0.02)]),
            ],
        )
        .unwrap();
        assert_eq!(yearly_average(&t, "tic1", 1999).unwrap(), 0.0);
        assert_eq!(yearly_average(&t, "tic1", 2020).unwrap(), 0.5);
        assert!((yearly_average(&t, "tic2", 1999).unwrap() - 0.032).abs() < 1e-12);
    }

    #[test]
    fn yearly_average_without_observations_is_nan() {
        let t = TimeSeriesTable::new(
            vec![d("2019-01-01"), d("2020-01-02")],
            vec![(col("a"), vec![Some(1.0), None])],
        )
        .unwrap();
        assert!(yearly_average(&t, "a", 2020).unwrap().is_nan());
        assert!(yearly_average(&t, "a", 2021).unwrap().is_nan());
        assert!(yearly_average(&t, "zzz", 2020).is_err());
    }

    #[test]
    fn yearly_average_of_prices() {
        let t = TimeSeriesTable::new(
            vec![d("2019-01-01"), d("2019-01-02"), d("2020-10-02"), d("2020-11-12")],
            vec![(col("some_tic"), vec![Some(1.0), Some(2.0), Some(4.0), Some(4.0)])],
        )
        .unwrap();
        assert_eq!(yearly_average(&t, "some_tic", 2019).unwrap(), 1.5);
    }

    #[test]
    fn equal_weighted_ignores_missing_per_row() {
        let t = TimeSeriesTable::new(
            vec![d("2019-01-01"), d("2019-01-02"), d("2020-10-02"), d("2020-11-12")],
            vec![
                (col("tic1"), vec![Some(1.0), Some(2.0), Some(1.0), Some(2.0)]),
                (col("tic2"), vec![Some(2.0), None, Some(2.0), Some(1.0)]),
                (col("tic3"), vec![Some(99.0); 4]),
            ],
        )
        .unwrap();
        let ew = equal_weighted_returns(&t, &["tic1", "tic2"]).unwrap();
        assert_eq!(ew.index(), t.index());
        assert_eq!(ew.values(), &[Some(1.5), Some(2.0), Some(1.5), Some(1.5)]);
        assert_eq!(ew.name().as_str(), "ew");
    }

    #[test]
    fn equal_weighted_all_missing_row_is_missing() {
        let t = TimeSeriesTable::new(
            vec![d("2020-01-02"), d("2020-01-03")],
            vec![
                (col("a"), vec![None, Some(1.0)]),
                (col("b"), vec![None, None]),
            ],
        )
        .unwrap();
        let ew = equal_weighted_returns(&t, &["a", "b"]).unwrap();
        assert_eq!(ew.values(), &[None, Some(1.0)]);
    }

    #[test]
    fn equal_weighted_rejects_bad_input() {
        let t = TimeSeriesTable::new(vec![d("2020-01-02")], vec![(col("a"), vec![Some(1.0)])])
            .unwrap();
        let none: [&str; 0] = [];
        assert!(equal_weighted_returns(&t, &none).is_err());
        assert!(equal_weighted_returns(&t, &["a", "b"]).is_err());
    }

    /// 400 daily observations compounding to 1.5, bracketed by junk
    /// observations outside the range.
    fn bracketed_series() -> (DateSeries, NaiveDate, NaiveDate) {
        let n = 400;
        let daily = 1.5_f64.powf(1.0 / n as f64) - 1.0;
        let start = d("2010-01-01");
        let end = start + Duration::days(n as i64 - 1);

        let mut pairs: Vec<(NaiveDate, Option<f64>)> = (1..=3)
            .map(|k| (start - Duration::days(k), Some(-99.0)))
            .collect();
        pairs.extend((0..n).map(|k| (start + Duration::days(k as i64), Some(daily))));
        pairs.extend((1..=3).map(|k| (end + Duration::days(k), Some(99.0))));

        (DateSeries::from_pairs(col("x"), pairs).unwrap(), start, end)
    }

    #[test]
    fn annualized_return_of_known_series() {
        let (ser, start, end) = bracketed_series();
        let res = annualized_return(&ser, start, end).unwrap();
        let expected = 1.5_f64.powf(252.0 / 400.0) - 1.0;
        assert!((res - expected).abs() < 1e-9, "{res} vs {expected}");
        assert!((res - 0.2910).abs() < 1e-4);

        let cum = cumulative_return(&ser, start, end).unwrap();
        assert!((cum - 0.5).abs() < 1e-9);
    }

    #[test]
    fn annualized_return_counts_only_present_observations() {
        let ser = DateSeries::new(
            col("x"),
            vec![d("2020-01-01"), d("2020-01-02"), d("2020-01-03")],
            vec![Some(0.01), None, Some(0.02)],
        )
        .unwrap();
        let res = annualized_return(&ser, d("2020-01-01"), d("2020-01-03")).unwrap();
        let expected = (1.01_f64 * 1.02).powf(252.0 / 2.0) - 1.0;
        assert!((res - expected).abs() < 1e-9);
    }

    #[test]
    fn empty_window_is_invalid_input() {
        let (ser, _, _) = bracketed_series();
        let err = annualized_return(&ser, d("2030-01-01"), d("2030-12-31")).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidInput(_)));
        assert!(annualized_return(&ser, d("2011-01-01"), d("2010-01-01")).is_err());

        let all_missing =
            DateSeries::new(col("x"), vec![d("2020-01-01")], vec![None]).unwrap();
        assert!(annualized_return(&all_missing, d("2020-01-01"), d("2020-01-01")).is_err());
    }
}
