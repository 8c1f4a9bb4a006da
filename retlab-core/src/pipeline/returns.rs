//! Simple daily returns plus the market column.

use crate::error::{AnalysisError, Result};
use crate::naming::{ColumnName, MKT};
use crate::table::{DateSeries, TimeSeriesTable};
use tracing::info;

/// Simple returns of one price column: `p[t] / p[prev] - 1`.
///
/// `prev` is the nearest earlier row with a price, so an absent date never
/// breaks the chain. Rows without a price, and each ticker's first priced
/// row, have no return.
pub fn simple_returns(prices: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut prev: Option<f64> = None;
    prices
        .iter()
        .map(|p| match *p {
            Some(price) => {
                let ret = prev.map(|base| price / base - 1.0);
                prev = Some(price);
                ret
            }
            None => None,
        })
        .collect()
}

/// Per-ticker returns of `prices`, inner-joined on date with `market`.
///
/// Returns are computed on the full price matrix before the join, so the
/// first date shared with the market series can still carry a return.
/// The output columns are the ticker columns followed by `mkt`.
pub fn compute_returns(prices: &TimeSeriesTable, market: &DateSeries) -> Result<TimeSeriesTable> {
    if prices.column(MKT).is_some() {
        return Err(AnalysisError::invalid(
            "price matrix already has a 'mkt' column",
        ));
    }

    let columns: Vec<(ColumnName, Vec<Option<f64>>)> = prices
        .columns()
        .iter()
        .map(|name| {
            let cells = prices.column(name.as_str()).unwrap_or_default();
            (name.clone(), simple_returns(cells))
        })
        .collect();
    let returns = TimeSeriesTable::new(prices.index().to_vec(), columns)?;

    let mkt = market.clone().renamed(ColumnName::mkt());
    let joined = returns.inner_join(&mkt)?;
    info!(
        tickers = prices.width(),
        dates = joined.height(),
        "computed returns"
    );
    Ok(joined)
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

    #[test]
    fn simple_returns_skip_missing_prices() {
        let r = simple_returns(&[None, Some(100.0), None, Some(110.0), Some(99.0)]);
        assert_eq!(r[0], None);
        assert_eq!(r[1], None);
        assert_eq!(r[2], None);
        assert!((r[3].unwrap() - 0.10).abs() < 1e-12);
        assert!((r[4].unwrap() + 0.10).abs() < 1e-12);
    }

    #[test]
    fn worked_example_aapl_tsla() {
        // Rows deliberately out of order: the table sorts them.
        let prices = TimeSeriesTable::new(
            vec![
                d("2020-10-13"),
                d("2020-10-14"),
                d("2020-10-15"),
                d("2020-10-16"),
                d("2020-10-12"),
            ],
            vec![
                (
                    col("aapl"),
                    vec![Some(121.09), Some(121.19), Some(120.70), Some(119.01), Some(124.40)],
                ),
                (
                    col("tsla"),
                    vec![Some(446.64), Some(461.29), Some(448.88), Some(439.67), None],
                ),
            ],
        )
        .unwrap();
        let market = DateSeries::new(
            col("mkt"),
            vec![
                d("2020-10-12"),
                d("2020-10-13"),
                d("2020-10-14"),
                d("2020-10-15"),
                d("2020-10-16"),
            ],
            vec![Some(0.0153), Some(-0.0041), Some(-0.0065), Some(-0.0008), Some(-0.0006)],
        )
        .unwrap();

        let ret = compute_returns(&prices, &market).unwrap();
        let labels: Vec<&str> = ret.columns().iter().map(|c| c.as_str()).collect();
        assert_eq!(labels, vec!["aapl", "tsla", "mkt"]);
        assert_eq!(ret.height(), 5);

        assert_eq!(ret.value(d("2020-10-12"), "aapl"), None);
        assert_eq!(ret.value(d("2020-10-12"), "tsla"), None);
        assert_eq!(ret.value(d("2020-10-13"), "tsla"), None);

        let expected = [
            ("2020-10-13", "aapl", -0.026608),
            ("2020-10-14", "aapl", 0.000826),
            ("2020-10-15", "aapl", -0.004043),
            ("2020-10-16", "aapl", -0.014002),
            ("2020-10-14", "tsla", 0.032800),
            ("2020-10-15", "tsla", -0.026903),
            ("2020-10-16", "tsla", -0.020518),
        ];
        for (date, tic, want) in expected {
            let got = ret.value(d(date), tic).unwrap();
            assert!((got - want).abs() < 1e-6, "{tic} {date}: {got} vs {want}");
        }
        assert_eq!(ret.value(d("2020-10-12"), "mkt"), Some(0.0153));
    }

    #[test]
    fn inner_join_drops_dates_missing_from_market() {
        let prices = TimeSeriesTable::new(
            vec![d("2020-01-02"), d("2020-01-03"), d("2020-01-06")],
            vec![(col("a"), vec![Some(10.0), Some(11.0), Some(12.1)])],
        )
        .unwrap();
        let market = DateSeries::new(
            col("mkt"),
            vec![d("2020-01-03"), d("2020-01-06"), d("2020-01-07")],
            vec![Some(0.01), Some(0.02), Some(0.03)],
        )
        .unwrap();

        let ret = compute_returns(&prices, &market).unwrap();
        assert_eq!(ret.index(), &[d("2020-01-03"), d("2020-01-06")]);
        // The 01-03 return still uses the 01-02 price.
        assert!((ret.value(d("2020-01-03"), "a").unwrap() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn existing_mkt_column_is_rejected() {
        let prices = TimeSeriesTable::new(
            vec![d("2020-01-02")],
            vec![(col("mkt"), vec![Some(1.0)])],
        )
        .unwrap();
        let market = DateSeries::new(col("mkt"), vec![d("2020-01-02")], vec![Some(0.0)]).unwrap();
        assert!(compute_returns(&prices, &market).is_err());
    }
}
