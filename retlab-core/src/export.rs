//! Table export: CSV via the `csv` crate, Parquet via Polars.

use crate::error::{AnalysisError, Result};
use crate::table::TimeSeriesTable;
use chrono::NaiveDate;
use polars::prelude::*;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Write `table` as CSV: `date` first, then every column in order.
/// Missing cells are empty fields.
pub fn write_csv<W: Write>(table: &TimeSeriesTable, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = vec!["date"];
    header.extend(table.columns().iter().map(|c| c.as_str()));
    wtr.write_record(&header)?;

    for (i, date) in table.index().iter().enumerate() {
        let mut record = vec![date.format("%Y-%m-%d").to_string()];
        record.extend(table.row(i).map(|v| v.map(|x| x.to_string()).unwrap_or_default()));
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// CSV rendering of `table` as a string.
pub fn to_csv_string(table: &TimeSeriesTable) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(table, &mut buf)?;
    String::from_utf8(buf).map_err(|e| AnalysisError::Export(format!("CSV output is not UTF-8: {e}")))
}

/// Convert to a Polars DataFrame: a `date` column of type `Date` followed
/// by one nullable `Float64` column per table column.
pub fn to_dataframe(table: &TimeSeriesTable) -> Result<DataFrame> {
    // NaiveDate::default() is 1970-01-01.
    let epoch = NaiveDate::default();
    let days: Vec<i32> = table
        .index()
        .iter()
        .map(|d| (*d - epoch).num_days() as i32)
        .collect();

    let mut columns = Vec::with_capacity(table.width() + 1);
    columns.push(
        Column::new("date".into(), days)
            .cast(&DataType::Date)
            .map_err(|e| AnalysisError::Export(format!("date cast: {e}")))?,
    );
    for name in table.columns() {
        let cells = table.require_column(name.as_str())?.to_vec();
        columns.push(Column::new(name.as_str().into(), cells));
    }

    DataFrame::new(columns).map_err(|e| AnalysisError::Export(format!("dataframe creation: {e}")))
}

/// Write `table` to a Parquet file at `path`.
pub fn write_parquet(table: &TimeSeriesTable, path: &Path) -> Result<()> {
    let mut df = to_dataframe(table)?;
    let file = fs::File::create(path)?;
    ParquetWriter::new(file)
        .finish(&mut df)
        .map_err(|e| AnalysisError::Export(format!("write parquet: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv_text::csv_to_table;
    use crate::data::read_table;

    fn table() -> TimeSeriesTable {
        csv_to_table(
            "
            date       , aapl      , mkt
            2020-10-12 ,           , 0.0153
            2020-10-13 , -0.026608 , -0.0041
            ",
        )
        .unwrap()
    }

    #[test]
    fn csv_writes_empty_cells_for_missing() {
        let out = to_csv_string(&table()).unwrap();
        assert_eq!(
            out,
            "date,aapl,mkt\n2020-10-12,,0.0153\n2020-10-13,-0.026608,-0.0041\n"
        );
    }

    #[test]
    fn csv_reads_back_to_the_same_table() {
        let t = table();
        let out = to_csv_string(&t).unwrap();
        let back = read_table(out.as_bytes(), "roundtrip").unwrap();
        assert_eq!(back, t);
    }

    #[test]
    fn dataframe_has_date_and_nullable_columns() {
        let df = to_dataframe(&table()).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 3);
        assert_eq!(df.column("date").unwrap().dtype(), &DataType::Date);
        assert_eq!(df.column("aapl").unwrap().null_count(), 1);
        assert_eq!(df.column("mkt").unwrap().null_count(), 0);
    }

    #[test]
    fn parquet_file_is_readable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ret.parquet");
        write_parquet(&table(), &path).unwrap();

        let file = fs::File::open(&path).unwrap();
        let df = ParquetReader::new(file).finish().unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.column("aapl").unwrap().null_count(), 1);
    }
}
