//! Date-indexed numeric tables.
//!
//! A [`TimeSeriesTable`] holds a strictly ascending, duplicate-free
//! `NaiveDate` index and column-major `Option<f64>` cells. `None` is the
//! explicit "not available" marker: arithmetic on it propagates, and
//! aggregation skips it. A NaN handed to a constructor is stored as `None`,
//! so the two never coexist.
//!
//! Tables are values. Every operation returns a new table.

use crate::error::{AnalysisError, Result};
use crate::naming::ColumnName;
use chrono::NaiveDate;
use std::collections::{BTreeSet, HashSet};

/// A single labeled, date-indexed column.
#[derive(Debug, Clone, PartialEq)]
pub struct DateSeries {
    name: ColumnName,
    index: Vec<NaiveDate>,
    values: Vec<Option<f64>>,
}

impl DateSeries {
    /// Build a series. Rows are sorted by date; duplicate dates are rejected.
    pub fn new(name: ColumnName, index: Vec<NaiveDate>, values: Vec<Option<f64>>) -> Result<Self> {
        if index.len() != values.len() {
            return Err(AnalysisError::invalid(format!(
                "series '{name}': {} dates but {} values",
                index.len(),
                values.len()
            )));
        }
        let order = sort_order(&index)?;
        Ok(Self {
            name,
            index: order.iter().map(|&i| index[i]).collect(),
            values: order.iter().map(|&i| clean(values[i])).collect(),
        })
    }

    pub fn from_pairs(
        name: ColumnName,
        pairs: impl IntoIterator<Item = (NaiveDate, Option<f64>)>,
    ) -> Result<Self> {
        let (index, values) = pairs.into_iter().unzip();
        Self::new(name, index, values)
    }

    pub fn name(&self) -> &ColumnName {
        &self.name
    }

    pub fn index(&self) -> &[NaiveDate] {
        &self.index
    }

    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, Option<f64>)> + '_ {
        self.index.iter().copied().zip(self.values.iter().copied())
    }

    /// Value on `date`; `None` if the date is absent or the cell is missing.
    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        self.index
            .binary_search(&date)
            .ok()
            .and_then(|i| self.values[i])
    }

    /// Observations with `start <= date <= end`, missing cells included.
    pub fn between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> impl Iterator<Item = (NaiveDate, Option<f64>)> + '_ {
        let lo = self.index.partition_point(|d| *d < start);
        let hi = self.index.partition_point(|d| *d <= end);
        let hi = hi.max(lo);
        self.index[lo..hi]
            .iter()
            .copied()
            .zip(self.values[lo..hi].iter().copied())
    }

    /// Same series without the rows whose value is missing.
    pub fn drop_missing(&self) -> Self {
        let (index, values) = self
            .iter()
            .filter(|(_, v)| v.is_some())
            .unzip();
        Self {
            name: self.name.clone(),
            index,
            values,
        }
    }

    pub fn non_missing_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    pub fn renamed(mut self, name: ColumnName) -> Self {
        self.name = name;
        self
    }

    /// Single-column table view of this series.
    pub fn into_table(self) -> TimeSeriesTable {
        TimeSeriesTable {
            index: self.index,
            columns: vec![self.name],
            data: vec![self.values],
        }
    }
}

/// A date-indexed, column-labeled numeric table.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesTable {
    index: Vec<NaiveDate>,
    columns: Vec<ColumnName>,
    data: Vec<Vec<Option<f64>>>,
}

impl TimeSeriesTable {
    /// Build a table from an index and labeled columns.
    ///
    /// Rows are reordered so the index ascends. Duplicate dates, duplicate
    /// labels and columns whose length differs from the index are rejected.
    pub fn new(index: Vec<NaiveDate>, columns: Vec<(ColumnName, Vec<Option<f64>>)>) -> Result<Self> {
        {
            let mut labels = HashSet::with_capacity(columns.len());
            for (name, values) in &columns {
                if !labels.insert(name.as_str()) {
                    return Err(AnalysisError::invalid(format!("duplicate column '{name}'")));
                }
                if values.len() != index.len() {
                    return Err(AnalysisError::invalid(format!(
                        "column '{name}' has {} values but the index has {} dates",
                        values.len(),
                        index.len()
                    )));
                }
            }
        }

        let order = sort_order(&index)?;
        let (names, data): (Vec<_>, Vec<_>) = columns
            .into_iter()
            .map(|(name, values)| {
                let sorted: Vec<Option<f64>> = order.iter().map(|&i| clean(values[i])).collect();
                (name, sorted)
            })
            .unzip();

        Ok(Self {
            index: order.iter().map(|&i| index[i]).collect(),
            columns: names,
            data,
        })
    }

    /// A table with an index and no columns.
    pub fn with_index(index: Vec<NaiveDate>) -> Result<Self> {
        Self::new(index, Vec::new())
    }

    /// Outer (union) join of several series on date.
    ///
    /// The index is the union of the series' indexes; a series lacking a
    /// date gets a missing cell on that row. Column order follows input order.
    pub fn outer_join(series: Vec<DateSeries>) -> Result<Self> {
        {
            let mut labels = HashSet::with_capacity(series.len());
            for s in &series {
                if !labels.insert(s.name.as_str()) {
                    return Err(AnalysisError::invalid(format!(
                        "duplicate column '{}'",
                        s.name
                    )));
                }
            }
        }

        let union: BTreeSet<NaiveDate> = series
            .iter()
            .flat_map(|s| s.index.iter().copied())
            .collect();
        let index: Vec<NaiveDate> = union.into_iter().collect();

        let mut columns = Vec::with_capacity(series.len());
        let mut data = Vec::with_capacity(series.len());
        for s in series {
            // Both indexes ascend, so a merge walk aligns them.
            let mut cells = Vec::with_capacity(index.len());
            let mut j = 0;
            for date in &index {
                if j < s.index.len() && s.index[j] == *date {
                    cells.push(s.values[j]);
                    j += 1;
                } else {
                    cells.push(None);
                }
            }
            columns.push(s.name);
            data.push(cells);
        }

        Ok(Self {
            index,
            columns,
            data,
        })
    }

    /// Inner join with `series` on date, appending it as the last column.
    pub fn inner_join(&self, series: &DateSeries) -> Result<Self> {
        if self.column(series.name.as_str()).is_some() {
            return Err(AnalysisError::invalid(format!(
                "column '{}' already present",
                series.name
            )));
        }

        let rows: Vec<(usize, usize)> = self
            .index
            .iter()
            .enumerate()
            .filter_map(|(i, d)| series.index.binary_search(d).ok().map(|j| (i, j)))
            .collect();

        let index = rows.iter().map(|&(i, _)| self.index[i]).collect();
        let mut data: Vec<Vec<Option<f64>>> = self
            .data
            .iter()
            .map(|col| rows.iter().map(|&(i, _)| col[i]).collect())
            .collect();
        data.push(rows.iter().map(|&(_, j)| series.values[j]).collect());

        let mut columns = self.columns.clone();
        columns.push(series.name.clone());

        Ok(Self {
            index,
            columns,
            data,
        })
    }

    pub fn index(&self) -> &[NaiveDate] {
        &self.index
    }

    pub fn columns(&self) -> &[ColumnName] {
        &self.columns
    }

    pub fn height(&self) -> usize {
        self.index.len()
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.as_str() == name)
    }

    /// Cells of column `name`, if present.
    pub fn column(&self, name: &str) -> Option<&[Option<f64>]> {
        self.position(name).map(|i| self.data[i].as_slice())
    }

    /// Like [`column`](Self::column) but an absent label is an error.
    pub fn require_column(&self, name: &str) -> Result<&[Option<f64>]> {
        self.column(name)
            .ok_or_else(|| AnalysisError::invalid(format!("column '{name}' not found")))
    }

    /// Column `name` as a standalone series.
    pub fn series(&self, name: &str) -> Result<DateSeries> {
        let pos = self
            .position(name)
            .ok_or_else(|| AnalysisError::invalid(format!("column '{name}' not found")))?;
        Ok(DateSeries {
            name: self.columns[pos].clone(),
            index: self.index.clone(),
            values: self.data[pos].clone(),
        })
    }

    /// Cell at (`date`, `name`); `None` when absent or missing.
    pub fn value(&self, date: NaiveDate, name: &str) -> Option<f64> {
        let row = self.index.binary_search(&date).ok()?;
        self.column(name).and_then(|c| c[row])
    }

    /// Cells of row `i` in column order.
    pub fn row(&self, i: usize) -> impl Iterator<Item = Option<f64>> + '_ {
        self.data.iter().map(move |col| col[i])
    }

    /// Same table restricted to the listed columns, in the listed order.
    pub fn select(&self, names: &[ColumnName]) -> Result<Self> {
        let mut seen = HashSet::with_capacity(names.len());
        let mut data = Vec::with_capacity(names.len());
        for name in names {
            if !seen.insert(name.as_str()) {
                return Err(AnalysisError::invalid(format!("duplicate column '{name}'")));
            }
            data.push(self.require_column(name.as_str())?.to_vec());
        }
        Ok(Self {
            index: self.index.clone(),
            columns: names.to_vec(),
            data,
        })
    }

    /// Same table without column `name` (unchanged if absent).
    pub fn drop_column(&self, name: &str) -> Self {
        let (columns, data) = self
            .columns
            .iter()
            .zip(&self.data)
            .filter(|(c, _)| c.as_str() != name)
            .map(|(c, d)| (c.clone(), d.clone()))
            .unzip();
        Self {
            index: self.index.clone(),
            columns,
            data,
        }
    }

    /// Rows whose date satisfies `keep`.
    pub fn filter_dates(&self, keep: impl Fn(NaiveDate) -> bool) -> Self {
        let rows: Vec<usize> = (0..self.index.len())
            .filter(|&i| keep(self.index[i]))
            .collect();
        Self {
            index: rows.iter().map(|&i| self.index[i]).collect(),
            columns: self.columns.clone(),
            data: self
                .data
                .iter()
                .map(|col| rows.iter().map(|&i| col[i]).collect())
                .collect(),
        }
    }

    /// Non-missing cell count of column `name`.
    pub fn non_missing_count(&self, name: &str) -> Option<usize> {
        self.column(name)
            .map(|c| c.iter().filter(|v| v.is_some()).count())
    }

    /// BLAKE3 digest over labels, dates and cells.
    ///
    /// Identical tables always hash identically; missing cells hash to a
    /// marker distinct from every finite value.
    pub fn content_hash(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        for name in &self.columns {
            hasher.update(name.as_str().as_bytes());
            hasher.update(&[0]);
        }
        for (i, date) in self.index.iter().enumerate() {
            hasher.update(date.to_string().as_bytes());
            for col in &self.data {
                match col[i] {
                    Some(v) => {
                        hasher.update(&[1]);
                        hasher.update(&v.to_le_bytes());
                    }
                    None => {
                        hasher.update(&[0]);
                    }
                }
            }
        }
        hasher.finalize().to_hex().to_string()
    }
}

fn clean(v: Option<f64>) -> Option<f64> {
    v.filter(|x| !x.is_nan())
}

/// Permutation that sorts `index` ascending; fails on duplicates.
fn sort_order(index: &[NaiveDate]) -> Result<Vec<usize>> {
    let mut order: Vec<usize> = (0..index.len()).collect();
    order.sort_by_key(|&i| index[i]);
    if let Some(w) = order.windows(2).find(|w| index[w[0]] == index[w[1]]) {
        return Err(AnalysisError::invalid(format!(
            "duplicate date {} in index",
            index[w[0]]
        )));
    }
    Ok(order)
}
