//! Plain-text rendering of tables, series and scalars for inspection.
//!
//! Purely presentational; nothing here feeds back into the analysis.

use crate::table::{DateSeries, TimeSeriesTable};
use std::fmt::Write as _;

/// Rendering options.
#[derive(Debug, Clone)]
pub struct PrettyPrinter {
    /// Character repeated to form the separator lines.
    pub sep_char: char,
    /// Separator line width.
    pub sep_width: usize,
    /// Show at most this many rows (head and tail, elided middle).
    pub max_rows: Option<usize>,
    /// Append an info block: row count, date range, non-missing counts.
    pub show_info: bool,
    /// Decimal places for cells.
    pub float_precision: usize,
}

impl Default for PrettyPrinter {
    fn default() -> Self {
        Self {
            sep_char: '-',
            sep_width: 40,
            max_rows: Some(20),
            show_info: true,
            float_precision: 6,
        }
    }
}

impl PrettyPrinter {
    fn separator(&self) -> String {
        std::iter::repeat(self.sep_char).take(self.sep_width).collect()
    }

    fn frame(&self, body: &str, msg: Option<&str>) -> String {
        let sep = self.separator();
        let mut out = String::new();
        let _ = writeln!(out, "{sep}");
        if let Some(m) = msg {
            let _ = writeln!(out, "{m}\n");
        }
        let _ = writeln!(out, "{}", body.trim_end());
        let _ = write!(out, "{sep}");
        out
    }

    fn cell(&self, v: Option<f64>) -> String {
        match v {
            Some(x) => format!("{x:.prec$}", prec = self.float_precision),
            None => "NaN".to_string(),
        }
    }

    /// Row indices to show, with `None` marking the elided gap.
    fn visible_rows(&self, height: usize) -> Vec<Option<usize>> {
        match self.max_rows {
            Some(max) if height > max && max >= 2 => {
                let head = max / 2;
                let tail = max - head;
                (0..head)
                    .map(Some)
                    .chain(std::iter::once(None))
                    .chain((height - tail..height).map(Some))
                    .collect()
            }
            _ => (0..height).map(Some).collect(),
        }
    }

    /// Render a table: a `Date` column followed by every data column.
    pub fn format_table(&self, table: &TimeSeriesTable, msg: Option<&str>) -> String {
        let mut header = vec!["Date".to_string()];
        header.extend(table.columns().iter().map(|c| c.to_string()));

        let mut rows: Vec<Vec<String>> = Vec::new();
        for slot in self.visible_rows(table.height()) {
            match slot {
                Some(i) => {
                    let mut row = vec![table.index()[i].to_string()];
                    row.extend(table.row(i).map(|v| self.cell(v)));
                    rows.push(row);
                }
                None => rows.push(vec!["...".to_string(); header.len()]),
            }
        }

        let widths: Vec<usize> = (0..header.len())
            .map(|j| {
                rows.iter()
                    .map(|r| r[j].len())
                    .chain(std::iter::once(header[j].len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut body = String::new();
        let render = |cells: &[String], out: &mut String| {
            let line: Vec<String> = cells
                .iter()
                .zip(&widths)
                .enumerate()
                .map(|(j, (c, w))| {
                    if j == 0 {
                        format!("{c:<w$}")
                    } else {
                        format!("{c:>w$}")
                    }
                })
                .collect();
            let _ = writeln!(out, "{}", line.join("  "));
        };
        render(&header, &mut body);
        for row in &rows {
            render(row, &mut body);
        }

        if self.show_info {
            body.push('\n');
            body.push_str(&self.table_info(table));
        }
        self.frame(&body, msg)
    }

    /// Row count, date range and per-column non-missing counts.
    pub fn table_info(&self, table: &TimeSeriesTable) -> String {
        let mut out = String::new();
        match (table.index().first(), table.index().last()) {
            (Some(first), Some(last)) => {
                let _ = writeln!(out, "Index: {} entries, {first} to {last}", table.height());
            }
            _ => {
                let _ = writeln!(out, "Index: 0 entries");
            }
        }
        let _ = writeln!(out, "Columns (total {}):", table.width());
        for (i, name) in table.columns().iter().enumerate() {
            let count = table.non_missing_count(name.as_str()).unwrap_or(0);
            let _ = writeln!(out, " {i:>2}  {:<12} {count} non-missing", name.as_str());
        }
        out
    }

    pub fn format_series(&self, series: &DateSeries, msg: Option<&str>) -> String {
        self.format_table(&series.clone().into_table(), msg)
    }

    pub fn format_scalar(&self, value: f64, msg: Option<&str>) -> String {
        let body = if value.is_nan() {
            "NaN".to_string()
        } else {
            format!("{value:.prec$}", prec = self.float_precision)
        };
        self.frame(&body, msg)
    }

    pub fn format_text(&self, text: &str, msg: Option<&str>) -> String {
        self.frame(text, msg)
    }
}
