use std::io::Write;

use crate::constants::is_null_marker;
use crate::metric::{Metric, ScoreSet};

use super::error::{TableError, TableResult};

#[derive(Debug, Clone, PartialEq)]
/// The input dataset, read once and never modified.
pub struct SourceTable {
    headers: Vec<String>,
    records: Vec<Vec<String>>,
    subject_index: usize,
}

impl SourceTable {
    /// Builds a table whose subject column is `headers[subject_index]`.
    pub fn new(headers: Vec<String>, records: Vec<Vec<String>>, subject_index: usize) -> Self {
        Self {
            headers,
            records,
            subject_index,
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn records(&self) -> &[Vec<String>] {
        &self.records
    }

    pub fn subject_column(&self) -> &str {
        &self.headers[self.subject_index]
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Subject text at `index`, or `None` when the cell is empty or a null marker.
    pub fn subject(&self, index: usize) -> Option<&str> {
        self.records
            .get(index)
            .and_then(|r| r.get(self.subject_index))
            .map(String::as_str)
            .filter(|v| !is_null_marker(v))
    }

    /// Subject text of every row, in ordinal order.
    pub fn subjects(&self) -> Vec<Option<String>> {
        (0..self.len())
            .map(|i| self.subject(i).map(str::to_string))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
/// One row of the result table: passthrough cells plus its scores.
pub struct Row {
    pub fields: Vec<String>,
    pub scores: ScoreSet,
}

#[derive(Debug, Clone, PartialEq)]
/// Source rows augmented with one [`ScoreSet`] each, in source order.
pub struct ResultTable {
    headers: Vec<String>,
    metrics: Vec<Metric>,
    rows: Vec<Row>,
}

impl ResultTable {
    pub fn new(headers: Vec<String>, metrics: Vec<Metric>, rows: Vec<Row>) -> Self {
        Self {
            headers,
            metrics,
            rows,
        }
    }

    /// Copies `source` and gives every row an all-null score set.
    ///
    /// Source columns that collide with a configured metric column are replaced by it.
    pub fn fresh(source: &SourceTable, metrics: &[Metric]) -> Self {
        let metric_columns: Vec<String> = metrics.iter().map(Metric::column_name).collect();
        let keep: Vec<usize> = source
            .headers()
            .iter()
            .enumerate()
            .filter(|(_, h)| !metric_columns.contains(h))
            .map(|(i, _)| i)
            .collect();

        let headers = keep.iter().map(|&i| source.headers()[i].clone()).collect();
        let rows = source
            .records()
            .iter()
            .map(|record| Row {
                fields: keep
                    .iter()
                    .map(|&i| record.get(i).cloned().unwrap_or_default())
                    .collect(),
                scores: ScoreSet::empty(metrics),
            })
            .collect();

        Self::new(headers, metrics.to_vec(), rows)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn metrics(&self) -> &[Metric] {
        &self.metrics
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Passthrough headers followed by one column per configured metric.
    pub fn column_names(&self) -> Vec<String> {
        self.headers
            .iter()
            .cloned()
            .chain(self.metrics.iter().map(Metric::column_name))
            .collect()
    }

    /// Writes `scores` into row `index`, keeping exactly the configured metrics.
    ///
    /// Metrics missing from `scores` are stored as null.
    pub fn set_scores(&mut self, index: usize, scores: &ScoreSet) -> TableResult<()> {
        let len = self.rows.len();
        let row = self
            .rows
            .get_mut(index)
            .ok_or(TableError::RowOutOfRange { index, len })?;
        row.scores = ScoreSet::from_entries(self.metrics.iter().map(|m| (*m, scores.get(*m))));
        Ok(())
    }

    /// One past the last row whose scores are all present; 0 if there is none.
    pub fn resume_cursor(&self) -> usize {
        self.rows
            .iter()
            .rposition(|r| r.scores.is_complete())
            .map_or(0, |i| i + 1)
    }

    /// Rows before `cursor` that still have a null score.
    pub fn incomplete_before(&self, cursor: usize) -> usize {
        self.rows
            .iter()
            .take(cursor)
            .filter(|r| !r.scores.is_complete())
            .count()
    }

    /// Mean of the non-null scores for `metric`.
    pub fn metric_mean(&self, metric: Metric) -> Option<f64> {
        let (sum, count) = self
            .rows
            .iter()
            .filter_map(|r| r.scores.get(metric))
            .fold((0.0, 0usize), |(sum, n), s| (sum + s, n + 1));
        (count > 0).then(|| sum / count as f64)
    }

    /// Serialises the table as CSV (header row first, nulls as empty cells).
    pub fn write_csv<W: Write>(&self, writer: W) -> TableResult<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(self.column_names())?;

        for row in &self.rows {
            let scores = self.metrics.iter().map(|m| {
                row.scores
                    .get(*m)
                    .map(|s| s.to_string())
                    .unwrap_or_default()
            });
            let record: Vec<String> = row.fields.iter().cloned().chain(scores).collect();
            csv.write_record(&record)?;
        }

        csv.flush().map_err(csv::Error::from)?;
        Ok(())
    }

    pub fn to_csv_bytes(&self) -> TableResult<Vec<u8>> {
        let mut buf = Vec::new();
        self.write_csv(&mut buf)?;
        Ok(buf)
    }
}
