use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::constants::{RESULT_FILE_SUFFIX, is_null_marker};
use crate::metric::{Metric, ScoreSet};

use super::error::{TableError, TableResult};
use super::model::{ResultTable, Row, SourceTable};

#[derive(Debug, Clone)]
/// Everything a run needs to start: the source, the result to fill, and where to resume.
pub struct LoadedTables {
    pub source: SourceTable,
    pub result: ResultTable,
    pub cursor: usize,
    /// `true` if `result` was read from an existing file.
    pub resumed: bool,
}

/// Derives `<result_dir>/<input-stem>_result.csv`.
pub fn result_path_for(input: &Path, result_dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "input".to_string());
    result_dir.join(format!("{stem}{RESULT_FILE_SUFFIX}"))
}

/// Loads the source table and the (possibly pre-existing) result table.
pub fn load(
    source_path: &Path,
    result_path: &Path,
    subject_column: &str,
    metrics: &[Metric],
) -> TableResult<LoadedTables> {
    let source = read_source(source_path, subject_column)?;

    let (result, resumed) = if result_path.exists() {
        info!(path = %result_path.display(), "Found existing result file");
        (read_result(result_path, &source, metrics)?, true)
    } else {
        info!(path = %result_path.display(), "Creating new result table");
        (ResultTable::fresh(&source, metrics), false)
    };

    let cursor = result.resume_cursor();
    if resumed {
        info!(cursor, total = result.len(), "Resuming from index {cursor}");

        let holes = result.incomplete_before(cursor);
        if holes > 0 {
            warn!(
                holes,
                cursor, "Rows before the resume cursor still have null scores and will be skipped"
            );
        }
    }

    Ok(LoadedTables {
        source,
        result,
        cursor,
        resumed,
    })
}

fn read_csv(path: &Path) -> TableResult<(Vec<String>, Vec<Vec<String>>)> {
    let csv_err = |source| TableError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(csv_err)?;

    let headers = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(str::to_string)
        .collect();

    let records = reader
        .records()
        .map(|r| r.map(|rec| rec.iter().map(str::to_string).collect()))
        .collect::<Result<Vec<Vec<String>>, _>>()
        .map_err(csv_err)?;

    Ok((headers, records))
}

fn read_source(path: &Path, subject_column: &str) -> TableResult<SourceTable> {
    if !path.exists() {
        return Err(TableError::SourceNotFound {
            path: path.to_path_buf(),
        });
    }

    let (headers, records) = read_csv(path)?;

    let subject_index = headers
        .iter()
        .position(|h| h == subject_column)
        .ok_or_else(|| TableError::MissingSubjectColumn {
            column: subject_column.to_string(),
            path: path.to_path_buf(),
            available: headers.clone(),
        })?;

    Ok(SourceTable::new(headers, records, subject_index))
}

fn read_result(path: &Path, source: &SourceTable, metrics: &[Metric]) -> TableResult<ResultTable> {
    let (headers, records) = read_csv(path)?;

    if records.len() != source.len() {
        return Err(TableError::RowCountMismatch {
            path: path.to_path_buf(),
            expected: source.len(),
            actual: records.len(),
        });
    }

    // Configured metrics map to a column index, or None for a column not yet written.
    let mut metric_columns: Vec<(Metric, Option<usize>)> =
        metrics.iter().map(|m| (*m, None)).collect();
    let mut passthrough = Vec::new();

    for (i, header) in headers.iter().enumerate() {
        let recognised = Metric::from_column_name(header);
        let slot = recognised.and_then(|metric| {
            metric_columns
                .iter_mut()
                .find(|(m, c)| *m == metric && c.is_none())
        });
        match slot {
            Some(entry) => entry.1 = Some(i),
            None => {
                if recognised.is_some() {
                    debug!(column = %header, "Keeping score column of an unconfigured metric");
                }
                passthrough.push(i);
            }
        }
    }

    for (metric, column) in &metric_columns {
        if column.is_none() {
            info!(column = %metric.column_name(), "Adding missing metric column");
        }
    }

    let rows = records
        .iter()
        .enumerate()
        .map(|(row_idx, record)| {
            let fields = passthrough
                .iter()
                .map(|&i| record.get(i).cloned().unwrap_or_default())
                .collect();

            let mut scores = ScoreSet::empty(metrics);
            for (metric, column) in &metric_columns {
                if let Some(col) = column {
                    let cell = record.get(*col).map(String::as_str).unwrap_or_default();
                    scores.set(*metric, parse_score(row_idx, *metric, cell)?);
                }
            }

            Ok(Row { fields, scores })
        })
        .collect::<TableResult<Vec<Row>>>()?;

    let passthrough_headers = passthrough.iter().map(|&i| headers[i].clone()).collect();
    Ok(ResultTable::new(passthrough_headers, metrics.to_vec(), rows))
}

fn parse_score(row: usize, metric: Metric, cell: &str) -> TableResult<Option<f64>> {
    let cell = cell.trim();
    if is_null_marker(cell) {
        return Ok(None);
    }

    match cell.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(TableError::InvalidScore {
            row,
            column: metric.column_name(),
            value: cell.to_string(),
        }),
    }
}
