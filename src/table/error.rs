use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or reconciling tables.
#[derive(Debug, Error)]
pub enum TableError {
    /// The configured subject column is absent from the source table.
    #[error("column '{column}' not found in {path}; available columns: {available:?}")]
    MissingSubjectColumn {
        column: String,
        path: PathBuf,
        available: Vec<String>,
    },

    /// The source table does not exist.
    #[error("source table not found: {path}")]
    SourceNotFound { path: PathBuf },

    /// The file could not be read or parsed as CSV.
    #[error("failed to read {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// An existing result table disagrees with the source on row count.
    #[error("result table {path} has {actual} rows but the source has {expected}")]
    RowCountMismatch {
        path: PathBuf,
        expected: usize,
        actual: usize,
    },

    /// A score cell held something other than a number or a null marker.
    #[error("invalid score '{value}' in column '{column}' at row {row}")]
    InvalidScore {
        row: usize,
        column: String,
        value: String,
    },

    /// A write-back targeted a row past the end of the table.
    #[error("row index {index} out of range (table has {len} rows)")]
    RowOutOfRange { index: usize, len: usize },

    /// Serialising the table failed.
    #[error("failed to serialise table: {0}")]
    Serialize(#[from] csv::Error),
}

pub type TableResult<T> = Result<T, TableError>;
