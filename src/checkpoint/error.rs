use std::path::PathBuf;
use thiserror::Error;

use crate::table::TableError;

/// Failure to persist progress. Threatens resumability, so it is always surfaced.
#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("failed to serialise result table: {0}")]
    Serialize(#[from] TableError),

    #[error("failed to write checkpoint {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Raised by test doubles.
    #[error("checkpoint rejected: {0}")]
    Rejected(String),
}

pub type CheckpointResult<T> = Result<T, CheckpointError>;
