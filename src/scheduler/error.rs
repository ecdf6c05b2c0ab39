use thiserror::Error;

use crate::checkpoint::CheckpointError;
use crate::table::TableError;

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("invalid scheduler config: {reason}")]
    InvalidConfig { reason: String },

    #[error("resume cursor {cursor} is past the end of the table ({len} rows)")]
    CursorOutOfRange { cursor: usize, len: usize },

    #[error("subject list has {subjects} rows but the result table has {rows}")]
    LengthMismatch { subjects: usize, rows: usize },

    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),
}

pub type SchedulerResult<T> = Result<T, SchedulerError>;
