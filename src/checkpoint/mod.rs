//! Durable flushes of the in-progress result table.

pub mod error;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod writer;


pub use error::{CheckpointError, CheckpointResult};
#[cfg(any(test, feature = "mock"))]
pub use mock::RecordingCheckpointer;
pub use writer::{Checkpointer, CsvCheckpointWriter};
