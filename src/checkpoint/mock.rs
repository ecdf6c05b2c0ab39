use async_trait::async_trait;
use parking_lot::Mutex;

use crate::table::ResultTable;

use super::error::{CheckpointError, CheckpointResult};
use super::writer::Checkpointer;

#[derive(Default)]
/// Keeps every flushed table in memory.
pub struct RecordingCheckpointer {
    snapshots: Mutex<Vec<ResultTable>>,
    failures_left: Mutex<usize>,
}

impl RecordingCheckpointer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The next `count` flushes fail.
    pub fn fail_next(&self, count: usize) {
        *self.failures_left.lock() = count;
    }

    pub fn flush_count(&self) -> usize {
        self.snapshots.lock().len()
    }

    pub fn snapshots(&self) -> Vec<ResultTable> {
        self.snapshots.lock().clone()
    }

    pub fn last(&self) -> Option<ResultTable> {
        self.snapshots.lock().last().cloned()
    }
}

#[async_trait]
impl Checkpointer for RecordingCheckpointer {
    async fn flush(&self, table: &ResultTable) -> CheckpointResult<()> {
        {
            let mut failures = self.failures_left.lock();
            if *failures > 0 {
                *failures -= 1;
                return Err(CheckpointError::Rejected("mock: disk full".to_string()));
            }
        }
        self.snapshots.lock().push(table.clone());
        Ok(())
    }
}
