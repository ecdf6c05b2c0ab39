use std::sync::Arc;

use futures_util::future::join_all;
use tracing::{debug, info};

use crate::checkpoint::Checkpointer;
use crate::client::Annotator;
use crate::lifecycle::ShutdownSignal;
use crate::table::ResultTable;

use super::config::SchedulerConfig;
use super::error::{SchedulerError, SchedulerResult};
use super::types::{SchedulerOutcome, SchedulerStatus};

/// Drives annotation over the unprocessed tail of a table, batch by batch.
pub struct BatchScheduler {
    annotator: Arc<Annotator>,
    checkpointer: Arc<dyn Checkpointer>,
    config: SchedulerConfig,
    shutdown: ShutdownSignal,
}

impl BatchScheduler {
    pub fn new(
        annotator: Arc<Annotator>,
        checkpointer: Arc<dyn Checkpointer>,
        config: SchedulerConfig,
        shutdown: ShutdownSignal,
    ) -> Self {
        Self {
            annotator,
            checkpointer,
            config,
            shutdown,
        }
    }

    /// Scores `subjects[cursor..]` into `table`, writing each result at its row index.
    ///
    /// Batches run strictly in order; the rows of one batch are scored concurrently and
    /// joined before write-back. The table is flushed whenever the cumulative row count
    /// crosses a multiple of the checkpoint interval, and once more after the last
    /// batch. If shutdown is requested, the in-flight batch finishes and the run returns
    /// [`SchedulerStatus::Interrupted`] without a final flush.
    pub async fn run(
        &self,
        table: &mut ResultTable,
        subjects: &[Option<String>],
        cursor: usize,
    ) -> SchedulerResult<SchedulerOutcome> {
        self.config.validate()?;

        if subjects.len() != table.len() {
            return Err(SchedulerError::LengthMismatch {
                subjects: subjects.len(),
                rows: table.len(),
            });
        }
        if cursor > subjects.len() {
            return Err(SchedulerError::CursorOutOfRange {
                cursor,
                len: subjects.len(),
            });
        }

        let pending = &subjects[cursor..];
        let total = pending.len();
        let mut outcome = SchedulerOutcome {
            status: SchedulerStatus::Completed,
            start_index: cursor,
            processed: 0,
            batches: 0,
            flushes: 0,
            unscored: 0,
        };

        if total == 0 {
            info!(cursor, "Nothing to process");
            return Ok(outcome);
        }

        info!(
            start = cursor,
            total,
            concurrency = self.config.concurrency,
            delay_ms = self.config.inter_batch_delay.as_millis() as u64,
            checkpoint_interval = self.config.checkpoint_interval,
            max_rows_per_minute = ?self.config.max_rows_per_minute(),
            "Processing rows"
        );

        let interval = self.config.checkpoint_interval;

        for (batch_no, batch) in pending.chunks(self.config.concurrency).enumerate() {
            if self.shutdown.is_triggered() {
                info!(
                    next_index = outcome.next_index(),
                    "Shutdown requested, not dispatching further batches"
                );
                outcome.status = SchedulerStatus::Interrupted;
                return Ok(outcome);
            }

            let first = cursor + batch_no * self.config.concurrency;
            let results = join_all(batch.iter().enumerate().map(|(offset, text)| {
                let index = first + offset;
                let annotator = &self.annotator;
                async move { (index, annotator.score(text.as_deref()).await) }
            }))
            .await;

            for (index, scores) in &results {
                if !scores.is_complete() {
                    outcome.unscored += 1;
                }
                table.set_scores(*index, scores)?;
            }

            let before = outcome.processed;
            outcome.processed += batch.len();
            outcome.batches += 1;
            debug!(
                batch = batch_no,
                first,
                size = batch.len(),
                processed = outcome.processed,
                "Batch complete"
            );

            if outcome.processed / interval > before / interval {
                self.checkpointer.flush(table).await?;
                outcome.flushes += 1;
                info!(
                    processed = outcome.processed,
                    total,
                    next_index = outcome.next_index(),
                    "Progress saved"
                );
            }

            let is_last = outcome.processed == total;
            if !is_last && !self.config.inter_batch_delay.is_zero() {
                tokio::select! {
                    _ = tokio::time::sleep(self.config.inter_batch_delay) => {}
                    _ = self.shutdown.triggered() => {}
                }
            }
        }

        self.checkpointer.flush(table).await?;
        outcome.flushes += 1;
        info!(
            processed = outcome.processed,
            unscored = outcome.unscored,
            "All rows processed"
        );

        Ok(outcome)
    }
}
