use std::time::Duration;

use crate::constants::{
    DEFAULT_CHECKPOINT_INTERVAL, DEFAULT_CONCURRENCY, DEFAULT_INTER_BATCH_DELAY,
};

use super::error::{SchedulerError, SchedulerResult};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Pacing and checkpoint cadence of a run.
pub struct SchedulerConfig {
    /// Maximum rows per batch; every row of a batch is scored concurrently.
    pub concurrency: usize,
    /// Pause between consecutive batches (none after the last).
    pub inter_batch_delay: Duration,
    /// Flush after every this many cumulative rows.
    pub checkpoint_interval: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            inter_batch_delay: DEFAULT_INTER_BATCH_DELAY,
            checkpoint_interval: DEFAULT_CHECKPOINT_INTERVAL,
        }
    }
}

impl SchedulerConfig {
    pub fn new(concurrency: usize, inter_batch_delay: Duration, checkpoint_interval: usize) -> Self {
        Self {
            concurrency,
            inter_batch_delay,
            checkpoint_interval,
        }
    }

    pub fn validate(&self) -> SchedulerResult<()> {
        if self.concurrency == 0 {
            return Err(SchedulerError::InvalidConfig {
                reason: "concurrency must be at least 1".to_string(),
            });
        }
        if self.checkpoint_interval == 0 {
            return Err(SchedulerError::InvalidConfig {
                reason: "checkpoint interval must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Approximate upper bound on dispatch rate, ignoring call latency.
    pub fn max_rows_per_minute(&self) -> Option<f64> {
        let secs = self.inter_batch_delay.as_secs_f64();
        (secs > 0.0).then(|| 60.0 / secs * self.concurrency as f64)
    }
}
