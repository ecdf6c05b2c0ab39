#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// How a scheduler run ended.
pub enum SchedulerStatus {
    /// Every pending row was processed and the final flush succeeded.
    Completed,
    /// Shutdown was requested; the table was not flushed by the scheduler.
    Interrupted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Summary of one [`BatchScheduler::run`](super::BatchScheduler::run).
pub struct SchedulerOutcome {
    pub status: SchedulerStatus,
    /// Index the run started from.
    pub start_index: usize,
    /// Rows attempted (scored, failed or skipped).
    pub processed: usize,
    /// Batches dispatched.
    pub batches: usize,
    /// Flushes performed by the scheduler.
    pub flushes: usize,
    /// Processed rows whose scores are still incomplete.
    pub unscored: usize,
}

impl SchedulerOutcome {
    /// First row not processed by this run.
    pub fn next_index(&self) -> usize {
        self.start_index + self.processed
    }

    pub fn is_completed(&self) -> bool {
        self.status == SchedulerStatus::Completed
    }
}
