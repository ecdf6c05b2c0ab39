//! Batch scheduler: concurrency cap, inter-batch pacing and checkpoint cadence.

mod config;
pub mod error;
mod runner;
mod types;


pub use config::SchedulerConfig;
pub use error::{SchedulerError, SchedulerResult};
pub use runner::BatchScheduler;
pub use types::{SchedulerOutcome, SchedulerStatus};
