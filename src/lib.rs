//! Perspective batch library crate (used by the binary and integration tests).
//!
//! # Public API Surface
//!
//! ## Run
//! - [`Config`], [`ConfigError`] - Environment-backed run configuration
//! - [`Pipeline`], [`RunReport`], [`RunOutcome`] - Load, resume, schedule, summarize
//! - [`ShutdownSignal`] - Cooperative stop on Ctrl+C / SIGTERM
//!
//! ## Scoring
//! - [`Metric`], [`ScoreSet`] - Attribute catalogue and per-row scores
//! - [`Annotator`], [`RetryPolicy`] - One retried remote call per row
//! - [`ScoringBackend`], [`PerspectiveClient`] - The remote seam and its HTTP implementation
//!
//! ## Persistence
//! - [`SourceTable`], [`ResultTable`], [`load`] - CSV row store and resume cursor
//! - [`Checkpointer`], [`CsvCheckpointWriter`] - Atomic progress flushes
//! - [`BatchScheduler`], [`SchedulerConfig`] - Concurrency, pacing and checkpoint cadence
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod checkpoint;
pub mod client;
pub mod config;
pub mod constants;
pub mod lifecycle;
pub mod metric;
pub mod pipeline;
pub mod scheduler;
pub mod table;

pub use checkpoint::{CheckpointError, CheckpointResult, Checkpointer, CsvCheckpointWriter};
#[cfg(any(test, feature = "mock"))]
pub use checkpoint::RecordingCheckpointer;

pub use client::{
    AnalyzeRequest, AnalyzeResponse, Annotator, AnnotatorStatsSnapshot, CallError, CallResult,
    PerspectiveClient, RetryPolicy, ScoringBackend,
};
#[cfg(any(test, feature = "mock"))]
pub use client::MockScoringBackend;

pub use config::{Config, ConfigError};
pub use lifecycle::ShutdownSignal;
pub use metric::{Metric, ScoreSet, UnknownMetric};
pub use pipeline::{Pipeline, PipelineError, PipelineResult, RunOutcome, RunReport};
pub use scheduler::{
    BatchScheduler, SchedulerConfig, SchedulerError, SchedulerOutcome, SchedulerStatus,
};
pub use table::{LoadedTables, ResultTable, Row, SourceTable, TableError, TableResult, load};
