//! End-to-end run: load, resume, schedule, persist, summarize.
//!
//! The pipeline owns the exit policy around [`BatchScheduler`]:
//!
//! - a schema problem in the input or result file fails before any remote call;
//! - an already complete result file is left untouched;
//! - an interrupted run is flushed exactly once before returning;
//! - a failed run still attempts one last flush so finished rows survive.

pub mod error;
mod report;


pub use error::{PipelineError, PipelineResult};
pub use report::{RunOutcome, RunReport};

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::checkpoint::{Checkpointer, CsvCheckpointWriter};
use crate::client::{Annotator, PerspectiveClient, ScoringBackend};
use crate::config::Config;
use crate::lifecycle::ShutdownSignal;
use crate::scheduler::{BatchScheduler, SchedulerStatus};
use crate::table;

/// One configured annotation run over a single input file.
pub struct Pipeline {
    config: Config,
    backend: Arc<dyn ScoringBackend>,
    checkpointer: Arc<dyn Checkpointer>,
    shutdown: ShutdownSignal,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("config", &self.config)
            .field("shutdown_requested", &self.shutdown.is_triggered())
            .finish_non_exhaustive()
    }
}

impl Pipeline {
    pub fn new(
        config: Config,
        backend: Arc<dyn ScoringBackend>,
        checkpointer: Arc<dyn Checkpointer>,
        shutdown: ShutdownSignal,
    ) -> Self {
        Self {
            config,
            backend,
            checkpointer,
            shutdown,
        }
    }

    /// Validates `config` and wires the HTTP client and the CSV checkpoint writer.
    pub fn from_config(config: Config, shutdown: ShutdownSignal) -> PipelineResult<Self> {
        config.validate()?;

        let api_key = config.api_key.clone().unwrap_or_default();
        let client = PerspectiveClient::new(
            config.endpoint.clone(),
            api_key,
            config.request_timeout,
        )
        .map_err(PipelineError::Client)?;
        let checkpointer = CsvCheckpointWriter::new(config.result_path());
        debug!(
            endpoint = client.endpoint(),
            result = %checkpointer.path().display(),
            "Pipeline wired"
        );

        Ok(Self::new(
            config,
            Arc::new(client),
            Arc::new(checkpointer),
            shutdown,
        ))
    }

    pub async fn run(&self) -> PipelineResult<RunReport> {
        let result_path = self.config.result_path();

        tokio::fs::create_dir_all(&self.config.result_dir)
            .await
            .map_err(|source| PipelineError::ResultDir {
                path: self.config.result_dir.clone(),
                source,
            })?;

        let loaded = {
            let input_path = self.config.input_path.clone();
            let result_path = result_path.clone();
            let subject_column = self.config.subject_column.clone();
            let metrics = self.config.metrics.clone();
            tokio::task::spawn_blocking(move || {
                table::load(&input_path, &result_path, &subject_column, &metrics)
            })
            .await??
        };
        let cursor = loaded.cursor;
        let subjects = loaded.source.subjects();
        let mut result = loaded.result;

        let annotator = Arc::new(Annotator::new(
            self.backend.clone(),
            self.config.metrics.clone(),
            self.config.language.clone(),
            self.config.retry_policy(),
        ));

        let mut report = RunReport {
            outcome: RunOutcome::AlreadyComplete,
            result_path,
            total_rows: result.len(),
            start_index: cursor,
            processed: 0,
            unscored: 0,
            flushes: 0,
            stats: annotator.stats(),
            means: Vec::new(),
        };

        if cursor >= result.len() {
            info!(total = result.len(), "All texts have been analyzed already");
            report.means = RunReport::means_of(&result);
            return Ok(report);
        }

        let scheduler = BatchScheduler::new(
            annotator.clone(),
            self.checkpointer.clone(),
            self.config.scheduler_config(),
            self.shutdown.clone(),
        );

        let outcome = match scheduler.run(&mut result, &subjects, cursor).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(error = %e, "Run failed, attempting a final checkpoint");
                if let Err(flush_err) = self.checkpointer.flush(&result).await {
                    error!(error = %flush_err, "Final checkpoint failed");
                }
                return Err(e.into());
            }
        };

        report.processed = outcome.processed;
        report.unscored = outcome.unscored;
        report.flushes = outcome.flushes;

        match outcome.status {
            SchedulerStatus::Completed => {
                report.outcome = RunOutcome::Completed;
            }
            SchedulerStatus::Interrupted => {
                self.checkpointer.flush(&result).await?;
                report.flushes += 1;
                report.outcome = RunOutcome::Interrupted;
                warn!(
                    next_index = outcome.next_index(),
                    "Interrupted; progress saved, rerun to resume"
                );
            }
        }

        report.stats = annotator.stats();
        report.means = RunReport::means_of(&result);

        info!(
            processed = report.processed,
            unscored = report.unscored,
            calls = report.stats.calls,
            retries = report.stats.retries,
            "Run finished"
        );

        Ok(report)
    }
}
