use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, error};

use crate::constants::is_null_marker;
use crate::metric::{Metric, ScoreSet};

use super::backend::ScoringBackend;
use super::retry::RetryPolicy;
use super::wire::AnalyzeRequest;

#[derive(Debug, Default)]
/// Counters updated by concurrent [`Annotator::score`] calls.
pub struct AnnotatorStats {
    calls: AtomicU64,
    retries: AtomicU64,
    scored: AtomicU64,
    failed: AtomicU64,
    skipped: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Point-in-time copy of [`AnnotatorStats`].
pub struct AnnotatorStatsSnapshot {
    /// Remote calls issued, retries included.
    pub calls: u64,
    /// Calls that were retries of a failed attempt.
    pub retries: u64,
    /// Rows that received scores.
    pub scored: u64,
    /// Rows that exhausted every attempt.
    pub failed: u64,
    /// Rows with empty or null subject text (no call made).
    pub skipped: u64,
}

impl AnnotatorStats {
    pub fn snapshot(&self) -> AnnotatorStatsSnapshot {
        // Relaxed: independent counters, read for reporting only.
        AnnotatorStatsSnapshot {
            calls: self.calls.load(Ordering::Relaxed),
            retries: self.retries.load(Ordering::Relaxed),
            scored: self.scored.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
        }
    }

    fn incr(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// Scores one subject text per call, absorbing every remote failure.
pub struct Annotator {
    backend: Arc<dyn ScoringBackend>,
    metrics: Vec<Metric>,
    language: String,
    retry: RetryPolicy,
    stats: AnnotatorStats,
}

impl std::fmt::Debug for Annotator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Annotator")
            .field("metrics", &self.metrics)
            .field("language", &self.language)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl Annotator {
    pub fn new(
        backend: Arc<dyn ScoringBackend>,
        metrics: Vec<Metric>,
        language: impl Into<String>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            backend,
            metrics,
            language: language.into(),
            retry,
            stats: AnnotatorStats::default(),
        }
    }

    pub fn stats(&self) -> AnnotatorStatsSnapshot {
        self.stats.snapshot()
    }

    /// Scores `text` for every configured metric.
    ///
    /// Empty or null text yields all-null scores without a remote call, as does a call
    /// that fails on every attempt. This never returns an error.
    pub async fn score(&self, text: Option<&str>) -> ScoreSet {
        let text = match text {
            Some(t) if !is_null_marker(t) => t,
            _ => {
                AnnotatorStats::incr(&self.stats.skipped);
                return ScoreSet::empty(&self.metrics);
            }
        };

        let request = AnalyzeRequest::new(text, &self.metrics, &self.language);

        let result = self
            .retry
            .execute("analyze", |attempt| {
                AnnotatorStats::incr(&self.stats.calls);
                if attempt > 0 {
                    AnnotatorStats::incr(&self.stats.retries);
                }
                let request = &request;
                async move {
                    let response = self.backend.analyze(request).await?;
                    response.score_set(&self.metrics)
                }
            })
            .await;

        match result {
            Ok(scores) => {
                AnnotatorStats::incr(&self.stats.scored);
                debug!(text_len = text.len(), "Scored text");
                scores
            }
            Err(e) => {
                AnnotatorStats::incr(&self.stats.failed);
                error!(
                    attempts = self.retry.max_attempts(),
                    backoff_ms = self.retry.total_backoff().as_millis() as u64,
                    error = %e,
                    "Scoring failed after all attempts, recording null scores"
                );
                ScoreSet::empty(&self.metrics)
            }
        }
    }
}
