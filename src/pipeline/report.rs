use std::fmt;
use std::path::PathBuf;

use crate::client::AnnotatorStatsSnapshot;
use crate::metric::Metric;
use crate::table::ResultTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every pending row was processed.
    Completed,
    /// Stopped on request after flushing progress.
    Interrupted,
    /// The result file was already complete; nothing was processed or written.
    AlreadyComplete,
}

#[derive(Debug, Clone, PartialEq)]
/// What a pipeline run did, plus the per-metric mean over the whole table.
pub struct RunReport {
    pub outcome: RunOutcome,
    pub result_path: PathBuf,
    pub total_rows: usize,
    pub start_index: usize,
    pub processed: usize,
    pub unscored: usize,
    pub flushes: usize,
    pub stats: AnnotatorStatsSnapshot,
    pub means: Vec<(Metric, Option<f64>)>,
}

impl RunReport {
    pub(crate) fn means_of(table: &ResultTable) -> Vec<(Metric, Option<f64>)> {
        table
            .metrics()
            .iter()
            .map(|m| (*m, table.metric_mean(*m)))
            .collect()
    }

    /// First row a subsequent run would process.
    pub fn next_index(&self) -> usize {
        self.start_index + self.processed
    }

    pub fn mean(&self, metric: Metric) -> Option<f64> {
        self.means
            .iter()
            .find(|(m, _)| *m == metric)
            .and_then(|(_, v)| *v)
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = match self.outcome {
            RunOutcome::Completed => "completed",
            RunOutcome::Interrupted => "interrupted",
            RunOutcome::AlreadyComplete => "already complete",
        };
        writeln!(
            f,
            "Run {status}: {} of {} rows processed from index {} ({} without scores)",
            self.processed, self.total_rows, self.start_index, self.unscored
        )?;
        writeln!(f, "Results: {}", self.result_path.display())?;
        writeln!(f, "Statistics:")?;
        for (metric, mean) in &self.means {
            match mean {
                Some(v) => writeln!(f, "  {metric}: mean = {v:.4}")?,
                None => writeln!(f, "  {metric}: mean = n/a")?,
            }
        }
        Ok(())
    }
}
