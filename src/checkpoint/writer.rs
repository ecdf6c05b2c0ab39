use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tracing::{debug, error};

use crate::client::RetryPolicy;
use crate::constants::{FLUSH_BACKOFF_BASE, FLUSH_MAX_ATTEMPTS};
use crate::table::ResultTable;

use super::error::{CheckpointError, CheckpointResult};

const TEMP_SUFFIX: &str = "tmp";

#[async_trait]
/// Persists the full result table. Each flush replaces the previous one.
pub trait Checkpointer: Send + Sync {
    async fn flush(&self, table: &ResultTable) -> CheckpointResult<()>;
}

#[derive(Debug)]
/// Writes the table as CSV to a temp file, fsyncs it, then renames it into place.
pub struct CsvCheckpointWriter {
    path: PathBuf,
    retry: RetryPolicy,
    flushes: AtomicU64,
}

impl CsvCheckpointWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_retry(
            path,
            RetryPolicy::new(FLUSH_MAX_ATTEMPTS, FLUSH_BACKOFF_BASE),
        )
    }

    pub fn with_retry(path: impl Into<PathBuf>, retry: RetryPolicy) -> Self {
        Self {
            path: path.into(),
            retry,
            flushes: AtomicU64::new(0),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Successful flushes so far.
    pub fn flush_count(&self) -> u64 {
        self.flushes.load(Ordering::Relaxed)
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.path.with_file_name(format!("{name}.{TEMP_SUFFIX}"))
    }

    async fn write_atomic(&self, bytes: &[u8]) -> CheckpointResult<()> {
        let io_err = |source| CheckpointError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }

        let temp_path = self.temp_path();
        {
            let mut file = tokio::fs::File::create(&temp_path)
                .await
                .map_err(io_err)?;
            file.write_all(bytes).await.map_err(io_err)?;
            file.sync_all().await.map_err(io_err)?;
        }

        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(io_err)
    }
}

#[async_trait]
impl Checkpointer for CsvCheckpointWriter {
    async fn flush(&self, table: &ResultTable) -> CheckpointResult<()> {
        let bytes = table.to_csv_bytes()?;

        let result = self
            .retry
            .execute("checkpoint", |_| self.write_atomic(&bytes))
            .await;

        match result {
            Ok(()) => {
                self.flushes.fetch_add(1, Ordering::Relaxed);
                debug!(path = %self.path.display(), bytes = bytes.len(), "Checkpoint written");
                Ok(())
            }
            Err(e) => {
                error!(path = %self.path.display(), error = %e, "Checkpoint failed");
                Err(e)
            }
        }
    }
}
