use std::path::PathBuf;
use thiserror::Error;

use crate::checkpoint::CheckpointError;
use crate::client::CallError;
use crate::config::ConfigError;
use crate::scheduler::SchedulerError;
use crate::table::TableError;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    Scheduler(#[from] SchedulerError),

    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),

    #[error("failed to create scoring client: {0}")]
    Client(#[source] CallError),

    #[error("failed to create result directory {path}: {source}")]
    ResultDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("table loading task failed: {0}")]
    Load(#[from] tokio::task::JoinError),
}

pub type PipelineResult<T> = Result<T, PipelineError>;
