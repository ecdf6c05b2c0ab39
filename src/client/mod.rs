//! Annotation client: one remote scoring call per subject text.
//!
//! [`Annotator`] wraps a [`ScoringBackend`] with a [`RetryPolicy`]. Remote failures are
//! retried with exponential backoff and, once attempts run out, turn into an all-null
//! [`ScoreSet`](crate::metric::ScoreSet) so the run keeps moving row by row.

mod annotator;
mod backend;
pub mod error;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod retry;
pub mod wire;


pub use annotator::{Annotator, AnnotatorStats, AnnotatorStatsSnapshot};
pub use backend::{PerspectiveClient, ScoringBackend};
pub use error::{CallError, CallResult};
#[cfg(any(test, feature = "mock"))]
pub use mock::MockScoringBackend;
pub use retry::RetryPolicy;
pub use wire::{AnalyzeRequest, AnalyzeResponse, truncate_chars};
