use thiserror::Error;

use crate::metric::Metric;

/// A single failed call to the scoring service.
///
/// Every variant is treated as transient: the [`Annotator`](super::Annotator) retries it
/// and, once attempts run out, records null scores instead of propagating it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CallError {
    /// Connection, TLS or timeout failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// The service answered with a non-success status (rate limit, validation, ...).
    #[error("service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The body could not be decoded.
    #[error("malformed response: {reason}")]
    MalformedResponse { reason: String },

    /// A requested metric has no summary score in the response.
    #[error("response has no score for {metric}")]
    MissingMetric { metric: Metric },

    /// A summary score is not a finite value in `[0, 1]`.
    #[error("score {value} for {metric} is outside [0, 1]")]
    ScoreOutOfRange { metric: Metric, value: f64 },
}

pub type CallResult<T> = Result<T, CallError>;
