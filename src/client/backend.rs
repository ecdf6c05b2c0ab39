use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use tracing::debug;

use super::error::{CallError, CallResult};
use super::wire::{AnalyzeRequest, AnalyzeResponse, truncate_chars};

/// Longest error body kept in [`CallError::Status`].
const ERROR_BODY_MAX_CHARS: usize = 200;

#[async_trait]
/// One remote scoring call. Implementations must tolerate concurrent use.
pub trait ScoringBackend: Send + Sync {
    /// Sends `request` and returns the decoded response body.
    async fn analyze(&self, request: &AnalyzeRequest) -> CallResult<AnalyzeResponse>;
}

#[derive(Clone)]
/// HTTP client for the Perspective `comments:analyze` endpoint.
pub struct PerspectiveClient {
    http: HttpClient,
    endpoint: String,
    api_key: String,
}

impl std::fmt::Debug for PerspectiveClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PerspectiveClient")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"***")
            .finish()
    }
}

impl PerspectiveClient {
    /// Creates a client for `endpoint` with a per-request `timeout`.
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> CallResult<Self> {
        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CallError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ScoringBackend for PerspectiveClient {
    async fn analyze(&self, request: &AnalyzeRequest) -> CallResult<AnalyzeResponse> {
        debug!(
            text_len = request.comment.text.len(),
            attributes = request.requested_attributes.len(),
            "Sending analyze request"
        );

        let resp = self
            .http
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(request)
            .send()
            .await
            .map_err(|e| CallError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(CallError::Status {
                status: status.as_u16(),
                body: truncate_chars(body.trim(), ERROR_BODY_MAX_CHARS).to_string(),
            });
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| CallError::Transport(e.to_string()))?;

        serde_json::from_slice(&bytes).map_err(|e| CallError::MalformedResponse {
            reason: e.to_string(),
        })
    }
}
