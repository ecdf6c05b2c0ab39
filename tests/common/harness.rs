//! In-process stand-in for the `comments:analyze` endpoint.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

pub const ANALYZE_PATH: &str = "/v1alpha1/analyze";

#[derive(Debug, Clone)]
pub enum Reply {
    /// Scores every requested attribute with the given value.
    Score(f64),
    /// Answers with this status and body.
    Status(u16, String),
    /// Answers 200 with a body that is not JSON.
    Garbage,
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub key: Option<String>,
    pub body: Value,
}

impl RecordedRequest {
    pub fn text(&self) -> &str {
        self.body["comment"]["text"].as_str().unwrap_or_default()
    }

    pub fn attributes(&self) -> Vec<String> {
        self.body["requestedAttributes"]
            .as_object()
            .map(|o| o.keys().cloned().collect())
            .unwrap_or_default()
    }
}

#[derive(Default)]
struct ServiceState {
    queued: Mutex<Vec<Reply>>,
    fallback: Mutex<Option<Reply>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

pub struct FakeService {
    pub addr: SocketAddr,
    state: Arc<ServiceState>,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl FakeService {
    pub async fn spawn() -> std::io::Result<Self> {
        let state = Arc::new(ServiceState::default());
        let app = Router::new()
            .route(ANALYZE_PATH, post(analyze))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await;
        });

        Ok(Self {
            addr,
            state,
            _server_handle: handle,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn endpoint(&self) -> String {
        format!("http://{}{}", self.addr, ANALYZE_PATH)
    }

    /// Replies used in order before falling back to the default.
    pub fn queue(&self, replies: impl IntoIterator<Item = Reply>) {
        self.state.queued.lock().extend(replies);
    }

    /// Reply used once the queue is empty. Defaults to a score derived from the text length.
    pub fn set_fallback(&self, reply: Reply) {
        *self.state.fallback.lock() = Some(reply);
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.state.requests.lock().len()
    }
}

impl Drop for FakeService {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// Score the fallback reply gives `text`.
pub fn length_score(text: &str) -> f64 {
    (text.chars().count() % 10) as f64 / 10.0
}

async fn analyze(
    State(state): State<Arc<ServiceState>>,
    Query(params): Query<HashMap<String, String>>,
    body: String,
) -> Response {
    let body: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
    let request = RecordedRequest {
        key: params.get("key").cloned(),
        body,
    };
    let attributes = request.attributes();
    let text = request.text().to_string();
    state.requests.lock().push(request);

    let reply = {
        let mut queued = state.queued.lock();
        if queued.is_empty() {
            state.fallback.lock().clone()
        } else {
            Some(queued.remove(0))
        }
    };

    match reply {
        Some(Reply::Status(status, body)) => (
            StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            body,
        )
            .into_response(),
        Some(Reply::Garbage) => (StatusCode::OK, "<html>not json</html>").into_response(),
        Some(Reply::Score(value)) => scores_response(&attributes, value),
        None => scores_response(&attributes, length_score(&text)),
    }
}

fn scores_response(attributes: &[String], value: f64) -> Response {
    let scores: serde_json::Map<String, Value> = attributes
        .iter()
        .map(|name| {
            (
                name.clone(),
                json!({
                    "spanScores": [],
                    "summaryScore": { "value": value, "type": "PROBABILITY" }
                }),
            )
        })
        .collect();

    axum::Json(json!({
        "attributeScores": scores,
        "languages": ["en"],
        "detectedLanguages": ["en"]
    }))
    .into_response()
}
