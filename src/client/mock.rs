use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::metric::Metric;

use super::backend::ScoringBackend;
use super::error::{CallError, CallResult};
use super::wire::{AnalyzeRequest, AnalyzeResponse};

#[derive(Debug, Clone)]
enum Scripted {
    /// Fail the next `remaining` calls for this text, then answer normally.
    FailTimes { remaining: usize },
    AlwaysFail,
    Respond(AnalyzeResponse),
}

#[derive(Default)]
/// In-memory [`ScoringBackend`] with deterministic scores and scripted failures.
pub struct MockScoringBackend {
    scripts: Mutex<HashMap<String, Scripted>>,
    latencies: Mutex<HashMap<String, Duration>>,
    default_latency: Mutex<Duration>,
    calls: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl MockScoringBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deterministic score the mock reports for `text` and `metric`.
    pub fn score_for(text: &str, metric: Metric) -> f64 {
        let seed = text.bytes().fold(metric as u64 + 1, |acc, b| {
            acc.wrapping_mul(31).wrapping_add(u64::from(b))
        });
        (seed % 1000) as f64 / 1000.0
    }

    /// The first `times` calls for `text` fail with a transport error.
    pub fn fail_times(&self, text: &str, times: usize) {
        self.scripts
            .lock()
            .insert(text.to_string(), Scripted::FailTimes { remaining: times });
    }

    /// Every call for `text` fails.
    pub fn always_fail(&self, text: &str) {
        self.scripts
            .lock()
            .insert(text.to_string(), Scripted::AlwaysFail);
    }

    /// Calls for `text` return `response` verbatim.
    pub fn respond_with(&self, text: &str, response: AnalyzeResponse) {
        self.scripts
            .lock()
            .insert(text.to_string(), Scripted::Respond(response));
    }

    /// Calls for `text` take `latency` before answering.
    pub fn latency_for(&self, text: &str, latency: Duration) {
        self.latencies.lock().insert(text.to_string(), latency);
    }

    /// Latency for texts without their own.
    pub fn set_default_latency(&self, latency: Duration) {
        *self.default_latency.lock() = latency;
    }

    /// Texts received, in arrival order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn calls_for(&self, text: &str) -> usize {
        self.calls.lock().iter().filter(|t| *t == text).count()
    }

    /// Highest number of calls observed in flight at once.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    fn next_outcome(&self, request: &AnalyzeRequest) -> CallResult<AnalyzeResponse> {
        let text = &request.comment.text;
        let mut scripts = self.scripts.lock();

        match scripts.get_mut(text) {
            Some(Scripted::AlwaysFail) => {
                Err(CallError::Transport("mock: connection reset".to_string()))
            }
            Some(Scripted::FailTimes { remaining }) if *remaining > 0 => {
                *remaining -= 1;
                Err(CallError::Status {
                    status: 429,
                    body: "mock: quota exceeded".to_string(),
                })
            }
            Some(Scripted::Respond(response)) => Ok(response.clone()),
            _ => Ok(AnalyzeResponse::from_scores(
                request
                    .metrics()
                    .into_iter()
                    .map(|m| (m, Self::score_for(text, m))),
            )),
        }
    }
}

#[async_trait]
impl ScoringBackend for MockScoringBackend {
    async fn analyze(&self, request: &AnalyzeRequest) -> CallResult<AnalyzeResponse> {
        self.calls.lock().push(request.comment.text.clone());

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

        let latency = self
            .latencies
            .lock()
            .get(&request.comment.text)
            .copied()
            .unwrap_or(*self.default_latency.lock());
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        let outcome = self.next_outcome(request);
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        outcome
    }
}
