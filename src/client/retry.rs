use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::constants::{DEFAULT_BACKOFF_BASE, DEFAULT_MAX_RETRIES};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Bounded attempts with exponential backoff.
///
/// The delay after failed attempt `k` (0-based) is `base_delay * 2^k`.
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RETRIES, DEFAULT_BACKOFF_BASE)
    }
}

impl RetryPolicy {
    /// Creates a policy; `max_attempts` is clamped to at least one.
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// A single attempt, no retries.
    pub fn no_retry() -> Self {
        Self::new(1, Duration::ZERO)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    /// Delay to wait after failed attempt `attempt` (0-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }

    /// Returns `true` if another attempt may follow failed attempt `attempt`.
    pub fn has_attempts_left(&self, attempt: u32) -> bool {
        attempt.saturating_add(1) < self.max_attempts
    }

    /// Sum of every backoff the policy can incur.
    pub fn total_backoff(&self) -> Duration {
        (0..self.max_attempts.saturating_sub(1))
            .map(|k| self.backoff(k))
            .fold(Duration::ZERO, Duration::saturating_add)
    }

    /// Runs `op` until it succeeds or attempts run out, sleeping between attempts.
    ///
    /// `op` receives the 0-based attempt number. The last error is returned on exhaustion.
    pub async fn execute<T, E, F, Fut>(&self, label: &str, mut op: F) -> Result<T, E>
    where
        E: Display,
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut attempt = 0u32;
        loop {
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) if self.has_attempts_left(attempt) => {
                    let delay = self.backoff(attempt);
                    warn!(
                        label,
                        attempt = attempt + 1,
                        max_attempts = self.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Attempt failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
