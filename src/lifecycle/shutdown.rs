use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::signal;
use tokio::sync::Notify;
use tracing::{info, warn};

use crate::constants::FORCED_EXIT_CODE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// What the process does about an OS interrupt.
pub enum SignalResponse {
    /// First interrupt: finish the current batch, save and stop.
    Drain,
    /// Repeated interrupt: exit without waiting.
    ForceExit,
}

#[derive(Debug, Clone, Default)]
/// Cloneable flag asking the run to stop dispatching new work.
///
/// Triggering is idempotent. In-flight work is not aborted.
pub struct ShutdownSignal {
    requested: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests shutdown. Returns `true` on the first call only.
    pub fn trigger(&self) -> bool {
        // AcqRel: the swap both observes an earlier trigger and publishes this one.
        let first = !self.requested.swap(true, Ordering::AcqRel);
        if first {
            self.notify.notify_waiters();
        }
        first
    }

    /// Returns `true` once shutdown has been requested.
    pub fn is_triggered(&self) -> bool {
        self.requested.load(Ordering::Acquire)
    }

    /// Resolves once shutdown has been requested (immediately if it already was).
    pub async fn triggered(&self) {
        loop {
            // Register before checking the flag so a concurrent trigger is not missed.
            let notified = self.notify.notified();
            if self.is_triggered() {
                return;
            }
            notified.await;
        }
    }

    /// Records an OS interrupt. The first one drains, any later one forces exit.
    pub fn on_os_signal(&self) -> SignalResponse {
        if self.trigger() {
            SignalResponse::Drain
        } else {
            SignalResponse::ForceExit
        }
    }

    /// Triggers this signal on Ctrl+C or SIGTERM.
    ///
    /// The listener keeps running after the first signal; a second one exits the
    /// process with [`FORCED_EXIT_CODE`].
    pub fn listen_for_os_signals(&self) -> tokio::task::JoinHandle<()> {
        let this = self.clone();
        tokio::spawn(async move {
            #[cfg(unix)]
            let mut terminate =
                match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                    Ok(sig) => Some(sig),
                    Err(e) => {
                        warn!(error = %e, "Failed to install SIGTERM handler");
                        None
                    }
                };

            loop {
                #[cfg(unix)]
                let sigterm = async {
                    match terminate.as_mut() {
                        Some(sig) => {
                            if sig.recv().await.is_none() {
                                std::future::pending::<()>().await;
                            }
                        }
                        None => std::future::pending::<()>().await,
                    }
                };

                #[cfg(not(unix))]
                let sigterm = std::future::pending::<()>();

                let ctrl_c = async {
                    if let Err(e) = signal::ctrl_c().await {
                        warn!(error = %e, "Failed to install Ctrl+C handler");
                        std::future::pending::<()>().await;
                    }
                };

                let name = tokio::select! {
                    _ = ctrl_c => "Ctrl+C",
                    _ = sigterm => "SIGTERM",
                };

                match this.on_os_signal() {
                    SignalResponse::Drain => {
                        info!(
                            signal = name,
                            "Finishing the current batch before stopping; repeat to exit now"
                        );
                    }
                    SignalResponse::ForceExit => {
                        warn!(signal = name, "Second interrupt, exiting without a final save");
                        std::process::exit(FORCED_EXIT_CODE);
                    }
                }
            }
        })
    }
}
