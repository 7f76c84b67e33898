use std::future::Future;
use std::time::Duration;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

/// Interrupt handle shared by the run loop. Cloning shares the same token.
#[derive(Debug, Clone, Default)]
pub struct Shutdown {
    token: CancellationToken,
}

impl Shutdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns a Ctrl+C listener that cancels this handle.
    pub fn listen_ctrl_c(&self) {
        let token = self.token.clone();
        tokio::spawn(async move {
            match signal::ctrl_c().await {
                Ok(()) => {
                    warn!("🛑 Received Ctrl+C. Stopping after the current step...");
                    token.cancel();
                }
                Err(err) => {
                    error!("Unable to listen for shutdown signal: {}", err);
                }
            }
        });
    }

    pub fn trigger(&self) {
        self.token.cancel();
    }

    pub fn is_triggered(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Drives `fut` to completion unless shutdown fires first (`None`).
    pub async fn guard<F: Future>(&self, fut: F) -> Option<F::Output> {
        tokio::select! {
            biased;
            _ = self.token.cancelled() => None,
            out = fut => Some(out),
        }
    }

    /// Sleeps for `duration`; returns `false` if interrupted.
    pub async fn pause(&self, duration: Duration) -> bool {
        self.guard(tokio::time::sleep(duration)).await.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_pause_completes_without_shutdown() {
        let shutdown = Shutdown::new();
        assert!(shutdown.pause(Duration::from_millis(5)).await);
    }

    #[tokio::test]
    async fn test_pause_interrupted() {
        let shutdown = Shutdown::new();
        let trigger = shutdown.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            trigger.trigger();
        });

        let start = tokio::time::Instant::now();
        assert!(!shutdown.pause(Duration::from_secs(30)).await);
        assert!(start.elapsed() < Duration::from_secs(5));
        assert!(shutdown.is_triggered());
    }

    #[tokio::test]
    async fn test_guard_returns_output() {
        let shutdown = Shutdown::new();
        assert_eq!(shutdown.guard(async { 7 }).await, Some(7));
    }
}
