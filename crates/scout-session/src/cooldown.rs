//! Countdown that blocks new searches after the service rate limits us.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

const TICK: Duration = Duration::from_secs(1);

/// Seconds remaining before a new search may be submitted.
///
/// While positive, a background ticker decrements the counter once per
/// second and stops at zero. Subscribers see every tick.
#[derive(Debug)]
pub struct Cooldown {
    remaining: Arc<watch::Sender<u64>>,
    ticker: Option<JoinHandle<()>>,
}

impl Cooldown {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0);
        Self {
            remaining: Arc::new(tx),
            ticker: None,
        }
    }

    /// Set the countdown to `secs`, replacing any countdown in progress.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime while `secs` is non-zero.
    pub fn start(&mut self, secs: u64) {
        self.stop();
        self.remaining.send_replace(secs);
        if secs == 0 {
            return;
        }

        tracing::info!(secs, "cooldown started");
        let remaining = Arc::clone(&self.remaining);
        self.ticker = Some(tokio::spawn(async move {
            loop {
                tokio::time::sleep(TICK).await;
                let mut left = 0;
                remaining.send_modify(|r| {
                    *r = r.saturating_sub(1);
                    left = *r;
                });
                if left == 0 {
                    tracing::info!("cooldown elapsed");
                    break;
                }
            }
        }));
    }

    #[must_use]
    pub fn remaining(&self) -> u64 {
        *self.remaining.borrow()
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.remaining() > 0
    }

    /// Receiver that observes every tick, for "Wait (Ns)" displays.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.remaining.subscribe()
    }

    /// Resolves once the countdown reaches zero.
    pub async fn wait_until_elapsed(&self) {
        let mut rx = self.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait.
        let _ = rx.wait_for(|secs| *secs == 0).await;
    }

    fn stop(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }
}

impl Default for Cooldown {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Cooldown {
    fn drop(&mut self) {
        self.stop();
    }
}
