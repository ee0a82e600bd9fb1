//! Shutdown coordination.
//!
//! Shutdown is a latch, not an event: once triggered it stays triggered, and
//! a listener created after the fact still observes it. That matters for
//! tasks spawned during startup racing a very early SIGTERM.

use tokio::sync::watch;

/// Coordinator handed to every long-running task.
#[derive(Clone)]
pub struct Shutdown {
    latch: watch::Sender<bool>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (latch, _) = watch::channel(false);
        Self { latch }
    }

    pub fn subscribe(&self) -> ShutdownListener {
        ShutdownListener {
            latch: self.latch.subscribe(),
        }
    }

    /// Latch the shutdown state. Idempotent.
    pub fn trigger(&self) {
        self.latch.send_replace(true);
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// One task's view of the shutdown latch.
pub struct ShutdownListener {
    latch: watch::Receiver<bool>,
}

impl ShutdownListener {
    /// Resolves once shutdown has been triggered, even if that happened
    /// before this listener existed.
    pub async fn recv(&mut self) {
        // A dropped coordinator counts as shutdown.
        let _ = self.latch.wait_for(|&triggered| triggered).await;
    }
}
