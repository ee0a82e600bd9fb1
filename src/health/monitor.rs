//! Background database liveness monitor.
//!
//! # Responsibilities
//! - Periodically probe the pool with a bounded timeout
//! - Update shared health state and log transitions

use std::sync::Arc;
use std::time::Duration;

use tokio::time;

use crate::db::{Database, HEALTH_PROBE_TIMEOUT};
use crate::health::state::HealthState;
use crate::lifecycle::ShutdownListener;

pub struct HealthMonitor {
    db: Arc<dyn Database>,
    period: Duration,
    state: Arc<HealthState>,
}

impl HealthMonitor {
    pub fn new(db: Arc<dyn Database>, period: Duration, state: Arc<HealthState>) -> Self {
        Self { db, period, state }
    }

    /// Run until the shutdown signal arrives.
    pub async fn run(self, mut shutdown: ShutdownListener) {
        tracing::info!(period_secs = self.period.as_secs(), "database health monitor starting");

        let mut ticker = time::interval(self.period);
        // The first tick fires immediately; the startup probe already ran.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.check().await;
                }
                _ = shutdown.recv() => {
                    tracing::info!("database health monitor received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    async fn check(&self) {
        let healthy = match self.db.ping(HEALTH_PROBE_TIMEOUT).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "database health check failed");
                false
            }
        };

        if self.state.record(healthy) {
            if healthy {
                tracing::info!("database connectivity restored");
            } else {
                tracing::error!("database unreachable");
            }
        }
    }
}
