//! Shared database health state.

use std::sync::atomic::{AtomicU8, Ordering};

const UNKNOWN: u8 = 0;
const HEALTHY: u8 = 1;
const UNHEALTHY: u8 = 2;

/// Last observed database health, shared between the monitor and observers.
///
/// Starts as unknown until the first probe completes.
#[derive(Debug, Default)]
pub struct HealthState {
    state: AtomicU8,
}

impl HealthState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a probe outcome. Returns true if this changed the state.
    pub fn record(&self, healthy: bool) -> bool {
        let next = if healthy { HEALTHY } else { UNHEALTHY };
        self.state.swap(next, Ordering::Relaxed) != next
    }

    pub fn is_healthy(&self) -> bool {
        self.state.load(Ordering::Relaxed) == HEALTHY
    }

    pub fn is_known(&self) -> bool {
        self.state.load(Ordering::Relaxed) != UNKNOWN
    }
}
