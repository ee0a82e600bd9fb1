//! Database health monitoring.
//!
//! # Data Flow
//! ```text
//! Background monitor (monitor.rs):
//!     Periodic timer (DatabaseConfig::health_check_period)
//!     → Bounded ping against the pool
//!     → Update state.rs, log on transition
//!
//! Health endpoint (http::health):
//!     Probes the pool directly on each call; the monitor only provides
//!     operator-facing logs between scrapes.
//! ```

pub mod monitor;
pub mod state;

pub use monitor::HealthMonitor;
pub use state::HealthState;
