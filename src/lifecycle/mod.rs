//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (server.rs):
//!     Load config → Provision pool → Bind listener → Serve in background
//!
//! Shutdown (shutdown.rs, server.rs):
//!     Signal received → Stop accepting → Drain in-flight (≤30s) → Close pool
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - One-shot state machine: Created → Running → Draining → Stopped
//! - Pool release happens-after listener shutdown, exactly once
//! - A blown drain deadline forces shutdown but never abandons it

pub mod server;
pub mod shutdown;
pub mod signals;

pub use server::{ListenError, RunError, Server, ServerState, ShutdownError, DRAIN_DEADLINE};
pub use shutdown::{Shutdown, ShutdownListener};
