//! HTTP listener subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → middleware/request_id.rs (tag + propagate x-request-id)
//!     → middleware/client_ip.rs (resolve real client IP)
//!     → middleware/panic_recovery.rs (handler panic → 500)
//!     → access logging (tower-http TraceLayer)
//!     → CORS enforcement (security::cors)
//!     → collaborator routes / health.rs
//! ```
//!
//! # Design Decisions
//! - The core knows nothing about handler semantics; collaborators merge
//!   their routes into the router the orchestrator builds
//! - The health endpoint probes the pool on every call with its own bound,
//!   independent of the request timeout

pub mod health;
pub mod middleware;
pub mod server;

pub use server::{build_router, AppState};
