//! Observability subsystem.
//!
//! Structured logging via `tracing`; the request ID flows through every
//! span (see `http::middleware::request_id`).

pub mod logging;
