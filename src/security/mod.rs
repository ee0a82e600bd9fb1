//! Security subsystem.
//!
//! # Responsibilities
//! - CORS enforcement from the loaded security configuration (cors.rs)
//! - Security response headers: HSTS, frame options, nosniff (headers.rs)
//! - Per-client token-bucket rate limiting (rate_limit.rs)
//!
//! # Design Decisions
//! - All policy comes from `SecurityConfig`; nothing here reads the
//!   environment directly
//! - HSTS emission is decided at config load time (production only)
//! - Rate limiting keys on the resolved client IP, not the socket peer

pub mod cors;
pub mod headers;
pub mod rate_limit;

pub use rate_limit::RateLimiterState;
