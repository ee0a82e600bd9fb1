//! Storefront API service lifecycle layer.
//!
//! # Architecture Overview
//!
//! ```text
//!            ┌────────────────────────────────────────────────────┐
//!            │                  STOREFRONT API                    │
//!            │                                                    │
//!   env ────▶│  config ──▶ db (pool + probe) ──▶ lifecycle        │
//!            │                                      │             │
//!            │                                      ▼             │
//!   client ─▶│  http (request-id → client-ip → recovery →         │
//!            │        access log → CORS) ──▶ collaborator routes  │
//!            │                                                    │
//!            │  ┌──────────────────────────────────────────────┐  │
//!            │  │           Cross-Cutting Concerns             │  │
//!            │  │  security (headers, rate limit)  health      │  │
//!            │  │  observability (structured logging)          │  │
//!            │  └──────────────────────────────────────────────┘  │
//!            └────────────────────────────────────────────────────┘
//!
//! SIGINT/SIGTERM ──▶ lifecycle: stop accept → drain ≤30s → close pool
//! ```
//!
//! The crate owns how the process comes up (validated configuration, a
//! liveness-verified connection pool, a middleware-wrapped listener) and how
//! it comes down (signal-driven drain with a bounded deadline, pool released
//! exactly once). Route handlers and the tenant data model are collaborators
//! that merge their routes into the router the lifecycle layer builds.

// Core subsystems
pub mod config;
pub mod db;
pub mod http;

// Traffic management
pub mod health;
pub mod security;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::Config;
pub use lifecycle::{Server, Shutdown};
