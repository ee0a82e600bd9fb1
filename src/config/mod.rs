//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! process environment (ENV, API_PORT, DATABASE_URL, ...)
//!     → loader.rs (per-key typed reads, required vs optional policy)
//!     → schema.rs (Config tree: app / security / database)
//!     → shared via Arc to all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; no component mutates it after startup
//! - Required keys missing → fatal ConfigError, no partial config returned
//! - Optional keys absent or malformed → documented default plus a warning
//!   diagnostic; the loader reports `used_default` so tests need not parse logs
//! - Derived predicates (is_development/is_production) gate only
//!   observability and security defaults, never correctness

pub mod loader;
pub mod schema;

pub use loader::ConfigError;
pub use schema::{AppConfig, Config, DatabaseConfig, SecurityConfig};
