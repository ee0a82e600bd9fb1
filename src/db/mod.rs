//! Database pool provisioning.
//!
//! # Responsibilities
//! - Build a bounded Postgres connection pool from [`DatabaseConfig`]
//! - Verify liveness with a bounded startup probe before handing the pool out
//! - Expose a reusable bounded probe for the health endpoint and monitor
//!
//! # Design Decisions
//! - The startup probe deadline (5s) is fixed and shorter than any
//!   request-serving timeout: a slow database fails boot fast instead of
//!   hanging the process
//! - Provisioning failure is fatal; the caller must not start the listener
//!   against an unverified database
//! - Handlers and tests see the pool through the [`Database`] trait so the
//!   health path can be exercised without a live Postgres

use std::time::Duration;

use futures_util::future::BoxFuture;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use thiserror::Error;

use crate::config::DatabaseConfig;

/// Deadline for the one-shot liveness probe at startup.
pub const STARTUP_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Deadline for per-call probes issued by the health endpoint and monitor.
pub const HEALTH_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Errors raised while provisioning or probing the pool.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// Pool construction failed (bad URL, TLS setup, ...).
    #[error("failed to create connection pool: {0}")]
    Pool(#[from] sqlx::Error),

    /// The liveness probe reached the database but failed.
    #[error("database liveness probe failed: {0}")]
    Probe(#[source] sqlx::Error),

    /// The liveness probe did not complete within its deadline.
    #[error("database liveness probe timed out after {0:?}")]
    ProbeTimeout(Duration),
}

/// Build the connection pool and verify it with a bounded liveness probe.
///
/// No pool handle is returned unless the probe succeeds within
/// [`STARTUP_PROBE_TIMEOUT`].
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, ProvisionError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .max_lifetime(config.max_conn_lifetime)
        .idle_timeout(config.max_conn_idle_time)
        // Lazy connect so the probe below owns the only startup deadline.
        .connect_lazy(&config.url)?;

    ping(&pool, STARTUP_PROBE_TIMEOUT).await?;

    tracing::info!(
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        "database pool ready"
    );
    Ok(pool)
}

/// Issue a liveness probe bounded by `deadline`.
pub async fn ping(pool: &PgPool, deadline: Duration) -> Result<(), ProvisionError> {
    match tokio::time::timeout(deadline, sqlx::query("SELECT 1").execute(pool)).await {
        Ok(Ok(_)) => Ok(()),
        Ok(Err(e)) => Err(ProvisionError::Probe(e)),
        Err(_) => Err(ProvisionError::ProbeTimeout(deadline)),
    }
}

/// Seam between the lifecycle/HTTP layers and the concrete pool.
///
/// Production code passes a [`PgPool`]; tests substitute a mock to simulate
/// a database that blocks past the probe bound or fails outright.
pub trait Database: Send + Sync {
    /// Bounded liveness probe.
    fn ping(&self, deadline: Duration) -> BoxFuture<'_, Result<(), ProvisionError>>;

    /// Release the pool. Called exactly once, after the listener has stopped.
    fn close(&self) -> BoxFuture<'_, ()>;
}

impl Database for PgPool {
    fn ping(&self, deadline: Duration) -> BoxFuture<'_, Result<(), ProvisionError>> {
        Box::pin(ping(self, deadline))
    }

    fn close(&self) -> BoxFuture<'_, ()> {
        Box::pin(PgPool::close(self))
    }
}
