//! Shared utilities for integration tests.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use futures_util::future::BoxFuture;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use storefront_api::config::Config;
use storefront_api::db::{Database, ProvisionError};
use storefront_api::lifecycle::{RunError, Server, ServerState, Shutdown};

/// A `Database` stand-in with programmable probe behavior.
pub struct MockDb {
    ping_delay: Duration,
    fail: AtomicBool,
    close_count: AtomicUsize,
}

impl MockDb {
    /// Probes succeed immediately.
    pub fn healthy() -> Arc<Self> {
        Arc::new(Self {
            ping_delay: Duration::ZERO,
            fail: AtomicBool::new(false),
            close_count: AtomicUsize::new(0),
        })
    }

    /// Probes block for `delay` before succeeding; past the caller's
    /// deadline this reports a probe timeout, like a stalled database.
    #[allow(dead_code)]
    pub fn blocking(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            ping_delay: delay,
            fail: AtomicBool::new(false),
            close_count: AtomicUsize::new(0),
        })
    }

    #[allow(dead_code)]
    pub fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }

    #[allow(dead_code)]
    pub fn close_count(&self) -> usize {
        self.close_count.load(Ordering::SeqCst)
    }
}

impl Database for MockDb {
    fn ping(&self, deadline: Duration) -> BoxFuture<'_, Result<(), ProvisionError>> {
        Box::pin(async move {
            if self.ping_delay > deadline {
                tokio::time::sleep(deadline).await;
                return Err(ProvisionError::ProbeTimeout(deadline));
            }
            tokio::time::sleep(self.ping_delay).await;
            if self.fail.load(Ordering::SeqCst) {
                Err(ProvisionError::Probe(sqlx::Error::PoolClosed))
            } else {
                Ok(())
            }
        })
    }

    fn close(&self) -> BoxFuture<'_, ()> {
        self.close_count.fetch_add(1, Ordering::SeqCst);
        Box::pin(async {})
    }
}

/// Configuration matching the documented development scenario, with port 0
/// so each test binds an ephemeral port.
pub fn test_config() -> Config {
    let map: HashMap<&str, &str> = HashMap::from([
        ("ENV", "development"),
        ("API_PORT", "0"),
        ("DATABASE_URL", "postgres://localhost:5432/storefront_test"),
        ("ALLOWED_ORIGINS", "http://localhost:3000"),
    ]);
    Config::from_lookup(|key| map.get(key).map(|v| v.to_string())).unwrap()
}

/// A running server plus the handles tests poke at.
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    #[allow(dead_code)]
    pub state: watch::Receiver<ServerState>,
    pub handle: JoinHandle<Result<(), RunError>>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Bind and run a server on an ephemeral port.
pub async fn spawn_server(
    config: Config,
    db: Arc<MockDb>,
    routes: Router,
    drain_deadline: Option<Duration>,
) -> TestServer {
    let mut server = Server::bind(Arc::new(config), db, routes)
        .await
        .expect("bind failed");
    if let Some(deadline) = drain_deadline {
        server = server.with_drain_deadline(deadline);
    }

    let addr = server.local_addr().unwrap();
    let mut state = server.state();
    let shutdown = Shutdown::new();
    let handle = tokio::spawn(server.run(shutdown.clone()));

    // Don't hand the server out until it accepts connections.
    state
        .wait_for(|s| *s == ServerState::Running)
        .await
        .expect("server never reached Running");

    TestServer {
        addr,
        shutdown,
        state,
        handle,
    }
}
