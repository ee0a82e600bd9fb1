//! Lifecycle orchestration.
//!
//! # Responsibilities
//! - Bind the configured address; bind failure is fatal
//! - Accept connections in the foreground loop until shutdown is triggered
//! - Drive the ordered shutdown: stop accepting → drain (≤ deadline) →
//!   sever stragglers → release the pool
//!
//! # Design Decisions
//! - The state machine is one-shot; there is no transition back to Running
//! - Connections are served on tasks the orchestrator retains, so the drain
//!   deadline can actually terminate handlers that outlive it
//! - A forced shutdown is reported as an error so the process exits nonzero,
//!   but the pool is still released first

use std::convert::Infallible;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use hyper_util::server::graceful::GracefulShutdown;
use hyper_util::service::TowerToHyperService;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tokio::time;
use tower::Service;

use crate::config::Config;
use crate::db::Database;
use crate::health::{HealthMonitor, HealthState};
use crate::http::{build_router, AppState};
use crate::lifecycle::shutdown::Shutdown;

/// How long in-flight requests may keep running after shutdown begins.
pub const DRAIN_DEADLINE: Duration = Duration::from_secs(30);

/// Listener lifecycle states. One-shot: never returns to an earlier state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    Created,
    Running,
    Draining,
    Stopped,
}

/// Socket bind or serve failure.
#[derive(Debug, Error)]
pub enum ListenError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] io::Error),
}

/// Graceful shutdown did not complete cleanly.
#[derive(Debug, Error)]
pub enum ShutdownError {
    #[error("drain deadline of {0:?} exceeded, shutdown was forced")]
    DrainDeadlineExceeded(Duration),
}

/// Any fatal outcome of [`Server::run`].
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Listen(#[from] ListenError),

    #[error(transparent)]
    Shutdown(#[from] ShutdownError),
}

/// Handle over the bound listener and its shutdown sequencing.
pub struct Server {
    listener: TcpListener,
    router: Router,
    db: Arc<dyn Database>,
    health_check_period: Duration,
    drain_deadline: Duration,
    state_tx: watch::Sender<ServerState>,
}

impl Server {
    /// Build the router and bind the configured address.
    pub async fn bind(
        config: Arc<Config>,
        db: Arc<dyn Database>,
        api_routes: Router,
    ) -> Result<Self, ListenError> {
        let state = AppState {
            config: config.clone(),
            db: db.clone(),
        };
        let router = build_router(state, api_routes);

        let addr = SocketAddr::from(([0, 0, 0, 0], config.app.port));
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ListenError::Bind { addr, source })?;

        let (state_tx, _) = watch::channel(ServerState::Created);
        Ok(Self {
            listener,
            router,
            db,
            health_check_period: config.database.health_check_period,
            drain_deadline: DRAIN_DEADLINE,
            state_tx,
        })
    }

    /// The address actually bound (useful with port 0).
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Override the drain deadline. Tests shrink it to observe forced
    /// shutdown without waiting 30 seconds.
    pub fn with_drain_deadline(mut self, deadline: Duration) -> Self {
        self.drain_deadline = deadline;
        self
    }

    /// Observe lifecycle state transitions.
    pub fn state(&self) -> watch::Receiver<ServerState> {
        self.state_tx.subscribe()
    }

    /// Serve until `shutdown` is triggered, then drain and release the pool.
    ///
    /// The pool is closed exactly once, strictly after the listener has
    /// stopped (or been forced to stop), so no handler can acquire a
    /// connection from a closing pool.
    pub async fn run(self, shutdown: Shutdown) -> Result<(), RunError> {
        let Server {
            listener,
            router,
            db,
            health_check_period,
            drain_deadline,
            state_tx,
        } = self;

        let addr = listener.local_addr().map_err(ListenError::Serve)?;

        let health_state = Arc::new(HealthState::new());
        tokio::spawn(
            HealthMonitor::new(db.clone(), health_check_period, health_state)
                .run(shutdown.subscribe()),
        );

        let mut drain_rx = shutdown.subscribe();
        let mut make_service = router.into_make_service_with_connect_info::<SocketAddr>();
        let conn_builder = ConnBuilder::new(TokioExecutor::new());
        let graceful = GracefulShutdown::new();
        // Connection tasks are retained so the drain deadline can sever the
        // ones that outlive it; hyper would otherwise keep them running
        // detached.
        let mut conns: JoinSet<()> = JoinSet::new();

        state_tx.send_replace(ServerState::Running);
        tracing::info!(address = %addr, "HTTP server listening");

        let serve_result: Result<(), ListenError> = loop {
            tokio::select! {
                biased;
                _ = drain_rx.recv() => break Ok(()),
                Some(_) = conns.join_next(), if !conns.is_empty() => {}
                accepted = listener.accept() => {
                    match accepted {
                        Ok((stream, peer)) => {
                            let service = unwrap_infallible(make_service.call(peer).await);
                            let conn = conn_builder
                                .serve_connection_with_upgrades(
                                    TokioIo::new(stream),
                                    TowerToHyperService::new(service),
                                )
                                .into_owned();
                            let conn = graceful.watch(conn);
                            conns.spawn(async move {
                                if let Err(e) = conn.await {
                                    tracing::debug!(error = %e, "connection error");
                                }
                            });
                        }
                        Err(e) => {
                            tracing::error!(error = %e, "failed to accept connection");
                            break Err(ListenError::Serve(e));
                        }
                    }
                }
            }
        };

        // Stop accepting before anything else.
        drop(listener);

        let result: Result<(), RunError> = match serve_result {
            Ok(()) => {
                state_tx.send_replace(ServerState::Draining);
                tracing::info!(
                    deadline_secs = drain_deadline.as_secs(),
                    "shutdown requested, draining in-flight requests"
                );

                match time::timeout(drain_deadline, graceful.shutdown()).await {
                    Ok(()) => {
                        tracing::info!("drain complete");
                        Ok(())
                    }
                    Err(_) => {
                        // Remaining connections are cut off; shutdown is
                        // flagged, not abandoned.
                        tracing::warn!("drain deadline exceeded, forcing shutdown");
                        conns.shutdown().await;
                        Err(RunError::Shutdown(ShutdownError::DrainDeadlineExceeded(
                            drain_deadline,
                        )))
                    }
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "HTTP server failed");
                conns.shutdown().await;
                Err(RunError::Listen(e))
            }
        };

        // Pool release happens-after listener shutdown.
        db.close().await;
        state_tx.send_replace(ServerState::Stopped);
        tracing::info!("shutdown complete");
        result
    }
}

fn unwrap_infallible<T>(result: Result<T, Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}
