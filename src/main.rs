//! Service entry point.
//!
//! Bootstrap order: environment → logging → configuration → database pool →
//! listener. Every failure before the listener is up exits with status 1;
//! a clean drain exits 0; a forced shutdown exits 1 so the operator sees it.

use std::process::ExitCode;
use std::sync::Arc;

use axum::Router;

use storefront_api::config::Config;
use storefront_api::lifecycle::{signals, Server, Shutdown};
use storefront_api::{db, observability};

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine; real deployments set the environment.
    dotenvy::dotenv().ok();

    observability::logging::init();

    let config = match Config::load() {
        Ok(config) => Arc::new(config),
        Err(e) => {
            tracing::error!(error = %e, "configuration load failed");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        environment = %config.app.environment,
        port = config.app.port,
        "configuration loaded"
    );

    let pool = match db::connect(&config.database).await {
        Ok(pool) => Arc::new(pool),
        Err(e) => {
            tracing::error!(error = %e, "database pool provisioning failed");
            return ExitCode::FAILURE;
        }
    };

    // Domain route collaborators register here; the lifecycle layer only
    // guarantees the health endpoint.
    let api_routes = Router::new();

    let server = match Server::bind(config, pool, api_routes).await {
        Ok(server) => server,
        Err(e) => {
            tracing::error!(error = %e, "listener startup failed");
            return ExitCode::FAILURE;
        }
    };

    let shutdown = Shutdown::new();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            signals::terminated().await;
            shutdown.trigger();
        }
    });

    match server.run(shutdown).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "shutdown was not clean");
            ExitCode::FAILURE
        }
    }
}
