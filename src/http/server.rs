//! Router assembly and middleware wiring.
//!
//! # Responsibilities
//! - Build the Axum router with the required health endpoint
//! - Merge collaborator-supplied routes
//! - Wire the middleware stack in its contractual order:
//!   request-id → client-ip → panic recovery → access logging → CORS

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::Request,
    response::Response,
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::db::Database;
use crate::http::health;
use crate::http::middleware::{client_ip, panic_recovery, ClientIp, MakeRequestUuid, X_REQUEST_ID};
use crate::security;
use crate::security::rate_limit::{rate_limit_middleware, RateLimiterState};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: Arc<dyn Database>,
}

/// Build the service router.
///
/// `api_routes` is the collaborator-supplied route set; the core imposes no
/// semantics on it beyond sharing the middleware stack. The health endpoint
/// is always registered.
pub fn build_router(state: AppState, api_routes: Router) -> Router {
    let security_config = state.config.security.clone();

    let mut router = Router::new()
        .route("/api/v1/health", get(health::health))
        .with_state(state)
        .merge(api_routes);

    // Innermost layers first; rate limiting runs inside access logging.
    if security_config.rate_limit_enabled {
        let limiter = Arc::new(RateLimiterState::new(&security_config));
        router = router.layer(axum::middleware::from_fn_with_state(
            limiter,
            rate_limit_middleware,
        ));
    }

    router = router.layer(TimeoutLayer::new(security_config.read_timeout));

    // Each .layer() call wraps everything added so far, so the last call is
    // outermost. Contractual order from the outside in:
    // request-id → client-ip → panic recovery → access log → CORS.
    let router = router
        .layer(security::cors::layer(&security_config))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = request
                        .headers()
                        .get(&X_REQUEST_ID)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("unknown");
                    // The client-ip layer runs outside this one, so the
                    // resolved address is already in the extensions.
                    let client = request
                        .extensions()
                        .get::<ClientIp>()
                        .map(|ip| ip.0.to_string());
                    tracing::info_span!(
                        "request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = %request_id,
                        client = client.as_deref().unwrap_or("-"),
                    )
                })
                .on_response(|response: &Response, latency: Duration, _span: &tracing::Span| {
                    tracing::info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis() as u64,
                        "request completed"
                    );
                }),
        )
        .layer(CatchPanicLayer::custom(panic_recovery::handle_panic))
        .layer(axum::middleware::from_fn(client_ip::resolve_client_ip))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid))
                .layer(PropagateRequestIdLayer::new(X_REQUEST_ID)),
        );

    security::headers::apply(router, &security_config)
}
