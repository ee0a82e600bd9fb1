//! Health endpoint.
//!
//! `GET /api/v1/health` is the only externally observable signal of live
//! database connectivity after startup. Each call probes the pool with its
//! own short bound so a stalled database yields a prompt 503 instead of a
//! hung request.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use crate::db::HEALTH_PROBE_TIMEOUT;
use crate::http::server::AppState;

#[derive(Debug, Serialize)]
struct HealthBody {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'static str>,
}

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    match state.db.ping(HEALTH_PROBE_TIMEOUT).await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthBody {
                status: "healthy",
                error: None,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health probe failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthBody {
                    status: "unhealthy",
                    error: Some("database unavailable"),
                }),
            )
        }
    }
}
