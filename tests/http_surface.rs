//! HTTP surface tests: health endpoint, middleware stack, security policy.

use std::time::{Duration, Instant};

use axum::{routing::get, Router};
use reqwest::StatusCode;
use serde_json::Value;

mod common;

#[tokio::test]
async fn health_reports_healthy_when_probe_succeeds() {
    let server = common::spawn_server(
        common::test_config(),
        common::MockDb::healthy(),
        Router::new(),
        None,
    )
    .await;

    let response = reqwest::get(server.url("/api/v1/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap(),
        "application/json"
    );
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, serde_json::json!({ "status": "healthy" }));

    server.shutdown.trigger();
    server.handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn health_reports_unhealthy_within_probe_bound() {
    // A database that blocks far past the 2s health probe bound.
    let server = common::spawn_server(
        common::test_config(),
        common::MockDb::blocking(Duration::from_secs(30)),
        Router::new(),
        None,
    )
    .await;

    let start = Instant::now();
    let response = reqwest::get(server.url("/api/v1/health")).await.unwrap();
    let elapsed = start.elapsed();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body,
        serde_json::json!({ "status": "unhealthy", "error": "database unavailable" })
    );
    // Bounded by the 2s probe deadline, not the blocking database.
    assert!(
        elapsed < Duration::from_secs(4),
        "health check took {elapsed:?}"
    );

    server.shutdown.trigger();
    server.handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn responses_carry_a_request_id() {
    let server = common::spawn_server(
        common::test_config(),
        common::MockDb::healthy(),
        Router::new(),
        None,
    )
    .await;

    let first = reqwest::get(server.url("/api/v1/health")).await.unwrap();
    let second = reqwest::get(server.url("/api/v1/health")).await.unwrap();

    let id_a = first.headers()["x-request-id"].to_str().unwrap().to_string();
    let id_b = second.headers()["x-request-id"].to_str().unwrap().to_string();
    assert_eq!(id_a.len(), 36);
    assert_ne!(id_a, id_b);

    server.shutdown.trigger();
    server.handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn handler_panic_becomes_500_and_process_survives() {
    async fn boom() -> &'static str {
        panic!("handler exploded")
    }
    let routes = Router::new().route("/boom", get(boom));
    let server = common::spawn_server(
        common::test_config(),
        common::MockDb::healthy(),
        routes,
        None,
    )
    .await;

    let response = reqwest::get(server.url("/boom")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, serde_json::json!({ "error": "internal server error" }));

    // The listener is still alive after the panic.
    let response = reqwest::get(server.url("/api/v1/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    server.shutdown.trigger();
    server.handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn cors_allows_configured_origin_only() {
    let server = common::spawn_server(
        common::test_config(),
        common::MockDb::healthy(),
        Router::new(),
        None,
    )
    .await;
    let client = reqwest::Client::new();

    let allowed = client
        .get(server.url("/api/v1/health"))
        .header("Origin", "http://localhost:3000")
        .send()
        .await
        .unwrap();
    assert_eq!(
        allowed.headers()["access-control-allow-origin"]
            .to_str()
            .unwrap(),
        "http://localhost:3000"
    );

    let denied = client
        .get(server.url("/api/v1/health"))
        .header("Origin", "http://evil.example.com")
        .send()
        .await
        .unwrap();
    assert!(denied
        .headers()
        .get("access-control-allow-origin")
        .is_none());

    server.shutdown.trigger();
    server.handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn security_headers_follow_environment_policy() {
    let server = common::spawn_server(
        common::test_config(),
        common::MockDb::healthy(),
        Router::new(),
        None,
    )
    .await;

    let response = reqwest::get(server.url("/api/v1/health")).await.unwrap();
    let headers = response.headers();
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["x-frame-options"], "DENY");
    assert_eq!(headers["content-security-policy"], "default-src 'self'");
    // Development environment: no HSTS.
    assert!(headers.get("strict-transport-security").is_none());

    server.shutdown.trigger();
    server.handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn rate_limit_rejects_burst_overflow() {
    let mut config = common::test_config();
    config.security.rate_limit_burst = 3;
    config.security.rate_limit_per = Duration::from_secs(3600);

    let server = common::spawn_server(config, common::MockDb::healthy(), Router::new(), None).await;
    let client = reqwest::Client::new();

    for _ in 0..3 {
        let response = client
            .get(server.url("/api/v1/health"))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
    let response = client
        .get(server.url("/api/v1/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    server.shutdown.trigger();
    server.handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn rate_limit_can_be_disabled() {
    let mut config = common::test_config();
    config.security.rate_limit_enabled = false;
    config.security.rate_limit_burst = 1;

    let server = common::spawn_server(config, common::MockDb::healthy(), Router::new(), None).await;
    let client = reqwest::Client::new();

    for _ in 0..5 {
        let response = client
            .get(server.url("/api/v1/health"))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    server.shutdown.trigger();
    server.handle.await.unwrap().unwrap();
}
