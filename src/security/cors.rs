//! CORS layer construction from the loaded security configuration.

use std::time::Duration;

use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::SecurityConfig;

/// Build the CORS layer. Origins are matched exactly against the configured
/// allow-list; unparsable entries are dropped with a warning rather than
/// silently widening the policy.
pub fn layer(config: &SecurityConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin = %origin, error = %e, "dropping unparsable CORS origin");
                None
            }
        })
        .collect();

    let methods: Vec<Method> = config
        .allowed_methods
        .iter()
        .filter_map(|m| m.parse().ok())
        .collect();

    let allow_headers: Vec<HeaderName> = config
        .allowed_headers
        .iter()
        .filter_map(|h| h.parse().ok())
        .collect();

    let expose_headers: Vec<HeaderName> = config
        .exposed_headers
        .iter()
        .filter_map(|h| h.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(methods)
        .allow_headers(allow_headers)
        .expose_headers(expose_headers)
        .allow_credentials(config.allow_credentials)
        .max_age(Duration::from_secs(config.cors_max_age))
}
