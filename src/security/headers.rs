//! Security response headers.
//!
//! Applies the header set from `SecurityConfig` to every response unless a
//! handler already set the header itself.

use axum::http::header::{
    HeaderValue, CONTENT_SECURITY_POLICY, STRICT_TRANSPORT_SECURITY, X_CONTENT_TYPE_OPTIONS,
    X_FRAME_OPTIONS, X_XSS_PROTECTION,
};
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::SecurityConfig;

/// Layer the configured security headers onto a router.
pub fn apply(mut router: Router, config: &SecurityConfig) -> Router {
    if let Some(value) = header_value("X-Frame-Options", &config.frame_options) {
        router = router.layer(SetResponseHeaderLayer::if_not_present(
            X_FRAME_OPTIONS,
            value,
        ));
    }

    if config.content_type_nosniff {
        router = router.layer(SetResponseHeaderLayer::if_not_present(
            X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ));
    }

    if config.xss_protection {
        router = router.layer(SetResponseHeaderLayer::if_not_present(
            X_XSS_PROTECTION,
            HeaderValue::from_static("1; mode=block"),
        ));
    }

    if let Some(value) = header_value("Content-Security-Policy", &config.content_security_policy)
    {
        router = router.layer(SetResponseHeaderLayer::if_not_present(
            CONTENT_SECURITY_POLICY,
            value,
        ));
    }

    if config.enable_hsts {
        let hsts = format!("max-age={}; includeSubDomains", config.hsts_max_age);
        if let Some(value) = header_value("Strict-Transport-Security", &hsts) {
            router = router.layer(SetResponseHeaderLayer::if_not_present(
                STRICT_TRANSPORT_SECURITY,
                value,
            ));
        }
    }

    router
}

fn header_value(name: &str, raw: &str) -> Option<HeaderValue> {
    match HeaderValue::from_str(raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(header = name, value = raw, error = %e, "dropping unparsable security header");
            None
        }
    }
}
