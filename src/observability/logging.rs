//! Structured logging initialization.
//!
//! # Design Decisions
//! - Initialized exactly once, in `main`, before configuration loads so the
//!   loader's default-applied warnings are captured
//! - `RUST_LOG` always wins; otherwise the level falls back on the `ENV`
//!   deployment name (debug in development, info elsewhere)

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global tracing subscriber.
///
/// Reads `ENV` directly because the config loader itself logs through this
/// subscriber; the value is re-validated by the loader immediately after.
pub fn init() {
    let default_directive = match std::env::var("ENV").as_deref() {
        Ok("development") => "storefront_api=debug,tower_http=debug",
        _ => "storefront_api=info",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directive.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
