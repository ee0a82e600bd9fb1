//! Configuration schema definitions.
//!
//! The complete configuration tree for the service. Loaded once at startup
//! from the process environment (see `loader`), then shared read-only.

use std::time::Duration;

/// Root configuration for the service.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Application identity (environment name, listen port).
    pub app: AppConfig,

    /// CORS, security headers, timeouts, rate limiting.
    pub security: SecurityConfig,

    /// Connection pool tuning.
    pub database: DatabaseConfig,
}

/// Application identity configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Deployment environment name (e.g. "development", "production").
    pub environment: String,

    /// Port the HTTP listener binds on all interfaces.
    pub port: u16,
}

impl AppConfig {
    /// Whether this process runs in a development environment.
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Whether this process runs in a production environment.
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Security policy: CORS, response headers, timeouts, rate limiting.
#[derive(Debug, Clone, PartialEq)]
pub struct SecurityConfig {
    /// Origins allowed by CORS (exact match).
    pub allowed_origins: Vec<String>,

    /// Methods allowed by CORS.
    pub allowed_methods: Vec<String>,

    /// Request headers allowed by CORS.
    pub allowed_headers: Vec<String>,

    /// Response headers exposed to browsers.
    pub exposed_headers: Vec<String>,

    /// Whether CORS responses allow credentials.
    pub allow_credentials: bool,

    /// Preflight cache lifetime in seconds.
    pub cors_max_age: u64,

    /// Whether Strict-Transport-Security is emitted (production only).
    pub enable_hsts: bool,

    /// HSTS max-age in seconds.
    pub hsts_max_age: u64,

    /// X-Frame-Options value.
    pub frame_options: String,

    /// Emit X-Content-Type-Options: nosniff.
    pub content_type_nosniff: bool,

    /// Emit X-XSS-Protection: 1; mode=block.
    pub xss_protection: bool,

    /// Content-Security-Policy value.
    pub content_security_policy: String,

    /// Maximum time a handler may take to produce a response.
    pub read_timeout: Duration,

    /// Maximum time allowed to write a response.
    pub write_timeout: Duration,

    /// Keep-alive idle timeout.
    pub idle_timeout: Duration,

    /// Whether per-client rate limiting is enforced.
    pub rate_limit_enabled: bool,

    /// Window the rate-limit burst refills over.
    pub rate_limit_per: Duration,

    /// Requests allowed per window per client.
    pub rate_limit_burst: u32,
}

impl SecurityConfig {
    /// Policy defaults applied on top of required/optional env input.
    ///
    /// HSTS is enabled only in production; browsers cache it aggressively,
    /// which breaks plain-HTTP local development.
    pub fn with_defaults(app: &AppConfig, allowed_origins: Vec<String>, rate_limit_enabled: bool) -> Self {
        Self {
            allowed_origins,
            allowed_methods: ["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"]
                .map(String::from)
                .to_vec(),
            allowed_headers: [
                "Accept",
                "Authorization",
                "Content-Type",
                "X-CSRF-Token",
                "X-Request-ID",
            ]
            .map(String::from)
            .to_vec(),
            exposed_headers: ["Link", "X-Total-Count"].map(String::from).to_vec(),
            allow_credentials: true,
            cors_max_age: 300,

            enable_hsts: app.is_production(),
            hsts_max_age: 31_536_000, // 1 year
            frame_options: "DENY".to_string(),
            content_type_nosniff: true,
            xss_protection: true,
            content_security_policy: "default-src 'self'".to_string(),

            read_timeout: Duration::from_secs(15),
            write_timeout: Duration::from_secs(15),
            idle_timeout: Duration::from_secs(60),

            rate_limit_enabled,
            rate_limit_per: Duration::from_secs(60),
            rate_limit_burst: 100,
        }
    }
}

/// Connection pool configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseConfig {
    /// Postgres connection URL.
    pub url: String,

    /// Upper bound on pooled connections.
    pub max_connections: u32,

    /// Connections kept open even when idle.
    pub min_connections: u32,

    /// Maximum lifetime of a single connection.
    pub max_conn_lifetime: Duration,

    /// Idle time after which a connection is reaped.
    pub max_conn_idle_time: Duration,

    /// Period of the background liveness monitor.
    pub health_check_period: Duration,
}

impl DatabaseConfig {
    /// Fixed pool tuning applied on top of env-derived sizing.
    pub fn with_defaults(url: String, max_connections: u32, min_connections: u32) -> Self {
        Self {
            url,
            max_connections,
            min_connections,
            max_conn_lifetime: Duration::from_secs(60 * 60),
            max_conn_idle_time: Duration::from_secs(30 * 60),
            health_check_period: Duration::from_secs(60),
        }
    }
}
