//! Configuration loading from the process environment.
//!
//! Required keys abort startup when absent; optional keys fall back to
//! documented defaults with a warning diagnostic. Loading is a pure function
//! of the environment (plus diagnostics), so loading twice from the same
//! environment yields equal trees.

use thiserror::Error;

use crate::config::schema::{AppConfig, Config, DatabaseConfig, SecurityConfig};

/// Default for `DATABASE_MAX_CONNECTIONS`.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 25;
/// Default for `DATABASE_MIN_CONNECTIONS`.
pub const DEFAULT_MIN_CONNECTIONS: u32 = 5;
/// Default for `RATE_LIMIT_ENABLED`.
pub const DEFAULT_RATE_LIMIT_ENABLED: bool = true;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is absent.
    #[error("{0} environment variable is required")]
    MissingKey(&'static str),

    /// A required environment variable is present but unusable.
    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl Config {
    /// Load and validate configuration from the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// `load` passes `std::env::var`; tests pass a map so they never touch
    /// (or race on) global process state.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let app = load_app(&lookup)?;
        let security = load_security(&lookup, &app)?;
        let database = load_database(&lookup)?;
        Ok(Self {
            app,
            security,
            database,
        })
    }
}

fn load_app<F>(lookup: &F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let environment = required(lookup, "ENV")?;

    // API_PORT is the canonical key; PORT is honored for platforms that
    // inject it (Heroku-style).
    let (key, raw) = match non_empty(lookup("API_PORT")) {
        Some(raw) => ("API_PORT", raw),
        None => match non_empty(lookup("PORT")) {
            Some(raw) => ("PORT", raw),
            None => return Err(ConfigError::MissingKey("API_PORT")),
        },
    };
    let port = raw.parse::<u16>().map_err(|e| ConfigError::Invalid {
        key,
        value: raw.clone(),
        reason: e.to_string(),
    })?;

    Ok(AppConfig { environment, port })
}

fn load_security<F>(lookup: &F, app: &AppConfig) -> Result<SecurityConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let origins_raw = required(lookup, "ALLOWED_ORIGINS")?;
    let allowed_origins: Vec<String> = origins_raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();
    if allowed_origins.is_empty() {
        return Err(ConfigError::Invalid {
            key: "ALLOWED_ORIGINS",
            value: origins_raw,
            reason: "no origins listed".to_string(),
        });
    }

    let (rate_limit_enabled, _) = optional_bool(
        lookup,
        "RATE_LIMIT_ENABLED",
        DEFAULT_RATE_LIMIT_ENABLED,
    );

    Ok(SecurityConfig::with_defaults(
        app,
        allowed_origins,
        rate_limit_enabled,
    ))
}

fn load_database<F>(lookup: &F) -> Result<DatabaseConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let url = required(lookup, "DATABASE_URL")?;
    let (max_connections, _) = optional_u32(
        lookup,
        "DATABASE_MAX_CONNECTIONS",
        DEFAULT_MAX_CONNECTIONS,
    );
    let (min_connections, _) = optional_u32(
        lookup,
        "DATABASE_MIN_CONNECTIONS",
        DEFAULT_MIN_CONNECTIONS,
    );
    Ok(DatabaseConfig::with_defaults(
        url,
        max_connections,
        min_connections,
    ))
}

fn required<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    non_empty(lookup(key)).ok_or(ConfigError::MissingKey(key))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Read an optional numeric key, falling back to `default` when the key is
/// absent or unparsable. Returns whether the default was applied.
pub fn optional_u32<F>(lookup: &F, key: &'static str, default: u32) -> (u32, bool)
where
    F: Fn(&str) -> Option<String>,
{
    match non_empty(lookup(key)) {
        None => {
            tracing::warn!(key, default, "environment variable not set, using default");
            (default, true)
        }
        Some(raw) => match raw.parse::<u32>() {
            Ok(parsed) => (parsed, false),
            Err(e) => {
                tracing::warn!(
                    key,
                    value = %raw,
                    default,
                    error = %e,
                    "failed to parse environment variable, using default"
                );
                (default, true)
            }
        },
    }
}

/// Read an optional boolean key with the same fallback policy as
/// [`optional_u32`]. Accepts `true`/`false`, `1`/`0`, case-insensitive.
pub fn optional_bool<F>(lookup: &F, key: &'static str, default: bool) -> (bool, bool)
where
    F: Fn(&str) -> Option<String>,
{
    match non_empty(lookup(key)) {
        None => {
            tracing::warn!(key, default, "environment variable not set, using default");
            (default, true)
        }
        Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => (true, false),
            "false" | "0" => (false, false),
            _ => {
                tracing::warn!(
                    key,
                    value = %raw,
                    default,
                    "failed to parse environment variable, using default"
                );
                (default, true)
            }
        },
    }
}
