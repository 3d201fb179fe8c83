//! Server configuration, loaded from environment variables at startup.

use std::path::PathBuf;
use std::time::Duration;

use registro_core::rate_limit::{DEFAULT_MAX_REQUESTS, DEFAULT_WINDOW};

/// Default cap on JSON request bodies.
pub const DEFAULT_MAX_BODY_BYTES: usize = 16 * 1024;

/// Runtime configuration for registro-server.
///
/// Every field has a default so the server starts without any environment
/// variables set.
#[derive(Debug, Clone)]
pub struct Config {
    /// TCP address to bind (default: `"0.0.0.0:{PORT}"`, `PORT` defaulting to 3001).
    pub bind_address: String,

    /// sqlx connection string (default: `"sqlite://registros.db"`).
    pub database_url: String,

    /// `tracing` filter string, e.g. `"info"` or `"debug,tower_http=warn"`.
    pub log_level: String,

    /// When `true`, emit log records as newline-delimited JSON.
    pub log_json: bool,

    /// When set, logs are also written to a daily rolling file here.
    pub log_dir: Option<PathBuf>,

    /// Comma-separated CORS origins; `None` allows any origin.
    pub cors_allowed_origins: Option<String>,

    /// Mount Swagger UI and the OpenAPI document.
    pub enable_swagger: bool,

    /// Creation requests allowed per client per window.
    pub rate_limit_max: u32,

    /// Rate-limit window length.
    pub rate_limit_window: Duration,

    /// Key the rate limiter on the first `X-Forwarded-For` address.
    pub trust_proxy: bool,

    /// Content filter rules in `word[:mask],...` form.
    pub denylist: Option<String>,

    /// Maximum accepted request body, in bytes.
    pub max_body_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl Config {
    /// Build [`Config`] from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build [`Config`] from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let env_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_owned());
        let flag = |key: &str, default: bool| {
            lookup(key)
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(default)
        };

        let bind_address = lookup("REGISTRO_BIND").unwrap_or_else(|| {
            let port: u16 = parse_value(lookup("PORT"), 3001);
            format!("0.0.0.0:{port}")
        });
        let database_url = lookup("REGISTRO_DATABASE_URL")
            .or_else(|| lookup("DATABASE_URL"))
            .unwrap_or_else(|| "sqlite://registros.db".to_owned());

        Self {
            bind_address,
            database_url,
            log_level: env_or("REGISTRO_LOG", "info"),
            log_json: flag("REGISTRO_LOG_JSON", false),
            log_dir: lookup("REGISTRO_LOG_DIR")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            cors_allowed_origins: lookup("REGISTRO_CORS_ORIGINS").filter(|v| !v.trim().is_empty()),
            enable_swagger: flag("REGISTRO_ENABLE_SWAGGER", true),
            rate_limit_max: parse_value(lookup("REGISTRO_RATE_LIMIT_MAX"), DEFAULT_MAX_REQUESTS),
            rate_limit_window: Duration::from_secs(parse_value(
                lookup("REGISTRO_RATE_LIMIT_WINDOW_SECS"),
                DEFAULT_WINDOW.as_secs(),
            )),
            trust_proxy: flag("REGISTRO_TRUST_PROXY", false),
            denylist: lookup("REGISTRO_DENYLIST").filter(|v| !v.trim().is_empty()),
            max_body_bytes: parse_value(lookup("REGISTRO_MAX_BODY_BYTES"), DEFAULT_MAX_BODY_BYTES),
        }
    }
}

// ── private helpers ──────────────────────────────────────────────────────────

fn parse_value<T: std::str::FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
