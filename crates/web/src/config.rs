//! Web server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SHOPPING_LIST_DATABASE_URL` - `PostgreSQL` connection string
//!   (falls back to `DATABASE_URL`)
//!
//! ## Optional
//! - `SHOPPING_LIST_HOST` - Bind address (default: 127.0.0.1)
//! - `SHOPPING_LIST_PORT` - Listen port (falls back to `PORT`, default: 8080)
//! - `SHOPPING_LIST_BASE_URL` - Public URL (default: `http://localhost:{port}`)
//! - `SHOPPING_LIST_SESSION_TTL_SECS` - Session inactivity expiry (default: 1000)
//! - `SHOPPING_LIST_STATIC_DIR` - Stylesheet directory served at `/css`
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)
//! - `LOG_FORMAT` - `text` (default) or `json`

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;

use secrecy::SecretString;
use thiserror::Error;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_SESSION_TTL_SECS: i64 = 1000;
const DEFAULT_STATIC_DIR: &str = "crates/web/static";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event, for log shippers.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("text") {
            Ok(Self::Text)
        } else if s.eq_ignore_ascii_case("json") {
            Ok(Self::Json)
        } else {
            Err(format!("expected `text` or `json`, got `{s}`"))
        }
    }
}

/// Web application configuration.
///
/// Implements `Debug` manually to redact the database URL.
#[derive(Clone)]
pub struct WebConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL of the site
    pub base_url: String,
    /// Session inactivity expiry in seconds
    pub session_ttl_secs: i64,
    /// Directory with the stylesheet served under `/css`
    pub static_dir: String,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Fraction of errors sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions sent to Sentry
    pub sentry_traces_sample_rate: f32,
    /// Log output format
    pub log_format: LogFormat,
}

impl std::fmt::Debug for WebConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebConfig")
            .field("database_url", &"[REDACTED]")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("base_url", &self.base_url)
            .field("session_ttl_secs", &self.session_ttl_secs)
            .field("static_dir", &self.static_dir)
            .field("sentry_dsn", &self.sentry_dsn.as_ref().map(|_| "[REDACTED]"))
            .field("sentry_environment", &self.sentry_environment)
            .field("sentry_sample_rate", &self.sentry_sample_rate)
            .field("sentry_traces_sample_rate", &self.sentry_traces_sample_rate)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl WebConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env { lookup };

        let database_url = env
            .first_of(&["SHOPPING_LIST_DATABASE_URL", "DATABASE_URL"])
            .map(SecretString::from)
            .ok_or_else(|| ConfigError::MissingEnvVar("SHOPPING_LIST_DATABASE_URL".to_string()))?;

        let host = env.parsed_or("SHOPPING_LIST_HOST", IpAddr::V4(Ipv4Addr::LOCALHOST))?;

        let port = match env.first_of(&["SHOPPING_LIST_PORT", "PORT"]) {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|e| ConfigError::InvalidEnvVar("SHOPPING_LIST_PORT".to_string(), e.to_string()))?,
            None => DEFAULT_PORT,
        };

        let base_url = env
            .get("SHOPPING_LIST_BASE_URL")
            .unwrap_or_else(|| format!("http://localhost:{port}"));

        let session_ttl_secs =
            env.parsed_or("SHOPPING_LIST_SESSION_TTL_SECS", DEFAULT_SESSION_TTL_SECS)?;
        if session_ttl_secs <= 0 {
            return Err(ConfigError::InvalidEnvVar(
                "SHOPPING_LIST_SESSION_TTL_SECS".to_string(),
                "must be positive".to_string(),
            ));
        }

        let static_dir = env
            .get("SHOPPING_LIST_STATIC_DIR")
            .unwrap_or_else(|| DEFAULT_STATIC_DIR.to_string());

        let sentry_sample_rate = env.parsed_or("SENTRY_SAMPLE_RATE", 1.0)?;
        let sentry_traces_sample_rate = env.parsed_or("SENTRY_TRACES_SAMPLE_RATE", 0.0)?;
        let log_format = env.parsed_or("LOG_FORMAT", LogFormat::default())?;

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            session_ttl_secs,
            static_dir,
            sentry_dsn: env.get("SENTRY_DSN"),
            sentry_environment: env.get("SENTRY_ENVIRONMENT"),
            sentry_sample_rate,
            sentry_traces_sample_rate,
            log_format,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the site is served over HTTPS (enables `Secure` cookies).
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Variable lookup with the parsing helpers used by [`WebConfig::from_lookup`].
struct Env<F> {
    lookup: F,
}

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Get a variable, treating empty values as unset.
    fn get(&self, key: &str) -> Option<String> {
        (self.lookup)(key).filter(|v| !v.trim().is_empty())
    }

    /// Get the first variable that is set.
    fn first_of(&self, keys: &[&str]) -> Option<String> {
        keys.iter().find_map(|key| self.get(key))
    }

    /// Parse a variable, returning `default` if it is unset.
    fn parsed_or<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get(key) {
            Some(raw) => raw
                .trim()
                .parse::<T>()
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
            None => Ok(default),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<WebConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        WebConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("SHOPPING_LIST_DATABASE_URL", "postgres://localhost/shop")]).unwrap();

        assert_eq!(config.database_url.expose_secret(), "postgres://localhost/shop");
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8080");
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.session_ttl_secs, 1000);
        assert_eq!(config.static_dir, "crates/web/static");
        assert!(config.sentry_dsn.is_none());
        assert!(!config.is_secure());
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn test_log_format() {
        let config = load(&[("DATABASE_URL", "postgres://x"), ("LOG_FORMAT", "JSON")]).unwrap();
        assert_eq!(config.log_format, LogFormat::Json);

        let err = load(&[("DATABASE_URL", "postgres://x"), ("LOG_FORMAT", "xml")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "LOG_FORMAT"));
    }

    #[test]
    fn test_missing_database_url() {
        let err = load(&[]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref key) if key == "SHOPPING_LIST_DATABASE_URL"));
    }

    #[test]
    fn test_database_url_fallback() {
        let config = load(&[("DATABASE_URL", "postgres://fly/db")]).unwrap();
        assert_eq!(config.database_url.expose_secret(), "postgres://fly/db");
    }

    #[test]
    fn test_port_fallback_and_override() {
        let config = load(&[("DATABASE_URL", "postgres://x"), ("PORT", "9000")]).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.base_url, "http://localhost:9000");

        let config = load(&[
            ("DATABASE_URL", "postgres://x"),
            ("PORT", "9000"),
            ("SHOPPING_LIST_PORT", "9100"),
        ])
        .unwrap();
        assert_eq!(config.port, 9100);
    }

    #[test]
    fn test_invalid_port() {
        let err = load(&[("DATABASE_URL", "postgres://x"), ("SHOPPING_LIST_PORT", "http")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_invalid_host() {
        let err = load(&[("DATABASE_URL", "postgres://x"), ("SHOPPING_LIST_HOST", "localhost")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "SHOPPING_LIST_HOST"));
    }

    #[test]
    fn test_non_positive_session_ttl() {
        let err = load(&[
            ("DATABASE_URL", "postgres://x"),
            ("SHOPPING_LIST_SESSION_TTL_SECS", "0"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_https_base_url_is_secure() {
        let config = load(&[
            ("DATABASE_URL", "postgres://x"),
            ("SHOPPING_LIST_BASE_URL", "https://lists.example.com"),
        ])
        .unwrap();
        assert!(config.is_secure());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = load(&[
            ("DATABASE_URL", "postgres://user:hunter2@db/shop"),
            ("SENTRY_DSN", "https://key@sentry.example.com/1"),
        ])
        .unwrap();

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("hunter2"));
        assert!(!debug_output.contains("key@sentry"));
    }
}
