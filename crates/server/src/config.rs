//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `MOTORPOOL_SESSION_SECRET` - Session secret (min 32 chars, not a placeholder)
//! - `MOTORPOOL_DATABASE_URL` - `PostgreSQL` connection string (only when
//!   `MOTORPOOL_BACKEND=postgres`; falls back to `DATABASE_URL`)
//!
//! ## Optional
//! - `MOTORPOOL_BACKEND` - Registry backend: `json` (default) or `postgres`
//! - `MOTORPOOL_DATA_DIR` - Flat-file data directory (default: data)
//! - `MOTORPOOL_REDIS_URL` - User store connection string
//!   (default: redis://127.0.0.1:6379; falls back to `REDIS_URL`)
//! - `MOTORPOOL_UPLOAD_DIR` - Picture upload directory (default: uploads)
//! - `MOTORPOOL_HOST` - Bind address (default: 127.0.0.1)
//! - `PORT` - Listen port (default: 8080)
//! - `MOTORPOOL_BASE_URL` - Public URL (default: `http://localhost:8080`)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_SESSION_SECRET_LENGTH: usize = 32;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "insert",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Which store backs the registry entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Flat-file JSON store (teaching-toy; default).
    Json,
    /// `PostgreSQL` via sqlx.
    Postgres,
}

/// Server application configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Registry backend selection
    pub backend: BackendKind,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL, used to decide whether cookies are secure
    pub base_url: String,
    /// Session secret
    pub session_secret: SecretString,
    /// `PostgreSQL` connection URL (contains password); postgres backend only
    pub database_url: Option<SecretString>,
    /// Directory holding `people.json`, `cars.json`, `stores.json`
    pub data_dir: PathBuf,
    /// User store (redis) connection string
    pub redis_url: String,
    /// Directory uploaded pictures are written to
    pub upload_dir: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid,
    /// or if the session secret fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let backend = parse_backend(&get_env_or_default("MOTORPOOL_BACKEND", "json"))?;
        let host = get_env_or_default("MOTORPOOL_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("MOTORPOOL_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("PORT", "8080")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("PORT".to_string(), e.to_string()))?;
        let base_url = get_env_or_default("MOTORPOOL_BASE_URL", "http://localhost:8080");

        let session_secret =
            SecretString::from(get_required_env("MOTORPOOL_SESSION_SECRET")?);
        validate_session_secret(&session_secret, "MOTORPOOL_SESSION_SECRET")?;

        // The database URL is only required for the postgres backend
        let database_url = get_database_url("MOTORPOOL_DATABASE_URL");
        if backend == BackendKind::Postgres && database_url.is_none() {
            return Err(ConfigError::MissingEnvVar(
                "MOTORPOOL_DATABASE_URL".to_string(),
            ));
        }

        let data_dir = PathBuf::from(get_env_or_default("MOTORPOOL_DATA_DIR", "data"));
        let redis_url = get_optional_env("MOTORPOOL_REDIS_URL")
            .or_else(|| get_optional_env("REDIS_URL"))
            .unwrap_or_else(|| "redis://127.0.0.1:6379".to_string());
        let upload_dir = PathBuf::from(get_env_or_default("MOTORPOOL_UPLOAD_DIR", "uploads"));
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            backend,
            host,
            port,
            base_url,
            session_secret,
            database_url,
            data_dir,
            redis_url,
            upload_dir,
            sentry_dsn,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse the backend selector.
fn parse_backend(value: &str) -> Result<BackendKind, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "json" | "file" => Ok(BackendKind::Json),
        "postgres" | "pg" => Ok(BackendKind::Postgres),
        other => Err(ConfigError::InvalidEnvVar(
            "MOTORPOOL_BACKEND".to_string(),
            format!("unknown backend '{other}' (expected json or postgres)"),
        )),
    }
}

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Option<SecretString> {
    std::env::var(primary_key)
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()
        .map(SecretString::from)
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Validate that a session secret is long enough and not a placeholder.
fn validate_session_secret(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_SESSION_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_SESSION_SECRET_LENGTH,
                value.len()
            ),
        ));
    }

    let lower = value.to_lowercase();
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_backend() {
        assert_eq!(parse_backend("json").unwrap(), BackendKind::Json);
        assert_eq!(parse_backend("Postgres").unwrap(), BackendKind::Postgres);
        assert_eq!(parse_backend("pg").unwrap(), BackendKind::Postgres);
        assert!(parse_backend("mongo").is_err());
    }

    #[test]
    fn test_validate_session_secret_too_short() {
        let secret = SecretString::from("short");
        assert!(validate_session_secret(&secret, "TEST_SESSION").is_err());
    }

    #[test]
    fn test_validate_session_secret_placeholder() {
        let secret = SecretString::from("changeme-changeme-changeme-changeme");
        assert!(validate_session_secret(&secret, "TEST_SESSION").is_err());
    }

    #[test]
    fn test_validate_session_secret_valid() {
        let secret = SecretString::from("fJ8zK2mQ9xV4bN7cW1pR5tY0uA3eH6dL");
        assert!(validate_session_secret(&secret, "TEST_SESSION").is_ok());
    }

    #[test]
    fn test_socket_addr() {
        let config = ServerConfig {
            backend: BackendKind::Json,
            host: "127.0.0.1".parse().unwrap(),
            port: 8080,
            base_url: "http://localhost:8080".to_string(),
            session_secret: SecretString::from("x".repeat(32)),
            database_url: None,
            data_dir: PathBuf::from("data"),
            redis_url: "redis://127.0.0.1:6379".to_string(),
            upload_dir: PathBuf::from("uploads"),
            sentry_dsn: None,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 8080);
    }
}
