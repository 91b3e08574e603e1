//! Store configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional. Without a database URL the store runs on the
//! in-memory demo catalog and in-memory sessions.
//!
//! - `STORE_HOST` - Bind address (default: 127.0.0.1)
//! - `STORE_PORT` - Listen port (default: 8000)
//! - `STORE_BASE_URL` - Public URL for the store (default: <http://localhost:8000>)
//! - `STORE_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `STORE_MEDIA_ROOT` - Directory for uploaded images (default: media)
//! - `STORE_MEDIA_URL` - URL prefix uploaded images are served under (default: /media)
//! - `STORE_MAX_UPLOAD_BYTES` - Request body limit for uploads (default: 5 MiB)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_TRACES_SAMPLE_RATE` - Sentry transaction sample rate (default: 0.0)

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;

/// Default upload limit (5 MiB).
const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Store application configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: Option<SecretString>,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the store
    pub base_url: String,
    /// Directory uploaded images are written to
    pub media_root: PathBuf,
    /// URL prefix uploaded images are served under
    pub media_url: String,
    /// Maximum accepted request body for image uploads
    pub max_upload_bytes: usize,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Sentry transaction sample rate
    pub sentry_traces_sample_rate: f32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 8000,
            base_url: "http://localhost:8000".to_owned(),
            media_root: PathBuf::from("media"),
            media_url: "/media".to_owned(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_traces_sample_rate: 0.0,
        }
    }
}

impl StoreConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let defaults = Self::default();

        let host = parse_env("STORE_HOST", defaults.host)?;
        let port = parse_env("STORE_PORT", defaults.port)?;
        let max_upload_bytes = parse_env("STORE_MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?;
        let sentry_traces_sample_rate = parse_env(
            "SENTRY_TRACES_SAMPLE_RATE",
            defaults.sentry_traces_sample_rate,
        )?;

        let media_url = get_optional_env("STORE_MEDIA_URL")
            .map(|url| url.trim().trim_end_matches('/').to_owned())
            .filter(|url| !url.is_empty())
            .unwrap_or(defaults.media_url);

        Ok(Self {
            database_url: get_database_url("STORE_DATABASE_URL"),
            host,
            port,
            base_url: get_optional_env("STORE_BASE_URL").unwrap_or(defaults.base_url),
            media_root: get_optional_env("STORE_MEDIA_ROOT")
                .map_or(defaults.media_root, PathBuf::from),
            media_url,
            max_upload_bytes,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether uploaded images are served by this process.
    ///
    /// True when the media URL is a local path such as `/media`; an absolute
    /// URL means another server hosts the files.
    #[must_use]
    pub fn serves_media(&self) -> bool {
        self.media_url.starts_with('/')
    }

    /// Whether session cookies should carry the `Secure` flag.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Option<SecretString> {
    get_optional_env(primary_key)
        .or_else(|| get_optional_env("DATABASE_URL"))
        .map(SecretString::from)
}

/// Get an optional, non-empty environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Parse an environment variable, falling back to a default when unset.
fn parse_env<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_optional_env(key).map_or(Ok(default), |raw| {
        raw.trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_socket_addr() {
        let config = StoreConfig {
            host: "0.0.0.0".parse().unwrap(),
            port: 9000,
            ..StoreConfig::default()
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "0.0.0.0");
        assert_eq!(addr.port(), 9000);
    }

    #[test]
    fn test_defaults() {
        let config = StoreConfig::default();
        assert!(config.database_url.is_none());
        assert_eq!(config.port, 8000);
        assert_eq!(config.media_url, "/media");
        assert!(!config.is_secure());
    }

    #[test]
    fn test_serves_media_only_for_local_paths() {
        assert!(StoreConfig::default().serves_media());

        let config = StoreConfig {
            media_url: "https://cdn.example.com/media".to_owned(),
            ..StoreConfig::default()
        };
        assert!(!config.serves_media());
    }

    #[test]
    fn test_is_secure_for_https_base_url() {
        let config = StoreConfig {
            base_url: "https://shop.example.com".to_owned(),
            ..StoreConfig::default()
        };
        assert!(config.is_secure());
    }

    #[test]
    fn test_parse_env_missing_uses_default() {
        let port: u16 = parse_env("TUTORIAL_STORE_TEST_UNSET_PORT", 1234).unwrap();
        assert_eq!(port, 1234);
    }

    #[test]
    fn test_debug_redacts_database_url() {
        let config = StoreConfig {
            database_url: Some(SecretString::from("postgres://user:hunter2@db/store")),
            ..StoreConfig::default()
        };

        let debug_output = format!("{config:?}");
        assert!(!debug_output.contains("hunter2"));
    }
}
