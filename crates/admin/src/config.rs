//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `API_BASE_URL` - Base URL of the retail backend (e.g. `http://localhost:5000/api`)
//!
//! ## Optional
//! - `API_TIMEOUT_SECS` - Per-request timeout for backend calls (default: 15)
//! - `ADMIN_HOST` - Bind address (default: 127.0.0.1)
//! - `ADMIN_PORT` - Listen port (default: 3001)
//! - `ADMIN_BASE_URL` - Public URL for the admin panel (default: `http://localhost:3001`);
//!   session cookies are marked `Secure` when it is https
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate, 0.0 to 1.0 (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate, 0.0 to 1.0 (default: 0.0)
//! - `LOG_FORMAT` - `json` for structured logs, anything else for text

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Admin application configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the admin panel
    pub base_url: String,
    /// Backend connection settings
    pub api: ApiConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<SecretString>,
    /// Sentry environment (e.g., "development", "staging", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
    /// Emit JSON logs
    pub json_logs: bool,
}

/// Retail backend connection settings.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: Url,
    pub timeout: Duration,
}

impl AdminConfig {
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

        let sentry_sample_rate = parse_env("SENTRY_SAMPLE_RATE", "1.0")?;
        let sentry_traces_sample_rate = parse_env("SENTRY_TRACES_SAMPLE_RATE", "0.0")?;
        validate_sample_rate("SENTRY_SAMPLE_RATE", sentry_sample_rate)?;
        validate_sample_rate("SENTRY_TRACES_SAMPLE_RATE", sentry_traces_sample_rate)?;

        Ok(Self {
            host: parse_env("ADMIN_HOST", "127.0.0.1")?,
            port: parse_env("ADMIN_PORT", "3001")?,
            base_url: get_env_or_default("ADMIN_BASE_URL", "http://localhost:3001"),
            api: ApiConfig::from_env()?,
            sentry_dsn: get_optional_env("SENTRY_DSN").map(SecretString::from),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate,
            sentry_traces_sample_rate,
            json_logs: get_optional_env("LOG_FORMAT")
                .is_some_and(|f| f.eq_ignore_ascii_case("json")),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the panel is served over HTTPS (secure cookies).
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl ApiConfig {
    /// Read `API_BASE_URL` and `API_TIMEOUT_SECS`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the URL is missing, unparsable, or not http(s),
    /// or the timeout is not a positive integer.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = parse_api_url(&get_required_env("API_BASE_URL")?)?;
        let secs: u64 = parse_env("API_TIMEOUT_SECS", "15")?;
        if secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "API_TIMEOUT_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            base_url,
            timeout: Duration::from_secs(secs),
        })
    }
}

fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw)
        .map_err(|e| ConfigError::InvalidEnvVar("API_BASE_URL".to_string(), e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidEnvVar(
            "API_BASE_URL".to_string(),
            format!("unsupported scheme '{other}'"),
        )),
    }
}

fn validate_sample_rate(key: &str, rate: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&rate) {
        Ok(())
    } else {
        Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("{rate} is outside 0.0..=1.0"),
        ))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable. Empty values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config(base_url: &str) -> AdminConfig {
        AdminConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3001,
            base_url: base_url.to_string(),
            api: ApiConfig {
                base_url: Url::parse("http://localhost:5000/api").unwrap(),
                timeout: Duration::from_secs(15),
            },
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
            json_logs: false,
        }
    }

    #[test]
    fn test_socket_addr() {
        let addr = config("http://localhost:3001").socket_addr();
        assert_eq!(addr.port(), 3001);
    }

    #[test]
    fn test_is_secure() {
        assert!(!config("http://localhost:3001").is_secure());
        assert!(config("https://admin.shop.in").is_secure());
    }

    #[test]
    fn test_validate_sample_rate() {
        assert!(validate_sample_rate("X", 0.5).is_ok());
        assert!(validate_sample_rate("X", 1.5).is_err());
    }

    #[test]
    fn test_parse_api_url_rejects_other_schemes() {
        assert!(parse_api_url("http://localhost:5000/api").is_ok());
        assert!(parse_api_url("file:///etc/passwd").is_err());
    }
}
