//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `PAYMALL_API_URL` - Base URL of the PayMall API (e.g., <https://api.paymall.app>)
//!
//! ## Optional
//! - `PAYMALL_HTTP_TIMEOUT_SECS` - Per-request timeout in seconds (default: 30).
//!   The silent token-refresh call deliberately carries no timeout of its own
//!   beyond this request timeout; see the `http` module.
//! - `PAYMALL_USER_AGENT` - User-Agent header (default: paymall-client/0.1)

use std::time::Duration;

use thiserror::Error;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_USER_AGENT: &str = concat!("paymall-client/", env!("CARGO_PKG_VERSION"));

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

/// PayMall client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the PayMall API, without a trailing slash.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// User-Agent header sent with every request.
    pub user_agent: String,
}

impl ClientConfig {
    /// Create a configuration for the given base URL with defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidBaseUrl` if the URL does not parse or is
    /// not http(s).
    pub fn new(base_url: impl Into<String>) -> Result<Self, ConfigError> {
        let base_url = base_url.into();
        let parsed = url::Url::parse(&base_url)
            .map_err(|e| ConfigError::InvalidBaseUrl(format!("{base_url}: {e}")))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(ConfigError::InvalidBaseUrl(format!(
                "{base_url}: scheme must be http or https"
            )));
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        })
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from a `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `PAYMALL_API_URL` is missing or invalid, or
    /// if an optional variable fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let base_url = std::env::var("PAYMALL_API_URL")
            .map_err(|_| ConfigError::MissingEnvVar("PAYMALL_API_URL".to_string()))?;
        let mut config = Self::new(base_url)?;

        if let Ok(secs) = std::env::var("PAYMALL_HTTP_TIMEOUT_SECS") {
            let secs: u64 = secs.parse().map_err(|_| {
                ConfigError::InvalidEnvVar(
                    "PAYMALL_HTTP_TIMEOUT_SECS".to_string(),
                    format!("not a number: {secs}"),
                )
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        if let Ok(agent) = std::env::var("PAYMALL_USER_AGENT") {
            config.user_agent = agent;
        }

        Ok(config)
    }

    /// Override the per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_base_url() {
        let config = ClientConfig::new("https://api.paymall.app").unwrap();
        assert_eq!(config.base_url, "https://api.paymall.app");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let config = ClientConfig::new("https://api.paymall.app/").unwrap();
        assert_eq!(config.base_url, "https://api.paymall.app");
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            ClientConfig::new("not a url"),
            Err(ConfigError::InvalidBaseUrl(_))
        ));
        assert!(matches!(
            ClientConfig::new("ftp://api.paymall.app"),
            Err(ConfigError::InvalidBaseUrl(_))
        ));
    }

    #[test]
    fn test_with_timeout() {
        let config = ClientConfig::new("http://localhost:8000")
            .unwrap()
            .with_timeout(Duration::from_secs(5));
        assert_eq!(config.timeout, Duration::from_secs(5));
    }
}
