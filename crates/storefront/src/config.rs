//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `TIFFIN_API_BASE_URL` - Base URL of the platform products API
//!
//! ## Optional
//! - `TIFFIN_API_TOKEN` - Bearer token sent with every API request
//! - `TIFFIN_DATA_DIR` - Directory for the persisted cart (default: .tiffin)
//! - `TIFFIN_HTTP_TIMEOUT_SECS` - HTTP request timeout (default: 10)
//! - `TIFFIN_CACHE_TTL_SECS` - Product cache time-to-live (default: 300)

use std::path::PathBuf;
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

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Base URL of the platform products API
    pub api_base_url: Url,
    /// Bearer token for the products API, when the deployment requires one
    pub api_token: Option<SecretString>,
    /// Directory where the cart document is persisted
    pub data_dir: PathBuf,
    /// HTTP request timeout in seconds
    pub http_timeout_secs: u64,
    /// Product cache time-to-live in seconds
    pub cache_ttl_secs: u64,
}

impl StorefrontConfig {
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

        let api_base_url = get_required_env("TIFFIN_API_BASE_URL")?
            .parse::<Url>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("TIFFIN_API_BASE_URL".to_string(), e.to_string())
            })?;
        let api_token = get_optional_env("TIFFIN_API_TOKEN").map(SecretString::from);
        let data_dir = PathBuf::from(get_env_or_default("TIFFIN_DATA_DIR", ".tiffin"));
        let http_timeout_secs = get_env_or_default("TIFFIN_HTTP_TIMEOUT_SECS", "10")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("TIFFIN_HTTP_TIMEOUT_SECS".to_string(), e.to_string())
            })?;
        let cache_ttl_secs = get_env_or_default("TIFFIN_CACHE_TTL_SECS", "300")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("TIFFIN_CACHE_TTL_SECS".to_string(), e.to_string())
            })?;

        Ok(Self {
            api_base_url,
            api_token,
            data_dir,
            http_timeout_secs,
            cache_ttl_secs,
        })
    }

    /// HTTP request timeout as a [`Duration`].
    #[must_use]
    pub const fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// Product cache time-to-live as a [`Duration`].
    #[must_use]
    pub const fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
