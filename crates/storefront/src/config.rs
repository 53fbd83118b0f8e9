//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//! - `STOREFRONT_API_URL` - Base URL of the REST API (default: `http://localhost:5000/api`)
//! - `STOREFRONT_DATA_DIR` - Directory for the persisted cart/session (default: `.atelier`)
//! - `STOREFRONT_GUEST_CHECKOUT` - Allow checkout without logging in (default: true)
//! - `STOREFRONT_REQUEST_TIMEOUT_SECS` - HTTP timeout in seconds (default: 30)
//! - `STOREFRONT_CACHE_TTL_SECS` - Product cache lifetime in seconds (default: 300)
//! - `UPLOAD_URL` - Image upload endpoint (requires `UPLOAD_PRESET`)
//! - `UPLOAD_PRESET` - Unsigned upload preset for the image host
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "http://localhost:5000/api";
const DEFAULT_DATA_DIR: &str = ".atelier";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Base URL every API path is joined onto
    pub api_url: Url,
    /// Directory holding the durable store records
    pub data_dir: PathBuf,
    /// Whether orders may be placed without a session
    pub guest_checkout: bool,
    /// Per-request HTTP timeout
    pub request_timeout: Duration,
    /// How long product responses stay cached
    pub cache_ttl: Duration,
    /// Image upload endpoint, if configured
    pub upload: Option<UploadConfig>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. "production")
    pub sentry_environment: Option<String>,
}

/// Image host upload configuration.
///
/// Implements `Debug` manually to redact the preset.
#[derive(Clone)]
pub struct UploadConfig {
    /// Multipart upload endpoint
    pub url: Url,
    /// Upload preset sent with every file
    pub preset: SecretString,
}

impl std::fmt::Debug for UploadConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadConfig")
            .field("url", &self.url.as_str())
            .field("preset", &"[REDACTED]")
            .finish()
    }
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            guest_checkout: true,
            request_timeout: Duration::from_secs(30),
            cache_ttl: Duration::from_secs(300),
            upload: None,
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but malformed, or if
    /// only one of `UPLOAD_URL`/`UPLOAD_PRESET` is set.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_url = parse_url(
            "STOREFRONT_API_URL",
            &get_env_or_default("STOREFRONT_API_URL", DEFAULT_API_URL),
        )?;
        let data_dir = PathBuf::from(get_env_or_default("STOREFRONT_DATA_DIR", DEFAULT_DATA_DIR));
        let guest_checkout = get_optional_env("STOREFRONT_GUEST_CHECKOUT")
            .map(|v| parse_bool("STOREFRONT_GUEST_CHECKOUT", &v))
            .transpose()?
            .unwrap_or(true);
        let request_timeout = parse_secs(
            "STOREFRONT_REQUEST_TIMEOUT_SECS",
            &get_env_or_default("STOREFRONT_REQUEST_TIMEOUT_SECS", "30"),
        )?;
        let cache_ttl = parse_secs(
            "STOREFRONT_CACHE_TTL_SECS",
            &get_env_or_default("STOREFRONT_CACHE_TTL_SECS", "300"),
        )?;
        let upload = UploadConfig::from_env()?;

        Ok(Self {
            api_url,
            data_dir,
            guest_checkout,
            request_timeout,
            cache_ttl,
            upload,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Point the client at a different API base URL.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if `api_url` is not an http(s) URL.
    pub fn with_api_url(mut self, api_url: &str) -> Result<Self, ConfigError> {
        self.api_url = parse_url("STOREFRONT_API_URL", api_url)?;
        Ok(self)
    }
}

impl UploadConfig {
    fn from_env() -> Result<Option<Self>, ConfigError> {
        match (get_optional_env("UPLOAD_URL"), get_optional_env("UPLOAD_PRESET")) {
            (None, None) => Ok(None),
            (Some(url), Some(preset)) => Ok(Some(Self {
                url: parse_endpoint("UPLOAD_URL", &url)?,
                preset: SecretString::from(preset),
            })),
            (Some(_), None) => Err(ConfigError::MissingEnvVar("UPLOAD_PRESET".to_string())),
            (None, Some(_)) => Err(ConfigError::MissingEnvVar("UPLOAD_URL".to_string())),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

#[allow(clippy::expect_used)] // constant input
fn default_api_url() -> Url {
    parse_url("STOREFRONT_API_URL", DEFAULT_API_URL).expect("default API URL is valid")
}

/// Get an optional environment variable, treating blank values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse an absolute http(s) URL as given.
fn parse_endpoint(key: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}

/// Parse a base URL for relative joins.
///
/// A trailing slash is added so joins keep the last path segment
/// (`.../api/` + `products` = `.../api/products`).
fn parse_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    let mut url = parse_endpoint(key, value)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Parse a boolean flag.
fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a boolean, got '{other}'"),
        )),
    }
}

/// Parse a whole number of seconds.
fn parse_secs(key: &str, value: &str) -> Result<Duration, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool_variants() {
        for yes in ["1", "true", "YES", " on "] {
            assert!(parse_bool("X", yes).unwrap());
        }
        for no in ["0", "False", "no", "off"] {
            assert!(!parse_bool("X", no).unwrap());
        }
        assert!(matches!(
            parse_bool("X", "maybe"),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
    }

    #[test]
    fn test_parse_url_adds_trailing_slash() {
        let url = parse_url("X", "https://shop.example.com/api").unwrap();
        assert_eq!(url.as_str(), "https://shop.example.com/api/");
        assert_eq!(
            url.join("products").unwrap().as_str(),
            "https://shop.example.com/api/products"
        );
    }

    #[test]
    fn test_parse_url_rejects_other_schemes() {
        assert!(parse_url("X", "ftp://files.example.com").is_err());
        assert!(parse_url("X", "not a url").is_err());
    }

    #[test]
    fn test_parse_endpoint_keeps_path() {
        let url = parse_endpoint("X", "https://upload.example.com/v1/image/upload").unwrap();
        assert_eq!(url.path(), "/v1/image/upload");
    }

    #[test]
    fn test_with_api_url() {
        let config = StorefrontConfig::default()
            .with_api_url("http://127.0.0.1:4000/api")
            .unwrap();
        assert_eq!(config.api_url.as_str(), "http://127.0.0.1:4000/api/");
    }

    #[test]
    fn test_parse_secs() {
        assert_eq!(parse_secs("X", "45").unwrap(), Duration::from_secs(45));
        assert!(parse_secs("X", "-1").is_err());
    }

    #[test]
    fn test_default_config() {
        let config = StorefrontConfig::default();
        assert_eq!(config.api_url.as_str(), "http://localhost:5000/api/");
        assert!(config.guest_checkout);
        assert!(config.upload.is_none());
    }

    #[test]
    fn test_upload_config_debug_redacts_preset() {
        let config = UploadConfig {
            url: Url::parse("https://upload.example.com/v1/image/upload").unwrap(),
            preset: SecretString::from("super_secret_preset"),
        };
        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("upload.example.com"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_preset"));
    }
}
