//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `SMARTSTOCK_API_BASE_URL` - Base URL of the inventory service
//!   (default: `http://localhost:8000/api/`; a missing trailing slash is
//!   normalized so path joins behave)
//! - `SMARTSTOCK_SESSION_FILE` - Path of the persisted session file
//!   (default: `$HOME/.smartstock/session.json`)
//! - `SMARTSTOCK_HTTP_TIMEOUT_SECS` - Request timeout in seconds
//!   (default: 30)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/";
const DEFAULT_SESSION_DIR: &str = ".smartstock";
const DEFAULT_SESSION_FILE: &str = "session.json";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// SmartStock client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the inventory service; always ends with a slash.
    pub base_url: Url,
    /// Path of the persisted session file.
    pub session_file: PathBuf,
    /// Timeout applied to every HTTP request.
    pub http_timeout: Duration,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid, or if no
    /// session file location can be derived (no override and no `$HOME`).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let base_url = parse_base_url(
            "SMARTSTOCK_API_BASE_URL",
            &get_env_or_default("SMARTSTOCK_API_BASE_URL", DEFAULT_BASE_URL),
        )?;

        let session_file = match get_optional_env("SMARTSTOCK_SESSION_FILE") {
            Some(path) => PathBuf::from(path),
            None => default_session_file()?,
        };

        let http_timeout = get_env_or_default(
            "SMARTSTOCK_HTTP_TIMEOUT_SECS",
            &DEFAULT_TIMEOUT_SECS.to_string(),
        )
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|e| {
            ConfigError::InvalidEnvVar("SMARTSTOCK_HTTP_TIMEOUT_SECS".to_string(), e.to_string())
        })?;

        Ok(Self {
            base_url,
            session_file,
            http_timeout,
        })
    }

    /// Build a configuration directly, bypassing the environment.
    ///
    /// Used by tests and by callers that already know where the service
    /// lives.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `base_url` is not a valid absolute URL.
    pub fn new(base_url: &str, session_file: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url("base_url", base_url)?,
            session_file: session_file.into(),
            http_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse a base URL, normalizing it to end with a slash.
///
/// `Url::join` treats the last path segment of a slash-less base as a file
/// and replaces it; the fixed path suffixes of the API contract assume a
/// directory-style base.
fn parse_base_url(name: &str, raw: &str) -> Result<Url, ConfigError> {
    let mut url = Url::parse(raw)
        .map_err(|e| ConfigError::InvalidEnvVar(name.to_string(), e.to_string()))?;

    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidEnvVar(
            name.to_string(),
            "not a usable base URL".to_string(),
        ));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}

/// Default session file location under the user's home directory.
fn default_session_file() -> Result<PathBuf, ConfigError> {
    let home = get_optional_env("HOME")
        .ok_or_else(|| ConfigError::MissingEnvVar("SMARTSTOCK_SESSION_FILE or HOME".to_string()))?;

    Ok(PathBuf::from(home)
        .join(DEFAULT_SESSION_DIR)
        .join(DEFAULT_SESSION_FILE))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_base_url_keeps_trailing_slash() {
        let url = parse_base_url("TEST", "http://localhost:8000/api/").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/");
    }

    #[test]
    fn test_parse_base_url_adds_missing_slash() {
        let url = parse_base_url("TEST", "http://localhost:8000/api").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/");

        // Joining a fixed suffix now appends instead of replacing.
        assert_eq!(
            url.join("products/").unwrap().as_str(),
            "http://localhost:8000/api/products/"
        );
    }

    #[test]
    fn test_parse_base_url_rejects_garbage() {
        let result = parse_base_url("TEST", "not a url");
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(_, _))));
    }

    #[test]
    fn test_new_uses_default_timeout() {
        let config = ClientConfig::new("http://127.0.0.1:9999/api", "/tmp/session.json").unwrap();
        assert_eq!(config.http_timeout, Duration::from_secs(30));
        assert_eq!(config.session_file, PathBuf::from("/tmp/session.json"));
    }
}
