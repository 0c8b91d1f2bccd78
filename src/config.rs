//! Backend connection settings.
//!
//! The base URL is baked in at build time from `BOOKMARK_API_URL`; timeouts are
//! fixed constants.

use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Base URL used when `BOOKMARK_API_URL` is not set at build time
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/v1";

/// Timeout for interactive calls
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for bulk operations such as re-vectorizing every bookmark
pub const BULK_TIMEOUT: Duration = Duration::from_secs(300);

/// Timeout for uploading a bookmarks export file
pub const UPLOAD_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid API base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    pub(crate) base_url: String,
    pub(crate) timeout: Duration,
    pub(crate) bulk_timeout: Duration,
    pub(crate) upload_timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: option_env!("BOOKMARK_API_URL")
                .unwrap_or(DEFAULT_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            timeout: DEFAULT_TIMEOUT,
            bulk_timeout: BULK_TIMEOUT,
            upload_timeout: UPLOAD_TIMEOUT,
        }
    }
}

impl ApiConfig {
    /// Create a configuration for the given base URL.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let parsed = Url::parse(base_url).map_err(|e| ConfigError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            ..Self::default()
        })
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_bulk_timeout(mut self, timeout: Duration) -> Self {
        self.bulk_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_upload_timeout(mut self, timeout: Duration) -> Self {
        self.upload_timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn bulk_timeout(&self) -> Duration {
        self.bulk_timeout
    }

    pub fn upload_timeout(&self) -> Duration {
        self.upload_timeout
    }

    /// Join an API path onto the base URL with exactly one separator
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Liveness check URL. The service serves it from the server root, outside
    /// the versioned API prefix.
    pub fn health_url(&self) -> String {
        Url::parse(&self.base_url)
            .and_then(|base| base.join("/health"))
            .map(String::from)
            .unwrap_or_else(|_| self.endpoint("health"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ApiConfig::default();
        assert!(config.base_url().starts_with("http"));
        assert!(!config.base_url().ends_with('/'));
        assert_eq!(config.timeout(), DEFAULT_TIMEOUT);
        assert_eq!(config.bulk_timeout(), BULK_TIMEOUT);
        assert_eq!(config.upload_timeout(), UPLOAD_TIMEOUT);
    }

    #[test]
    fn test_health_url_is_rooted_at_origin() {
        let config = ApiConfig::new(DEFAULT_BASE_URL).unwrap();
        assert_eq!(config.health_url(), "http://localhost:8000/health");

        let config = ApiConfig::new("https://bookmarks.example.com:8443/api/v1/").unwrap();
        assert_eq!(config.health_url(), "https://bookmarks.example.com:8443/health");
    }

    #[test]
    fn test_endpoint_joining() {
        let config = ApiConfig::new("https://bookmarks.example.com/api/v1/").unwrap();
        assert_eq!(config.endpoint("/bookmarks"), "https://bookmarks.example.com/api/v1/bookmarks");
        assert_eq!(config.endpoint("search/analyze-url"), "https://bookmarks.example.com/api/v1/search/analyze-url");
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            ApiConfig::new("not a url"),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
        assert!(matches!(
            ApiConfig::new("ftp://example.com"),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn test_builder_timeouts() {
        let config = ApiConfig::new("http://localhost:9000")
            .unwrap()
            .with_timeout(Duration::from_secs(5))
            .with_bulk_timeout(Duration::from_secs(60))
            .with_upload_timeout(Duration::from_secs(20));

        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.bulk_timeout(), Duration::from_secs(60));
        assert_eq!(config.upload_timeout(), Duration::from_secs(20));
    }
}
