//! # Builder for CacheConfig
//!
//! Fluent construction of [`CacheConfig`] instances.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use fetchvault::CacheConfig;
//!
//! let config = CacheConfig::builder()
//!     .with_cache_root("/var/cache/thumbnails")
//!     .with_timeout(Duration::from_secs(60))
//!     .with_user_agent("MyApp/1.0")
//!     .with_header("X-Api-Key", "my-secret-key")
//!     .build();
//! ```

use std::path::PathBuf;
use std::time::Duration;

use reqwest::header::{HeaderName, HeaderValue};

use crate::CacheConfig;

/// Builder for creating [`CacheConfig`] instances with a fluent API.
#[derive(Debug, Clone)]
pub struct CacheConfigBuilder {
    config: CacheConfig,
}

impl CacheConfigBuilder {
    /// Create a new builder with default configuration.
    pub fn new() -> Self {
        Self {
            config: CacheConfig::default(),
        }
    }

    /// Set the directory cached files are written to.
    pub fn with_cache_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.cache_root = Some(root.into());
        self
    }

    /// Set the overall timeout for an entire HTTP request.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the connection timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Enable or disable following redirects.
    pub fn with_follow_redirects(mut self, follow: bool) -> Self {
        self.config.follow_redirects = follow;
        self
    }

    /// Set the user agent string.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Add a custom header sent with every fetch.
    ///
    /// Invalid header names or values are ignored rather than failing the
    /// build.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            name.parse::<HeaderName>(),
            value.parse::<HeaderValue>(),
        ) {
            self.config.headers.insert(name, value);
        }
        self
    }

    /// Build the final configuration.
    pub fn build(self) -> CacheConfig {
        self.config
    }
}

impl Default for CacheConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = CacheConfigBuilder::new().build();
        assert!(config.cache_root.is_none());
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert!(config.follow_redirects);
    }

    #[test]
    fn test_builder_customization() {
        let config = CacheConfig::builder()
            .with_cache_root("/srv/cache")
            .with_timeout(Duration::from_secs(60))
            .with_connect_timeout(Duration::from_secs(20))
            .with_follow_redirects(false)
            .with_user_agent("CustomUserAgent/1.0")
            .with_header("X-Custom-Header", "CustomValue")
            .build();

        assert_eq!(config.cache_root, Some(PathBuf::from("/srv/cache")));
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.connect_timeout, Duration::from_secs(20));
        assert!(!config.follow_redirects);
        assert_eq!(config.user_agent, "CustomUserAgent/1.0");

        let header_value = config.headers.get("X-Custom-Header").unwrap();
        assert_eq!(header_value.to_str().unwrap(), "CustomValue");
    }

    #[test]
    fn test_builder_ignores_invalid_header() {
        let config = CacheConfig::builder()
            .with_header("not a header name", "value")
            .build();
        assert!(config.headers.get("not a header name").is_none());
    }
}
