//! # Cache Configuration
//!
//! Options controlling where cached files live and how the HTTP transport
//! behaves. Use [`CacheConfig::builder`] for fluent construction.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};

const DEFAULT_USER_AGENT: &str = concat!("fetchvault/", env!("CARGO_PKG_VERSION"));

/// Configurable options for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Directory holding cached files. When `None`, a `fetchvault-cache`
    /// directory under the system temp dir is used.
    pub cache_root: Option<PathBuf>,

    /// Overall timeout for an entire HTTP request. Zero disables it.
    pub timeout: Duration,

    /// Connection timeout. Zero disables it.
    pub connect_timeout: Duration,

    /// Whether to follow redirects (limited to 10 hops when enabled).
    pub follow_redirects: bool,

    /// User agent string sent with every fetch.
    pub user_agent: String,

    /// Custom HTTP headers sent with every fetch.
    pub headers: HeaderMap,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            cache_root: None,
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            follow_redirects: true,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            headers: CacheConfig::default_headers(),
        }
    }
}

impl CacheConfig {
    pub fn builder() -> crate::builder::CacheConfigBuilder {
        crate::builder::CacheConfigBuilder::new()
    }

    /// The directory cached files are written to.
    pub fn resolved_root(&self) -> PathBuf {
        self.cache_root
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("fetchvault-cache"))
    }

    pub fn default_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            HeaderValue::from_static("*/*"),
        );
        headers.insert(
            reqwest::header::ACCEPT_ENCODING,
            HeaderValue::from_static("gzip, deflate"),
        );
        headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CacheConfig::default();
        assert!(config.cache_root.is_none());
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert!(config.follow_redirects);
        assert!(config.user_agent.starts_with("fetchvault/"));
    }

    #[test]
    fn test_resolved_root_defaults_to_temp() {
        let config = CacheConfig::default();
        assert!(config.resolved_root().starts_with(std::env::temp_dir()));

        let explicit = CacheConfig {
            cache_root: Some(PathBuf::from("/var/cache/fetchvault")),
            ..CacheConfig::default()
        };
        assert_eq!(
            explicit.resolved_root(),
            PathBuf::from("/var/cache/fetchvault")
        );
    }
}
