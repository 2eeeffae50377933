//! # Transport
//!
//! The network primitive the cache consumes: fetch a URL into a local file
//! and report the HTTP status. The [`Transport`] trait is the seam tests use
//! to substitute a fake network; [`HttpTransport`] is the reqwest-backed
//! production implementation.

use std::path::Path;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, StatusCode};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::config::CacheConfig;
use crate::error::TransferError;

/// Downloads a remote resource into a local file.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetch `url` into `dest`, returning the response status.
    ///
    /// On a non-success status the destination file may be absent or
    /// partially written; callers must not treat it as valid content.
    async fn download_to_file(
        &self,
        url: &str,
        dest: &Path,
    ) -> Result<StatusCode, TransferError>;
}

/// HTTP transport backed by a shared reqwest [`Client`].
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn download_to_file(
        &self,
        url: &str,
        dest: &Path,
    ) -> Result<StatusCode, TransferError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            debug!(url, status = %status, "skipping body of non-success response");
            return Ok(status);
        }

        // Stream the body to disk chunk by chunk rather than buffering it.
        let mut file = fs::File::create(dest).await?;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
        }
        file.flush().await?;

        Ok(status)
    }
}

/// Create a reqwest [`Client`] from the cache configuration.
pub fn create_client(config: &CacheConfig) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder()
        .user_agent(&config.user_agent)
        .default_headers(config.headers.clone())
        .redirect(if config.follow_redirects {
            reqwest::redirect::Policy::limited(10)
        } else {
            reqwest::redirect::Policy::none()
        });

    if !config.timeout.is_zero() {
        builder = builder.timeout(config.timeout);
    }

    if !config.connect_timeout.is_zero() {
        builder = builder.connect_timeout(config.connect_timeout);
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_client_with_defaults() {
        let config = CacheConfig::default();
        assert!(create_client(&config).is_ok());
    }

    #[test]
    fn test_create_client_with_zero_timeouts() {
        let config = CacheConfig::builder()
            .with_timeout(std::time::Duration::ZERO)
            .with_connect_timeout(std::time::Duration::ZERO)
            .build();
        assert!(create_client(&config).is_ok());
    }
}
