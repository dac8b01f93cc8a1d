//! HTTP adapter for downloading images.

use std::time::Duration;

use bytes::Bytes;
use reqwest::StatusCode;
use tracing::debug;

use crate::domain::ports::{CacheError, CacheResult, ImageFetcherPort};

/// Default request timeout.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Downloads images with a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpImageFetcher {
    client: reqwest::Client,
}

impl HttpImageFetcher {
    /// Creates a fetcher whose requests time out after `timeout`.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(timeout: Duration) -> CacheResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CacheError::NetworkError(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Creates a fetcher with the default 15 second timeout.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn with_default_timeout() -> CacheResult<Self> {
        Self::new(DEFAULT_FETCH_TIMEOUT)
    }
}

#[async_trait::async_trait]
impl ImageFetcherPort for HttpImageFetcher {
    async fn fetch(&self, url: &str) -> CacheResult<Bytes> {
        debug!(url, "Downloading image");

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                CacheError::NetworkError(format!("Request timed out: {e}"))
            } else {
                CacheError::NetworkError(format!("Request failed: {e}"))
            }
        })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(CacheError::HttpStatus(status.as_u16()));
        }

        response
            .bytes()
            .await
            .map_err(|e| CacheError::NetworkError(format!("Failed to read body: {e}")))
    }
}
