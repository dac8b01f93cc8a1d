//! Port definitions for image caching.

use bytes::Bytes;

/// Result type for cache operations.
pub type CacheResult<T> = std::result::Result<T, CacheError>;

/// Errors that can occur during cache operations.
///
/// These never cross the public cache API; they are logged and collapsed into
/// a cache miss or a no-op at that boundary.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CacheError {
    /// Failed to decode or encode image data.
    #[error("Decode error: {0}")]
    DecodeError(String),
    /// I/O error during cache operation.
    #[error("IO error: {0}")]
    IoError(String),
    /// Network error during download.
    #[error("Network error: {0}")]
    NetworkError(String),
    /// Server answered with something other than 200 OK.
    #[error("Unexpected HTTP status: {0}")]
    HttpStatus(u16),
    /// No usable cache directory; the cache runs memory-only.
    #[error("Disk cache unavailable")]
    DiskUnavailable,
}

/// Port for downloading raw image bytes.
/// Implementations must be thread-safe.
#[async_trait::async_trait]
pub trait ImageFetcherPort: Send + Sync {
    /// Fetches the body behind `url`.
    ///
    /// # Errors
    /// Returns error on transport failure, timeout or a non-200 response.
    async fn fetch(&self, url: &str) -> CacheResult<Bytes>;
}
