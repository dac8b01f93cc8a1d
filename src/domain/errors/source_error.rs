//! Message source error types.

use thiserror::Error;

/// Failures reported by a paginated message source.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum SourceError {
    #[error("channel not found: {channel_id}")]
    ChannelNotFound { channel_id: String },

    #[error("network error while fetching messages: {message}")]
    NetworkError { message: String },

    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    #[error("unexpected message source error: {message}")]
    Unexpected { message: String },
}

impl SourceError {
    /// Creates network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::NetworkError {
            message: message.into(),
        }
    }

    /// Returns true if retrying later may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::NetworkError { .. } | Self::RateLimited { .. })
    }
}
