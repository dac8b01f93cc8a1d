//! Port for the paginated message history source.

use async_trait::async_trait;

use crate::domain::entities::{Message, MessageId};
use crate::domain::errors::SourceError;

/// Largest page the source accepts.
pub const MAX_PAGE_SIZE: u8 = 100;

/// Options for fetching a page of messages from a channel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchMessagesOptions {
    pub limit: Option<u8>,
    pub before: Option<MessageId>,
}

impl FetchMessagesOptions {
    #[must_use]
    pub const fn with_limit(mut self, limit: u8) -> Self {
        self.limit = Some(if limit < MAX_PAGE_SIZE {
            limit
        } else {
            MAX_PAGE_SIZE
        });
        self
    }

    #[must_use]
    pub const fn before_message(mut self, message_id: MessageId) -> Self {
        self.before = Some(message_id);
        self
    }
}

/// Paginated message history, newest message first.
///
/// An empty page means there is nothing older than the cursor.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageSourcePort: Send + Sync {
    /// Fetches one page of a channel's history.
    async fn fetch_messages(
        &self,
        channel_id: &str,
        options: FetchMessagesOptions,
    ) -> Result<Vec<Message>, SourceError>;
}
