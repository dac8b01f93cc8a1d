//! Message history loading against the message cache.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::entities::{Message, MessageCache, MessageWindow};
use crate::domain::errors::SourceError;
use crate::domain::ports::{FetchMessagesOptions, MessageSourcePort};

/// Default number of messages requested per history page.
pub const DEFAULT_PAGE_SIZE: u8 = 50;

/// Keeps the message cache in step with the paginated message source.
#[derive(Clone)]
pub struct LoadHistoryUseCase {
    source: Arc<dyn MessageSourcePort>,
    cache: MessageCache<Message>,
    page_size: u8,
}

impl LoadHistoryUseCase {
    /// Creates new history use case.
    #[must_use]
    pub const fn new(
        source: Arc<dyn MessageSourcePort>,
        cache: MessageCache<Message>,
        page_size: u8,
    ) -> Self {
        Self {
            source,
            cache,
            page_size,
        }
    }

    /// The cache this use case writes into.
    #[must_use]
    pub const fn cache(&self) -> &MessageCache<Message> {
        &self.cache
    }

    /// Loads the most recent page of a channel, replacing whatever was cached.
    ///
    /// # Errors
    /// Returns error if the message source fails; the cache is left untouched.
    pub async fn load_latest(&self, channel_id: &str) -> Result<MessageWindow<Message>, SourceError> {
        debug!(channel_id, "Loading latest messages");

        let options = FetchMessagesOptions::default().with_limit(self.page_size);
        let page = self
            .source
            .fetch_messages(channel_id, options)
            .await
            .inspect_err(|e| warn!(channel_id, error = %e, "Failed to load latest messages"))?;

        info!(channel_id, count = page.len(), "Loaded latest messages");
        self.cache.set(channel_id, page);
        Ok(self.cache.get(channel_id))
    }

    /// Loads the page older than the oldest cached message.
    ///
    /// Returns how many messages were added. Depleted channels are not fetched
    /// again; an empty page marks the channel depleted.
    ///
    /// # Errors
    /// Returns error if the message source fails.
    pub async fn load_older(&self, channel_id: &str) -> Result<usize, SourceError> {
        if self.cache.is_depleted(channel_id) {
            debug!(channel_id, "History depleted, skipping fetch");
            return Ok(0);
        }

        let Some(oldest) = self.cache.oldest(channel_id) else {
            return Ok(self.load_latest(channel_id).await?.len());
        };

        let options = FetchMessagesOptions::default()
            .with_limit(self.page_size)
            .before_message(oldest.id());
        let page = self
            .source
            .fetch_messages(channel_id, options)
            .await
            .inspect_err(|e| warn!(channel_id, error = %e, "Failed to load older messages"))?;

        if page.is_empty() {
            debug!(channel_id, before = %oldest.id(), "Reached start of history");
            self.cache.set_depleted(channel_id, true);
            return Ok(0);
        }

        let added = page.len();
        self.cache.prepend(channel_id, page);
        debug!(channel_id, added, "Loaded older messages");
        Ok(added)
    }

    /// Records a live message delivered by the gateway.
    pub fn on_message_created(&self, message: Message) {
        let channel_id = message.channel_id().to_string();
        self.cache.append(&channel_id, message);
    }

    /// Drops a deleted channel from the cache.
    pub fn on_channel_deleted(&self, channel_id: &str) {
        self.cache.clear(channel_id);
    }
}
