//! Per-channel ordered message cache.
//!
//! Each channel holds an oldest-first window of at most `limit` messages plus a
//! depleted flag for backward pagination. The message source hands out pages
//! newest-first, so [`MessageCache::set`] and [`MessageCache::prepend`] flip
//! page order on the way in.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, trace};

/// Default number of messages kept per channel.
pub const DEFAULT_MESSAGE_LIMIT: usize = 100;

/// Oldest-first snapshot of a channel's cached messages.
///
/// Snapshots are shared with the cache; later writes copy on write and never
/// alter a snapshot already handed out.
pub type MessageWindow<M> = Arc<VecDeque<M>>;

/// Thread-safe cache of recent messages keyed by channel ID.
pub struct MessageCache<M> {
    inner: Arc<RwLock<MessageCacheInner<M>>>,
    limit: usize,
}

struct MessageCacheInner<M> {
    channels: HashMap<String, MessageWindow<M>>,
    depleted: HashSet<String>,
}

impl<M> Default for MessageCacheInner<M> {
    fn default() -> Self {
        Self {
            channels: HashMap::new(),
            depleted: HashSet::new(),
        }
    }
}

impl<M> Clone for MessageCache<M> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            limit: self.limit,
        }
    }
}

impl<M> std::fmt::Debug for MessageCache<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageCache")
            .field("limit", &self.limit)
            .field("channels", &self.inner.read().channels.len())
            .finish()
    }
}

impl<M: Clone> Default for MessageCache<M> {
    fn default() -> Self {
        Self::new(DEFAULT_MESSAGE_LIMIT)
    }
}

impl<M: Clone> MessageCache<M> {
    /// Creates a cache keeping at most `limit` messages per channel.
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self {
            inner: Arc::new(RwLock::new(MessageCacheInner::default())),
            limit: limit.max(1),
        }
    }

    /// Per-channel message limit.
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Returns the oldest-first messages for a channel, empty if unknown.
    #[must_use]
    pub fn get(&self, channel_id: &str) -> MessageWindow<M> {
        self.inner
            .read()
            .channels
            .get(channel_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Replaces a channel's messages with a freshly loaded page.
    ///
    /// `newest_first` is in the order the message source returns it. Only the
    /// `limit` most recent messages are kept, and the channel is no longer
    /// considered depleted.
    pub fn set(&self, channel_id: &str, mut newest_first: Vec<M>) {
        newest_first.reverse();
        let mut window = VecDeque::from(newest_first);
        if window.len() > self.limit {
            let excess = window.len() - self.limit;
            window.drain(..excess);
        }
        let len = window.len();

        let mut inner = self.inner.write();
        inner.channels.insert(channel_id.to_string(), Arc::new(window));
        inner.depleted.remove(channel_id);
        drop(inner);

        debug!(channel_id, len, "Replaced cached channel messages");
    }

    /// Adds a live message at the newest end, dropping the oldest one when the
    /// channel goes over its limit.
    pub fn append(&self, channel_id: &str, message: M) {
        let mut inner = self.inner.write();
        let window = Arc::make_mut(
            inner
                .channels
                .entry(channel_id.to_string())
                .or_default(),
        );
        window.push_back(message);
        if window.len() > self.limit {
            window.pop_front();
        }
        trace!(channel_id, len = window.len(), "Appended message");
    }

    /// Places an older history page in front of the cached messages.
    ///
    /// The page arrives newest-first. Prepending never trims, so a channel
    /// may exceed its limit while history is being scrolled.
    pub fn prepend(&self, channel_id: &str, older_newest_first: Vec<M>) {
        if older_newest_first.is_empty() {
            return;
        }
        let added = older_newest_first.len();

        let mut inner = self.inner.write();
        let window = Arc::make_mut(
            inner
                .channels
                .entry(channel_id.to_string())
                .or_default(),
        );
        window.reserve(added);
        for message in older_newest_first {
            window.push_front(message);
        }
        debug!(channel_id, added, len = window.len(), "Prepended history page");
    }

    /// Marks whether backward pagination for a channel is exhausted.
    pub fn set_depleted(&self, channel_id: &str, depleted: bool) {
        let mut inner = self.inner.write();
        if depleted {
            inner.depleted.insert(channel_id.to_string());
        } else {
            inner.depleted.remove(channel_id);
        }
    }

    /// Returns true once the oldest available message has been reached.
    #[must_use]
    pub fn is_depleted(&self, channel_id: &str) -> bool {
        self.inner.read().depleted.contains(channel_id)
    }

    /// Drops everything cached for a channel, including its depleted flag.
    pub fn clear(&self, channel_id: &str) {
        let mut inner = self.inner.write();
        let removed = inner.channels.remove(channel_id).is_some();
        inner.depleted.remove(channel_id);
        if removed {
            debug!(channel_id, "Cleared cached channel");
        }
    }

    /// Oldest cached message, the cursor for the next history page.
    #[must_use]
    pub fn oldest(&self, channel_id: &str) -> Option<M> {
        self.inner
            .read()
            .channels
            .get(channel_id)
            .and_then(|window| window.front().cloned())
    }

    /// Number of messages cached for a channel.
    #[must_use]
    pub fn len(&self, channel_id: &str) -> usize {
        self.inner
            .read()
            .channels
            .get(channel_id)
            .map_or(0, |window| window.len())
    }

    /// Number of channels with cached messages.
    #[must_use]
    pub fn channel_count(&self) -> usize {
        self.inner.read().channels.len()
    }
}
