//! In-memory store of decoded images and their pending-flush set.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use tracing::trace;

use crate::domain::entities::ImageId;

/// Decoded images keyed by ID, plus the IDs not yet written to disk.
/// Every pending ID also has an image in the map.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
    hits: AtomicU64,
    misses: AtomicU64,
}

#[derive(Default)]
struct MemoryState {
    images: HashMap<ImageId, Arc<image::DynamicImage>>,
    pending: HashSet<ImageId>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up an image.
    pub fn get(&self, id: &ImageId) -> Option<Arc<image::DynamicImage>> {
        let found = self.state.read().images.get(id).cloned();
        if found.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            trace!(id = %id, "Memory cache hit");
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            trace!(id = %id, "Memory cache miss");
        }
        found
    }

    /// Returns true if the image is held in memory.
    pub fn contains(&self, id: &ImageId) -> bool {
        self.state.read().images.contains_key(id)
    }

    /// Stores an image and marks it for the next flush.
    pub fn insert(&self, id: ImageId, image: Arc<image::DynamicImage>) {
        let mut state = self.state.write();
        state.pending.insert(id.clone());
        state.images.insert(id, image);
    }

    /// Stores an image that already has a disk copy.
    ///
    /// An image set while the disk copy was being read wins; the image now
    /// held for `id` is returned.
    pub fn promote(&self, id: ImageId, image: Arc<image::DynamicImage>) -> Arc<image::DynamicImage> {
        self.state
            .write()
            .images
            .entry(id)
            .or_insert(image)
            .clone()
    }

    /// Swaps the pending set for an empty one and returns its images.
    ///
    /// Only the swap happens under the lock; callers write the returned
    /// images after it has been released.
    pub fn take_pending(&self) -> Vec<(ImageId, Arc<image::DynamicImage>)> {
        let mut state = self.state.write();
        let pending = std::mem::take(&mut state.pending);
        pending
            .into_iter()
            .filter_map(|id| {
                let image = state.images.get(&id).cloned()?;
                Some((id, image))
            })
            .collect()
    }

    /// Drops every image and pending mark.
    pub fn clear(&self) {
        let mut state = self.state.write();
        state.images.clear();
        state.pending.clear();
    }

    /// Number of images held.
    pub fn len(&self) -> usize {
        self.state.read().images.len()
    }

    /// Returns true if no images are held.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of images waiting to be flushed.
    pub fn pending_len(&self) -> usize {
        self.state.read().pending.len()
    }

    /// Returns true if the image still has to be flushed.
    pub fn is_pending(&self, id: &ImageId) -> bool {
        self.state.read().pending.contains(id)
    }

    /// Returns cache statistics.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        let hit_rate = if total > 0 {
            (hits as f64 / total as f64) * 100.0
        } else {
            0.0
        };
        let state = self.state.read();
        CacheStats {
            hits,
            misses,
            hit_rate,
            size: state.images.len(),
            pending: state.pending.len(),
        }
    }
}

/// Statistics about memory cache performance.
#[derive(Debug, Clone)]
pub struct CacheStats {
    /// Number of cache hits.
    pub hits: u64,
    /// Number of cache misses.
    pub misses: u64,
    /// Hit rate as a percentage.
    pub hit_rate: f64,
    /// Current number of images in memory.
    pub size: usize,
    /// Images not yet flushed to disk.
    pub pending: usize,
}

impl std::fmt::Display for CacheStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Cache: {} images ({} pending), {:.1}% hit rate ({} hits, {} misses)",
            self.size, self.pending, self.hit_rate, self.hits, self.misses
        )
    }
}
