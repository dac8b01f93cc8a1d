//! Image caching infrastructure.
//!
//! This module provides:
//! - A memory store with a pending-flush set
//! - PNG persistence under the cache directory
//! - Periodic flushing and size-bounded purging
//! - Deduplicated HTTP downloads
//! - Circular clipping for avatars

pub mod cache_dir;
pub mod circle;
pub mod disk_store;
pub mod flush_scheduler;
pub mod http_fetcher;
pub mod image_cache;
pub mod in_flight;
pub mod memory_store;

pub use cache_dir::{CACHE_SUBPATH, resolve_cache_dir};
pub use circle::circle_clip;
pub use disk_store::DiskStore;
pub use flush_scheduler::{DEFAULT_FLUSH_INTERVAL, FlushScheduler};
pub use http_fetcher::{DEFAULT_FETCH_TIMEOUT, HttpImageFetcher};
pub use image_cache::{DEFAULT_MAX_CACHE_SIZE, ImageCache, ImageCacheConfig};
pub use in_flight::InFlight;
pub use memory_store::{CacheStats, MemoryStore};
