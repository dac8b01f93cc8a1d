//! Hybrid memory + disk image cache.
//!
//! Lookups go memory -> disk -> network. Images set in memory are written to
//! disk by a periodic flush and once more on shutdown. Persistence is best
//! effort: every failure is logged and treated as a cache miss.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, error, info, trace, warn};

use crate::domain::entities::{ImageId, ImageSource, LoadedImage};
use crate::domain::ports::{CacheError, CacheResult, ImageFetcherPort, UiDispatcherPort};

use super::cache_dir::{first_usable, resolve_cache_dir};
use super::circle::circle_clip;
use super::disk_store::DiskStore;
use super::flush_scheduler::{DEFAULT_FLUSH_INTERVAL, FlushScheduler};
use super::in_flight::InFlight;
use super::memory_store::{CacheStats, MemoryStore};

/// Default disk budget (5 GiB).
pub const DEFAULT_MAX_CACHE_SIZE: u64 = 5 * 1024 * 1024 * 1024;

/// Configuration for the image cache.
#[derive(Debug, Clone)]
pub struct ImageCacheConfig {
    /// Cache directory. `None` resolves the platform default.
    pub cache_dir: Option<PathBuf>,
    /// Disk budget checked at startup and by [`ImageCache::check_and_purge`].
    pub max_cache_size: u64,
    /// Time between periodic flushes.
    pub flush_interval: Duration,
}

impl Default for ImageCacheConfig {
    fn default() -> Self {
        Self {
            cache_dir: None,
            max_cache_size: DEFAULT_MAX_CACHE_SIZE,
            flush_interval: DEFAULT_FLUSH_INTERVAL,
        }
    }
}

/// Shared handle to the image cache. Cloning is cheap.
#[derive(Clone)]
pub struct ImageCache {
    inner: Arc<ImageCacheInner>,
}

struct ImageCacheInner {
    memory: Arc<MemoryStore>,
    disk: Arc<DiskStore>,
    fetcher: Arc<dyn ImageFetcherPort>,
    dispatcher: Arc<dyn UiDispatcherPort>,
    in_flight: InFlight,
    max_cache_size: AtomicU64,
    scheduler: Mutex<Option<FlushScheduler>>,
    // Held across a whole flush or purge so a purge cannot race a flush's writes.
    flush_lock: Arc<AsyncMutex<()>>,
}

impl std::fmt::Debug for ImageCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageCache")
            .field("cache_dir", &self.cache_dir())
            .field("max_cache_size", &self.max_cache_size())
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

impl ImageCache {
    /// Creates the cache, purges the disk copy if it is over budget and starts
    /// the periodic flush.
    ///
    /// Must be called from within a Tokio runtime. A cache directory that
    /// cannot be created leaves the cache memory-only.
    pub async fn start(
        config: ImageCacheConfig,
        fetcher: Arc<dyn ImageFetcherPort>,
        dispatcher: Arc<dyn UiDispatcherPort>,
    ) -> Self {
        let dir = match config.cache_dir {
            Some(dir) => first_usable([dir]),
            None => resolve_cache_dir(),
        };

        let memory = Arc::new(MemoryStore::new());
        let disk = Arc::new(DiskStore::new(dir));
        let flush_lock = Arc::new(AsyncMutex::new(()));

        let cache = Self {
            inner: Arc::new(ImageCacheInner {
                memory: Arc::clone(&memory),
                disk: Arc::clone(&disk),
                fetcher,
                dispatcher,
                in_flight: InFlight::new(),
                max_cache_size: AtomicU64::new(config.max_cache_size),
                scheduler: Mutex::new(None),
                flush_lock: Arc::clone(&flush_lock),
            }),
        };

        cache.check_and_purge().await;

        let scheduler = FlushScheduler::start(config.flush_interval, memory, disk, flush_lock);
        *cache.inner.scheduler.lock() = Some(scheduler);

        info!(
            dir = ?cache.cache_dir(),
            max_size = config.max_cache_size,
            flush_interval = ?config.flush_interval,
            "Image cache started"
        );
        cache
    }

    /// Looks an image up in memory, then on disk.
    ///
    /// A disk hit is promoted into memory. Missing or unreadable files are
    /// reported as `None`.
    pub async fn get(&self, id: &ImageId) -> Option<Arc<image::DynamicImage>> {
        self.lookup(id).await.map(|loaded| loaded.image)
    }

    /// Stores an image in memory and queues it for the next flush.
    pub fn set(&self, id: ImageId, image: impl Into<Arc<image::DynamicImage>>) {
        trace!(id = %id, "Storing image in memory cache");
        self.inner.memory.insert(id, image.into());
    }

    /// Loads an image from the cache, downloading it on a miss.
    ///
    /// Concurrent misses for the same ID share a single download.
    pub async fn load(&self, id: &ImageId, url: &str) -> Option<LoadedImage> {
        if let Some(found) = self.lookup(id).await {
            return Some(found);
        }

        let (download, started) = self.inner.in_flight.join(id, || {
            download(
                Arc::clone(&self.inner.fetcher),
                Arc::clone(&self.inner.memory),
                id.clone(),
                url.to_string(),
            )
        });
        if !started {
            debug!(id = %id, "Waiting on in-flight download");
        }

        let image = download.await?;
        Some(LoadedImage {
            id: id.clone(),
            image,
            source: ImageSource::Network,
        })
    }

    /// Returns the cached image or downloads it, `None` on any failure.
    pub async fn load_from_url(&self, id: &ImageId, url: &str) -> Option<Arc<image::DynamicImage>> {
        self.load(id, url).await.map(|loaded| loaded.image)
    }

    /// Loads an image without blocking the caller.
    ///
    /// On a memory hit `on_loaded` runs immediately on the calling thread.
    /// Only memory is checked inline: a disk copy is read on the background
    /// path like a network miss, so the caller never waits on file I/O. That
    /// path clips the image to a circle if `circular` is set and hands
    /// `on_loaded` to the UI dispatcher. The callback never runs if the image
    /// cannot be loaded.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn load_from_url_async<F>(&self, id: ImageId, url: String, circular: bool, on_loaded: F)
    where
        F: FnOnce(Arc<image::DynamicImage>) + Send + 'static,
    {
        if let Some(image) = self.inner.memory.get(&id) {
            let image = if circular {
                Arc::new(circle_clip(&image))
            } else {
                image
            };
            on_loaded(image);
            return;
        }

        let cache = self.clone();
        tokio::spawn(async move {
            let Some(image) = cache.load_from_url(&id, &url).await else {
                debug!(id = %id, "Async image load produced nothing");
                return;
            };

            let image = if circular {
                match tokio::task::spawn_blocking(move || circle_clip(&image)).await {
                    Ok(clipped) => Arc::new(clipped),
                    Err(e) => {
                        error!(id = %id, error = %e, "Clip task panicked");
                        return;
                    }
                }
            } else {
                image
            };

            cache
                .inner
                .dispatcher
                .dispatch(Box::new(move || on_loaded(image)));
        });
    }

    /// Writes every pending image to disk. Returns how many were written.
    pub async fn flush_to_disk(&self) -> usize {
        flush_pending(&self.inner.memory, &self.inner.disk, &self.inner.flush_lock).await
    }

    /// Stops the periodic flush and flushes one last time.
    ///
    /// Every image set before this call is on disk afterwards, unless its
    /// write failed.
    pub async fn shutdown(&self) {
        let scheduler = self.inner.scheduler.lock().take();
        match scheduler {
            Some(scheduler) => scheduler.stop().await,
            None => debug!("Flush scheduler already stopped"),
        }

        let written = self.flush_to_disk().await;
        info!(written, "Image cache shut down");
    }

    /// Total size in bytes of everything under the cache directory.
    pub async fn cache_size(&self) -> u64 {
        self.inner.disk.size().await
    }

    /// Purges the cache if the disk copy exceeds the budget.
    /// Returns true if a purge happened.
    pub async fn check_and_purge(&self) -> bool {
        let size = self.cache_size().await;
        let max_size = self.max_cache_size();
        if size <= max_size {
            debug!(size, max_size, "Image cache within budget");
            return false;
        }

        info!(size, max_size, "Image cache over budget, purging");
        self.purge().await;
        true
    }

    /// Drops every image from memory and deletes everything on disk.
    ///
    /// Waits for an in-progress flush, so nothing it writes survives the purge.
    pub async fn purge(&self) {
        let _flushing = self.inner.flush_lock.lock().await;
        self.inner.memory.clear();
        match self.inner.disk.purge().await {
            Ok(removed) => info!(removed, "Purged image cache"),
            Err(e) => warn!(error = %e, "Failed to purge disk cache"),
        }
    }

    /// Changes the budget used by later [`ImageCache::check_and_purge`] calls.
    pub fn set_max_cache_size(&self, bytes: u64) {
        self.inner.max_cache_size.store(bytes, Ordering::Relaxed);
    }

    /// Current disk budget in bytes.
    #[must_use]
    pub fn max_cache_size(&self) -> u64 {
        self.inner.max_cache_size.load(Ordering::Relaxed)
    }

    /// The cache directory, `None` when running memory-only.
    #[must_use]
    pub fn cache_dir(&self) -> Option<&Path> {
        self.inner.disk.dir()
    }

    /// Returns memory cache statistics.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.inner.memory.stats()
    }

    async fn lookup(&self, id: &ImageId) -> Option<LoadedImage> {
        if let Some(image) = self.inner.memory.get(id) {
            return Some(LoadedImage {
                id: id.clone(),
                image,
                source: ImageSource::MemoryCache,
            });
        }

        let image = self.inner.disk.load(id).await?;
        let image = self.inner.memory.promote(id.clone(), Arc::new(image));
        Some(LoadedImage {
            id: id.clone(),
            image,
            source: ImageSource::DiskCache,
        })
    }
}

/// Swaps out the pending set and writes its images after the memory lock is
/// released. `flush_lock` is held until every write has finished.
pub(super) async fn flush_pending(
    memory: &MemoryStore,
    disk: &DiskStore,
    flush_lock: &AsyncMutex<()>,
) -> usize {
    let _flushing = flush_lock.lock().await;
    let pending = memory.take_pending();
    if pending.is_empty() {
        return 0;
    }
    if !disk.is_enabled() {
        trace!(count = pending.len(), "No disk cache, images stay in memory only");
        return 0;
    }

    let total = pending.len();
    let mut written = 0usize;
    for (id, image) in pending {
        match disk.store(&id, image).await {
            Ok(_) => written += 1,
            Err(e) => warn!(id = %id, error = %e, "Failed to persist image"),
        }
    }

    debug!(written, failed = total - written, "Flushed images to disk");
    written
}

async fn download(
    fetcher: Arc<dyn ImageFetcherPort>,
    memory: Arc<MemoryStore>,
    id: ImageId,
    url: String,
) -> Option<Arc<image::DynamicImage>> {
    match fetch_and_decode(fetcher.as_ref(), &url).await {
        Ok(decoded) => {
            let image = Arc::new(decoded);
            memory.insert(id.clone(), Arc::clone(&image));
            debug!(id = %id, source = "network", "Image loaded successfully");
            Some(image)
        }
        Err(e) => {
            warn!(id = %id, url = %url, error = %e, "Failed to load image");
            None
        }
    }
}

async fn fetch_and_decode(
    fetcher: &dyn ImageFetcherPort,
    url: &str,
) -> CacheResult<image::DynamicImage> {
    let bytes = fetcher.fetch(url).await?;

    tokio::task::spawn_blocking(move || image::load_from_memory(&bytes))
        .await
        .map_err(|e| CacheError::DecodeError(format!("Decode task panicked: {e}")))?
        .map_err(|e| CacheError::DecodeError(format!("Failed to decode image: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::mocks::{InlineDispatcher, MockImageFetcher, png_bytes};
    use std::sync::atomic::AtomicBool;
    use tempfile::TempDir;
    use tokio::sync::oneshot;

    const URL: &str = "https://cdn.discordapp.com/avatars/1/abc.png";

    struct Harness {
        cache: ImageCache,
        fetcher: Arc<MockImageFetcher>,
        dispatcher: Arc<InlineDispatcher>,
        dir: PathBuf,
        _temp: TempDir,
    }

    async fn harness(fetcher: MockImageFetcher) -> Harness {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("images");
        let fetcher = Arc::new(fetcher);
        let dispatcher = Arc::new(InlineDispatcher::new());
        let cache = start_in(&dir, fetcher.clone(), dispatcher.clone()).await;
        Harness {
            cache,
            fetcher,
            dispatcher,
            dir,
            _temp: temp,
        }
    }

    async fn start_in(
        dir: &Path,
        fetcher: Arc<MockImageFetcher>,
        dispatcher: Arc<InlineDispatcher>,
    ) -> ImageCache {
        let config = ImageCacheConfig {
            cache_dir: Some(dir.to_path_buf()),
            flush_interval: Duration::from_secs(3600),
            ..ImageCacheConfig::default()
        };
        ImageCache::start(config, fetcher, dispatcher).await
    }

    fn img(width: u32, height: u32) -> image::DynamicImage {
        image::DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
            width,
            height,
            image::Rgba([0, 128, 255, 255]),
        ))
    }

    #[tokio::test]
    async fn test_get_after_set_issues_no_fetch() {
        let h = harness(MockImageFetcher::returning(png_bytes(4, 4))).await;
        let id = ImageId::new("a");

        h.cache.set(id.clone(), img(10, 20));

        let got = h.cache.get(&id).await.unwrap();
        assert_eq!((got.width(), got.height()), (10, 20));
        let loaded = h.cache.load_from_url(&id, URL).await.unwrap();
        assert_eq!(loaded.width(), 10);
        assert_eq!(h.fetcher.calls(), 0);
    }

    #[tokio::test]
    async fn test_get_unknown_is_none() {
        let h = harness(MockImageFetcher::returning(png_bytes(4, 4))).await;
        assert!(h.cache.get(&ImageId::new("missing")).await.is_none());
    }

    #[tokio::test]
    async fn test_load_downloads_once_then_serves_memory() {
        let h = harness(MockImageFetcher::returning(png_bytes(100, 60))).await;
        let id = ImageId::new("a");

        let first = h.cache.load(&id, URL).await.unwrap();
        let second = h.cache.load(&id, URL).await.unwrap();

        assert_eq!(first.source, ImageSource::Network);
        assert_eq!(second.source, ImageSource::MemoryCache);
        assert_eq!((first.image.width(), first.image.height()), (100, 60));
        assert_eq!(h.fetcher.calls(), 1);
        assert_eq!(h.cache.stats().pending, 1);
    }

    #[tokio::test]
    async fn test_network_failure_is_absent() {
        let h = harness(MockImageFetcher::failing(CacheError::HttpStatus(404))).await;
        let id = ImageId::new("a");

        assert!(h.cache.load_from_url(&id, URL).await.is_none());
        assert!(h.cache.get(&id).await.is_none());
        assert_eq!(h.cache.stats().size, 0);
    }

    #[tokio::test]
    async fn test_undecodable_body_is_absent() {
        let h = harness(MockImageFetcher::returning(&b"<html>not an image</html>"[..])).await;

        assert!(h.cache.load_from_url(&ImageId::new("a"), URL).await.is_none());
        assert_eq!(h.fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_misses_share_one_fetch() {
        let fetcher =
            MockImageFetcher::returning(png_bytes(8, 8)).with_delay(Duration::from_millis(50));
        let h = harness(fetcher).await;
        let id = ImageId::new("a");

        let (a, b) = tokio::join!(
            h.cache.load_from_url(&id, URL),
            h.cache.load_from_url(&id, URL)
        );

        assert!(a.is_some());
        assert!(b.is_some());
        assert_eq!(h.fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_shutdown_persists_every_set_image() {
        let h = harness(MockImageFetcher::returning(png_bytes(4, 4))).await;
        for name in ["a", "b", "c"] {
            h.cache.set(ImageId::new(name), img(3, 3));
        }

        h.cache.shutdown().await;

        for name in ["a", "b", "c"] {
            assert!(h.dir.join(format!("{name}.png")).exists(), "{name} not flushed");
        }
        assert_eq!(h.cache.stats().pending, 0);

        // A second shutdown only flushes again.
        h.cache.shutdown().await;
    }

    #[tokio::test]
    async fn test_fresh_instance_reads_flushed_images_from_disk() {
        let h = harness(MockImageFetcher::returning(png_bytes(4, 4))).await;
        let id = ImageId::new("a");
        h.cache.set(id.clone(), img(7, 5));
        h.cache.shutdown().await;

        let fetcher = Arc::new(MockImageFetcher::returning(png_bytes(4, 4)));
        let reopened = start_in(&h.dir, fetcher.clone(), Arc::new(InlineDispatcher::new())).await;

        let loaded = reopened.load(&id, URL).await.unwrap();
        assert_eq!(loaded.source, ImageSource::DiskCache);
        assert_eq!((loaded.image.width(), loaded.image.height()), (7, 5));
        assert_eq!(reopened.stats().pending, 0);
        assert_eq!(fetcher.calls(), 0);
        reopened.shutdown().await;
    }

    #[tokio::test]
    async fn test_failed_write_keeps_image_in_memory() {
        let h = harness(MockImageFetcher::returning(png_bytes(4, 4))).await;
        let id = ImageId::new("a");
        h.cache.set(id.clone(), img(3, 3));

        std::fs::remove_dir_all(&h.dir).unwrap();
        std::fs::write(&h.dir, b"not a directory").unwrap();

        assert_eq!(h.cache.flush_to_disk().await, 0);

        assert!(!h.dir.join("a.png").exists());
        assert!(h.cache.get(&id).await.is_some());
        assert_eq!(h.cache.stats().pending, 0);
    }

    #[tokio::test]
    async fn test_startup_purges_cache_over_budget() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("images");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("old1.png"), vec![0u8; 1000]).unwrap();
        std::fs::write(dir.join("old2.png"), vec![0u8; 1000]).unwrap();

        let config = ImageCacheConfig {
            cache_dir: Some(dir.clone()),
            max_cache_size: 1000,
            flush_interval: Duration::from_secs(3600),
        };
        let cache = ImageCache::start(
            config,
            Arc::new(MockImageFetcher::returning(png_bytes(1, 1))),
            Arc::new(InlineDispatcher::new()),
        )
        .await;

        assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 0);
        assert_eq!(cache.stats().size, 0);
        assert_eq!(cache.cache_size().await, 0);
    }

    #[tokio::test]
    async fn test_startup_keeps_cache_within_budget() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("images");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("old.png"), vec![0u8; 500]).unwrap();

        let config = ImageCacheConfig {
            cache_dir: Some(dir.clone()),
            max_cache_size: 1000,
            flush_interval: Duration::from_secs(3600),
        };
        let cache = ImageCache::start(
            config,
            Arc::new(MockImageFetcher::returning(png_bytes(1, 1))),
            Arc::new(InlineDispatcher::new()),
        )
        .await;

        assert!(dir.join("old.png").exists());
        assert_eq!(cache.cache_size().await, 500);
    }

    #[tokio::test]
    async fn test_lowered_budget_purges_on_demand() {
        let h = harness(MockImageFetcher::returning(png_bytes(4, 4))).await;
        h.cache.set(ImageId::new("a"), img(16, 16));
        h.cache.flush_to_disk().await;
        assert!(h.cache.cache_size().await > 0);

        assert!(!h.cache.check_and_purge().await);
        h.cache.set_max_cache_size(1);

        assert!(h.cache.check_and_purge().await);
        assert_eq!(h.cache.max_cache_size(), 1);
        assert_eq!(h.cache.cache_size().await, 0);
        assert!(h.cache.get(&ImageId::new("a")).await.is_none());
    }

    #[tokio::test]
    async fn test_purge_during_flush_leaves_disk_empty() {
        let h = harness(MockImageFetcher::returning(png_bytes(4, 4))).await;
        for i in 0..8 {
            h.cache.set(ImageId::new(format!("img{i}")), img(32, 32));
        }

        let (written, ()) = tokio::join!(h.cache.flush_to_disk(), h.cache.purge());

        assert_eq!(written, 8);
        assert_eq!(std::fs::read_dir(&h.dir).unwrap().count(), 0);
        assert_eq!(h.cache.stats().size, 0);
        assert_eq!(h.cache.stats().pending, 0);
    }

    #[tokio::test]
    async fn test_purge_waits_for_running_flush() {
        let h = harness(MockImageFetcher::returning(png_bytes(4, 4))).await;
        h.cache.set(ImageId::new("a"), img(2, 2));
        let flushing = h.cache.inner.flush_lock.lock().await;

        let cache = h.cache.clone();
        let purge = tokio::spawn(async move { cache.purge().await });
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(!purge.is_finished());
        assert_eq!(h.cache.stats().size, 1);

        drop(flushing);
        purge.await.unwrap();
        assert_eq!(h.cache.stats().size, 0);
    }

    #[tokio::test]
    async fn test_async_hit_runs_callback_inline() {
        let h = harness(MockImageFetcher::returning(png_bytes(4, 4))).await;
        let id = ImageId::new("a");
        h.cache.set(id.clone(), img(100, 60));

        let called = Arc::new(AtomicBool::new(false));
        let flag = called.clone();
        h.cache
            .load_from_url_async(id, URL.to_string(), true, move |image| {
                assert_eq!((image.width(), image.height()), (60, 60));
                flag.store(true, Ordering::SeqCst);
            });

        assert!(called.load(Ordering::SeqCst));
        assert_eq!(h.dispatcher.dispatched(), 0);
        assert_eq!(h.fetcher.calls(), 0);
    }

    #[tokio::test]
    async fn test_async_miss_dispatches_clipped_image() {
        let h = harness(MockImageFetcher::returning(png_bytes(100, 60))).await;
        let (tx, rx) = oneshot::channel();

        h.cache.load_from_url_async(
            ImageId::new("a"),
            URL.to_string(),
            true,
            move |image| {
                let _ = tx.send(image);
            },
        );

        let image = rx.await.unwrap();
        assert_eq!((image.width(), image.height()), (60, 60));
        let rgba = image.to_rgba8();
        assert_eq!(rgba.get_pixel(0, 0).0[3], 0);
        assert_eq!(rgba.get_pixel(30, 30).0[3], 255);
        assert_eq!(h.dispatcher.dispatched(), 1);

        // The unclipped original is what gets cached.
        let cached = h.cache.get(&ImageId::new("a")).await.unwrap();
        assert_eq!((cached.width(), cached.height()), (100, 60));
    }

    #[tokio::test]
    async fn test_async_failure_never_calls_back() {
        let h = harness(MockImageFetcher::failing(CacheError::NetworkError(
            "timeout".to_string(),
        )))
        .await;
        let called = Arc::new(AtomicBool::new(false));
        let flag = called.clone();

        h.cache
            .load_from_url_async(ImageId::new("a"), URL.to_string(), false, move |_| {
                flag.store(true, Ordering::SeqCst);
            });
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(h.fetcher.calls(), 1);
        assert!(!called.load(Ordering::SeqCst));
        assert_eq!(h.dispatcher.dispatched(), 0);
    }

    #[tokio::test]
    async fn test_unusable_directory_runs_memory_only() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("blocker");
        std::fs::write(&blocker, b"file").unwrap();

        let cache = start_in(
            &blocker.join("images"),
            Arc::new(MockImageFetcher::returning(png_bytes(1, 1))),
            Arc::new(InlineDispatcher::new()),
        )
        .await;
        let id = ImageId::new("a");
        cache.set(id.clone(), img(2, 2));
        cache.shutdown().await;

        assert!(cache.cache_dir().is_none());
        assert!(cache.get(&id).await.is_some());
        assert_eq!(cache.cache_size().await, 0);
    }
}
