//! On-disk PNG copies of cached images.
//!
//! Layout is flat: `{cache_dir}/{image_id}.png`, PNG regardless of the format
//! the image was downloaded in. A store without a directory runs memory-only.

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::ImageFormat;
use tokio::fs;
use tracing::{debug, error, trace, warn};

use crate::domain::entities::ImageId;
use crate::domain::ports::{CacheError, CacheResult};

/// PNG files of decoded images under a single cache directory.
#[derive(Debug, Clone)]
pub struct DiskStore {
    dir: Option<PathBuf>,
}

impl DiskStore {
    /// Creates a store rooted at `dir`, or a memory-only store for `None`.
    #[must_use]
    pub const fn new(dir: Option<PathBuf>) -> Self {
        Self { dir }
    }

    /// Creates a store that never touches the disk.
    #[must_use]
    pub const fn memory_only() -> Self {
        Self { dir: None }
    }

    /// The cache directory, if any.
    #[must_use]
    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    /// Returns false for a memory-only store.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.dir.is_some()
    }

    /// Returns the path for a cached image.
    #[must_use]
    pub fn path_for(&self, id: &ImageId) -> Option<PathBuf> {
        self.dir.as_ref().map(|dir| dir.join(id.file_name()))
    }

    /// Loads and decodes an image. Missing and corrupt files both count as a miss.
    pub async fn load(&self, id: &ImageId) -> Option<image::DynamicImage> {
        let path = self.path_for(id)?;
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    debug!(id = %id, path = %path.display(), error = %e, "Failed to read cached image");
                }
                trace!(id = %id, "Disk cache miss");
                return None;
            }
        };

        let result = tokio::task::spawn_blocking(move || {
            image::load_from_memory_with_format(&bytes, ImageFormat::Png)
        })
        .await;

        match result {
            Ok(Ok(img)) => {
                debug!(id = %id, "Decoded image from disk cache");
                Some(img)
            }
            Ok(Err(e)) => {
                warn!(id = %id, error = %e, "Failed to decode cached image");
                None
            }
            Err(e) => {
                error!(id = %id, error = %e, "Decode task panicked");
                None
            }
        }
    }

    /// Encodes an image as PNG and writes it, creating directories as needed.
    /// Returns the number of bytes written.
    ///
    /// # Errors
    /// Returns error if the store is memory-only or encoding/writing fails.
    pub async fn store(&self, id: &ImageId, image: Arc<image::DynamicImage>) -> CacheResult<u64> {
        let path = self.path_for(id).ok_or(CacheError::DiskUnavailable)?;

        let written = tokio::task::spawn_blocking(move || write_png(&path, &image))
            .await
            .map_err(|e| CacheError::IoError(format!("Write task panicked: {e}")))??;

        trace!(id = %id, size = written, "Stored image in disk cache");
        Ok(written)
    }

    /// Checks if an image has a disk copy.
    pub async fn contains(&self, id: &ImageId) -> bool {
        let Some(path) = self.path_for(id) else {
            return false;
        };
        fs::try_exists(&path).await.unwrap_or(false)
    }

    /// Sums the sizes of all files below the cache directory.
    /// Entries that cannot be read are skipped.
    pub async fn size(&self) -> u64 {
        let Some(root) = &self.dir else {
            return 0;
        };

        let mut total = 0u64;
        let mut stack = vec![root.clone()];

        while let Some(dir) = stack.pop() {
            let Ok(mut entries) = fs::read_dir(&dir).await else {
                trace!(path = %dir.display(), "Skipping unreadable directory");
                continue;
            };

            while let Ok(Some(entry)) = entries.next_entry().await {
                match entry.metadata().await {
                    Ok(meta) if meta.is_dir() => stack.push(entry.path()),
                    Ok(meta) => total += meta.len(),
                    Err(e) => {
                        trace!(path = %entry.path().display(), error = %e, "Skipping unreadable entry");
                    }
                }
            }
        }

        total
    }

    /// Deletes every entry under the cache directory, keeping the directory.
    /// Returns the number of entries removed.
    ///
    /// # Errors
    /// Returns error if the cache directory cannot be read.
    pub async fn purge(&self) -> CacheResult<usize> {
        let Some(root) = &self.dir else {
            return Ok(0);
        };

        let mut entries = match fs::read_dir(root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => {
                return Err(CacheError::IoError(format!(
                    "Failed to read cache dir: {e}"
                )));
            }
        };

        let mut removed = 0usize;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| CacheError::IoError(format!("Failed to read entry: {e}")))?
        {
            let path = entry.path();
            let is_dir = entry.file_type().await.is_ok_and(|t| t.is_dir());
            let result = if is_dir {
                fs::remove_dir_all(&path).await
            } else {
                fs::remove_file(&path).await
            };

            match result {
                Ok(()) => removed += 1,
                Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove cache entry"),
            }
        }

        debug!(removed, "Purged disk cache");
        Ok(removed)
    }
}

fn write_png(path: &Path, image: &image::DynamicImage) -> CacheResult<u64> {
    let parent = path
        .parent()
        .ok_or_else(|| CacheError::IoError("Invalid cache path".to_string()))?;
    std::fs::create_dir_all(parent)
        .map_err(|e| CacheError::IoError(format!("Failed to create cache dir: {e}")))?;

    let mut encoded = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut encoded), ImageFormat::Png)
        .map_err(|e| CacheError::DecodeError(format!("Failed to encode PNG: {e}")))?;

    let mut temp_file = tempfile::NamedTempFile::new_in(parent)
        .map_err(|e| CacheError::IoError(format!("Failed to create cache file: {e}")))?;
    temp_file
        .write_all(&encoded)
        .map_err(|e| CacheError::IoError(format!("Failed to write cache file: {e}")))?;
    temp_file
        .persist(path)
        .map_err(|e| CacheError::IoError(format!("Failed to persist cache file: {}", e.error)))?;

    Ok(encoded.len() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (DiskStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = DiskStore::new(Some(temp_dir.path().to_path_buf()));
        (store, temp_dir)
    }

    fn img(width: u32, height: u32) -> Arc<image::DynamicImage> {
        Arc::new(image::DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
            width,
            height,
            image::Rgba([10, 20, 30, 255]),
        )))
    }

    #[tokio::test]
    async fn test_store_and_load() {
        let (store, temp) = create_test_store();
        let id = ImageId::new("avatar1");

        let written = store.store(&id, img(8, 4)).await.unwrap();

        assert!(written > 0);
        assert!(temp.path().join("avatar1.png").exists());
        let loaded = store.load(&id).await.unwrap();
        assert_eq!((loaded.width(), loaded.height()), (8, 4));
        assert_eq!(loaded.to_rgba8().get_pixel(0, 0).0, [10, 20, 30, 255]);
    }

    #[tokio::test]
    async fn test_load_miss() {
        let (store, _temp) = create_test_store();
        assert!(store.load(&ImageId::new("nonexistent")).await.is_none());
    }

    #[tokio::test]
    async fn test_load_corrupt_file_is_miss() {
        let (store, temp) = create_test_store();
        std::fs::write(temp.path().join("broken.png"), b"not a png").unwrap();

        assert!(store.load(&ImageId::new("broken")).await.is_none());
    }

    #[tokio::test]
    async fn test_store_creates_missing_directory() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("nested").join("images");
        let store = DiskStore::new(Some(dir.clone()));

        store.store(&ImageId::new("a"), img(2, 2)).await.unwrap();

        assert!(dir.join("a.png").exists());
    }

    #[tokio::test]
    async fn test_store_fails_when_directory_blocked() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("blocker");
        std::fs::write(&blocker, b"file").unwrap();
        let store = DiskStore::new(Some(blocker.join("images")));

        let result = store.store(&ImageId::new("a"), img(2, 2)).await;

        assert!(matches!(result, Err(CacheError::IoError(_))));
    }

    #[tokio::test]
    async fn test_memory_only_store() {
        let store = DiskStore::memory_only();
        let id = ImageId::new("a");

        assert!(!store.is_enabled());
        assert!(matches!(
            store.store(&id, img(1, 1)).await,
            Err(CacheError::DiskUnavailable)
        ));
        assert!(store.load(&id).await.is_none());
        assert_eq!(store.size().await, 0);
        assert_eq!(store.purge().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_size_walks_subdirectories() {
        let (store, temp) = create_test_store();
        std::fs::write(temp.path().join("a.png"), vec![0u8; 300]).unwrap();
        std::fs::create_dir_all(temp.path().join("sub")).unwrap();
        std::fs::write(temp.path().join("sub").join("b.bin"), vec![0u8; 700]).unwrap();

        assert_eq!(store.size().await, 1000);
    }

    #[tokio::test]
    async fn test_size_of_missing_directory_is_zero() {
        let temp = TempDir::new().unwrap();
        let store = DiskStore::new(Some(temp.path().join("absent")));
        assert_eq!(store.size().await, 0);
    }

    #[tokio::test]
    async fn test_purge_removes_everything_but_root() {
        let (store, temp) = create_test_store();
        store.store(&ImageId::new("a"), img(2, 2)).await.unwrap();
        std::fs::create_dir_all(temp.path().join("sub")).unwrap();
        std::fs::write(temp.path().join("sub").join("b.bin"), b"data").unwrap();

        let removed = store.purge().await.unwrap();

        assert_eq!(removed, 2);
        assert!(temp.path().exists());
        assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 0);
        assert!(!store.contains(&ImageId::new("a")).await);
    }

    #[tokio::test]
    async fn test_path_like_ids_stay_inside_cache_dir() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("cache");
        let store = DiskStore::new(Some(dir.clone()));
        let outside = temp.path().join("outside").join("abs");
        let absolute = ImageId::new(outside.to_string_lossy().into_owned());
        let dotdot = ImageId::new("../escaped");

        store.store(&absolute, img(2, 2)).await.unwrap();
        store.store(&dotdot, img(2, 2)).await.unwrap();

        assert!(!temp.path().join("outside").exists());
        assert!(!temp.path().join("escaped.png").exists());
        for id in [&absolute, &dotdot] {
            let path = store.path_for(id).unwrap();
            assert_eq!(path.parent(), Some(dir.as_path()));
            assert!(store.load(id).await.is_some());
        }
        assert!(store.size().await > 0);

        assert_eq!(store.purge().await.unwrap(), 2);
        assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 0);
        assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 1);
    }
}
