//! Infrastructure layer with external service adapters.

/// Application configuration.
pub mod config;
/// Image caching, loading and persistence.
pub mod image;
/// UI thread dispatch.
pub mod ui_dispatch;

pub use config::{AppConfig, CacheConfig, CliArgs, Command, LogLevel, StorageManager};
pub use image::{
    CacheStats, HttpImageFetcher, ImageCache, ImageCacheConfig, circle_clip, resolve_cache_dir,
};
pub use ui_dispatch::ChannelDispatcher;
