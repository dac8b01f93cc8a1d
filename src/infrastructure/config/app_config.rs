//! Application configuration.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::use_cases::{DEFAULT_PAGE_SIZE, LoadHistoryUseCase};
use crate::domain::entities::{DEFAULT_MESSAGE_LIMIT, MessageCache};
use crate::domain::ports::MessageSourcePort;
use crate::infrastructure::image::{DEFAULT_MAX_CACHE_SIZE, ImageCacheConfig};

use super::args::CliArgs;

const APP_NAME: &str = "oxicord";
const APP_QUALIFIER: &str = "com";
const APP_ORGANIZATION: &str = "linuxmobile";
const LOG_FILE_NAME: &str = "oxicord-cache.log";

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl LogLevel {
    /// Converts to tracing level.
    #[must_use]
    pub const fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Application configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Configuration file path.
    #[serde(skip)]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[serde(skip)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Cache configuration.
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Cache configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Image cache directory. Unset resolves the platform cache directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<PathBuf>,

    /// Disk budget in bytes, checked at startup.
    #[serde(default = "default_max_cache_size")]
    pub max_cache_size_bytes: u64,

    /// Seconds between periodic flushes of new images to disk.
    #[serde(default = "default_flush_interval_secs")]
    pub flush_interval_secs: u64,

    /// Image download timeout in seconds.
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    /// Messages kept per channel.
    #[serde(default = "default_message_limit")]
    pub message_limit: usize,

    /// Messages requested per history page.
    #[serde(default = "default_history_page_size")]
    pub history_page_size: u8,
}

fn default_max_cache_size() -> u64 {
    DEFAULT_MAX_CACHE_SIZE
}

fn default_flush_interval_secs() -> u64 {
    120
}

fn default_fetch_timeout_secs() -> u64 {
    15
}

fn default_message_limit() -> usize {
    DEFAULT_MESSAGE_LIMIT
}

fn default_history_page_size() -> u8 {
    DEFAULT_PAGE_SIZE
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            cache_dir: None,
            max_cache_size_bytes: default_max_cache_size(),
            flush_interval_secs: default_flush_interval_secs(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            message_limit: default_message_limit(),
            history_page_size: default_history_page_size(),
        }
    }
}

impl CacheConfig {
    /// Builds the image cache configuration.
    #[must_use]
    pub fn image_cache_config(&self) -> ImageCacheConfig {
        ImageCacheConfig {
            cache_dir: self.cache_dir.clone(),
            max_cache_size: self.max_cache_size_bytes,
            flush_interval: Duration::from_secs(self.flush_interval_secs),
        }
    }

    /// Image download timeout.
    #[must_use]
    pub const fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Builds the history loader over a fresh message cache.
    #[must_use]
    pub fn history_use_case(&self, source: Arc<dyn MessageSourcePort>) -> LoadHistoryUseCase {
        LoadHistoryUseCase::new(
            source,
            MessageCache::new(self.message_limit),
            self.history_page_size,
        )
    }
}

impl AppConfig {
    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: &CliArgs) {
        if let Some(config_path) = &args.config {
            self.config = Some(config_path.clone());
        }
        if let Some(log_path) = &args.log_path {
            self.log_path = Some(log_path.clone());
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(cache_dir) = &args.cache_dir {
            self.cache.cache_dir = Some(cache_dir.clone());
        }
        if let Some(max_cache_size) = args.max_cache_size {
            self.cache.max_cache_size_bytes = max_cache_size;
        }
    }

    /// Returns default config directory.
    #[must_use]
    pub fn default_config_dir() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Returns default config file path.
    #[must_use]
    pub fn default_config_path() -> Option<PathBuf> {
        Self::default_config_dir().map(|dir| dir.join("config.toml"))
    }

    /// Returns default log file path.
    #[must_use]
    pub fn default_log_path() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.data_dir().join(LOG_FILE_NAME))
    }

    /// Returns effective config path.
    #[must_use]
    pub fn effective_config_path(&self) -> Option<PathBuf> {
        self.config.clone().or_else(Self::default_config_path)
    }

    /// Returns effective log path.
    #[must_use]
    pub fn effective_log_path(&self) -> Option<PathBuf> {
        self.log_path.clone().or_else(Self::default_log_path)
    }
}
