use super::app_config::{AppConfig, CacheConfig};
use directories::ProjectDirs;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

const APP_QUALIFIER: &str = "com";
const APP_ORGANIZATION: &str = "linuxmobile";
const APP_NAME: &str = "oxicord";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Errors loading or writing the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to determine config directory")]
    ConfigDirNotFound,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("toml serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

/// Reads and writes files in the configuration directory.
pub struct StorageManager {
    config_dir: PathBuf,
}

impl StorageManager {
    /// Uses the platform config directory for oxicord.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ConfigDirNotFound` when the platform has no home directory.
    pub fn new() -> Result<Self, ConfigError> {
        let config_dir = ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.config_dir().to_path_buf())
            .ok_or(ConfigError::ConfigDirNotFound)?;

        Ok(Self { config_dir })
    }

    /// Uses `path` as the config directory.
    #[must_use]
    pub fn with_dir(path: PathBuf) -> Self {
        Self { config_dir: path }
    }

    /// Directory holding `config.toml`.
    #[must_use]
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Loads the application configuration.
    ///
    /// A missing file is created with defaults. A malformed file is left alone
    /// and defaults are used. Zero cache settings fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or the default cannot be written.
    pub fn load_config(&self, path_override: Option<&Path>) -> Result<AppConfig, ConfigError> {
        let config_path = path_override.map_or_else(
            || self.config_dir.join(CONFIG_FILE_NAME),
            Path::to_path_buf,
        );

        if !config_path.exists() {
            info!(path = %config_path.display(), "Config file not found, writing defaults");
            let defaults = AppConfig::default();
            if let Some(parent) = config_path.parent() {
                fs::create_dir_all(parent)?;
            }
            Self::write_atomically(&config_path, &defaults)?;
            return Ok(defaults);
        }

        let content = fs::read_to_string(&config_path)?;
        let mut config = parse_config(&content, &config_path);
        let reset = sanitize_cache_config(&mut config.cache);
        if reset > 0 {
            warn!(path = %config_path.display(), reset, "Replaced invalid cache settings with defaults");
        }
        Ok(config)
    }

    fn write_atomically<T: serde::Serialize>(path: &Path, data: &T) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(data)?;

        let parent = path
            .parent()
            .ok_or_else(|| std::io::Error::other("config path has no parent directory"))?;
        let mut staged = tempfile::NamedTempFile::new_in(parent)?;
        staged.write_all(content.as_bytes())?;
        staged.persist(path).map_err(|e| e.error)?;

        Ok(())
    }
}

fn parse_config(content: &str, path: &Path) -> AppConfig {
    toml::from_str(content).unwrap_or_else(|e| {
        warn!(path = %path.display(), error = %e, "Failed to parse config file, using defaults");
        AppConfig::default()
    })
}

/// Resets cache settings that must not be zero to their defaults.
/// Returns how many were reset.
pub fn sanitize_cache_config(cache: &mut CacheConfig) -> usize {
    let defaults = CacheConfig::default();
    [
        reset_if_zero(
            "flush_interval_secs",
            &mut cache.flush_interval_secs,
            defaults.flush_interval_secs,
        ),
        reset_if_zero(
            "fetch_timeout_secs",
            &mut cache.fetch_timeout_secs,
            defaults.fetch_timeout_secs,
        ),
        reset_if_zero("message_limit", &mut cache.message_limit, defaults.message_limit),
        reset_if_zero(
            "history_page_size",
            &mut cache.history_page_size,
            defaults.history_page_size,
        ),
    ]
    .into_iter()
    .filter(|reset| *reset)
    .count()
}

fn reset_if_zero<T>(field: &str, value: &mut T, default: T) -> bool
where
    T: Copy + Default + PartialEq + std::fmt::Display,
{
    if *value != T::default() {
        return false;
    }
    warn!(field, default = %default, "Cache setting must not be zero, using default");
    *value = default;
    true
}
