//! Cache directory resolution.

use std::path::{Path, PathBuf};

use directories::BaseDirs;
use tracing::{debug, warn};

/// Path appended to every candidate base directory.
pub const CACHE_SUBPATH: &str = "oxicord/images";

/// Candidate directories in order of preference: the platform cache
/// directory, `~/.cache`, then `./cache`.
#[must_use]
pub fn candidate_dirs() -> Vec<PathBuf> {
    let mut candidates = Vec::with_capacity(3);
    if let Some(base) = BaseDirs::new() {
        candidates.push(base.cache_dir().join(CACHE_SUBPATH));
        candidates.push(base.home_dir().join(".cache").join(CACHE_SUBPATH));
    }
    candidates.push(Path::new("cache").join(CACHE_SUBPATH));
    candidates.dedup();
    candidates
}

/// Resolves and creates the image cache directory.
///
/// Returns `None` when no candidate can be created, in which case the image
/// cache runs memory-only.
#[must_use]
pub fn resolve_cache_dir() -> Option<PathBuf> {
    first_usable(candidate_dirs())
}

/// Returns the first directory that exists or can be created.
pub fn first_usable(candidates: impl IntoIterator<Item = PathBuf>) -> Option<PathBuf> {
    for dir in candidates {
        match std::fs::create_dir_all(&dir) {
            Ok(()) => {
                debug!(path = %dir.display(), "Using image cache directory");
                return Some(dir);
            }
            Err(e) => {
                warn!(path = %dir.display(), error = %e, "Cannot create image cache directory");
            }
        }
    }

    warn!("No usable image cache directory, images will be kept in memory only");
    None
}
