//! Coalescing of concurrent downloads for the same image.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use parking_lot::Mutex;
use tracing::{error, trace};

use crate::domain::entities::ImageId;

type LoadOutput = Option<Arc<image::DynamicImage>>;

/// A download that every concurrent requester awaits.
pub type SharedLoad = Shared<BoxFuture<'static, LoadOutput>>;

/// Registry of in-progress downloads keyed by image ID.
///
/// The first request for an ID starts the download; requests arriving while
/// it runs get a handle to the same future. Downloads run on their own task,
/// so they finish and leave the registry even if every requester goes away.
#[derive(Default, Clone)]
pub struct InFlight {
    loads: Arc<Mutex<HashMap<ImageId, SharedLoad>>>,
}

impl InFlight {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Joins the download for `id`, starting it with `start` if none is running.
    ///
    /// Returns the shared download and whether this call started it. Must be
    /// called from within a Tokio runtime.
    pub fn join<F>(&self, id: &ImageId, start: impl FnOnce() -> F) -> (SharedLoad, bool)
    where
        F: Future<Output = LoadOutput> + Send + 'static,
    {
        let mut loads = self.loads.lock();
        if let Some(existing) = loads.get(id) {
            trace!(id = %id, "Joining in-flight download");
            return (existing.clone(), false);
        }

        let entry = Entry {
            registry: Arc::clone(&self.loads),
            id: id.clone(),
        };
        let download = start();
        // The registry lock is held until the entry is inserted, so the task
        // cannot remove it first.
        let task = tokio::spawn(async move {
            let output = download.await;
            drop(entry);
            output
        });

        let key = id.clone();
        let load = async move {
            task.await.unwrap_or_else(|e| {
                error!(id = %key, error = %e, "Download task failed");
                None
            })
        }
        .boxed()
        .shared();

        loads.insert(id.clone(), load.clone());
        (load, true)
    }

    /// Number of downloads currently running.
    #[must_use]
    pub fn len(&self) -> usize {
        self.loads.lock().len()
    }

    /// Returns true if nothing is downloading.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Removes its registry entry when the download task ends, even by panic.
struct Entry {
    registry: Arc<Mutex<HashMap<ImageId, SharedLoad>>>,
    id: ImageId,
}

impl Drop for Entry {
    fn drop(&mut self) {
        self.registry.lock().remove(&self.id);
    }
}
