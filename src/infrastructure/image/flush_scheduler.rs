//! Periodic flushing of pending images to disk.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, warn};

use super::disk_store::DiskStore;
use super::image_cache::flush_pending;
use super::memory_store::MemoryStore;

/// Default time between periodic flushes.
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_secs(120);

/// Background task flushing the memory store on a fixed interval.
///
/// Stopping is permanent. Dropping the scheduler stops it as well.
pub struct FlushScheduler {
    interval: Duration,
    stop_tx: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl FlushScheduler {
    /// Spawns the flush loop. The first flush happens one interval from now.
    ///
    /// `flush_lock` is shared with whatever else must not interleave with a
    /// flush.
    #[must_use]
    pub fn start(
        interval: Duration,
        memory: Arc<MemoryStore>,
        disk: Arc<DiskStore>,
        flush_lock: Arc<Mutex<()>>,
    ) -> Self {
        let interval = interval.max(Duration::from_millis(1));
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = &mut stop_rx => break,
                    _ = ticker.tick() => {
                        let written = flush_pending(&memory, &disk, &flush_lock).await;
                        if written > 0 {
                            debug!(written, "Periodic flush complete");
                        }
                    }
                }
            }

            debug!("Flush scheduler stopped");
        });

        Self {
            interval,
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        }
    }

    /// Time between flushes.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Stops the loop and waits for an in-progress flush to finish.
    pub async fn stop(mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
        if let Some(handle) = self.handle.take()
            && let Err(e) = handle.await
        {
            warn!(error = %e, "Flush scheduler task failed");
        }
    }
}

impl Drop for FlushScheduler {
    fn drop(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
    }
}

impl std::fmt::Debug for FlushScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlushScheduler")
            .field("interval", &self.interval)
            .field("running", &self.stop_tx.is_some())
            .finish()
    }
}
