//! Port for running work on the UI thread.

/// A unit of work to run on the UI thread.
pub type UiJob = Box<dyn FnOnce() + Send + 'static>;

/// Marshals callbacks from background tasks onto the single UI thread.
pub trait UiDispatcherPort: Send + Sync {
    /// Schedules `job` to run on the UI thread.
    fn dispatch(&self, job: UiJob);
}
