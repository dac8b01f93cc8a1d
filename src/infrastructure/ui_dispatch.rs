//! Channel-backed UI dispatcher.

use tokio::sync::mpsc;
use tracing::warn;

use crate::domain::ports::{UiDispatcherPort, UiJob};

/// Sends UI jobs over an unbounded channel.
///
/// The UI loop owns the receiver and runs each job it drains, so every
/// callback executes on that loop's thread.
#[derive(Debug, Clone)]
pub struct ChannelDispatcher {
    tx: mpsc::UnboundedSender<UiJob>,
}

impl ChannelDispatcher {
    /// Creates a dispatcher and the receiver the UI loop drains.
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<UiJob>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl UiDispatcherPort for ChannelDispatcher {
    fn dispatch(&self, job: UiJob) {
        if self.tx.send(job).is_err() {
            warn!("UI loop has stopped, dropping job");
        }
    }
}
