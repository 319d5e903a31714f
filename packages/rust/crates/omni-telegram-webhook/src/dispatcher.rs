//! Handoff point from the inbound listener to downstream update handling.

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::update::Update;

/// Consumer of parsed updates. `process` must not block: implementations hand
/// the update off and return.
pub trait Dispatcher: Send + Sync {
    fn process(&self, update: Update);
}

/// Dispatcher that enqueues updates on a bounded channel.
///
/// A full or closed queue drops the update with a log line; the webhook
/// request itself still succeeds.
#[derive(Debug, Clone)]
pub struct ChannelDispatcher {
    tx: mpsc::Sender<Update>,
}

impl ChannelDispatcher {
    pub fn new(tx: mpsc::Sender<Update>) -> Self {
        Self { tx }
    }

    /// Dispatcher plus the receiving half of a queue of `capacity` updates.
    pub fn bounded(capacity: usize) -> (Self, mpsc::Receiver<Update>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, rx)
    }
}

impl Dispatcher for ChannelDispatcher {
    fn process(&self, update: Update) {
        match self.tx.try_send(update) {
            Ok(()) => {}
            Err(TrySendError::Full(update)) => {
                tracing::warn!(
                    update_id = update.update_id,
                    "Update queue full; dropping update"
                );
            }
            Err(TrySendError::Closed(update)) => {
                tracing::error!(
                    update_id = update.update_id,
                    "Update queue unavailable; dropping update"
                );
            }
        }
    }
}
