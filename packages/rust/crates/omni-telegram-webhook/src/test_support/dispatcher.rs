use std::sync::Mutex;

use crate::dispatcher::Dispatcher;
use crate::update::Update;

/// Dispatcher that keeps every update it receives.
#[derive(Debug, Default)]
pub struct RecordingDispatcher {
    updates: Mutex<Vec<Update>>,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn updates(&self) -> Vec<Update> {
        self.updates
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    pub fn count(&self) -> usize {
        self.updates.lock().map(|guard| guard.len()).unwrap_or(0)
    }
}

impl Dispatcher for RecordingDispatcher {
    fn process(&self, update: Update) {
        if let Ok(mut guard) = self.updates.lock() {
            guard.push(update);
        }
    }
}
