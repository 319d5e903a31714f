use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::provider::{ProviderError, RemoteProviderClient, RemoteWebhookStatus};

/// Snapshot of calls made against a [`ScriptedProvider`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProviderCallCounts {
    pub get_webhook_info: usize,
    pub set_webhook: usize,
    pub delete_webhook: usize,
}

impl ProviderCallCounts {
    /// `setWebhook` + `deleteWebhook` calls.
    pub fn mutating(&self) -> usize {
        self.set_webhook + self.delete_webhook
    }
}

/// In-memory provider with scripted `setWebhook`/`deleteWebhook` outcomes.
///
/// A successful `setWebhook` updates the stored status, so a second
/// reconciliation sees the new URL. Once a script runs out, calls succeed.
#[derive(Debug, Default)]
pub struct ScriptedProvider {
    status: Mutex<RemoteWebhookStatus>,
    status_error: Mutex<Option<ProviderError>>,
    set_script: Mutex<VecDeque<Result<bool, ProviderError>>>,
    delete_script: Mutex<VecDeque<Result<bool, ProviderError>>>,
    set_delay: Mutex<Option<Duration>>,
    delete_delay: Mutex<Option<Duration>>,
    get_calls: AtomicUsize,
    set_calls: AtomicUsize,
    delete_calls: AtomicUsize,
}

impl ScriptedProvider {
    /// Provider whose remote registration currently points at `url`.
    pub fn with_url(url: &str) -> Self {
        let provider = Self::default();
        provider.set_status(RemoteWebhookStatus::registered(url));
        provider
    }

    pub fn set_status(&self, status: RemoteWebhookStatus) {
        if let Ok(mut guard) = self.status.lock() {
            *guard = status;
        }
    }

    pub fn fail_status_with(&self, error: ProviderError) {
        if let Ok(mut guard) = self.status_error.lock() {
            *guard = Some(error);
        }
    }

    pub fn script_set_webhook<I>(&self, outcomes: I)
    where
        I: IntoIterator<Item = Result<bool, ProviderError>>,
    {
        if let Ok(mut guard) = self.set_script.lock() {
            guard.extend(outcomes);
        }
    }

    pub fn script_delete_webhook<I>(&self, outcomes: I)
    where
        I: IntoIterator<Item = Result<bool, ProviderError>>,
    {
        if let Ok(mut guard) = self.delete_script.lock() {
            guard.extend(outcomes);
        }
    }

    /// Make every `setWebhook` call sleep before answering.
    pub fn delay_set_webhook(&self, delay: Duration) {
        if let Ok(mut guard) = self.set_delay.lock() {
            *guard = Some(delay);
        }
    }

    /// Make every `deleteWebhook` call sleep before answering.
    pub fn delay_delete_webhook(&self, delay: Duration) {
        if let Ok(mut guard) = self.delete_delay.lock() {
            *guard = Some(delay);
        }
    }

    pub fn current_url(&self) -> String {
        self.status
            .lock()
            .map(|guard| guard.url.clone())
            .unwrap_or_default()
    }

    pub fn calls(&self) -> ProviderCallCounts {
        ProviderCallCounts {
            get_webhook_info: self.get_calls.load(Ordering::SeqCst),
            set_webhook: self.set_calls.load(Ordering::SeqCst),
            delete_webhook: self.delete_calls.load(Ordering::SeqCst),
        }
    }

    fn next(script: &Mutex<VecDeque<Result<bool, ProviderError>>>) -> Result<bool, ProviderError> {
        script
            .lock()
            .ok()
            .and_then(|mut guard| guard.pop_front())
            .unwrap_or(Ok(true))
    }

    fn delay(slot: &Mutex<Option<Duration>>) -> Option<Duration> {
        slot.lock().ok().and_then(|guard| *guard)
    }
}

#[async_trait]
impl RemoteProviderClient for ScriptedProvider {
    async fn get_webhook_info(&self) -> Result<RemoteWebhookStatus, ProviderError> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.status_error.lock().ok().and_then(|guard| guard.clone()) {
            return Err(error);
        }
        Ok(self
            .status
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default())
    }

    async fn set_webhook(&self, url: &str, _timeout: Duration) -> Result<bool, ProviderError> {
        self.set_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = Self::delay(&self.set_delay) {
            tokio::time::sleep(delay).await;
        }
        let outcome = Self::next(&self.set_script);
        if matches!(outcome, Ok(true)) {
            self.set_status(RemoteWebhookStatus::registered(url));
        }
        outcome
    }

    async fn delete_webhook(&self) -> Result<bool, ProviderError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = Self::delay(&self.delete_delay) {
            tokio::time::sleep(delay).await;
        }
        let outcome = Self::next(&self.delete_script);
        if matches!(outcome, Ok(true)) {
            self.set_status(RemoteWebhookStatus::default());
        }
        outcome
    }
}
