use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::reconciler::WebhookReconciler;

/// Deregisters the remote webhook on the host's stop event, at most once.
///
/// Clones share the guard, so duplicate stop notifications collapse into one
/// `deleteWebhook` call.
#[derive(Clone)]
pub struct ShutdownHook {
    inner: Arc<ShutdownHookInner>,
}

struct ShutdownHookInner {
    reconciler: Arc<WebhookReconciler>,
    timeout: Duration,
    fired: AtomicBool,
}

impl ShutdownHook {
    pub(super) fn new(reconciler: Arc<WebhookReconciler>, timeout: Duration) -> Self {
        Self {
            inner: Arc::new(ShutdownHookInner {
                reconciler,
                timeout,
                fired: AtomicBool::new(false),
            }),
        }
    }

    /// Run deregistration. Returns `false` if an earlier call already did.
    ///
    /// Never fails: provider errors are logged and a slow provider is
    /// abandoned after the configured timeout.
    pub async fn fire(&self) -> bool {
        if self.inner.fired.swap(true, Ordering::AcqRel) {
            tracing::debug!("webhook deregistration already triggered; ignoring stop event");
            return false;
        }
        match tokio::time::timeout(self.inner.timeout, self.inner.reconciler.deregister()).await {
            Ok(_) => {}
            Err(_) => tracing::warn!(
                timeout_secs = self.inner.timeout.as_secs(),
                "Timed out deleting telegram webhook; continuing shutdown"
            ),
        }
        true
    }

    pub fn has_fired(&self) -> bool {
        self.inner.fired.load(Ordering::Acquire)
    }

    /// Fire once `stop` resolves.
    pub fn spawn_on_stop<F>(&self, stop: F) -> tokio::task::JoinHandle<bool>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let hook = self.clone();
        tokio::spawn(async move {
            stop.await;
            hook.fire().await
        })
    }
}
