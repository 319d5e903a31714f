use std::sync::Arc;
use std::time::Duration;

use crate::dispatcher::Dispatcher;
use crate::error::{Result, WebhookError};
use crate::listener::build_webhook_listener;
use crate::reconciler::{Registration, WebhookReconciler};
use crate::trust::TrustGate;
use crate::url::{DesiredWebhookUrl, TELEGRAM_WEBHOOK_PATH};

use super::host::ListenerHost;
use super::shutdown::ShutdownHook;

/// Upper bound on the shutdown-time `deleteWebhook` call.
pub const DEFAULT_DEREGISTER_TIMEOUT_SECS: u64 = 10;

/// Result of a successful [`LifecycleCoordinator::setup`].
pub struct WebhookSetup {
    /// URL the provider now points at.
    pub url: DesiredWebhookUrl,
    /// What reconciliation had to do.
    pub registration: Registration,
    /// Hook to run on the host's stop event.
    pub shutdown: ShutdownHook,
}

/// All-or-nothing webhook setup: https check, remote sync, listener mount.
pub struct LifecycleCoordinator {
    reconciler: Arc<WebhookReconciler>,
    trust_gate: Arc<TrustGate>,
    dispatcher: Arc<dyn Dispatcher>,
    deregister_timeout: Duration,
}

impl LifecycleCoordinator {
    pub fn new(
        reconciler: WebhookReconciler,
        trust_gate: TrustGate,
        dispatcher: Arc<dyn Dispatcher>,
    ) -> Self {
        Self {
            reconciler: Arc::new(reconciler),
            trust_gate: Arc::new(trust_gate),
            dispatcher,
            deregister_timeout: Duration::from_secs(DEFAULT_DEREGISTER_TIMEOUT_SECS),
        }
    }

    #[must_use]
    pub fn with_deregister_timeout(mut self, timeout: Duration) -> Self {
        self.deregister_timeout = timeout;
        self
    }

    /// Run startup. On any error nothing stays registered: the listener is
    /// not mounted, and a remote webhook set by this call is removed again
    /// (best effort) when mounting fails.
    pub async fn setup<H>(&self, host: &mut H) -> Result<WebhookSetup>
    where
        H: ListenerHost + ?Sized,
    {
        let url = self.reconciler.desired_url().clone();
        if let Err(error) = url.ensure_https() {
            tracing::error!(url = %url, "Invalid telegram webhook, must be https");
            return Err(error);
        }

        let registration = match self.reconciler.reconcile().await {
            Ok(registration) => registration,
            Err(error) => {
                tracing::error!(url = %url, error = %error, "Telegram webhook setup aborted");
                return Err(error);
            }
        };

        let shutdown = ShutdownHook::new(Arc::clone(&self.reconciler), self.deregister_timeout);

        if self.trust_gate.is_empty() {
            tracing::warn!("No trusted networks configured; every webhook call will be denied");
        }
        let listener = build_webhook_listener(
            Arc::clone(&self.trust_gate),
            Arc::clone(&self.dispatcher),
        );
        if let Err(error) = host.mount(TELEGRAM_WEBHOOK_PATH, listener) {
            tracing::error!(
                path = TELEGRAM_WEBHOOK_PATH,
                error = %error,
                "Failed to mount telegram webhook listener; removing remote webhook"
            );
            shutdown.fire().await;
            return Err(WebhookError::ListenerRegistration(error.to_string()));
        }

        tracing::info!(
            url = %url,
            registration = ?registration,
            trusted_networks = self.trust_gate.networks().len(),
            "Telegram webhook ready"
        );
        Ok(WebhookSetup {
            url,
            registration,
            shutdown,
        })
    }
}
