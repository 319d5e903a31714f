//! Telegram webhook receiver.
//!
//! - **Reconcile**: compare Telegram's `getWebhookInfo` with the desired URL and
//!   call `setWebhook` only on drift (bounded retry on timeouts).
//! - **Listen**: `POST /api/telegram_webhooks`, gated by trusted CIDR ranges,
//!   parsed into [`Update`] and handed to a [`Dispatcher`].
//! - **Lifecycle**: all-or-nothing setup and a once-only `deleteWebhook` on stop.

#![allow(missing_docs)]

mod config;
mod dispatcher;
mod error;
mod lifecycle;
mod listener;
mod provider;
mod reconciler;
#[doc(hidden)]
pub mod test_support;
mod trust;
mod update;
mod url;

pub use config::{
    RuntimeSettings, TelegramWebhookSettings, WebhookConfig, WebhookOverrides,
    load_runtime_settings, load_runtime_settings_from_paths, runtime_settings_paths,
    set_config_home_override,
};
pub use dispatcher::{ChannelDispatcher, Dispatcher};
pub use error::{Result, WebhookError};
pub use lifecycle::{
    AxumHost, DEFAULT_DEREGISTER_TIMEOUT_SECS, LifecycleCoordinator, ListenerHost, ShutdownHook,
    StopSignal, WebhookSetup,
};
pub use listener::{InboundRejection, build_webhook_listener};
pub use provider::{
    ProviderError, RemoteProviderClient, RemoteWebhookStatus, TELEGRAM_API_BASE_ENV,
    TELEGRAM_DEFAULT_API_BASE, TelegramBotApi,
};
pub use reconciler::{
    DEFAULT_SET_WEBHOOK_ATTEMPTS, DEFAULT_SET_WEBHOOK_TIMEOUT_SECS, Registration,
    WebhookReconciler,
};
pub use trust::{DEFAULT_TRUSTED_NETWORKS, TrustGate};
pub use update::Update;
pub use url::{DesiredWebhookUrl, TELEGRAM_WEBHOOK_PATH, resolve_base_url};
