//! Remote provider seam: the three webhook calls the reconciler needs.

mod error;
mod telegram;
mod types;

use std::time::Duration;

use async_trait::async_trait;

pub use error::ProviderError;
pub use telegram::{TELEGRAM_API_BASE_ENV, TELEGRAM_DEFAULT_API_BASE, TelegramBotApi};
pub use types::RemoteWebhookStatus;

/// Remote webhook registration API.
///
/// Implementations must be safe for concurrent read-only use; mutating calls
/// are only issued from the single reconciliation flow.
#[async_trait]
pub trait RemoteProviderClient: Send + Sync {
    /// Current remote webhook registration.
    async fn get_webhook_info(&self) -> Result<RemoteWebhookStatus, ProviderError>;

    /// Point the provider at `url`. `timeout` bounds this single call and
    /// surfaces as [`ProviderError::TimedOut`].
    async fn set_webhook(&self, url: &str, timeout: Duration) -> Result<bool, ProviderError>;

    /// Remove the remote webhook. Naturally idempotent on the provider side.
    async fn delete_webhook(&self) -> Result<bool, ProviderError>;
}
