//! Keeps the provider's webhook registration pointed at the desired URL.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::{Result, WebhookError};
use crate::provider::{ProviderError, RemoteProviderClient};
use crate::url::DesiredWebhookUrl;

/// Attempts spent on `setWebhook` timeouts before giving up.
pub const DEFAULT_SET_WEBHOOK_ATTEMPTS: usize = 3;
/// Per-attempt `setWebhook` timeout.
pub const DEFAULT_SET_WEBHOOK_TIMEOUT_SECS: u64 = 5;

/// Successful reconciliation outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// Remote already pointed at the desired URL; nothing was written.
    AlreadyCurrent,
    /// Remote was (re)pointed at the desired URL.
    Updated {
        /// `setWebhook` attempts used, including the successful one.
        attempts: usize,
    },
}

/// Sole owner of the remote webhook registration.
pub struct WebhookReconciler {
    provider: Arc<dyn RemoteProviderClient>,
    desired_url: DesiredWebhookUrl,
    set_webhook_attempts: usize,
    set_webhook_timeout: Duration,
}

impl WebhookReconciler {
    pub fn new(provider: Arc<dyn RemoteProviderClient>, desired_url: DesiredWebhookUrl) -> Self {
        Self {
            provider,
            desired_url,
            set_webhook_attempts: DEFAULT_SET_WEBHOOK_ATTEMPTS,
            set_webhook_timeout: Duration::from_secs(DEFAULT_SET_WEBHOOK_TIMEOUT_SECS),
        }
    }

    /// Override the timeout retry budget (at least one attempt is always made).
    #[must_use]
    pub fn with_retry_policy(mut self, attempts: usize, timeout: Duration) -> Self {
        self.set_webhook_attempts = attempts.max(1);
        self.set_webhook_timeout = timeout;
        self
    }

    pub fn desired_url(&self) -> &DesiredWebhookUrl {
        &self.desired_url
    }

    /// Fetch the remote status and re-point the webhook only when it drifted.
    pub async fn reconcile(&self) -> Result<Registration> {
        let status = self
            .provider
            .get_webhook_info()
            .await
            .map_err(|error| WebhookError::FetchStatusFailed(error.to_string()))?;

        if let Some(last_error_date) = status.last_error_date {
            tracing::info!(
                last_error_date = %format_unix_seconds(last_error_date),
                last_error_message = ?status.last_error_message,
                url = %status.url,
                pending_update_count = ?status.pending_update_count,
                "Telegram webhook reported a delivery error"
            );
        } else {
            tracing::debug!(status = ?status, "Telegram webhook status");
        }

        if status.url == self.desired_url.as_str() {
            return Ok(Registration::AlreadyCurrent);
        }

        match self.try_to_set_webhook().await {
            Ok(attempts) => {
                tracing::info!(url = %self.desired_url, attempts, "Set new telegram webhook");
                Ok(Registration::Updated { attempts })
            }
            Err(error) => {
                tracing::error!(
                    url = %self.desired_url,
                    error = %error,
                    "Set telegram webhook failed"
                );
                Err(error)
            }
        }
    }

    async fn try_to_set_webhook(&self) -> Result<usize> {
        tracing::debug!(url = %self.desired_url, "Registering webhook URL");
        let url = self.desired_url.as_str();
        for attempt in 1..=self.set_webhook_attempts {
            let outcome = tokio::time::timeout(
                self.set_webhook_timeout,
                self.provider.set_webhook(url, self.set_webhook_timeout),
            )
            .await
            .unwrap_or(Err(ProviderError::TimedOut));

            match outcome {
                Ok(true) => return Ok(attempt),
                Ok(false) => {
                    return Err(WebhookError::SetWebhookFailed {
                        attempts: attempt,
                        reason: "provider did not accept the webhook".to_string(),
                    });
                }
                Err(error) if error.is_timeout() => {
                    tracing::warn!(
                        retry = attempt,
                        max_attempts = self.set_webhook_attempts,
                        "Timeout trying to set webhook"
                    );
                }
                Err(error) => {
                    return Err(WebhookError::SetWebhookFailed {
                        attempts: attempt,
                        reason: error.to_string(),
                    });
                }
            }
        }

        Err(WebhookError::SetWebhookFailed {
            attempts: self.set_webhook_attempts,
            reason: ProviderError::TimedOut.to_string(),
        })
    }

    /// Delete the remote webhook once. Failures are logged and returned but
    /// callers on the shutdown path only log them.
    pub async fn deregister(&self) -> Result<()> {
        tracing::debug!("Deregistering webhook URL");
        match self.provider.delete_webhook().await {
            Ok(true) => {
                tracing::info!(url = %self.desired_url, "Deleted telegram webhook");
                Ok(())
            }
            Ok(false) => {
                tracing::warn!("Telegram did not confirm webhook deletion");
                Err(WebhookError::DeregisterFailed(
                    "provider did not confirm deletion".to_string(),
                ))
            }
            Err(error) => {
                tracing::warn!(error = %error, "Failed to delete telegram webhook");
                Err(WebhookError::DeregisterFailed(error.to_string()))
            }
        }
    }
}

/// RFC 3339 UTC rendering of a provider timestamp; raw seconds when out of range.
fn format_unix_seconds(secs: i64) -> String {
    DateTime::<Utc>::from_timestamp(secs, 0).map_or_else(
        || secs.to_string(),
        |at| at.to_rfc3339_opts(SecondsFormat::Secs, true),
    )
}

#[cfg(test)]
mod tests {
    use super::format_unix_seconds;

    #[test]
    fn last_error_date_renders_as_utc() {
        assert_eq!(format_unix_seconds(1_700_000_000), "2023-11-14T22:13:20Z");
        assert_eq!(format_unix_seconds(0), "1970-01-01T00:00:00Z");
    }

    #[test]
    fn out_of_range_last_error_date_stays_raw() {
        assert_eq!(format_unix_seconds(i64::MAX), i64::MAX.to_string());
    }
}
