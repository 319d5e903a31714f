use serde::Deserialize;

/// Snapshot of the provider's webhook registration (`getWebhookInfo`).
///
/// Fetched per reconciliation pass and never cached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RemoteWebhookStatus {
    /// Registered URL; empty when no webhook is set.
    #[serde(default)]
    pub url: String,
    /// Unix time of the most recent delivery error.
    #[serde(default)]
    pub last_error_date: Option<i64>,
    /// Human-readable description of the most recent delivery error.
    #[serde(default)]
    pub last_error_message: Option<String>,
    /// Updates waiting for delivery.
    #[serde(default)]
    pub pending_update_count: Option<u64>,
}

impl RemoteWebhookStatus {
    /// Status pointing at `url` with no error history.
    pub fn registered(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }
}
