//! Telegram Bot API implementation of [`super::RemoteProviderClient`].

mod client;
mod constants;
mod response;

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

use super::{ProviderError, RemoteProviderClient, RemoteWebhookStatus};
pub use constants::TELEGRAM_DEFAULT_API_BASE;

/// Env var overriding the Bot API base URL (local Bot API servers, tests).
pub const TELEGRAM_API_BASE_ENV: &str = "OMNI_TELEGRAM_WEBHOOK_API_BASE_URL";

/// Bot API client scoped to one bot token.
pub struct TelegramBotApi {
    client: reqwest::Client,
    api_base_url: String,
    bot_token: String,
}

impl TelegramBotApi {
    /// Client against an explicit Bot API base URL.
    pub fn new_with_base_url(bot_token: String, api_base_url: String) -> Self {
        Self {
            client: client::build_telegram_http_client(),
            api_base_url: api_base_url.trim().trim_end_matches('/').to_string(),
            bot_token,
        }
    }

    fn api_url(&self, method: &str) -> String {
        format!("{}/bot{}/{method}", self.api_base_url, self.bot_token)
    }

    async fn call<T: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        body: &serde_json::Value,
        timeout: Option<Duration>,
    ) -> Result<T, ProviderError> {
        let mut request = self.client.post(self.api_url(method)).json(body);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }
        let response = request.send().await.map_err(ProviderError::from_reqwest)?;
        response::read_telegram_result(response).await
    }
}

impl fmt::Debug for TelegramBotApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramBotApi")
            .field("api_base_url", &self.api_base_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl RemoteProviderClient for TelegramBotApi {
    async fn get_webhook_info(&self) -> Result<RemoteWebhookStatus, ProviderError> {
        self.call("getWebhookInfo", &serde_json::json!({}), None)
            .await
    }

    async fn set_webhook(&self, url: &str, timeout: Duration) -> Result<bool, ProviderError> {
        self.call("setWebhook", &serde_json::json!({ "url": url }), Some(timeout))
            .await
    }

    async fn delete_webhook(&self) -> Result<bool, ProviderError> {
        self.call("deleteWebhook", &serde_json::json!({}), None)
            .await
    }
}
