//! Resolved webhook runtime config: CLI > env > settings file > default.

use anyhow::{Result, anyhow};

use super::settings::{TelegramWebhookSettings, load_runtime_settings};
use crate::error::WebhookError;
use crate::lifecycle::DEFAULT_DEREGISTER_TIMEOUT_SECS;
use crate::provider::{TELEGRAM_API_BASE_ENV, TELEGRAM_DEFAULT_API_BASE};
use crate::reconciler::{DEFAULT_SET_WEBHOOK_ATTEMPTS, DEFAULT_SET_WEBHOOK_TIMEOUT_SECS};
use crate::trust::{DEFAULT_TRUSTED_NETWORKS, TrustGate};
use crate::url::{DesiredWebhookUrl, resolve_base_url};

const DEFAULT_BIND: &str = "0.0.0.0:8443";
const DEFAULT_UPDATE_QUEUE_CAPACITY: usize = 100;

const ENV_BOT_TOKEN: &str = "OMNI_TELEGRAM_WEBHOOK_BOT_TOKEN";
const ENV_BASE_URL: &str = "OMNI_TELEGRAM_WEBHOOK_BASE_URL";
const ENV_EXTERNAL_URL: &str = "OMNI_TELEGRAM_WEBHOOK_EXTERNAL_URL";
const ENV_TRUSTED_NETWORKS: &str = "OMNI_TELEGRAM_WEBHOOK_TRUSTED_NETWORKS";
const ENV_BIND: &str = "OMNI_TELEGRAM_WEBHOOK_BIND";
const ENV_SET_WEBHOOK_ATTEMPTS: &str = "OMNI_TELEGRAM_WEBHOOK_SET_WEBHOOK_ATTEMPTS";
const ENV_SET_WEBHOOK_TIMEOUT_SECS: &str = "OMNI_TELEGRAM_WEBHOOK_SET_WEBHOOK_TIMEOUT_SECS";
const ENV_DEREGISTER_TIMEOUT_SECS: &str = "OMNI_TELEGRAM_WEBHOOK_DEREGISTER_TIMEOUT_SECS";
const ENV_UPDATE_QUEUE_CAPACITY: &str = "OMNI_TELEGRAM_WEBHOOK_UPDATE_QUEUE_CAPACITY";

/// Values supplied on the command line; each wins over env and settings.
#[derive(Debug, Clone, Default)]
pub struct WebhookOverrides {
    pub bot_token: Option<String>,
    pub base_url: Option<String>,
    pub external_url: Option<String>,
    pub trusted_networks: Option<String>,
    pub bind: Option<String>,
}

#[derive(Clone)]
pub struct WebhookConfig {
    pub bot_token: String,
    pub base_url: Option<String>,
    pub external_url: Option<String>,
    pub trusted_networks: Vec<String>,
    pub bind: String,
    pub api_base_url: String,
    pub set_webhook_attempts: usize,
    pub set_webhook_timeout_secs: u64,
    pub deregister_timeout_secs: u64,
    pub update_queue_capacity: usize,
}

impl std::fmt::Debug for WebhookConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookConfig")
            .field("base_url", &self.base_url)
            .field("external_url", &self.external_url)
            .field("trusted_networks", &self.trusted_networks)
            .field("bind", &self.bind)
            .field("api_base_url", &self.api_base_url)
            .field("set_webhook_attempts", &self.set_webhook_attempts)
            .field("set_webhook_timeout_secs", &self.set_webhook_timeout_secs)
            .field("deregister_timeout_secs", &self.deregister_timeout_secs)
            .field("update_queue_capacity", &self.update_queue_capacity)
            .finish_non_exhaustive()
    }
}

impl WebhookConfig {
    /// Resolve from process env and the merged settings files.
    pub fn from_env(overrides: WebhookOverrides) -> Result<Self> {
        let settings = load_runtime_settings();
        Self::from_lookup(
            |name| std::env::var(name).ok(),
            overrides,
            &settings.telegram_webhook,
        )
    }

    /// Resolve with an explicit env lookup (tests).
    pub fn from_lookup<F>(
        lookup: F,
        overrides: WebhookOverrides,
        settings: &TelegramWebhookSettings,
    ) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bot_token = resolve_string(
            &lookup,
            overrides.bot_token,
            ENV_BOT_TOKEN,
            settings.bot_token.as_deref(),
        )
        .filter(|token| !token.trim().is_empty())
        .ok_or_else(|| anyhow!("telegram bot token is required (--bot-token or {ENV_BOT_TOKEN})"))?;

        let trusted_networks = resolve_string(
            &lookup,
            overrides.trusted_networks,
            ENV_TRUSTED_NETWORKS,
            settings.trusted_networks.as_deref(),
        )
        .map(|raw| parse_comma_separated(&raw))
        .unwrap_or_else(|| {
            DEFAULT_TRUSTED_NETWORKS
                .iter()
                .map(ToString::to_string)
                .collect()
        });

        Ok(Self {
            bot_token: bot_token.trim().to_string(),
            base_url: resolve_string(
                &lookup,
                overrides.base_url,
                ENV_BASE_URL,
                settings.base_url.as_deref(),
            ),
            external_url: resolve_string(
                &lookup,
                overrides.external_url,
                ENV_EXTERNAL_URL,
                settings.external_url.as_deref(),
            ),
            trusted_networks,
            bind: resolve_string(&lookup, overrides.bind, ENV_BIND, settings.bind.as_deref())
                .unwrap_or_else(|| DEFAULT_BIND.to_string()),
            api_base_url: resolve_string(
                &lookup,
                None,
                TELEGRAM_API_BASE_ENV,
                settings.api_base_url.as_deref(),
            )
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| TELEGRAM_DEFAULT_API_BASE.to_string()),
            set_webhook_attempts: resolve_positive(
                &lookup,
                ENV_SET_WEBHOOK_ATTEMPTS,
                settings.set_webhook_attempts,
                DEFAULT_SET_WEBHOOK_ATTEMPTS,
            ),
            set_webhook_timeout_secs: resolve_positive(
                &lookup,
                ENV_SET_WEBHOOK_TIMEOUT_SECS,
                settings.set_webhook_timeout_secs,
                DEFAULT_SET_WEBHOOK_TIMEOUT_SECS,
            ),
            deregister_timeout_secs: resolve_positive(
                &lookup,
                ENV_DEREGISTER_TIMEOUT_SECS,
                settings.deregister_timeout_secs,
                DEFAULT_DEREGISTER_TIMEOUT_SECS,
            ),
            update_queue_capacity: resolve_positive(
                &lookup,
                ENV_UPDATE_QUEUE_CAPACITY,
                settings.update_queue_capacity,
                DEFAULT_UPDATE_QUEUE_CAPACITY,
            ),
        })
    }

    pub fn trust_gate(&self) -> Result<TrustGate, WebhookError> {
        TrustGate::from_cidrs(&self.trusted_networks)
    }

    /// Desired webhook URL from the explicit base URL or the external URL.
    pub fn desired_url(&self) -> Result<DesiredWebhookUrl, WebhookError> {
        let base = resolve_base_url(self.base_url.as_deref(), self.external_url.as_deref())?;
        Ok(DesiredWebhookUrl::from_base(&base))
    }
}

fn resolve_string<F>(
    lookup: &F,
    cli_value: Option<String>,
    env_name: &str,
    settings_value: Option<&str>,
) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    if cli_value.is_some() {
        return cli_value;
    }
    if let Some(value) = lookup(env_name)
        && !value.trim().is_empty()
    {
        return Some(value);
    }
    settings_value.map(ToString::to_string)
}

fn resolve_positive<F, T>(lookup: &F, name: &str, setting_value: Option<T>, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr + PartialOrd + Default + Copy + std::fmt::Display,
{
    if let Some(raw) = lookup(name) {
        match raw.trim().parse::<T>() {
            Ok(value) if value > T::default() => return value,
            _ => tracing::warn!(
                env_var = %name,
                value = %raw,
                "invalid runtime config env value; using settings/default"
            ),
        }
    }
    match setting_value {
        Some(value) if value > T::default() => value,
        Some(value) => {
            tracing::warn!(
                setting = %name,
                value = %value,
                default = %default,
                "invalid runtime config settings value; using default"
            );
            default
        }
        None => default,
    }
}

fn parse_comma_separated(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(ToString::to_string)
        .collect()
}
