//! Config namespace: settings files and resolved runtime config.

mod runtime;
mod settings;

pub use runtime::{WebhookConfig, WebhookOverrides};
pub use settings::{
    RuntimeSettings, TelegramWebhookSettings, load_runtime_settings,
    load_runtime_settings_from_paths, runtime_settings_paths, set_config_home_override,
};
