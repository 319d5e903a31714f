use std::path::PathBuf;

use clap::Parser;

use omni_telegram_webhook::WebhookOverrides;

#[derive(Parser)]
#[command(name = "omni-telegram-webhook")]
#[command(about = "Receive Telegram updates via webhook: register, listen, deregister on stop.")]
pub(crate) struct Cli {
    /// Override config directory.
    #[arg(long)]
    pub(crate) conf: Option<PathBuf>,

    /// Telegram bot token (default: OMNI_TELEGRAM_WEBHOOK_BOT_TOKEN or settings).
    #[arg(long)]
    pub(crate) bot_token: Option<String>,

    /// Public https base URL; the webhook path is appended.
    #[arg(long)]
    pub(crate) base_url: Option<String>,

    /// Externally reachable https URL of this host, used when --base-url is not set.
    #[arg(long)]
    pub(crate) external_url: Option<String>,

    /// Comma separated trusted CIDR ranges (default: Telegram's published ranges).
    #[arg(long)]
    pub(crate) trusted_networks: Option<String>,

    /// Listen address (default: 0.0.0.0:8443).
    #[arg(long)]
    pub(crate) bind: Option<String>,

    /// Debug logging for this crate.
    #[arg(long, short = 'v')]
    pub(crate) verbose: bool,
}

impl Cli {
    pub(crate) fn overrides(&self) -> WebhookOverrides {
        WebhookOverrides {
            bot_token: self.bot_token.clone(),
            base_url: self.base_url.clone(),
            external_url: self.external_url.clone(),
            trusted_networks: self.trusted_networks.clone(),
            bind: self.bind.clone(),
        }
    }
}
