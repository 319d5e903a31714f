//! omni-telegram-webhook: register the webhook, serve updates, deregister on stop.
//!
//! Logging: set `RUST_LOG=omni_telegram_webhook=info` (or `warn`, `debug`) to see logs on stderr.

mod cli;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use omni_telegram_webhook::{
    AxumHost, ChannelDispatcher, LifecycleCoordinator, StopSignal, TelegramBotApi, Update,
    WebhookConfig, WebhookReconciler, set_config_home_override,
};

use crate::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    if let Some(conf_dir) = cli.conf.clone() {
        set_config_home_override(conf_dir);
    }

    // RUST_LOG overrides; --verbose => debug; else info
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if cli.verbose {
            "omni_telegram_webhook=debug"
        } else {
            "omni_telegram_webhook=info"
        })
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let config = WebhookConfig::from_env(cli.overrides())?;
    tracing::debug!(config = ?config, "resolved webhook config");

    let trust_gate = config.trust_gate()?;
    let desired_url = config.desired_url()?;
    let provider =
        TelegramBotApi::new_with_base_url(config.bot_token.clone(), config.api_base_url.clone());
    let reconciler = WebhookReconciler::new(Arc::new(provider), desired_url).with_retry_policy(
        config.set_webhook_attempts,
        Duration::from_secs(config.set_webhook_timeout_secs),
    );
    let (dispatcher, update_rx) = ChannelDispatcher::bounded(config.update_queue_capacity);
    let consumer = tokio::spawn(drain_updates(update_rx));

    let coordinator = LifecycleCoordinator::new(reconciler, trust_gate, Arc::new(dispatcher))
        .with_deregister_timeout(Duration::from_secs(config.deregister_timeout_secs));
    let mut host = AxumHost::new();
    let setup = coordinator
        .setup(&mut host)
        .await
        .context("telegram webhook setup failed")?;

    let listener = match TcpListener::bind(&config.bind).await {
        Ok(listener) => listener,
        Err(error) => {
            tracing::error!(bind = %config.bind, error = %error, "failed to bind webhook listener");
            setup.shutdown.fire().await;
            return Err(error).context(format!("failed to bind {}", config.bind));
        }
    };
    tracing::info!(
        bind = %config.bind,
        url = %setup.url,
        "telegram webhook listening (Ctrl+C/SIGTERM to stop)"
    );

    // The stop event reaches the hook directly; a stalled drain must not hold
    // up deleteWebhook.
    let stop = StopSignal::new();
    let deregistration = setup.shutdown.spawn_on_stop(stop.wait());
    let signal_stop = stop.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        tracing::info!("stop signal received; deregistering webhook and draining");
        signal_stop.trigger();
    });

    let served = host.serve(listener, stop.wait()).await;
    stop.trigger();
    if let Err(error) = deregistration.await {
        tracing::warn!(error = %error, "webhook deregistration task failed");
    }
    setup.shutdown.fire().await;
    consumer.abort();
    served.context("webhook server failed")?;
    tracing::info!("telegram webhook stopped");
    Ok(())
}

async fn drain_updates(mut rx: mpsc::Receiver<Update>) {
    while let Some(update) = rx.recv().await {
        tracing::info!(
            update_id = update.update_id,
            kind = ?update.kind(),
            chat_id = ?update.chat_id(),
            "telegram update dispatched"
        );
    }
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = sigterm.recv() => {}
                }
            }
            Err(error) => {
                tracing::warn!(error = %error, "failed to listen for SIGTERM; using Ctrl+C only");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
