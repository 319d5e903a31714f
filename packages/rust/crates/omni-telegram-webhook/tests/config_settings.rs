#![allow(missing_docs)]

use std::collections::HashMap;

use anyhow::Result;
use omni_telegram_webhook::{
    DEFAULT_SET_WEBHOOK_ATTEMPTS, DEFAULT_TRUSTED_NETWORKS, TELEGRAM_DEFAULT_API_BASE,
    TelegramWebhookSettings, WebhookConfig, WebhookError, WebhookOverrides,
    load_runtime_settings_from_paths,
};

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    move |name: &str| map.get(name).cloned()
}

#[test]
fn user_settings_override_system_settings() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let system = dir.path().join("system.yaml");
    let user = dir.path().join("user.yaml");
    std::fs::write(
        &system,
        r#"
telegram_webhook:
  bot_token: "system-token"
  base_url: "https://system.example.com"
  trusted_networks: "10.0.0.0/8"
  set_webhook_attempts: 5
"#,
    )?;
    std::fs::write(
        &user,
        r#"
telegram_webhook:
  base_url: "https://user.example.com"
"#,
    )?;

    let settings = load_runtime_settings_from_paths(&system, &user).telegram_webhook;

    assert_eq!(settings.bot_token.as_deref(), Some("system-token"));
    assert_eq!(settings.base_url.as_deref(), Some("https://user.example.com"));
    assert_eq!(settings.trusted_networks.as_deref(), Some("10.0.0.0/8"));
    assert_eq!(settings.set_webhook_attempts, Some(5));
    Ok(())
}

#[test]
fn invalid_or_missing_files_are_ignored() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let broken = dir.path().join("broken.yaml");
    std::fs::write(&broken, "telegram_webhook: [not, a, map")?;
    let missing = dir.path().join("missing.yaml");

    let settings = load_runtime_settings_from_paths(&broken, &missing).telegram_webhook;

    assert!(settings.bot_token.is_none());
    assert!(settings.base_url.is_none());
    Ok(())
}

#[test]
fn cli_beats_env_beats_settings() -> Result<()> {
    let settings = TelegramWebhookSettings {
        bot_token: Some("settings-token".to_string()),
        base_url: Some("https://settings.example.com".to_string()),
        bind: Some("127.0.0.1:9000".to_string()),
        ..TelegramWebhookSettings::default()
    };
    let lookup = lookup_from(&[
        ("OMNI_TELEGRAM_WEBHOOK_BOT_TOKEN", "env-token"),
        ("OMNI_TELEGRAM_WEBHOOK_BASE_URL", "https://env.example.com"),
    ]);
    let overrides = WebhookOverrides {
        base_url: Some("https://cli.example.com".to_string()),
        ..WebhookOverrides::default()
    };

    let config = WebhookConfig::from_lookup(lookup, overrides, &settings)?;

    assert_eq!(config.bot_token, "env-token");
    assert_eq!(config.base_url.as_deref(), Some("https://cli.example.com"));
    assert_eq!(config.bind, "127.0.0.1:9000");
    assert_eq!(
        config.desired_url()?.as_str(),
        "https://cli.example.com/api/telegram_webhooks"
    );
    Ok(())
}

#[test]
fn api_base_url_env_beats_settings() -> Result<()> {
    let settings = TelegramWebhookSettings {
        bot_token: Some("t".to_string()),
        api_base_url: Some("https://from-settings.example".to_string()),
        ..TelegramWebhookSettings::default()
    };

    let from_env = WebhookConfig::from_lookup(
        lookup_from(&[("OMNI_TELEGRAM_WEBHOOK_API_BASE_URL", "http://from-env.example")]),
        WebhookOverrides::default(),
        &settings,
    )?;
    assert_eq!(from_env.api_base_url, "http://from-env.example");

    let from_settings =
        WebhookConfig::from_lookup(lookup_from(&[]), WebhookOverrides::default(), &settings)?;
    assert_eq!(from_settings.api_base_url, "https://from-settings.example");

    let fallback = WebhookConfig::from_lookup(
        lookup_from(&[("OMNI_TELEGRAM_WEBHOOK_API_BASE_URL", "  ")]),
        WebhookOverrides::default(),
        &TelegramWebhookSettings {
            bot_token: Some("t".to_string()),
            ..TelegramWebhookSettings::default()
        },
    )?;
    assert_eq!(fallback.api_base_url, TELEGRAM_DEFAULT_API_BASE);
    Ok(())
}

#[test]
fn missing_bot_token_is_an_error() {
    let result = WebhookConfig::from_lookup(
        lookup_from(&[]),
        WebhookOverrides::default(),
        &TelegramWebhookSettings::default(),
    );
    assert!(result.is_err());
}

#[test]
fn defaults_apply_when_nothing_is_configured() -> Result<()> {
    let config = WebhookConfig::from_lookup(
        lookup_from(&[("OMNI_TELEGRAM_WEBHOOK_BOT_TOKEN", "t")]),
        WebhookOverrides::default(),
        &TelegramWebhookSettings::default(),
    )?;

    assert_eq!(config.set_webhook_attempts, DEFAULT_SET_WEBHOOK_ATTEMPTS);
    assert_eq!(config.set_webhook_timeout_secs, 5);
    assert_eq!(config.bind, "0.0.0.0:8443");
    assert_eq!(config.trusted_networks.len(), DEFAULT_TRUSTED_NETWORKS.len());
    assert_eq!(config.trust_gate()?.networks().len(), 2);
    assert!(matches!(
        config.desired_url(),
        Err(WebhookError::MissingBaseUrl)
    ));
    Ok(())
}

#[test]
fn invalid_numeric_env_falls_back_to_settings() -> Result<()> {
    let settings = TelegramWebhookSettings {
        set_webhook_attempts: Some(4),
        set_webhook_timeout_secs: Some(0),
        ..TelegramWebhookSettings::default()
    };
    let config = WebhookConfig::from_lookup(
        lookup_from(&[
            ("OMNI_TELEGRAM_WEBHOOK_BOT_TOKEN", "t"),
            ("OMNI_TELEGRAM_WEBHOOK_SET_WEBHOOK_ATTEMPTS", "many"),
        ]),
        WebhookOverrides::default(),
        &settings,
    )?;

    assert_eq!(config.set_webhook_attempts, 4);
    assert_eq!(config.set_webhook_timeout_secs, 5);
    Ok(())
}

#[test]
fn external_url_must_be_public_https() -> Result<()> {
    let base = |external: &str| -> Result<WebhookConfig> {
        WebhookConfig::from_lookup(
            lookup_from(&[
                ("OMNI_TELEGRAM_WEBHOOK_BOT_TOKEN", "t"),
                ("OMNI_TELEGRAM_WEBHOOK_EXTERNAL_URL", external),
            ]),
            WebhookOverrides::default(),
            &TelegramWebhookSettings::default(),
        )
    };

    assert_eq!(
        base("https://ha.example.com/")?.desired_url()?.as_str(),
        "https://ha.example.com/api/telegram_webhooks"
    );
    assert!(matches!(
        base("http://ha.example.com")?.desired_url(),
        Err(WebhookError::InvalidUrlScheme { .. })
    ));
    assert!(matches!(
        base("https://192.168.1.20:8123")?.desired_url(),
        Err(WebhookError::InternalBaseUrl { .. })
    ));
    assert!(matches!(
        base("https://localhost")?.desired_url(),
        Err(WebhookError::InternalBaseUrl { .. })
    ));
    Ok(())
}

#[test]
fn invalid_trusted_network_is_reported() -> Result<()> {
    let config = WebhookConfig::from_lookup(
        lookup_from(&[
            ("OMNI_TELEGRAM_WEBHOOK_BOT_TOKEN", "t"),
            ("OMNI_TELEGRAM_WEBHOOK_TRUSTED_NETWORKS", "10.0.0.0/8, bogus"),
        ]),
        WebhookOverrides::default(),
        &TelegramWebhookSettings::default(),
    )?;

    assert_eq!(config.trusted_networks, vec!["10.0.0.0/8", "bogus"]);
    assert!(matches!(
        config.trust_gate(),
        Err(WebhookError::InvalidTrustedNetwork { .. })
    ));
    Ok(())
}
