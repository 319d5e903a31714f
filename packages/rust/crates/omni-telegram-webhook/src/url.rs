//! Desired webhook URL composition and base URL resolution.

use std::fmt;
use std::net::IpAddr;

use reqwest::Url;

use crate::error::{Result, WebhookError};

/// Fixed path the listener is mounted on.
pub const TELEGRAM_WEBHOOK_PATH: &str = "/api/telegram_webhooks";

/// Webhook URL registered with Telegram: `<base><TELEGRAM_WEBHOOK_PATH>`.
///
/// Built once at startup; scheme is checked by [`DesiredWebhookUrl::ensure_https`]
/// before any provider call is made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesiredWebhookUrl(String);

impl DesiredWebhookUrl {
    /// Compose from a base URL (trailing slashes dropped).
    pub fn from_base(base_url: &str) -> Self {
        let base = base_url.trim().trim_end_matches('/');
        Self(format!("{base}{TELEGRAM_WEBHOOK_PATH}"))
    }

    /// Full URL string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Reject anything that is not `https://`.
    pub fn ensure_https(&self) -> Result<()> {
        match Url::parse(&self.0) {
            Ok(url) if url.scheme() == "https" => Ok(()),
            _ => Err(WebhookError::InvalidUrlScheme {
                url: self.0.clone(),
            }),
        }
    }
}

impl fmt::Display for DesiredWebhookUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pick the base URL: an explicit override is used as-is, otherwise the host's
/// external URL must be https and must not point at an internal host.
pub fn resolve_base_url(configured: Option<&str>, external: Option<&str>) -> Result<String> {
    if let Some(configured) = configured.map(str::trim).filter(|v| !v.is_empty()) {
        return Ok(configured.trim_end_matches('/').to_string());
    }
    let Some(external) = external.map(str::trim).filter(|v| !v.is_empty()) else {
        return Err(WebhookError::MissingBaseUrl);
    };
    let url = Url::parse(external).map_err(|error| WebhookError::InvalidUrl {
        url: external.to_string(),
        reason: error.to_string(),
    })?;
    if url.scheme() != "https" {
        return Err(WebhookError::InvalidUrlScheme {
            url: external.to_string(),
        });
    }
    let host = url.host_str().unwrap_or_default();
    if is_internal_host(host) {
        return Err(WebhookError::InternalBaseUrl {
            url: external.to_string(),
            host: host.to_string(),
        });
    }
    Ok(external.trim_end_matches('/').to_string())
}

fn is_internal_host(host: &str) -> bool {
    let host = host.trim_start_matches('[').trim_end_matches(']');
    if host.is_empty() {
        return true;
    }
    if let Ok(ip) = host.parse::<IpAddr>() {
        return is_internal_ip(ip.to_canonical());
    }
    let host = host.trim_end_matches('.').to_ascii_lowercase();
    host == "localhost"
        || host.ends_with(".localhost")
        || host.ends_with(".local")
        || host.ends_with(".internal")
        || host.ends_with(".lan")
        || !host.contains('.')
}

fn is_internal_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            v4.is_loopback()
                || v4.is_private()
                || v4.is_link_local()
                || v4.is_unspecified()
                // 100.64.0.0/10 carrier-grade NAT
                || (v4.octets()[0] == 100 && (v4.octets()[1] & 0xc0) == 64)
        }
        IpAddr::V6(v6) => {
            let first = v6.segments()[0];
            v6.is_loopback()
                || v6.is_unspecified()
                || (first & 0xfe00) == 0xfc00
                || (first & 0xffc0) == 0xfe80
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composes_path_without_double_slash() {
        let url = DesiredWebhookUrl::from_base("https://bot.example.com/");
        assert_eq!(url.as_str(), "https://bot.example.com/api/telegram_webhooks");
        assert!(url.ensure_https().is_ok());
    }

    #[test]
    fn http_base_is_rejected() {
        let url = DesiredWebhookUrl::from_base("http://example.com");
        assert!(matches!(
            url.ensure_https(),
            Err(WebhookError::InvalidUrlScheme { .. })
        ));
    }

    #[test]
    fn internal_hosts_are_detected() {
        for host in [
            "localhost",
            "127.0.0.1",
            "10.0.0.4",
            "192.168.1.10",
            "[::1]",
            "fd00::1",
            "homeassistant.local",
            "nas",
        ] {
            assert!(is_internal_host(host), "{host} should be internal");
        }
        for host in ["bot.example.com", "203.0.113.7", "2001:db8::1"] {
            assert!(!is_internal_host(host), "{host} should be external");
        }
    }
}
