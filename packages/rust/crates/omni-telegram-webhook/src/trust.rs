//! Network-origin trust gate for inbound webhook calls.

use std::net::IpAddr;

use ipnetwork::IpNetwork;

use crate::error::{Result, WebhookError};

/// Telegram's published webhook source ranges.
pub const DEFAULT_TRUSTED_NETWORKS: &[&str] = &["149.154.160.0/20", "91.108.4.0/22"];

/// Immutable set of trusted CIDR ranges.
#[derive(Debug, Clone, Default)]
pub struct TrustGate {
    networks: Vec<IpNetwork>,
}

impl TrustGate {
    /// Build from already parsed networks.
    pub fn new(networks: Vec<IpNetwork>) -> Self {
        Self { networks }
    }

    /// Parse CIDR entries (IPv4 or IPv6). Bare addresses are single-host ranges.
    pub fn from_cidrs<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut networks = Vec::new();
        for entry in entries {
            let raw = entry.as_ref().trim();
            if raw.is_empty() {
                continue;
            }
            let network =
                raw.parse::<IpNetwork>()
                    .map_err(|error| WebhookError::InvalidTrustedNetwork {
                        entry: raw.to_string(),
                        reason: error.to_string(),
                    })?;
            networks.push(network);
        }
        Ok(Self { networks })
    }

    /// Telegram default ranges.
    pub fn telegram_defaults() -> Self {
        Self::from_cidrs(DEFAULT_TRUSTED_NETWORKS).unwrap_or_default()
    }

    /// Configured ranges.
    pub fn networks(&self) -> &[IpNetwork] {
        &self.networks
    }

    /// Whether no range is configured (every caller is denied).
    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }

    /// `true` iff `addr` falls inside at least one configured range.
    ///
    /// IPv4-mapped IPv6 addresses (`::ffff:a.b.c.d`) also match IPv4 ranges,
    /// since dual-stack listeners report IPv4 peers in that form.
    pub fn is_allowed(&self, addr: IpAddr) -> bool {
        let canonical = addr.to_canonical();
        self.networks
            .iter()
            .any(|network| network.contains(addr) || network.contains(canonical))
    }
}
