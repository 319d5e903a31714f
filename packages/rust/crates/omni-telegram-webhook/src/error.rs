//! Error types for webhook setup and teardown.
//!
//! Setup-phase errors are fatal: the listener is never mounted when any of
//! them is returned. Per-request failures live in [`crate::InboundRejection`].

use thiserror::Error;

/// Webhook lifecycle errors.
#[derive(Error, Debug)]
pub enum WebhookError {
    /// Webhook URL does not use the `https` scheme.
    #[error("invalid telegram webhook {url}: must be https")]
    InvalidUrlScheme {
        /// Offending URL.
        url: String,
    },

    /// Auto-discovered base URL points at an internal or loopback host.
    #[error("base url {url} is not externally reachable (host {host} is internal)")]
    InternalBaseUrl {
        /// Offending URL.
        url: String,
        /// Host component that was rejected.
        host: String,
    },

    /// URL could not be parsed.
    #[error("invalid url {url}: {reason}")]
    InvalidUrl {
        /// Raw value.
        url: String,
        /// Parser message.
        reason: String,
    },

    /// Neither an explicit base URL nor an external host URL was configured.
    #[error("no base url configured and no external url available")]
    MissingBaseUrl,

    /// Remote webhook status could not be fetched.
    #[error("failed to fetch telegram webhook status: {0}")]
    FetchStatusFailed(String),

    /// Remote webhook could not be set.
    #[error("set telegram webhook failed after {attempts} attempt(s): {reason}")]
    SetWebhookFailed {
        /// Attempts consumed before giving up.
        attempts: usize,
        /// Last failure observed.
        reason: String,
    },

    /// Remote webhook deletion failed.
    #[error("failed to delete telegram webhook: {0}")]
    DeregisterFailed(String),

    /// Listener could not be attached to the host server.
    #[error("failed to register webhook listener: {0}")]
    ListenerRegistration(String),

    /// Trusted network entry is not valid CIDR notation.
    #[error("invalid trusted network {entry}: {reason}")]
    InvalidTrustedNetwork {
        /// Raw entry.
        entry: String,
        /// Parser message.
        reason: String,
    },
}

/// Result type for webhook lifecycle operations.
pub type Result<T> = std::result::Result<T, WebhookError>;
