use std::fmt;

/// Failure of a single provider call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// Call did not complete within its timeout.
    TimedOut,
    /// Connection or transport level failure.
    Transport(String),
    /// Provider answered with `ok: false` or a non-success status.
    Api {
        /// HTTP status, when known.
        status: Option<u16>,
        /// Telegram `error_code`.
        error_code: Option<i64>,
        /// Telegram `description` (or raw body).
        description: String,
    },
    /// Success response whose body could not be decoded.
    Decode(String),
}

impl ProviderError {
    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::TimedOut
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }

    /// Only timeouts count as transient.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::TimedOut)
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TimedOut => write!(f, "timed out"),
            Self::Transport(message) => write!(f, "transport error: {message}"),
            Self::Api {
                status,
                error_code,
                description,
            } => match (status, error_code) {
                (Some(status), Some(code)) => {
                    write!(f, "status={status}, error_code={code}, body={description}")
                }
                (Some(status), None) => write!(f, "status={status}, body={description}"),
                (None, Some(code)) => write!(f, "error_code={code}, body={description}"),
                (None, None) => write!(f, "{description}"),
            },
            Self::Decode(message) => write!(f, "failed to decode response: {message}"),
        }
    }
}

impl std::error::Error for ProviderError {}
