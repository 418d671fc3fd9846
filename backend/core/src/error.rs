use std::time::Duration;

use thiserror::Error;

/// Top-level error type for ringforge collaborators.
///
/// External-API failures are split by kind so call sites can decide on a
/// fallback and log what actually went wrong.
#[derive(Debug, Error)]
pub enum RingError {
    #[error("{service} timed out after {after_ms}ms")]
    Timeout { service: String, after_ms: u64 },

    #[error("{service} rejected the request ({status}): {message}")]
    Rejected {
        service: String,
        status: u16,
        message: String,
    },

    #[error("{service} returned a malformed response: {message}")]
    Malformed { service: String, message: String },

    #[error("{service} request failed: {message}")]
    Transport { service: String, message: String },

    #[error("audio storage error: {0}")]
    Storage(String),

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RingError {
    pub fn timeout(service: impl Into<String>, after: Duration) -> Self {
        Self::Timeout {
            service: service.into(),
            after_ms: after.as_millis() as u64,
        }
    }

    pub fn rejected(service: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            service: service.into(),
            status,
            message: message.into(),
        }
    }

    pub fn malformed(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Malformed {
            service: service.into(),
            message: message.into(),
        }
    }

    pub fn transport(service: impl Into<String>, message: impl ToString) -> Self {
        Self::Transport {
            service: service.into(),
            message: message.to_string(),
        }
    }

    /// Short machine-readable label, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Timeout { .. } => "timeout",
            Self::Rejected { .. } => "rejected",
            Self::Malformed { .. } => "malformed",
            Self::Transport { .. } => "transport",
            Self::Storage(_) => "storage",
            Self::ConfigError(_) => "config",
            Self::Other(_) => "other",
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

impl From<std::io::Error> for RingError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(err.to_string())
    }
}
