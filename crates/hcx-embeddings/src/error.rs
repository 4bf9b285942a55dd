//! Error types for hcx-embeddings

use std::fmt;
use thiserror::Error;

/// Result type alias using HcxError
pub type Result<T> = std::result::Result<T, HcxError>;

/// Error type alias for convenience
pub type Error = HcxError;

/// Network-level failure category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    Timeout,
    Connect,
    Cancelled,
    Other,
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Timeout => "timeout",
            Self::Connect => "connect",
            Self::Cancelled => "cancelled",
            Self::Other => "other",
        };
        f.write_str(name)
    }
}

/// Main error type for hcx-embeddings
#[derive(Debug, Error)]
pub enum HcxError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Transport error ({kind}): {message}")]
    Transport { kind: TransportKind, message: String },

    #[error("Remote error (HTTP {status}{}): {message}", code_suffix(.code))]
    Remote {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl HcxError {
    pub(crate) fn cancelled() -> Self {
        Self::Transport {
            kind: TransportKind::Cancelled,
            message: "request cancelled before completion".to_string(),
        }
    }

    pub(crate) fn remote(status: u16, code: Option<String>, message: impl Into<String>) -> Self {
        Self::Remote {
            status,
            code,
            message: message.into(),
        }
    }

    /// HTTP status carried by a remote error
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Transport failure category, if this is a transport error
    pub fn transport_kind(&self) -> Option<TransportKind> {
        match self {
            Self::Transport { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Whether a caller-side retry could plausibly succeed.
    ///
    /// The client itself never retries.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport { kind, .. } => *kind != TransportKind::Cancelled,
            Self::Remote { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

fn code_suffix(code: &Option<String>) -> String {
    code.as_deref()
        .map(|c| format!(", code {}", c))
        .unwrap_or_default()
}

/// Covers `send()` and body-read failures. Response bodies are decoded by
/// `embed::protocol`, never through this conversion.
impl From<reqwest::Error> for HcxError {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            TransportKind::Timeout
        } else if err.is_connect() {
            TransportKind::Connect
        } else {
            TransportKind::Other
        };
        Self::Transport {
            kind,
            message: err.to_string(),
        }
    }
}
