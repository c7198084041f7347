use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VectorWebError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Service unreachable: {0}")]
    Transport(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// The service answered with a non-success status. `message` is what the
    /// user sees: the body's `detail`, or a status-derived fallback.
    #[error("{message}")]
    Service { status: u16, message: String },

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl VectorWebError {
    /// Returns `true` when the error is likely transient (network-level
    /// failures, timeouts, HTTP 429/5xx).
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(_) | Self::Timeout(_) => true,
            Self::Service { status, .. } => *status == 429 || (500..600).contains(status),
            _ => false,
        }
    }

    /// The message shown to the user when a known-good backend fails.
    pub fn user_message(&self) -> String {
        match self {
            Self::Service { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for VectorWebError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Malformed(e.to_string())
        } else {
            Self::Transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for VectorWebError {
    fn from(e: serde_json::Error) -> Self {
        Self::Malformed(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, VectorWebError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_transport() {
        let err = VectorWebError::Transport("connection refused".into());
        assert!(err.is_transient());
    }

    #[test]
    fn test_transient_timeout() {
        assert!(VectorWebError::Timeout(Duration::from_secs(30)).is_transient());
    }

    #[test]
    fn test_transient_503() {
        let err = VectorWebError::Service {
            status: 503,
            message: "unavailable".into(),
        };
        assert!(err.is_transient());
    }

    #[test]
    fn test_permanent_400() {
        let err = VectorWebError::Service {
            status: 400,
            message: "Content too short or empty.".into(),
        };
        assert!(!err.is_transient());
    }

    #[test]
    fn test_permanent_malformed() {
        assert!(!VectorWebError::Malformed("missing field `results`".into()).is_transient());
    }

    #[test]
    fn test_service_message_is_verbatim() {
        let err = VectorWebError::Service {
            status: 500,
            message: "index not found".into(),
        };
        assert_eq!(err.to_string(), "index not found");
        assert_eq!(err.user_message(), "index not found");
    }

    #[test]
    fn test_timeout_message() {
        assert_eq!(
            VectorWebError::Timeout(Duration::from_secs(30)).user_message(),
            "Request timed out after 30s"
        );
        assert_eq!(
            VectorWebError::Timeout(Duration::from_millis(250)).to_string(),
            "Request timed out after 250ms"
        );
    }
}
