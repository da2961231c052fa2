use crate::http::retry::RETRYABLE_STATUSES;
use std::fmt;
use thiserror::Error;

/// Longest response-body excerpt carried by [`HttpError::Status`].
pub const MAX_BODY_EXCERPT: usize = 400;

/// Which kind of transport-level failure ended a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// Connect or read timeout.
    Timeout,
    /// The connection could not be established or was reset.
    Connect,
    /// Any other failure while sending the request or reading the body.
    Other,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportErrorKind::Timeout => write!(f, "timeout"),
            TransportErrorKind::Connect => write!(f, "connection failure"),
            TransportErrorKind::Other => write!(f, "transport failure"),
        }
    }
}

/// A single failed attempt below the HTTP status layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Timeouts and connection failures; the manual retry tier only retries these.
    pub fn is_timeout_or_connect(&self) -> bool {
        matches!(
            self.kind,
            TransportErrorKind::Timeout | TransportErrorKind::Connect
        )
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        let kind = if e.is_timeout() {
            TransportErrorKind::Timeout
        } else if e.is_connect() {
            TransportErrorKind::Connect
        } else {
            TransportErrorKind::Other
        };
        TransportError::new(kind, e.to_string())
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("Request to {url} failed after {attempts} attempts ({kind}): {message}")]
    Transport {
        url: String,
        attempts: u32,
        kind: TransportErrorKind,
        message: String,
    },

    #[error("HTTP {status} from {url}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    #[error("Failed to decode JSON response from {url}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid request for {url}")]
    InvalidRequest {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),
}

impl HttpError {
    /// Builds a [`HttpError::Status`], keeping at most [`MAX_BODY_EXCERPT`] characters of the body.
    pub fn status(url: impl Into<String>, status: u16, body: &str) -> Self {
        HttpError::Status {
            url: url.into(),
            status,
            body: body.chars().take(MAX_BODY_EXCERPT).collect(),
        }
    }

    /// `true` for network failures and retryable statuses that outlasted every retry.
    pub fn is_transient(&self) -> bool {
        match self {
            HttpError::Transport { .. } => true,
            HttpError::Status { status, .. } => RETRYABLE_STATUSES.contains(status),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_body_is_truncated() {
        let body = "x".repeat(1000);
        match HttpError::status("http://example.test", 500, &body) {
            HttpError::Status { body, status, .. } => {
                assert_eq!(status, 500);
                assert_eq!(body.chars().count(), MAX_BODY_EXCERPT);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        let body = "é".repeat(500);
        let err = HttpError::status("u", 418, &body);
        assert!(err.to_string().starts_with("HTTP 418 from u: é"));
    }

    #[test]
    fn test_transient_classification() {
        let err = HttpError::Transport {
            url: "u".to_string(),
            attempts: 3,
            kind: TransportErrorKind::Timeout,
            message: "timed out".to_string(),
        };
        assert!(err.is_transient());
        assert!(!HttpError::status("u", 404, "").is_transient());
        assert!(HttpError::status("u", 503, "").is_transient());
    }
}
