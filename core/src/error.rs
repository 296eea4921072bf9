//! Error types for the fetch adapter.
//!
//! # Design
//! `TransportFailure` is the only error the adapter raises on its own: the
//! transport answered, but with a failing status. It keeps the normalized
//! response so callers can inspect the body and headers. Errors produced by
//! the transport itself are wrapped in `FetchError::Transport` and left as-is.

use std::fmt;

use thiserror::Error;

use crate::types::NormalizedResponse;

/// The transport replied with a failing status.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportFailure {
    /// Status text reported by the transport, if any.
    pub message: Option<String>,
    pub response: NormalizedResponse,
}

impl TransportFailure {
    pub fn status_code(&self) -> u16 {
        self.response.status_code
    }
}

impl fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => f.write_str(message),
            None => write!(f, "HTTP {}", self.response.status_code),
        }
    }
}

impl std::error::Error for TransportFailure {}

/// Errors returned by `FetchBackend::request`.
#[derive(Debug, Error)]
pub enum FetchError<E> {
    #[error(transparent)]
    Failure(#[from] TransportFailure),

    /// The transport call or body decoding failed.
    #[error(transparent)]
    Transport(E),

    /// The request data could not be serialized to JSON text.
    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),
}

impl<E> FetchError<E> {
    /// The failure payload, when the transport answered with an error status.
    pub fn failure(&self) -> Option<&TransportFailure> {
        match self {
            FetchError::Failure(failure) => Some(failure),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn failure(message: Option<&str>) -> TransportFailure {
        TransportFailure {
            message: message.map(str::to_string),
            response: NormalizedResponse {
                data: serde_json::Value::Null,
                headers: BTreeMap::new(),
                status_code: 503,
            },
        }
    }

    #[test]
    fn failure_displays_status_text() {
        assert_eq!(failure(Some("Service Unavailable")).to_string(), "Service Unavailable");
    }

    #[test]
    fn failure_without_status_text_falls_back_to_code() {
        assert_eq!(failure(None).to_string(), "HTTP 503");
    }

    #[test]
    fn fetch_error_is_transparent_over_failure() {
        let err: FetchError<std::io::Error> = failure(Some("Service Unavailable")).into();
        assert_eq!(err.to_string(), "Service Unavailable");
        assert_eq!(err.failure().map(TransportFailure::status_code), Some(503));
    }
}
