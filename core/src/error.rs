//! Error types for the SAiPD API client.
//!
//! # Design
//! Transport failures and HTTP error responses are surfaced exactly as they
//! arrived: `Http` keeps the raw status code and body so callers can branch on
//! them. Caller misuse (`UnsupportedStatus`, `InvalidArgument`) is raised while
//! building a request, before anything reaches the network.

use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No response was received.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// Status has no convenience endpoint; use the update-by-record path.
    #[error("unsupported convenience status `{0}`")]
    UnsupportedStatus(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid base url `{0}`")]
    InvalidBaseUrl(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("session storage error: {0}")]
    Storage(String),

    #[error("serialization failed: {0}")]
    Serialization(String),

    #[error("deserialization failed: {0}")]
    Deserialization(String),
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

impl ApiError {
    /// HTTP status code, for `Http` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Human-readable `detail` field of a structured error body, if any.
    pub fn detail(&self) -> Option<String> {
        let ApiError::Http { body, .. } = self else {
            return None;
        };
        let parsed: ErrorBody = serde_json::from_str(body).ok()?;
        match parsed.detail {
            serde_json::Value::String(s) => Some(s),
            other => Some(other.to_string()),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}
