// Error types surfaced at the network boundary

use serde::Serialize;
use thiserror::Error;

/// Any failure talking to the upstream metrics API.
#[derive(Debug, Clone, Error)]
pub enum NetworkError {
    /// Non-2xx response.
    #[error("upstream returned HTTP {status}")]
    Status { status: u16 },

    /// Connection, TLS, or timeout failure before a response arrived.
    #[error("upstream request failed: {0}")]
    Transport(String),

    /// 2xx response whose body was not the expected JSON.
    #[error("upstream response could not be decoded: {0}")]
    Body(String),
}

impl NetworkError {
    /// HTTP status, when the upstream answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            NetworkError::Status { status } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for NetworkError {
    fn from(e: reqwest::Error) -> Self {
        if let Some(status) = e.status() {
            NetworkError::Status {
                status: status.as_u16(),
            }
        } else if e.is_decode() {
            NetworkError::Body(e.to_string())
        } else {
            NetworkError::Transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for NetworkError {
    fn from(e: serde_json::Error) -> Self {
        NetworkError::Body(e.to_string())
    }
}

/// Per-series error as shown to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorInfo {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl From<&NetworkError> for ErrorInfo {
    fn from(e: &NetworkError) -> Self {
        Self {
            message: e.to_string(),
            status: e.status(),
        }
    }
}

impl From<NetworkError> for ErrorInfo {
    fn from(e: NetworkError) -> Self {
        Self::from(&e)
    }
}
