//! API client error types
//!
//! Every failure talking to the backend collapses into `ApiError`, whose
//! `Display` is the message shown to the user.

use thiserror::Error;

/// Shown whenever the backend cannot be reached at all
pub const UNREACHABLE_MESSAGE: &str =
    "Unable to connect to the server. Please check if the backend is running.";

/// Errors returned by the HRMS backend client
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Backend answered with a non-2xx status
    #[error("{message}")]
    Status { status: u16, message: String },

    /// Host unreachable or the connection dropped before the full response
    #[error("{}", UNREACHABLE_MESSAGE)]
    Unreachable,

    /// Any other transport-level failure, e.g. client construction
    #[error("{0}")]
    Transport(String),

    /// A 2xx body that does not match the expected shape
    #[error("Invalid response from server: {0}")]
    Decode(String),
}

impl ApiError {
    /// Build the error for a non-2xx response.
    ///
    /// Uses the backend's `detail` string verbatim when present.
    pub fn from_status(status: u16, body: &[u8]) -> Self {
        let detail = serde_json::from_slice::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(str::to_string))
            .filter(|d| !d.is_empty());

        ApiError::Status {
            status,
            message: detail.unwrap_or_else(|| format!("HTTP error! status: {}", status)),
        }
    }

    /// Translate a reqwest failure raised while sending a request
    pub fn from_send(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() || err.is_request() {
            ApiError::Unreachable
        } else {
            ApiError::Transport(err.to_string())
        }
    }

    /// HTTP status, when the backend produced one
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// User-facing message
    pub fn message(&self) -> String {
        self.to_string()
    }
}

/// Result type for backend calls
pub type ApiResult<T> = Result<T, ApiError>;
