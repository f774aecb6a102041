//! Error types for CDO API operations

use cdo_types::{StatusMessage, ValidationError};
use reqwest::StatusCode;

/// Errors that can occur while issuing CDO API requests
#[derive(Debug, thiserror::Error)]
pub enum CdoError {
    /// Invalid request parameters, caught locally or rejected upstream (HTTP 400)
    #[error("invalid request: {0}")]
    Validation(String),

    /// The client was closed before this call
    #[error("client is closed")]
    Lifecycle,

    /// The local daily request quota is exhausted; waiting cannot help today
    #[error("daily request quota of {limit} exhausted")]
    QuotaExceeded {
        /// Configured requests-per-day ceiling
        limit: u32,
    },

    /// Per-request timeout elapsed
    #[error("request timed out")]
    Timeout,

    /// Token rejected by the server (HTTP 401/403)
    #[error("authentication rejected (HTTP {status}): {message}")]
    Authentication { status: u16, message: String },

    /// Requested resource does not exist (HTTP 404)
    #[error("resource not found: {message}")]
    NotFound { message: String },

    /// Throttled by the remote server itself (HTTP 429), distinct from the
    /// local limiter
    #[error("throttled by the remote API: {message}")]
    RateLimited { message: String },

    /// Upstream failure (HTTP 5xx or unexpected status)
    #[error("server error (HTTP {status}): {message}")]
    Server { status: u16, message: String },

    /// 2xx response whose body was not the expected JSON shape
    #[error("failed to decode response body: {0}")]
    Decode(String),

    /// The client was closed while this call was suspended or in flight
    #[error("request cancelled: client closed while waiting")]
    Cancelled,

    /// Transport-level HTTP failure that is not a timeout
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl From<ValidationError> for CdoError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl CdoError {
    /// Translate a non-2xx status and its body into the error taxonomy
    ///
    /// The API serves a `{"status": ..., "message": ...}` envelope on most
    /// failures; its message is surfaced when present, otherwise the raw
    /// body text is used.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<StatusMessage>(body)
            .ok()
            .and_then(|m| m.message)
            .unwrap_or_else(|| {
                let trimmed = body.trim();
                if trimmed.is_empty() {
                    status.to_string()
                } else {
                    trimmed.to_string()
                }
            });

        match status.as_u16() {
            400 => Self::Validation(message),
            401 | 403 => Self::Authentication {
                status: status.as_u16(),
                message,
            },
            404 => Self::NotFound { message },
            429 => Self::RateLimited { message },
            s => Self::Server { status: s, message },
        }
    }

    /// Whether this error came from a rate ceiling, local or remote
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::QuotaExceeded { .. } | Self::RateLimited { .. })
    }
}

/// Result type for CDO operations
pub type CdoResult<T> = Result<T, CdoError>;
