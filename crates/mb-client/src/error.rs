//! Client error types

use reqwest::StatusCode;

/// Errors talking to a schema store
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// Connection-level failure
    #[error("network error: {0}")]
    Transport(String),

    /// No response within the configured timeout
    #[error("request timed out")]
    Timeout,

    /// Non-2xx response
    #[error("http {status}: {detail}")]
    Http { status: u16, detail: String },

    /// Response body did not match the expected shape
    #[error("invalid response body: {0}")]
    Decode(String),

    /// The HTTP client could not be built
    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl ClientError {
    /// 404 from the backend
    #[must_use]
    pub fn not_found() -> Self {
        Self::Http {
            status: StatusCode::NOT_FOUND.as_u16(),
            detail: "Not found.".to_string(),
        }
    }

    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Http { status: 404, .. })
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Transport(e.to_string())
        }
    }
}

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, ClientError>;
