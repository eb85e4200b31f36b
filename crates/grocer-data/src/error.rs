//! HTTP client error types.

use thiserror::Error;

/// Errors that can occur when talking to the backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The request could not be sent or no response arrived.
    #[error("Request failed: {0}")]
    RequestError(String),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Non-2xx response. `message` is the backend's error text when it sent one.
    #[error("HTTP {status}: {message}")]
    HttpError { status: u16, message: String },

    /// Failed to parse response body.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Request timeout.
    #[error("Request timed out")]
    Timeout,

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(String),
}

impl FetchError {
    /// HTTP status of the failed response, if there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::HttpError { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The backend rejected the credentials (401 or 403).
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401 | 403))
    }

    /// The failure happened before any response was received.
    pub fn is_transport(&self) -> bool {
        matches!(self, FetchError::RequestError(_) | FetchError::Timeout)
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::JsonError(e.to_string())
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else if e.is_builder() {
            FetchError::InvalidUrl(e.to_string())
        } else if e.is_decode() {
            FetchError::ParseError(e.to_string())
        } else {
            FetchError::RequestError(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized() {
        let err = FetchError::HttpError {
            status: 401,
            message: "JWT expired".to_string(),
        };
        assert!(err.is_unauthorized());
        assert_eq!(err.status(), Some(401));
        assert!(!FetchError::Timeout.is_unauthorized());
    }

    #[test]
    fn test_transport_errors() {
        assert!(FetchError::Timeout.is_transport());
        assert!(FetchError::RequestError("refused".into()).is_transport());
        assert!(!FetchError::ParseError("bad".into()).is_transport());
    }

    #[test]
    fn test_display() {
        let err = FetchError::HttpError {
            status: 409,
            message: "duplicate key".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 409: duplicate key");
    }
}
