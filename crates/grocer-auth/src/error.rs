//! Authentication errors.

use grocer_data::FetchError;
use thiserror::Error;

/// Authentication error type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The address is not a plausible email.
    #[error("invalid email address: {0}")]
    InvalidEmail(String),

    /// The emailed token was wrong, used, or expired.
    #[error("token invalid or expired")]
    InvalidToken,

    /// No session is stored.
    #[error("not signed in")]
    NotAuthenticated,

    /// Session expired and could not be refreshed.
    #[error("session expired")]
    SessionExpired,

    /// Too many emails requested in a short period.
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// The auth service refused the request.
    #[error("auth request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The auth service could not be reached.
    #[error("auth service unavailable: {0}")]
    Unavailable(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl AuthError {
    /// Check if this is an authentication failure.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            AuthError::InvalidToken | AuthError::NotAuthenticated | AuthError::SessionExpired
        )
    }
}

impl From<FetchError> for AuthError {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::HttpError { status: 429, message } => AuthError::RateLimited(message),
            FetchError::HttpError {
                status: 401 | 403,
                ..
            } => AuthError::InvalidToken,
            FetchError::HttpError { status, message } => AuthError::Rejected { status, message },
            FetchError::ParseError(msg) | FetchError::JsonError(msg) => {
                AuthError::Serialization(msg)
            }
            other => AuthError::Unavailable(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(e: serde_json::Error) -> Self {
        AuthError::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_fetch_error() {
        let limited = AuthError::from(FetchError::HttpError {
            status: 429,
            message: "email rate limit exceeded".into(),
        });
        assert_eq!(limited, AuthError::RateLimited("email rate limit exceeded".into()));

        let bad = AuthError::from(FetchError::HttpError {
            status: 403,
            message: "Token has expired or is invalid".into(),
        });
        assert!(bad.is_auth_failure());

        assert!(matches!(
            AuthError::from(FetchError::Timeout),
            AuthError::Unavailable(_)
        ));
    }
}
