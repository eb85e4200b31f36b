//! Database error types.

use grocer_data::FetchError;
use thiserror::Error;

/// Errors that can occur when using the database.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DbError {
    /// The backend could not be reached.
    #[error("Database unreachable: {0}")]
    Unavailable(String),

    /// The credentials were missing, expired or lacked permission.
    #[error("Not authorized: {0}")]
    Unauthorized(String),

    /// The backend rejected the query.
    #[error("Query failed ({status}): {message}")]
    QueryError { status: u16, message: String },

    /// Failed to serialize a payload or deserialize a row.
    #[error("Deserialization error: {0}")]
    DeserializeError(String),

    /// No rows returned when one was expected.
    #[error("No rows returned")]
    NotFound,
}

impl DbError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, DbError::Unauthorized(_))
    }
}

impl From<FetchError> for DbError {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::HttpError {
                status: 401 | 403,
                message,
            } => DbError::Unauthorized(message),
            // PostgREST answers 406 when a single object was requested and
            // the result had zero rows.
            FetchError::HttpError { status: 406, .. } => DbError::NotFound,
            FetchError::HttpError { status, message } => DbError::QueryError { status, message },
            FetchError::ParseError(msg) | FetchError::JsonError(msg) => {
                DbError::DeserializeError(msg)
            }
            other => DbError::Unavailable(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for DbError {
    fn from(e: serde_json::Error) -> Self {
        DbError::DeserializeError(e.to_string())
    }
}
