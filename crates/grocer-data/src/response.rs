//! HTTP response handling.

use crate::FetchError;
use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;

/// A fully buffered HTTP response.
#[derive(Debug, Clone)]
pub struct Response {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The response headers.
    pub headers: HeaderMap,
    /// The response body.
    pub body: Vec<u8>,
}

impl Response {
    /// Create a new response.
    pub fn new(status: StatusCode, headers: HeaderMap, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Response with a JSON body and no headers.
    pub fn json_body(status: StatusCode, value: &serde_json::Value) -> Self {
        Self::new(status, HeaderMap::new(), value.to_string().into_bytes())
    }

    /// Check if the response was successful (2xx status).
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Get the response body as text.
    pub fn text(&self) -> Result<String, FetchError> {
        String::from_utf8(self.body.clone())
            .map_err(|e| FetchError::ParseError(format!("Invalid UTF-8: {}", e)))
    }

    /// Parse the response body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, FetchError> {
        serde_json::from_slice(&self.body).map_err(|e| FetchError::ParseError(e.to_string()))
    }

    /// Get the raw response body.
    pub fn bytes(&self) -> &[u8] {
        &self.body
    }

    /// Get a header value.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key).and_then(|v| v.to_str().ok())
    }

    /// Convert to a Result, returning an error for non-2xx status codes.
    ///
    /// The error message is taken from the body's `message`, `msg`,
    /// `error_description` or `error` field when the body is JSON, and is the
    /// raw body text otherwise.
    pub fn error_for_status(self) -> Result<Self, FetchError> {
        if self.is_success() {
            return Ok(self);
        }
        Err(FetchError::HttpError {
            status: self.status.as_u16(),
            message: self.error_message(),
        })
    }

    fn error_message(&self) -> String {
        if let Ok(value) = serde_json::from_slice::<serde_json::Value>(&self.body) {
            for key in ["message", "msg", "error_description", "error"] {
                if let Some(text) = value.get(key).and_then(|v| v.as_str()) {
                    return text.to_string();
                }
            }
        }
        match self.text() {
            Ok(text) if !text.trim().is_empty() => text,
            _ => self
                .status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string(),
        }
    }
}
