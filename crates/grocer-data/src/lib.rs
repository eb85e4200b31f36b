//! HTTP client utilities for the GroceryGo backend.
//!
//! Requests are described with a [`RequestBuilder`] and handed to a
//! [`Transport`]. Production code uses [`ReqwestTransport`]; tests queue
//! canned responses on a `StubTransport` (enable the `stub` feature).
//!
//! # Example
//!
//! ```rust,ignore
//! use grocer_data::{FetchClient, ReqwestTransport};
//! use std::time::Duration;
//!
//! let client = FetchClient::new(ReqwestTransport::new(Duration::from_secs(10))?)
//!     .with_base_url("https://project.supabase.co")
//!     .with_default_header("apikey", anon_key);
//!
//! let rows: Vec<serde_json::Value> = client
//!     .get("/rest/v1/products")
//!     .query("select", "*")
//!     .send_json()
//!     .await?;
//! ```

mod error;
mod request;
mod response;
mod transport;

pub use error::FetchError;
pub use request::{Method, RequestBuilder};
pub use response::Response;
#[cfg(any(test, feature = "stub"))]
pub use transport::StubTransport;
pub use transport::{ReqwestTransport, Transport};

use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Instant;

/// HTTP client for outbound requests.
///
/// Cheap to clone; clones share the transport.
#[derive(Clone)]
pub struct FetchClient {
    base_url: Option<String>,
    default_headers: Vec<(String, String)>,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for FetchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchClient")
            .field("base_url", &self.base_url)
            .field("default_headers", &self.default_headers.len())
            .finish_non_exhaustive()
    }
}

impl FetchClient {
    /// Create a client over the given transport.
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self::from_arc(Arc::new(transport))
    }

    /// Create a client over a shared transport.
    pub fn from_arc(transport: Arc<dyn Transport>) -> Self {
        Self {
            base_url: None,
            default_headers: Vec::new(),
            transport,
        }
    }

    /// Create a client with a base URL that will be prepended to relative paths.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Add a default header that will be included in all requests.
    pub fn with_default_header(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.default_headers.push((key.into(), value.into()));
        self
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// Create a GET request.
    pub fn get(&self, url: impl Into<String>) -> ClientRequestBuilder {
        self.request(Method::Get, url)
    }

    /// Create a POST request.
    pub fn post(&self, url: impl Into<String>) -> ClientRequestBuilder {
        self.request(Method::Post, url)
    }

    /// Create a request with a custom method.
    pub fn request(&self, method: Method, url: impl Into<String>) -> ClientRequestBuilder {
        let url = url.into();
        let full_url = match &self.base_url {
            Some(base) if !(url.starts_with("http://") || url.starts_with("https://")) => {
                format!(
                    "{}/{}",
                    base.trim_end_matches('/'),
                    url.trim_start_matches('/')
                )
            }
            _ => url,
        };

        let mut builder = RequestBuilder::new(method, full_url);
        for (key, value) in &self.default_headers {
            builder = builder.header(key.clone(), value.clone());
        }

        ClientRequestBuilder {
            builder,
            transport: Arc::clone(&self.transport),
        }
    }
}

/// A request builder bound to a client.
pub struct ClientRequestBuilder {
    builder: RequestBuilder,
    transport: Arc<dyn Transport>,
}

impl ClientRequestBuilder {
    /// Add a header to the request.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.builder = self.builder.header(key, value);
        self
    }

    /// Append a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.builder = self.builder.query(key, value);
        self
    }

    /// Set the request body as JSON.
    pub fn json<T: serde::Serialize + ?Sized>(mut self, value: &T) -> Result<Self, FetchError> {
        self.builder = self.builder.json(value)?;
        Ok(self)
    }

    /// Add a bearer token authorization header.
    pub fn bearer_auth(mut self, token: impl AsRef<str>) -> Self {
        self.builder = self.builder.bearer_auth(token);
        self
    }

    /// Set the Accept header.
    pub fn accept(mut self, content_type: impl Into<String>) -> Self {
        self.builder = self.builder.accept(content_type);
        self
    }

    /// The request as built so far.
    pub fn as_request(&self) -> &RequestBuilder {
        &self.builder
    }

    /// Send the request and return the response, whatever its status.
    pub async fn send(self) -> Result<Response, FetchError> {
        let method = self.builder.method();
        let url = self.builder.url().to_string();
        let started = Instant::now();

        tracing::debug!(method = method.as_str(), %url, "sending request");
        let result = self.transport.execute(self.builder).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match &result {
            Ok(response) => tracing::debug!(
                method = method.as_str(),
                %url,
                status = response.status.as_u16(),
                elapsed_ms,
                "received response"
            ),
            Err(err) => tracing::warn!(
                method = method.as_str(),
                %url,
                error = %err,
                elapsed_ms,
                "request failed"
            ),
        }
        result
    }

    /// Send the request, fail on non-2xx, and parse the body as JSON.
    pub async fn send_json<T: DeserializeOwned>(self) -> Result<T, FetchError> {
        self.send().await?.error_for_status()?.json()
    }

    /// Send the request and fail on non-2xx, ignoring the body.
    pub async fn send_empty(self) -> Result<(), FetchError> {
        self.send().await?.error_for_status()?;
        Ok(())
    }
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{FetchClient, FetchError, Method, Response, Transport};
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client(stub: Arc<StubTransport>) -> FetchClient {
        FetchClient::from_arc(stub)
            .with_base_url("https://demo.example.co/")
            .with_default_header("apikey", "anon")
    }

    #[tokio::test]
    async fn test_base_url_join_and_default_headers() {
        let stub = Arc::new(StubTransport::new());
        stub.push_json(200, json!([]));

        let _: Vec<serde_json::Value> = client(stub.clone())
            .get("/rest/v1/products")
            .send_json()
            .await
            .unwrap();

        let req = &stub.requests()[0];
        assert_eq!(req.url(), "https://demo.example.co/rest/v1/products");
        assert_eq!(req.header_value("apikey"), Some("anon"));
        assert_eq!(req.method(), Method::Get);
    }

    #[tokio::test]
    async fn test_absolute_url_bypasses_base() {
        let stub = Arc::new(StubTransport::new());
        stub.push_json(204, json!(null));

        client(stub.clone())
            .post("https://other.example/x")
            .send_empty()
            .await
            .unwrap();
        assert_eq!(stub.requests()[0].url(), "https://other.example/x");
    }

    #[tokio::test]
    async fn test_send_json_maps_http_errors() {
        let stub = Arc::new(StubTransport::new());
        stub.push_json(401, json!({"message": "JWT expired"}));

        let result: Result<serde_json::Value, _> =
            client(stub).get("/rest/v1/orders").send_json().await;
        let err = result.unwrap_err();
        assert!(err.is_unauthorized());
        assert_eq!(err.to_string(), "HTTP 401: JWT expired");
    }

    #[tokio::test]
    async fn test_send_returns_non_success_response() {
        let stub = Arc::new(StubTransport::new());
        stub.push_json(500, json!({"message": "boom"}));

        let response = client(stub).get("/x").send().await.unwrap();
        assert!(!response.is_success());
    }

    #[tokio::test]
    async fn test_request_headers_override_defaults() {
        let stub = Arc::new(StubTransport::new());
        stub.push_json(200, json!({}));

        client(stub.clone())
            .post("/x")
            .header("APIKEY", "service")
            .json(&json!({"a": 1}))
            .unwrap()
            .send_empty()
            .await
            .unwrap();

        let req = &stub.requests()[0];
        assert_eq!(req.header_value("apikey"), Some("service"));
        assert_eq!(req.body_json().unwrap()["a"], 1);
    }
}
