//! Transports that carry a [`RequestBuilder`] to the network.

use crate::{FetchError, RequestBuilder, Response};
use async_trait::async_trait;
use std::time::Duration;

/// Sends one request and buffers the whole response.
///
/// Non-2xx statuses are not errors at this level; callers decide with
/// [`Response::error_for_status`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: RequestBuilder) -> Result<Response, FetchError>;
}

/// Transport backed by a pooled `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a client whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("grocer/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: RequestBuilder) -> Result<Response, FetchError> {
        let RequestBuilder {
            method,
            url,
            query,
            headers,
            body,
        } = request;

        let mut builder = self.client.request(method.into(), &url);
        if !query.is_empty() {
            builder = builder.query(&query);
        }
        for (key, value) in &headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();

        Ok(Response::new(status, headers, body))
    }
}

#[cfg(any(test, feature = "stub"))]
pub use stub::StubTransport;

#[cfg(any(test, feature = "stub"))]
mod stub {
    use super::*;
    use http::StatusCode;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// In-memory transport that replays queued responses and records every
    /// request it receives.
    #[derive(Debug, Default)]
    pub struct StubTransport {
        responses: Mutex<VecDeque<Result<Response, FetchError>>>,
        requests: Mutex<Vec<RequestBuilder>>,
    }

    impl StubTransport {
        pub fn new() -> Self {
            Self::default()
        }

        /// Queue a JSON response.
        pub fn push_json(&self, status: u16, body: serde_json::Value) -> &Self {
            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            self.push(Ok(Response::json_body(status, &body)))
        }

        /// Queue a transport failure.
        pub fn push_error(&self, error: FetchError) -> &Self {
            self.push(Err(error))
        }

        fn push(&self, response: Result<Response, FetchError>) -> &Self {
            self.responses
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push_back(response);
            self
        }

        /// Requests received so far, oldest first.
        pub fn requests(&self) -> Vec<RequestBuilder> {
            self.requests
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .clone()
        }

        pub fn request_count(&self) -> usize {
            self.requests.lock().unwrap_or_else(|e| e.into_inner()).len()
        }
    }

    #[async_trait]
    impl Transport for StubTransport {
        async fn execute(&self, request: RequestBuilder) -> Result<Response, FetchError> {
            let url = request.url.clone();
            self.requests
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push(request);
            self.responses
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .pop_front()
                .unwrap_or_else(|| Err(FetchError::RequestError(format!("no stubbed response for {url}"))))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Method;

    #[tokio::test]
    async fn test_stub_replays_in_order() {
        let stub = StubTransport::new();
        stub.push_json(200, serde_json::json!({"n": 1}))
            .push_json(404, serde_json::json!({"message": "gone"}));

        let first = stub
            .execute(RequestBuilder::new(Method::Get, "http://x/1"))
            .await
            .unwrap();
        assert_eq!(first.json::<serde_json::Value>().unwrap()["n"], 1);

        let second = stub
            .execute(RequestBuilder::new(Method::Get, "http://x/2"))
            .await
            .unwrap();
        assert_eq!(second.status, http::StatusCode::NOT_FOUND);

        let urls: Vec<String> = stub.requests().iter().map(|r| r.url().to_string()).collect();
        assert_eq!(urls, vec!["http://x/1", "http://x/2"]);
    }

    #[tokio::test]
    async fn test_stub_errors_when_exhausted() {
        let stub = StubTransport::new();
        let result = stub
            .execute(RequestBuilder::new(Method::Get, "http://x"))
            .await;
        assert!(matches!(result, Err(FetchError::RequestError(_))));
        assert_eq!(stub.request_count(), 1);
    }

    #[test]
    fn test_reqwest_transport_builds() {
        assert!(ReqwestTransport::new(Duration::from_secs(5)).is_ok());
    }
}
