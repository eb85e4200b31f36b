//! Client for the hosted auth service.

use crate::session::TokenResponse;
use crate::user::normalize_email;
use crate::{AuthError, AuthSession, User};
use chrono::Utc;
use grocer_data::{ClientRequestBuilder, FetchClient};
use serde_json::json;

const AUTH_PATH: &str = "/auth/v1";

/// Passwordless email login.
///
/// The flow is: [`send_magic_link`](Self::send_magic_link) emails a link
/// and a one-time token, then [`verify_otp`](Self::verify_otp) exchanges the
/// token for an [`AuthSession`].
#[derive(Debug, Clone)]
pub struct AuthClient {
    client: FetchClient,
    anon_key: String,
    redirect_url: Option<String>,
}

impl AuthClient {
    /// Create a client. `client` must already carry the backend base URL.
    pub fn new(client: FetchClient, anon_key: impl Into<String>) -> Self {
        Self {
            client,
            anon_key: anon_key.into(),
            redirect_url: None,
        }
    }

    /// Where the emailed link sends the browser.
    pub fn with_redirect_url(mut self, url: impl Into<String>) -> Self {
        self.redirect_url = Some(url.into());
        self
    }

    /// Email a sign-in link, creating the account on first use.
    pub async fn send_magic_link(&self, email: &str) -> Result<(), AuthError> {
        let email = normalize_email(email)?;

        let mut request = self.post("otp");
        if let Some(redirect) = &self.redirect_url {
            request = request.query("redirect_to", redirect.as_str());
        }
        request
            .json(&json!({ "email": email, "create_user": true }))?
            .send_empty()
            .await?;

        tracing::info!(%email, "magic link sent");
        Ok(())
    }

    /// Exchange the emailed one-time token for a session.
    pub async fn verify_otp(&self, email: &str, token: &str) -> Result<AuthSession, AuthError> {
        let email = normalize_email(email)?;
        let token = token.trim();
        if token.is_empty() {
            return Err(AuthError::InvalidToken);
        }

        let response: TokenResponse = self
            .post("verify")
            .json(&json!({ "type": "magiclink", "email": email, "token": token }))?
            .send_json()
            .await?;
        let session = response.into_session(Utc::now())?;

        tracing::info!(user_id = %session.user.id, "signed in");
        Ok(session)
    }

    /// Look up the user behind an access token.
    pub async fn get_user(&self, access_token: &str) -> Result<User, AuthError> {
        let user = self
            .client
            .get(format!("{AUTH_PATH}/user"))
            .header("apikey", self.anon_key.as_str())
            .bearer_auth(access_token)
            .send_json()
            .await?;
        Ok(user)
    }

    /// Trade a refresh token for a new session.
    pub async fn refresh(&self, refresh_token: &str) -> Result<AuthSession, AuthError> {
        let result = self
            .post("token")
            .query("grant_type", "refresh_token")
            .json(&json!({ "refresh_token": refresh_token }))?
            .send_json::<TokenResponse>()
            .await;

        match result {
            Ok(response) => {
                let session = response.into_session(Utc::now())?;
                tracing::debug!(user_id = %session.user.id, "session refreshed");
                Ok(session)
            }
            Err(err) => {
                tracing::warn!(error = %err, "session refresh failed");
                match AuthError::from(err) {
                    AuthError::InvalidToken | AuthError::Rejected { status: 400, .. } => {
                        Err(AuthError::SessionExpired)
                    }
                    other => Err(other),
                }
            }
        }
    }

    /// Return `session` unchanged while it is fresh, or a refreshed one.
    pub async fn ensure_fresh(&self, session: AuthSession) -> Result<AuthSession, AuthError> {
        if !session.needs_refresh() {
            return Ok(session);
        }
        if session.refresh_token.is_empty() {
            return Err(AuthError::SessionExpired);
        }
        self.refresh(&session.refresh_token).await
    }

    /// Revoke the session's tokens on the server.
    pub async fn sign_out(&self, access_token: &str) -> Result<(), AuthError> {
        self.post("logout")
            .bearer_auth(access_token)
            .send_empty()
            .await?;
        tracing::info!("signed out");
        Ok(())
    }

    /// POST to an auth endpoint, authorized with the anon key.
    fn post(&self, endpoint: &str) -> ClientRequestBuilder {
        self.client
            .post(format!("{AUTH_PATH}/{endpoint}"))
            .header("apikey", self.anon_key.as_str())
            .bearer_auth(&self.anon_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use grocer_data::{Method, StubTransport};
    use std::sync::Arc;

    fn auth(stub: &Arc<StubTransport>) -> AuthClient {
        let client = FetchClient::from_arc(stub.clone()).with_base_url("https://proj.example.co");
        AuthClient::new(client, "anon").with_redirect_url("https://shop.example.app/")
    }

    fn grant(access: &str) -> serde_json::Value {
        json!({
            "access_token": access,
            "token_type": "bearer",
            "expires_in": 3600,
            "refresh_token": "rt-2",
            "user": {"id": "u1", "email": "asha@example.edu"}
        })
    }

    #[tokio::test]
    async fn test_send_magic_link() {
        let stub = Arc::new(StubTransport::new());
        stub.push_json(200, json!({}));

        auth(&stub).send_magic_link(" Asha@Example.edu ").await.unwrap();

        let req = &stub.requests()[0];
        assert_eq!(req.method(), Method::Post);
        assert_eq!(req.url(), "https://proj.example.co/auth/v1/otp");
        assert_eq!(req.query_value("redirect_to"), Some("https://shop.example.app/"));
        assert_eq!(req.header_value("apikey"), Some("anon"));
        let body = req.body_json().unwrap();
        assert_eq!(body["email"], "asha@example.edu");
        assert_eq!(body["create_user"], true);
    }

    #[tokio::test]
    async fn test_send_magic_link_rejects_bad_email_without_request() {
        let stub = Arc::new(StubTransport::new());
        let err = auth(&stub).send_magic_link("not-an-email").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidEmail(_)));
        assert_eq!(stub.request_count(), 0);
    }

    #[tokio::test]
    async fn test_send_magic_link_rate_limited() {
        let stub = Arc::new(StubTransport::new());
        stub.push_json(429, json!({"msg": "For security purposes, you can only request this once every 60 seconds"}));

        let err = auth(&stub).send_magic_link("a@b.io").await.unwrap_err();
        assert!(matches!(err, AuthError::RateLimited(_)));
    }

    #[tokio::test]
    async fn test_verify_otp_returns_session() {
        let stub = Arc::new(StubTransport::new());
        stub.push_json(200, grant("jwt-1"));

        let session = auth(&stub).verify_otp("asha@example.edu", "123456").await.unwrap();
        assert_eq!(session.access_token, "jwt-1");
        assert_eq!(session.user_id().as_str(), "u1");
        assert!(!session.is_expired());

        let body = stub.requests()[0].body_json().unwrap();
        assert_eq!(body["type"], "magiclink");
        assert_eq!(body["token"], "123456");
    }

    #[tokio::test]
    async fn test_verify_otp_bad_expiry_is_an_error() {
        let stub = Arc::new(StubTransport::new());
        let mut body = grant("jwt-1");
        body["expires_in"] = json!(9_223_372_036_854_775_i64);
        stub.push_json(200, body);

        let err = auth(&stub).verify_otp("asha@example.edu", "123456").await.unwrap_err();
        assert!(matches!(err, AuthError::Serialization(_)));
    }

    #[tokio::test]
    async fn test_verify_otp_wrong_token() {
        let stub = Arc::new(StubTransport::new());
        stub.push_json(403, json!({"code": 403, "msg": "Token has expired or is invalid"}));

        let err = auth(&stub).verify_otp("a@b.io", "000000").await.unwrap_err();
        assert_eq!(err, AuthError::InvalidToken);
    }

    #[tokio::test]
    async fn test_get_user_uses_access_token() {
        let stub = Arc::new(StubTransport::new());
        stub.push_json(200, json!({"id": "u1", "email": "asha@example.edu"}));

        let user = auth(&stub).get_user("jwt-1").await.unwrap();
        assert_eq!(user.id.as_str(), "u1");
        let req = &stub.requests()[0];
        assert_eq!(req.method(), Method::Get);
        assert_eq!(req.header_value("authorization"), Some("Bearer jwt-1"));
    }

    #[tokio::test]
    async fn test_refresh() {
        let stub = Arc::new(StubTransport::new());
        stub.push_json(200, grant("jwt-2"));

        let session = auth(&stub).refresh("rt-1").await.unwrap();
        assert_eq!(session.access_token, "jwt-2");
        let req = &stub.requests()[0];
        assert_eq!(req.query_value("grant_type"), Some("refresh_token"));
        assert_eq!(req.body_json().unwrap()["refresh_token"], "rt-1");
    }

    #[tokio::test]
    async fn test_refresh_with_revoked_token() {
        let stub = Arc::new(StubTransport::new());
        stub.push_json(400, json!({"error": "invalid_grant", "error_description": "Invalid Refresh Token"}));

        let err = auth(&stub).refresh("gone").await.unwrap_err();
        assert_eq!(err, AuthError::SessionExpired);
    }

    #[tokio::test]
    async fn test_ensure_fresh_skips_fresh_session() {
        let stub = Arc::new(StubTransport::new());
        let session = AuthSession {
            access_token: "jwt".into(),
            refresh_token: "rt".into(),
            expires_at: Utc::now() + Duration::hours(1),
            user: User::new("u1", "a@b.io"),
        };

        let same = auth(&stub).ensure_fresh(session.clone()).await.unwrap();
        assert_eq!(same, session);
        assert_eq!(stub.request_count(), 0);
    }

    #[tokio::test]
    async fn test_ensure_fresh_refreshes_expired_session() {
        let stub = Arc::new(StubTransport::new());
        stub.push_json(200, grant("jwt-new"));
        let session = AuthSession {
            access_token: "jwt-old".into(),
            refresh_token: "rt".into(),
            expires_at: Utc::now() - Duration::minutes(5),
            user: User::new("u1", "a@b.io"),
        };

        let fresh = auth(&stub).ensure_fresh(session).await.unwrap();
        assert_eq!(fresh.access_token, "jwt-new");
    }

    #[tokio::test]
    async fn test_sign_out() {
        let stub = Arc::new(StubTransport::new());
        stub.push_json(204, json!(null));

        auth(&stub).sign_out("jwt-1").await.unwrap();
        let req = &stub.requests()[0];
        assert_eq!(req.url(), "https://proj.example.co/auth/v1/logout");
        assert_eq!(req.header_value("Authorization"), Some("Bearer jwt-1"));
    }
}
