//! Session management.

use crate::user::User;
use crate::AuthError;
use chrono::{DateTime, Duration, TimeZone, Utc};
use grocer_commerce::ids::UserId;
use serde::{Deserialize, Serialize};

/// An authenticated session issued by the auth service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthSession {
    /// Bearer token for REST calls.
    pub access_token: String,
    /// Token used to obtain a new session.
    pub refresh_token: String,
    /// When `access_token` stops being accepted.
    pub expires_at: DateTime<Utc>,
    /// The signed-in user.
    pub user: User,
}

impl AuthSession {
    /// Refresh this long before the access token actually expires.
    pub const REFRESH_MARGIN_SECS: i64 = 60;

    pub fn user_id(&self) -> &UserId {
        &self.user.id
    }

    /// Check if the access token has expired at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Check if session is expired.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// The access token expires within the refresh margin of `now`.
    pub fn needs_refresh_at(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(Self::REFRESH_MARGIN_SECS) >= self.expires_at
    }

    pub fn needs_refresh(&self) -> bool {
        self.needs_refresh_at(Utc::now())
    }

    /// Seconds until expiry at `now`; negative once expired.
    pub fn time_to_expiry_at(&self, now: DateTime<Utc>) -> i64 {
        (self.expires_at - now).num_seconds()
    }
}

/// Token grant body returned by `verify` and `token` endpoints.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    access_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    user: User,
}

impl TokenResponse {
    /// Default lifetime when the service omits both expiry fields.
    const DEFAULT_LIFETIME_SECS: i64 = 3600;

    /// Convert into a session. An absolute `expires_at` wins over
    /// `expires_in`, which is counted from `now`. An expiry outside the
    /// representable time range is rejected.
    pub(crate) fn into_session(self, now: DateTime<Utc>) -> Result<AuthSession, AuthError> {
        let expires_at = match self.expires_at {
            Some(secs) => Utc.timestamp_opt(secs, 0).single(),
            None => Duration::try_seconds(self.expires_in.unwrap_or(Self::DEFAULT_LIFETIME_SECS))
                .and_then(|lifetime| now.checked_add_signed(lifetime)),
        }
        .ok_or_else(|| {
            AuthError::Serialization(format!(
                "token expiry out of range (expires_at: {:?}, expires_in: {:?})",
                self.expires_at, self.expires_in
            ))
        })?;

        Ok(AuthSession {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at,
            user: self.user,
        })
    }
}
