//! User types.

use crate::AuthError;
use chrono::{DateTime, Utc};
use grocer_commerce::ids::UserId;
use serde::{Deserialize, Serialize};

/// A signed-in user as reported by the auth service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    /// User ID. Orders reference it.
    pub id: UserId,
    /// Email address.
    #[serde(default)]
    pub email: Option<String>,
    /// Database role, normally `"authenticated"`.
    #[serde(default)]
    pub role: Option<String>,
    /// When the address was confirmed.
    #[serde(default)]
    pub email_confirmed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_sign_in_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn new(id: impl Into<UserId>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: Some(email.into()),
            role: None,
            email_confirmed_at: None,
            last_sign_in_at: None,
        }
    }

    /// Email if known, otherwise the user id.
    pub fn display_name(&self) -> &str {
        self.email.as_deref().unwrap_or(self.id.as_str())
    }

    /// Check if email is verified.
    pub fn is_email_verified(&self) -> bool {
        self.email_confirmed_at.is_some()
    }
}

/// Normalize and sanity-check an email address.
///
/// Returns the trimmed, lowercased address. Only the shape is checked:
/// one `@` with a non-empty local part and a dotted domain, and no spaces.
pub fn normalize_email(email: &str) -> Result<String, AuthError> {
    let email = email.trim().to_lowercase();
    let invalid = || AuthError::InvalidEmail(email.clone());

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty()
        || domain.contains('@')
        || email.chars().any(char::is_whitespace)
        || !domain.contains('.')
        || domain.starts_with('.')
        || domain.ends_with('.')
    {
        return Err(invalid());
    }
    Ok(email)
}
