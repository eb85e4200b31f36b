//! Authentication for the GroceryGo storefront.
//!
//! Passwordless email sign-in against the hosted auth service, plus the
//! session and user types the rest of the workspace passes around.

mod client;
mod error;
mod session;
mod user;

pub use client::AuthClient;
pub use error::AuthError;
pub use session::AuthSession;
pub use user::{normalize_email, User};
