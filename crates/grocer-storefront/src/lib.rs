//! Storefront services for GroceryGo.
//!
//! Ties the cart store to the hosted backend: catalog loading, order
//! placement, and the wiring that gives each service the right credentials.
//!
//! # Example
//!
//! ```rust,ignore
//! use grocer_storefront::{place_order, Backend, BackendSettings, CatalogProvider};
//!
//! let backend = Backend::connect(&BackendSettings::new(url, anon_key))?;
//! let products = backend.catalog(Some(&session)).list_products().await?;
//!
//! let receipt = place_order(
//!     &backend.orders(Some(&session)),
//!     session.user_id(),
//!     &details,
//!     &mut cart,
//! )
//! .await?;
//! ```

mod catalog;
mod checkout;
mod error;
mod orders;

pub use catalog::{CatalogProvider, MockCatalogProvider, RemoteCatalog};
pub use checkout::place_order;
pub use error::StorefrontError;
pub use orders::{MockOrderSubmitter, OrderSubmitter, RemoteOrderSubmitter};

use grocer_auth::{AuthClient, AuthSession};
use grocer_data::{FetchClient, ReqwestTransport};
use grocer_db::Db;
use std::time::Duration;

/// Where the backend lives and how to reach it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendSettings {
    /// Project URL, e.g. `https://abcd.supabase.co`.
    pub url: String,
    /// Public anon key.
    pub anon_key: String,
    pub request_timeout: Duration,
    /// Link target for sign-in emails.
    pub redirect_url: Option<String>,
}

impl BackendSettings {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            anon_key: anon_key.into(),
            request_timeout: Self::DEFAULT_TIMEOUT,
            redirect_url: None,
        }
    }
}

/// Handle from which every backend-facing service is built.
#[derive(Debug, Clone)]
pub struct Backend {
    client: FetchClient,
    anon_key: String,
    redirect_url: Option<String>,
}

impl Backend {
    /// Build a backend over the real network.
    pub fn connect(settings: &BackendSettings) -> Result<Self, StorefrontError> {
        let transport = ReqwestTransport::new(settings.request_timeout)?;
        Ok(Self::with_client(FetchClient::new(transport), settings))
    }

    /// Build a backend over an existing client (any transport).
    pub fn with_client(client: FetchClient, settings: &BackendSettings) -> Self {
        Self {
            client: client.with_base_url(settings.url.trim_end_matches('/')),
            anon_key: settings.anon_key.clone(),
            redirect_url: settings.redirect_url.clone(),
        }
    }

    pub fn auth(&self) -> AuthClient {
        let auth = AuthClient::new(self.client.clone(), self.anon_key.clone());
        match &self.redirect_url {
            Some(url) => auth.with_redirect_url(url.clone()),
            None => auth,
        }
    }

    /// Database handle acting as the session's user, or anonymously.
    pub fn db(&self, session: Option<&AuthSession>) -> Db {
        let db = Db::new(self.client.clone(), self.anon_key.clone());
        match session {
            Some(session) => db.with_access_token(session.access_token.clone()),
            None => db,
        }
    }

    pub fn catalog(&self, session: Option<&AuthSession>) -> RemoteCatalog {
        RemoteCatalog::new(self.db(session))
    }

    pub fn orders(&self, session: Option<&AuthSession>) -> RemoteOrderSubmitter {
        RemoteOrderSubmitter::new(self.db(session))
    }
}
