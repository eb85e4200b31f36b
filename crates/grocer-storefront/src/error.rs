//! Storefront errors.

use grocer_auth::AuthError;
use grocer_commerce::{CommerceError, OrderId};
use grocer_data::FetchError;
use grocer_db::DbError;
use thiserror::Error;

/// Errors surfaced by storefront operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StorefrontError {
    /// Local validation failed (empty cart, bad delivery details, bad product).
    #[error(transparent)]
    Commerce(#[from] CommerceError),

    /// Product listing failed.
    #[error("could not load products: {0}")]
    Catalog(#[source] DbError),

    /// The order header was not created. Nothing was persisted.
    #[error("could not create order: {0}")]
    OrderRejected(#[source] DbError),

    /// The order header exists but its lines were not stored.
    #[error("order {order_id} was created but its items were not saved: {source}")]
    OrderItemsRejected {
        order_id: OrderId,
        #[source]
        source: DbError,
    },

    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The backend client could not be built.
    #[error("backend client error: {0}")]
    Backend(#[from] FetchError),
}

impl StorefrontError {
    /// One-line notification shown to the shopper.
    pub fn notification(&self) -> &'static str {
        match self {
            StorefrontError::Catalog(_) => "Failed to load products",
            StorefrontError::OrderRejected(_) | StorefrontError::OrderItemsRejected { .. } => {
                "Failed to place order"
            }
            StorefrontError::Commerce(CommerceError::EmptyCart) => "Your cart is empty",
            StorefrontError::Commerce(e) if e.is_validation() => "Please check your details",
            StorefrontError::Auth(_) => "Please sign in again",
            _ => "Something went wrong",
        }
    }

    /// The failure came from rejected or expired credentials.
    pub fn is_unauthorized(&self) -> bool {
        match self {
            StorefrontError::Catalog(e) | StorefrontError::OrderRejected(e) => e.is_unauthorized(),
            StorefrontError::OrderItemsRejected { source, .. } => source.is_unauthorized(),
            StorefrontError::Auth(e) => e.is_auth_failure(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notifications() {
        assert_eq!(
            StorefrontError::Catalog(DbError::Unavailable("down".into())).notification(),
            "Failed to load products"
        );
        assert_eq!(
            StorefrontError::OrderRejected(DbError::NotFound).notification(),
            "Failed to place order"
        );
        assert_eq!(
            StorefrontError::from(CommerceError::EmptyCart).notification(),
            "Your cart is empty"
        );
    }

    #[test]
    fn test_unauthorized() {
        let err = StorefrontError::OrderItemsRejected {
            order_id: OrderId::new("o1"),
            source: DbError::Unauthorized("JWT expired".into()),
        };
        assert!(err.is_unauthorized());
        assert!(!StorefrontError::Catalog(DbError::NotFound).is_unauthorized());
    }
}
