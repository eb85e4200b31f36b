//! Commerce error types.

use thiserror::Error;

/// Errors that can occur in storefront domain operations.
///
/// The cart store itself never fails; these errors come from boundary
/// validation (product snapshots, delivery details) and checkout guards.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommerceError {
    /// Product not found in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// A product snapshot failed boundary validation.
    #[error("Invalid product {id}: {reason}")]
    InvalidProduct { id: String, reason: String },

    /// Checkout was attempted with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// A delivery form field failed validation.
    #[error("Invalid {field}: {reason}")]
    InvalidDeliveryDetails { field: &'static str, reason: String },

    /// A monetary amount could not be parsed.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl CommerceError {
    /// Check if this error was caused by user input rather than system state.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CommerceError::InvalidProduct { .. }
                | CommerceError::InvalidDeliveryDetails { .. }
                | CommerceError::InvalidAmount(_)
        )
    }
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::SerializationError(e.to_string())
    }
}
