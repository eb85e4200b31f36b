//! Product snapshot accepted by the cart.

use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// The `{id, name, price}` triple a product contributes when added to the cart.
///
/// Name and price are copied at add-time and never re-fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Product identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Unit price.
    pub price: Money,
}

impl CartItem {
    /// Create an item without validation.
    ///
    /// The cart store trusts its caller; use [`CartItem::try_new`] when the
    /// fields come from outside the process.
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: Money) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
        }
    }

    /// Create an item, rejecting a blank id or a negative price.
    pub fn try_new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        price: Money,
    ) -> Result<Self, CommerceError> {
        let item = Self::new(id, name, price);
        item.validate()?;
        Ok(item)
    }

    /// Check the fields against the product shape the store expects.
    pub fn validate(&self) -> Result<(), CommerceError> {
        if self.id.is_blank() {
            return Err(CommerceError::InvalidProduct {
                id: self.id.to_string(),
                reason: "id is blank".to_string(),
            });
        }
        if self.price.is_negative() {
            return Err(CommerceError::InvalidProduct {
                id: self.id.to_string(),
                reason: format!("price {} is negative", self.price),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_new_accepts_valid_item() {
        let item = CartItem::try_new("p1", "Bread", Money::parse("1.25").unwrap()).unwrap();
        assert_eq!(item.id.as_str(), "p1");
    }

    #[test]
    fn test_try_new_rejects_blank_id() {
        let err = CartItem::try_new(" ", "Bread", Money::zero()).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_try_new_rejects_negative_price() {
        let result = CartItem::try_new("p1", "Bread", Money::parse("-0.01").unwrap());
        assert!(matches!(result, Err(CommerceError::InvalidProduct { .. })));
    }

    #[test]
    fn test_zero_price_is_allowed() {
        assert!(CartItem::try_new("free", "Sample", Money::zero()).is_ok());
    }
}
