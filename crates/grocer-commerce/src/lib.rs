//! Storefront domain types and the client-side cart store for GroceryGo.
//!
//! This crate holds everything the storefront knows without talking to the
//! hosted backend:
//!
//! - **Cart**: the in-memory [`CartStore`] with its line invariants
//! - **Catalog**: product records as served by the `products` table
//! - **Checkout**: delivery details validation and order drafts
//!
//! # Example
//!
//! ```
//! use grocer_commerce::prelude::*;
//!
//! let mut cart = CartStore::new();
//! cart.add_item(CartItem::new("apple", "Apple", Money::parse("2.50").unwrap()));
//! cart.add_item(CartItem::new("milk", "Milk", Money::parse("1.00").unwrap()));
//! cart.add_item(CartItem::new("milk", "Milk", Money::parse("1.00").unwrap()));
//!
//! assert_eq!(cart.total(), Money::parse("4.50").unwrap());
//! assert_eq!(cart.item_count(), 3);
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;
pub mod checkout;

pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Cart
    pub use crate::cart::{CartItem, CartLine, CartStore};

    // Catalog
    pub use crate::catalog::{group_by_category, Product, DEFAULT_IMAGE_URL};

    // Checkout
    pub use crate::checkout::{
        DeliveryDetails, DeliveryForm, DeliveryOptions, DraftLine, NewOrder, NewOrderItem, Order,
        OrderDraft, OrderReceipt, OrderStatus, PaymentMethod,
    };
}
