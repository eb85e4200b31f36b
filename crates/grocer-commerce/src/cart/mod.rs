//! Shopping cart module.
//!
//! Contains the cart store, its lines, and the item snapshot the catalog
//! hands over when a product is added.

mod item;
mod store;

pub use item::CartItem;
pub use store::{CartLine, CartStore};
