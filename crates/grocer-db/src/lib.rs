//! Typed table access for the GroceryGo hosted database.
//!
//! Tables are reached through the backend's REST endpoint; rows are
//! deserialized straight into the caller's types.
//!
//! # Example
//!
//! ```rust,ignore
//! use grocer_db::{Db, Order};
//!
//! let db = Db::new(client, anon_key).with_access_token(session.access_token);
//!
//! let products: Vec<Product> = db
//!     .from("products")
//!     .select("*")
//!     .order(Order::asc("category"))
//!     .fetch()
//!     .await?;
//! ```

mod db;
mod error;
mod types;

pub use db::{Db, Table};
pub use error::DbError;
pub use types::Order;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Db, DbError, Order};
}
