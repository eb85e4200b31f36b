//! Product catalog module.

mod product;

pub use product::{find_product, group_by_category, Product, DEFAULT_IMAGE_URL};
