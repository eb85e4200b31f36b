//! Product records.

use crate::cart::CartItem;
use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Image shown for products without one.
pub const DEFAULT_IMAGE_URL: &str =
    "https://images.unsplash.com/photo-1542838132-92c53300491e?auto=format&fit=crop&q=80";

/// A row of the `products` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// Description for listings.
    #[serde(default)]
    pub description: Option<String>,
    /// Unit price.
    pub price: Money,
    /// Category used for ordering and grouping.
    #[serde(default)]
    pub category: Option<String>,
    /// Units in stock.
    #[serde(default)]
    pub stock: i64,
    /// Product image.
    #[serde(default)]
    pub image_url: Option<String>,
}

impl Product {
    /// Create a product with the required fields.
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: Money) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            price,
            category: None,
            stock: 0,
            image_url: None,
        }
    }

    /// Set the category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set the stock level.
    pub fn with_stock(mut self, stock: i64) -> Self {
        self.stock = stock;
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The item the cart stores for this product.
    pub fn snapshot(&self) -> Result<CartItem, CommerceError> {
        CartItem::try_new(self.id.clone(), self.name.clone(), self.price)
    }

    /// Check whether any units are in stock.
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Category name, empty when unset.
    pub fn category_name(&self) -> &str {
        self.category.as_deref().unwrap_or("")
    }

    /// Product image or the storefront default.
    pub fn image_url_or_default(&self) -> &str {
        match self.image_url.as_deref() {
            Some(url) if !url.is_empty() => url,
            _ => DEFAULT_IMAGE_URL,
        }
    }
}

/// Find a product by id.
pub fn find_product<'a>(products: &'a [Product], id: &ProductId) -> Option<&'a Product> {
    products.iter().find(|p| &p.id == id)
}

/// Group products by category, keeping the order in which categories first
/// appear.
pub fn group_by_category(products: &[Product]) -> Vec<(&str, Vec<&Product>)> {
    let mut groups: Vec<(&str, Vec<&Product>)> = Vec::new();
    for product in products {
        let category = product.category_name();
        match groups.iter_mut().find(|(name, _)| *name == category) {
            Some((_, members)) => members.push(product),
            None => groups.push((category, vec![product])),
        }
    }
    groups
}
