//! Product listing.

use crate::StorefrontError;
use async_trait::async_trait;
use grocer_commerce::catalog::Product;
use grocer_db::{Db, Order};
use mockall::automock;

/// Source of the product catalog.
#[automock]
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// All products, ordered by category.
    async fn list_products(&self) -> Result<Vec<Product>, StorefrontError>;
}

/// Catalog read from the hosted `products` table.
#[derive(Debug, Clone)]
pub struct RemoteCatalog {
    db: Db,
}

impl RemoteCatalog {
    pub const TABLE: &'static str = "products";

    pub fn new(db: Db) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CatalogProvider for RemoteCatalog {
    async fn list_products(&self) -> Result<Vec<Product>, StorefrontError> {
        let products: Vec<Product> = self
            .db
            .from(Self::TABLE)
            .select("*")
            .order(Order::asc("category"))
            .fetch()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "failed to load products");
                StorefrontError::Catalog(e)
            })?;

        tracing::debug!(count = products.len(), "loaded products");
        Ok(products)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grocer_data::{FetchClient, StubTransport};
    use grocer_db::DbError;
    use serde_json::json;
    use std::sync::Arc;

    fn catalog(stub: &Arc<StubTransport>) -> RemoteCatalog {
        let client = FetchClient::from_arc(stub.clone()).with_base_url("https://proj.example.co");
        RemoteCatalog::new(Db::new(client, "anon").with_access_token("jwt"))
    }

    #[tokio::test]
    async fn test_list_products() {
        let stub = Arc::new(StubTransport::new());
        stub.push_json(
            200,
            json!([
                {"id": "p1", "name": "Milk", "price": 1.25, "category": "Dairy", "stock": 4},
                {"id": "p2", "name": "Apple", "price": 0.5, "category": "Fruit", "stock": 0,
                 "description": null, "image_url": "https://img.example/apple.jpg"}
            ]),
        );

        let products = catalog(&stub).list_products().await.unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].name, "Milk");
        assert!(!products[1].in_stock());

        let req = &stub.requests()[0];
        assert_eq!(req.url(), "https://proj.example.co/rest/v1/products");
        assert_eq!(req.query_value("order"), Some("category.asc"));
        assert_eq!(req.header_value("authorization"), Some("Bearer jwt"));
    }

    #[tokio::test]
    async fn test_list_products_failure() {
        let stub = Arc::new(StubTransport::new());
        stub.push_json(500, json!({"message": "boom"}));

        let err = catalog(&stub).list_products().await.unwrap_err();
        assert!(matches!(err, StorefrontError::Catalog(DbError::QueryError { status: 500, .. })));
        assert_eq!(err.notification(), "Failed to load products");
    }
}
