//! Order persistence.

use crate::StorefrontError;
use async_trait::async_trait;
use grocer_commerce::checkout::{Order, OrderDraft};
use grocer_db::Db;
use mockall::automock;

/// Persists an order draft.
#[automock]
#[async_trait]
pub trait OrderSubmitter: Send + Sync {
    /// Store the header and its lines, returning the created header row.
    async fn submit(&self, draft: &OrderDraft) -> Result<Order, StorefrontError>;
}

/// Writes orders to the hosted `orders` and `order_items` tables.
///
/// The header is inserted first so its generated id can be stamped on each
/// line. The two inserts are separate requests; if the second fails the
/// header stays behind and the error carries its id.
#[derive(Debug, Clone)]
pub struct RemoteOrderSubmitter {
    db: Db,
}

impl RemoteOrderSubmitter {
    pub const ORDERS: &'static str = "orders";
    pub const ORDER_ITEMS: &'static str = "order_items";

    pub fn new(db: Db) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrderSubmitter for RemoteOrderSubmitter {
    async fn submit(&self, draft: &OrderDraft) -> Result<Order, StorefrontError> {
        let order: Order = self
            .db
            .from(Self::ORDERS)
            .select("*")
            .insert_one(&draft.header)
            .await
            .map_err(StorefrontError::OrderRejected)?;

        let items = draft.items_for(&order.id);
        if let Err(source) = self.db.from(Self::ORDER_ITEMS).insert_all(&items).await {
            tracing::warn!(order_id = %order.id, error = %source, "order items not saved");
            return Err(StorefrontError::OrderItemsRejected {
                order_id: order.id,
                source,
            });
        }

        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grocer_commerce::prelude::*;
    use grocer_data::{FetchClient, Method, StubTransport};
    use grocer_db::DbError;
    use serde_json::json;
    use std::sync::Arc;

    fn submitter(stub: &Arc<StubTransport>) -> RemoteOrderSubmitter {
        let client = FetchClient::from_arc(stub.clone()).with_base_url("https://proj.example.co");
        RemoteOrderSubmitter::new(Db::new(client, "anon").with_access_token("jwt"))
    }

    fn draft() -> OrderDraft {
        let details = DeliveryForm {
            customer_name: "Asha".into(),
            phone_number: "9876543210".into(),
            hostel: "2".into(),
            location: "Loc1".into(),
            room: "114".into(),
        }
        .validate(&DeliveryOptions::default())
        .unwrap();

        let mut cart = CartStore::new();
        cart.add_item(CartItem::new("p1", "Milk", Money::parse("1.25").unwrap()));
        cart.add_item(CartItem::new("p2", "Bread", Money::parse("2.00").unwrap()));
        cart.update_quantity(&ProductId::new("p2"), 3);

        OrderDraft::from_cart(UserId::new("u1"), &details, &cart).unwrap()
    }

    fn order_row() -> serde_json::Value {
        json!({
            "id": "o-77",
            "user_id": "u1",
            "customer_name": "Asha",
            "phone_number": "9876543210",
            "total_amount": 7.25,
            "delivery_address": "Hostel 2, Loc1, Room 114",
            "status": "pending",
            "created_at": "2024-03-01T10:00:00Z"
        })
    }

    #[tokio::test]
    async fn test_submit_inserts_header_then_items() {
        let stub = Arc::new(StubTransport::new());
        stub.push_json(201, order_row()).push_json(201, json!(null));

        let order = submitter(&stub).submit(&draft()).await.unwrap();
        assert_eq!(order.id.as_str(), "o-77");

        let requests = stub.requests();
        assert_eq!(requests.len(), 2);

        let header = &requests[0];
        assert_eq!(header.method(), Method::Post);
        assert_eq!(header.url(), "https://proj.example.co/rest/v1/orders");
        let body = header.body_json().unwrap();
        assert_eq!(body["total_amount"], 7.25);
        assert_eq!(body["status"], "pending");
        assert_eq!(body["delivery_address"], "Hostel 2, Loc1, Room 114");

        let items = &requests[1];
        assert_eq!(items.url(), "https://proj.example.co/rest/v1/order_items");
        let body = items.body_json().unwrap();
        assert_eq!(body[0]["order_id"], "o-77");
        assert_eq!(body[0]["product_id"], "p1");
        assert_eq!(body[1]["quantity"], 3);
        assert_eq!(body[1]["price"], 2.0);
    }

    #[tokio::test]
    async fn test_header_failure_sends_no_items() {
        let stub = Arc::new(StubTransport::new());
        stub.push_json(400, json!({"message": "violates check constraint"}));

        let err = submitter(&stub).submit(&draft()).await.unwrap_err();
        assert!(matches!(err, StorefrontError::OrderRejected(DbError::QueryError { status: 400, .. })));
        assert_eq!(stub.request_count(), 1);
    }

    #[tokio::test]
    async fn test_items_failure_reports_orphaned_header() {
        let stub = Arc::new(StubTransport::new());
        stub.push_json(201, order_row())
            .push_json(403, json!({"message": "new row violates row-level security policy"}));

        let err = submitter(&stub).submit(&draft()).await.unwrap_err();
        match err {
            StorefrontError::OrderItemsRejected { order_id, source } => {
                assert_eq!(order_id.as_str(), "o-77");
                assert!(source.is_unauthorized());
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
