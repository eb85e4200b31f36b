//! Order types.

use crate::cart::CartStore;
use crate::checkout::DeliveryDetails;
use crate::error::CommerceError;
use crate::ids::{OrderId, ProductId, UserId};
use crate::money::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Order placed, awaiting the store.
    #[default]
    Pending,
    /// Store accepted the order.
    Confirmed,
    /// Order is on its way.
    OutForDelivery,
    /// Order delivered.
    Delivered,
    /// Order cancelled.
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::OutForDelivery => "out_for_delivery",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Confirmed => "Confirmed",
            OrderStatus::OutForDelivery => "Out for delivery",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    /// Check if order is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }
}

/// How the customer pays. Only cash on delivery is offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    CashOnDelivery,
}

impl PaymentMethod {
    pub fn display_name(&self) -> &'static str {
        match self {
            PaymentMethod::CashOnDelivery => "Cash on Delivery",
        }
    }
}

/// Order header row as inserted into `orders`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewOrder {
    pub user_id: UserId,
    pub customer_name: String,
    pub phone_number: String,
    pub total_amount: Money,
    pub delivery_address: String,
    pub status: OrderStatus,
}

/// Order line row as inserted into `order_items`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewOrderItem {
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub price: Money,
}

/// An `orders` row as returned by the backend.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub customer_name: String,
    pub phone_number: String,
    pub total_amount: Money,
    pub delivery_address: String,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// One cart line frozen for submission.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftLine {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: u32,
    pub price: Money,
}

impl DraftLine {
    pub fn line_total(&self) -> Money {
        self.price.times(self.quantity)
    }
}

/// Everything needed to persist an order, captured from the cart at
/// submission time.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDraft {
    /// Header row.
    pub header: NewOrder,
    /// Lines in cart order.
    pub lines: Vec<DraftLine>,
}

impl OrderDraft {
    /// Capture the cart's lines and total.
    ///
    /// Fails with [`CommerceError::EmptyCart`] when there is nothing to order.
    pub fn from_cart(
        user_id: UserId,
        details: &DeliveryDetails,
        cart: &CartStore,
    ) -> Result<Self, CommerceError> {
        if cart.is_empty() {
            return Err(CommerceError::EmptyCart);
        }

        let lines = cart
            .iter()
            .map(|line| DraftLine {
                product_id: line.id.clone(),
                name: line.name.clone(),
                quantity: line.quantity(),
                price: line.price,
            })
            .collect();

        Ok(Self {
            header: NewOrder {
                user_id,
                customer_name: details.customer_name().to_string(),
                phone_number: details.phone_number().to_string(),
                total_amount: cart.total(),
                delivery_address: details.delivery_address(),
                status: OrderStatus::Pending,
            },
            lines,
        })
    }

    /// Line rows for an order created by the backend.
    pub fn items_for(&self, order_id: &OrderId) -> Vec<NewOrderItem> {
        self.lines
            .iter()
            .map(|line| NewOrderItem {
                order_id: order_id.clone(),
                product_id: line.product_id.clone(),
                quantity: line.quantity,
                price: line.price,
            })
            .collect()
    }

    /// Total item count (sum of quantities).
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }
}

/// Summary of a placed order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderReceipt {
    pub order_id: OrderId,
    pub status: OrderStatus,
    pub total: Money,
    pub item_count: u64,
    pub delivery_address: String,
    pub payment_method: PaymentMethod,
}

impl OrderReceipt {
    /// Build a receipt from the persisted header and the submitted draft.
    pub fn new(order: &Order, draft: &OrderDraft) -> Self {
        Self {
            order_id: order.id.clone(),
            status: order.status,
            total: order.total_amount,
            item_count: draft.item_count(),
            delivery_address: order.delivery_address.clone(),
            payment_method: PaymentMethod::CashOnDelivery,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartItem;
    use crate::checkout::{DeliveryForm, DeliveryOptions};

    fn details() -> DeliveryDetails {
        DeliveryForm {
            customer_name: "Ravi".to_string(),
            phone_number: "9000000001".to_string(),
            hostel: "1".to_string(),
            location: "Loc3".to_string(),
            room: "21".to_string(),
        }
        .validate(&DeliveryOptions::default())
        .unwrap()
    }

    fn cart() -> CartStore {
        let mut cart = CartStore::new();
        cart.add_item(CartItem::new("a", "Apple", Money::parse("2.50").unwrap()));
        cart.add_item(CartItem::new("b", "Bread", Money::parse("1.00").unwrap()));
        cart.add_item(CartItem::new("b", "Bread", Money::parse("1.00").unwrap()));
        cart
    }

    #[test]
    fn test_status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::OutForDelivery).unwrap(),
            "\"out_for_delivery\""
        );
        assert_eq!(
            serde_json::from_str::<OrderStatus>("\"pending\"").unwrap(),
            OrderStatus::Pending
        );
    }

    #[test]
    fn test_status_terminal() {
        assert!(OrderStatus::Delivered.is_terminal());
        assert!(!OrderStatus::Pending.is_terminal());
    }

    #[test]
    fn test_draft_from_cart() {
        let draft = OrderDraft::from_cart(UserId::new("u1"), &details(), &cart()).unwrap();

        assert_eq!(draft.header.total_amount, Money::parse("4.50").unwrap());
        assert_eq!(draft.header.status, OrderStatus::Pending);
        assert_eq!(draft.header.delivery_address, "Hostel 1, Loc3, Room 21");
        assert_eq!(draft.lines.len(), 2);
        assert_eq!(draft.item_count(), 3);
    }

    #[test]
    fn test_draft_rejects_empty_cart() {
        let result = OrderDraft::from_cart(UserId::new("u1"), &details(), &CartStore::new());
        assert_eq!(result.unwrap_err(), CommerceError::EmptyCart);
    }

    #[test]
    fn test_new_order_json_shape() {
        let draft = OrderDraft::from_cart(UserId::new("u1"), &details(), &cart()).unwrap();
        let json = serde_json::to_value(&draft.header).unwrap();

        assert_eq!(json["user_id"], "u1");
        assert_eq!(json["customer_name"], "Ravi");
        assert_eq!(json["phone_number"], "9000000001");
        assert_eq!(json["total_amount"], 4.5);
        assert_eq!(json["status"], "pending");
    }

    #[test]
    fn test_items_for_order() {
        let draft = OrderDraft::from_cart(UserId::new("u1"), &details(), &cart()).unwrap();
        let items = draft.items_for(&OrderId::new("o9"));

        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|i| i.order_id.as_str() == "o9"));
        assert_eq!(items[1].product_id.as_str(), "b");
        assert_eq!(items[1].quantity, 2);
        assert_eq!(items[1].price, Money::parse("1.00").unwrap());
    }

    #[test]
    fn test_order_row_deserializes() {
        let json = r#"{
            "id": "o1",
            "user_id": "u1",
            "customer_name": "Ravi",
            "phone_number": "9000000001",
            "total_amount": 4.5,
            "delivery_address": "Hostel 1, Loc3, Room 21",
            "status": "pending",
            "created_at": "2024-03-01T10:00:00.123456+00:00"
        }"#;
        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.id.as_str(), "o1");
        assert_eq!(order.status, OrderStatus::Pending);
        assert!(order.created_at.is_some());
    }

    #[test]
    fn test_receipt() {
        let draft = OrderDraft::from_cart(UserId::new("u1"), &details(), &cart()).unwrap();
        let order = Order {
            id: OrderId::new("o1"),
            user_id: UserId::new("u1"),
            customer_name: "Ravi".to_string(),
            phone_number: "9000000001".to_string(),
            total_amount: draft.header.total_amount,
            delivery_address: draft.header.delivery_address.clone(),
            status: OrderStatus::Pending,
            created_at: None,
        };
        let receipt = OrderReceipt::new(&order, &draft);
        assert_eq!(receipt.item_count, 3);
        assert_eq!(receipt.payment_method, PaymentMethod::CashOnDelivery);
    }
}
