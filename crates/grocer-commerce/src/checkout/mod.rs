//! Checkout module.
//!
//! Contains delivery details, order rows and the draft built from a cart.

mod details;
mod order;

pub use details::{DeliveryDetails, DeliveryForm, DeliveryOptions, PHONE_DIGITS};
pub use order::{
    DraftLine, NewOrder, NewOrderItem, Order, OrderDraft, OrderReceipt, OrderStatus, PaymentMethod,
};
