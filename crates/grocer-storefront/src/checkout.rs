//! Order placement.

use crate::orders::OrderSubmitter;
use crate::StorefrontError;
use grocer_commerce::cart::CartStore;
use grocer_commerce::checkout::{DeliveryDetails, OrderDraft, OrderReceipt};
use grocer_commerce::ids::UserId;

/// Place an order for everything in `cart`.
///
/// An empty cart is rejected before anything is sent. The cart is cleared
/// only after the submitter reports success; on any failure it is left as
/// it was so the shopper can retry.
pub async fn place_order(
    submitter: &dyn OrderSubmitter,
    user_id: &UserId,
    details: &DeliveryDetails,
    cart: &mut CartStore,
) -> Result<OrderReceipt, StorefrontError> {
    let draft = OrderDraft::from_cart(user_id.clone(), details, cart)?;

    let order = submitter.submit(&draft).await.map_err(|e| {
        tracing::warn!(%user_id, error = %e, "order placement failed");
        e
    })?;

    cart.clear_cart();
    let receipt = OrderReceipt::new(&order, &draft);
    tracing::info!(
        order_id = %receipt.order_id,
        total = %receipt.total,
        items = receipt.item_count,
        "order placed"
    );
    Ok(receipt)
}
