//! Query handlers for the order context.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use storefront_core::error::DomainError;
use storefront_core::model::{CustomerId, Money, Order, OrderId, OrderStatus, ProductId};
use storefront_core::repository::Store;

/// Read-only view of a placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderView {
    /// The order identifier.
    pub id: OrderId,
    /// The ordered product.
    pub product_id: ProductId,
    /// Ordered units.
    pub quantity: i32,
    /// Unit price at placement.
    pub price: Money,
    /// Price times quantity.
    pub amount: Money,
    /// Fulfilment state.
    pub status: OrderStatus,
    /// Payment reference.
    pub payment_id: String,
    /// When the order was placed.
    pub placed_at: DateTime<Utc>,
}

impl From<Order> for OrderView {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            product_id: order.product_id,
            quantity: order.quantity,
            amount: order.price * Decimal::from(order.quantity),
            price: order.price,
            status: order.status,
            payment_id: order.payment_id,
            placed_at: order.placed_at,
        }
    }
}

/// Lists the customer's orders, newest first.
///
/// # Errors
///
/// Returns `DomainError::Persistence` if the orders cannot be loaded.
pub async fn list_orders(
    customer_id: CustomerId,
    store: &dyn Store,
) -> Result<Vec<OrderView>, DomainError> {
    let orders = store.find_orders(customer_id).await?;
    Ok(orders.into_iter().map(OrderView::from).collect())
}
