//! Commands for the cart context.

use storefront_core::model::{CartLineId, CustomerId, ProductId};
use uuid::Uuid;

use super::policy::QuantityDelta;

/// Command to put one unit of a product into a customer's cart.
#[derive(Debug, Clone)]
pub struct AddToCart {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The customer owning the cart.
    pub customer_id: CustomerId,
    /// The product to add.
    pub product_id: ProductId,
}

/// Command to raise or lower a cart line's quantity by one.
#[derive(Debug, Clone)]
pub struct ChangeQuantity {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The customer owning the cart.
    pub customer_id: CustomerId,
    /// The line to adjust.
    pub line_id: CartLineId,
    /// Direction of the adjustment.
    pub delta: QuantityDelta,
}

/// Command to delete a cart line.
#[derive(Debug, Clone)]
pub struct RemoveLine {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The customer owning the cart.
    pub customer_id: CustomerId,
    /// The line to delete.
    pub line_id: CartLineId,
}
