//! Commands for the order context.

use storefront_core::model::CustomerId;
use uuid::Uuid;

/// Command to convert every line of a customer's cart into orders.
#[derive(Debug, Clone)]
pub struct PlaceOrder {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The ordering customer.
    pub customer_id: CustomerId,
}
