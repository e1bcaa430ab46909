//! Command handlers for the order context.
//!
//! Order placement stages every order, stock decrement and cart deletion in a
//! single `ChangeSet`. The first failing line aborts the whole batch.

use storefront_core::clock::Clock;
use storefront_core::error::DomainError;
use storefront_core::model::{Order, OrderId, OrderStatus, PLACEHOLDER_PAYMENT_ID};
use storefront_core::repository::{ChangeSet, Mutation, Store};
use tracing::{info, instrument};

use crate::domain::commands::PlaceOrder;

/// Result of a successfully placed order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedOrders {
    /// One order per former cart line, in cart order.
    pub orders: Vec<Order>,
}

/// Handles the `PlaceOrder` command.
///
/// For each cart line, in cart order, stages an order snapshotting the
/// product's current price, a stock decrement of the line quantity, and the
/// deletion of the line. Lines holding zero units are deleted without an
/// order. Everything is committed at once.
///
/// # Errors
///
/// Returns `DomainError::EmptyCart` if the customer has no cart line with at
/// least one unit,
/// `DomainError::InsufficientStock` if a line asks for more units than are
/// in stock, and `DomainError::Persistence` if loading or committing fails.
/// No state is changed in any error case.
#[instrument(skip_all, fields(correlation_id = %command.correlation_id, customer_id = %command.customer_id))]
pub async fn handle_place_order(
    command: &PlaceOrder,
    clock: &dyn Clock,
    store: &dyn Store,
) -> Result<PlacedOrders, DomainError> {
    let entries = store.find_cart_entries(command.customer_id).await?;
    if entries.iter().all(|entry| entry.line.quantity < 1) {
        return Err(DomainError::EmptyCart);
    }

    let placed_at = clock.now();
    let mut changes = ChangeSet::new();
    let mut orders = Vec::with_capacity(entries.len());

    for entry in entries {
        let (line, product) = (entry.line, entry.product);
        if line.quantity < 1 {
            changes.push(Mutation::DeleteCartLine(line.id));
            continue;
        }
        if product.in_stock < line.quantity {
            return Err(DomainError::InsufficientStock {
                product_id: product.id,
                requested: line.quantity,
                available: product.in_stock,
            });
        }

        let order = Order {
            id: OrderId::generate(),
            customer_id: line.customer_id,
            product_id: line.product_id,
            quantity: line.quantity,
            price: product.current_price,
            status: OrderStatus::Pending,
            payment_id: PLACEHOLDER_PAYMENT_ID.to_owned(),
            placed_at,
        };

        changes.push(Mutation::InsertOrder(order.clone()));
        changes.push(Mutation::DecrementStock {
            product_id: line.product_id,
            quantity: line.quantity,
        });
        changes.push(Mutation::DeleteCartLine(line.id));
        orders.push(order);
    }

    store.commit(changes).await?;

    info!(orders = orders.len(), "order placed");

    Ok(PlacedOrders { orders })
}
