//! Command handlers for the cart context.
//!
//! Each handler loads what it needs through the `Store`, stages its writes in
//! one `ChangeSet`, and commits once. A failed commit leaves the cart exactly
//! as it was.

use serde::Serialize;
use storefront_core::clock::Clock;
use storefront_core::error::DomainError;
use storefront_core::model::{CartLine, CartLineId, CustomerId, Money};
use storefront_core::repository::{Mutation, Store};
use tracing::info;

use crate::application::query_handlers::compute_totals;
use crate::domain::commands::{AddToCart, ChangeQuantity, RemoveLine};
use crate::domain::policy::ZeroQuantityPolicy;
use crate::domain::totals::CartTotals;

/// Whether add-to-cart created a line or bumped an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AddToCartKind {
    /// A new line with quantity 1 was created.
    Added,
    /// An existing line's quantity was raised by 1.
    Incremented,
}

/// Result of a successfully handled `AddToCart` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddToCartOutcome {
    /// The line holding the product.
    pub line_id: CartLineId,
    /// Name of the product, for the user notification.
    pub product_name: String,
    /// Quantity of the line after the command.
    pub quantity: i32,
    /// What happened to the line.
    pub kind: AddToCartKind,
}

/// Line quantity and refreshed cart totals after a line-level change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LineUpdate {
    /// Quantity of the affected line (0 once it has been removed by a
    /// decrement).
    pub quantity: i32,
    /// Cart subtotal.
    pub amount: Money,
    /// Cart subtotal plus the fixed fee.
    pub total: Money,
}

impl LineUpdate {
    fn new(quantity: i32, totals: CartTotals) -> Self {
        Self {
            quantity,
            amount: totals.subtotal,
            total: totals.total,
        }
    }
}

/// Loads a cart line and checks that it belongs to `customer_id`. Lines of
/// other customers are reported as missing.
async fn load_owned_line(
    store: &dyn Store,
    customer_id: CustomerId,
    line_id: CartLineId,
) -> Result<CartLine, DomainError> {
    store
        .find_cart_line(line_id)
        .await?
        .filter(|line| line.customer_id == customer_id)
        .ok_or_else(|| DomainError::cart_line_not_found(line_id))
}

/// Handles the `AddToCart` command: increments the customer's line for the
/// product, or creates it with quantity 1.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the product does not exist,
/// `DomainError::Validation` if the quantity would overflow, and
/// `DomainError::Persistence` if loading or committing fails.
pub async fn handle_add_to_cart(
    command: &AddToCart,
    clock: &dyn Clock,
    store: &dyn Store,
) -> Result<AddToCartOutcome, DomainError> {
    let product = store
        .find_product(command.product_id)
        .await?
        .ok_or_else(|| DomainError::product_not_found(command.product_id))?;

    let existing = store
        .find_cart_line_for(command.customer_id, command.product_id)
        .await?;

    let (mutation, outcome) = match existing {
        Some(line) => {
            let quantity = line.quantity.checked_add(1).ok_or_else(|| {
                DomainError::Validation(format!("quantity of cart line {} overflows", line.id))
            })?;
            (
                Mutation::SetCartQuantity {
                    line_id: line.id,
                    quantity,
                },
                AddToCartOutcome {
                    line_id: line.id,
                    product_name: product.name,
                    quantity,
                    kind: AddToCartKind::Incremented,
                },
            )
        }
        None => {
            let line = CartLine::first_unit(command.customer_id, command.product_id, clock.now());
            let outcome = AddToCartOutcome {
                line_id: line.id,
                product_name: product.name,
                quantity: line.quantity,
                kind: AddToCartKind::Added,
            };
            (Mutation::InsertCartLine(line), outcome)
        }
    };

    store.commit(mutation.into()).await?;

    info!(
        correlation_id = %command.correlation_id,
        customer_id = %command.customer_id,
        line_id = %outcome.line_id,
        quantity = outcome.quantity,
        "cart line saved"
    );

    Ok(outcome)
}

/// Handles the `ChangeQuantity` command: moves a line's quantity by one unit
/// and returns the refreshed totals.
///
/// A decrement that would leave the line below one unit is resolved by
/// `policy`.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the line does not exist or belongs to
/// another customer, `DomainError::Validation` if `policy` rejects the
/// decrement or the quantity would overflow, and `DomainError::Persistence`
/// if loading or committing fails.
pub async fn handle_change_quantity(
    command: &ChangeQuantity,
    policy: ZeroQuantityPolicy,
    store: &dyn Store,
) -> Result<LineUpdate, DomainError> {
    let line = load_owned_line(store, command.customer_id, command.line_id).await?;

    let next = line.quantity.checked_add(command.delta.value()).ok_or_else(|| {
        DomainError::Validation(format!("quantity of cart line {} overflows", line.id))
    })?;

    let (mutation, quantity) = if next >= 1 {
        (
            Some(Mutation::SetCartQuantity {
                line_id: line.id,
                quantity: next,
            }),
            next,
        )
    } else {
        match policy {
            ZeroQuantityPolicy::Remove => (Some(Mutation::DeleteCartLine(line.id)), 0),
            // A kept line bottoms out at zero units.
            ZeroQuantityPolicy::Keep => (
                (line.quantity > 0).then_some(Mutation::SetCartQuantity {
                    line_id: line.id,
                    quantity: 0,
                }),
                0,
            ),
            ZeroQuantityPolicy::Reject => {
                return Err(DomainError::Validation(format!(
                    "cart line {} cannot go below one unit; remove it instead",
                    line.id
                )));
            }
        }
    };

    if let Some(mutation) = mutation {
        store.commit(mutation.into()).await?;
    }

    info!(
        correlation_id = %command.correlation_id,
        customer_id = %command.customer_id,
        line_id = %line.id,
        quantity,
        "cart line quantity changed"
    );

    let totals = compute_totals(command.customer_id, store).await?;
    Ok(LineUpdate::new(quantity, totals))
}

/// Handles the `RemoveLine` command: deletes the line and returns the
/// refreshed totals together with the quantity the line held.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the line does not exist or belongs to
/// another customer, and `DomainError::Persistence` if loading or committing
/// fails.
pub async fn handle_remove_line(
    command: &RemoveLine,
    store: &dyn Store,
) -> Result<LineUpdate, DomainError> {
    let line = load_owned_line(store, command.customer_id, command.line_id).await?;

    store.commit(Mutation::DeleteCartLine(line.id).into()).await?;

    info!(
        correlation_id = %command.correlation_id,
        customer_id = %command.customer_id,
        line_id = %line.id,
        "cart line removed"
    );

    let totals = compute_totals(command.customer_id, store).await?;
    Ok(LineUpdate::new(line.quantity, totals))
}
