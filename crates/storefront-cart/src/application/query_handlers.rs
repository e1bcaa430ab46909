//! Query handlers for the cart context.

use serde::Serialize;
use storefront_core::error::DomainError;
use storefront_core::model::{CartEntry, CartLineId, CustomerId, Money, ProductId};
use storefront_core::repository::Store;

use crate::domain::totals::{CartTotals, FIXED_FEE};

/// Read-only view of one cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLineView {
    /// The line identifier.
    pub id: CartLineId,
    /// The referenced product.
    pub product_id: ProductId,
    /// Product name.
    pub product_name: String,
    /// Current unit price.
    pub price: Money,
    /// Units in the cart.
    pub quantity: i32,
    /// Price times quantity.
    pub amount: Money,
}

impl From<&CartEntry> for CartLineView {
    fn from(entry: &CartEntry) -> Self {
        Self {
            id: entry.line.id,
            product_id: entry.product.id,
            product_name: entry.product.name.clone(),
            price: entry.product.current_price,
            quantity: entry.line.quantity,
            amount: entry.amount(),
        }
    }
}

/// Read-only view of a customer's cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartView {
    /// Lines, oldest first.
    pub lines: Vec<CartLineView>,
    /// Sum of the line amounts.
    pub subtotal: Money,
    /// The fixed fee included in `total`.
    pub fee: Money,
    /// Subtotal plus fee.
    pub total: Money,
}

/// Prices the customer's cart.
///
/// # Errors
///
/// Returns `DomainError::Persistence` if the cart cannot be loaded.
pub async fn compute_totals(
    customer_id: CustomerId,
    store: &dyn Store,
) -> Result<CartTotals, DomainError> {
    let entries = store.find_cart_entries(customer_id).await?;
    Ok(CartTotals::from_entries(&entries))
}

/// Retrieves the customer's cart with its lines and totals.
///
/// # Errors
///
/// Returns `DomainError::Persistence` if the cart cannot be loaded.
pub async fn get_cart(customer_id: CustomerId, store: &dyn Store) -> Result<CartView, DomainError> {
    let entries = store.find_cart_entries(customer_id).await?;
    let totals = CartTotals::from_entries(&entries);
    Ok(CartView {
        lines: entries.iter().map(CartLineView::from).collect(),
        subtotal: totals.subtotal,
        fee: FIXED_FEE,
        total: totals.total,
    })
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use rust_decimal_macros::dec;
    use storefront_core::clock::Clock;
    use storefront_core::error::DomainError;
    use storefront_core::model::CustomerId;
    use storefront_test_support::{FailingStore, FixedClock, InMemoryStore, cart_line, product};

    use crate::application::query_handlers::{compute_totals, get_cart};

    #[tokio::test]
    async fn test_compute_totals_for_empty_cart_is_fee_only() {
        let store = InMemoryStore::new();

        let totals = compute_totals(CustomerId(1), &store).await.unwrap();

        assert_eq!(totals.subtotal, dec!(0));
        assert_eq!(totals.total, dec!(10));
    }

    #[tokio::test]
    async fn test_compute_totals_only_counts_own_lines() {
        // Arrange
        let now = FixedClock::default().now();
        let store = InMemoryStore::with_products([
            product(7, "Phone X", dec!(100), 5),
            product(8, "Camera", dec!(40), 5),
        ]);
        store.insert_cart_line(cart_line(1, 7, 2, now));
        store.insert_cart_line(cart_line(1, 8, 1, now));
        store.insert_cart_line(cart_line(2, 8, 9, now));

        // Act
        let totals = compute_totals(CustomerId(1), &store).await.unwrap();

        // Assert
        assert_eq!(totals.subtotal, dec!(240));
        assert_eq!(totals.total, dec!(250));
    }

    #[tokio::test]
    async fn test_get_cart_lists_lines_oldest_first() {
        // Arrange
        let now = FixedClock::default().now();
        let store = InMemoryStore::with_products([
            product(7, "Phone X", dec!(100), 5),
            product(8, "Camera", dec!(40), 5),
        ]);
        let newer = cart_line(1, 7, 2, now + Duration::minutes(5));
        let older = cart_line(1, 8, 1, now);
        store.insert_cart_line(newer.clone());
        store.insert_cart_line(older.clone());

        // Act
        let view = get_cart(CustomerId(1), &store).await.unwrap();

        // Assert
        assert_eq!(view.lines.len(), 2);
        assert_eq!(view.lines[0].id, older.id);
        assert_eq!(view.lines[0].product_name, "Camera");
        assert_eq!(view.lines[1].id, newer.id);
        assert_eq!(view.lines[1].amount, dec!(200));
        assert_eq!(view.subtotal, dec!(240));
        assert_eq!(view.fee, dec!(10));
        assert_eq!(view.total, dec!(250));
    }

    #[tokio::test]
    async fn test_get_cart_propagates_store_failure() {
        let result = get_cart(CustomerId(1), &FailingStore).await;

        assert!(matches!(result, Err(DomainError::Persistence(_))));
    }
}
