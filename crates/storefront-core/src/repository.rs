//! Persistence abstraction.
//!
//! Reads are typed lookups; writes are staged into a [`ChangeSet`] and
//! applied by a single [`Store::commit`], which is the only atomicity
//! boundary in the system.

use async_trait::async_trait;

use crate::error::DomainError;
use crate::filter::ProductFilter;
use crate::model::{CartEntry, CartLine, CartLineId, CustomerId, Order, Product, ProductId};

/// A single staged write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// Insert a new cart line.
    InsertCartLine(CartLine),
    /// Overwrite the quantity of an existing cart line.
    SetCartQuantity {
        /// Line to update.
        line_id: CartLineId,
        /// New quantity.
        quantity: i32,
    },
    /// Delete a cart line.
    DeleteCartLine(CartLineId),
    /// Insert a new order.
    InsertOrder(Order),
    /// Take units out of a product's stock. Fails with
    /// `DomainError::InsufficientStock` if fewer than `quantity` remain.
    DecrementStock {
        /// Product whose stock is reduced.
        product_id: ProductId,
        /// Units to remove.
        quantity: i32,
    },
}

impl Mutation {
    /// Checks the quantities carried by the mutation. Stores call this before
    /// applying it.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` for a negative cart quantity or a
    /// stock decrement of less than one unit.
    pub fn validate(&self) -> Result<(), DomainError> {
        match self {
            Self::InsertCartLine(CartLine { id, quantity, .. })
            | Self::SetCartQuantity {
                line_id: id,
                quantity,
            } if *quantity < 0 => Err(DomainError::Validation(format!(
                "cart line {id} cannot hold {quantity} units"
            ))),
            Self::DecrementStock {
                product_id,
                quantity,
            } if *quantity < 1 => Err(DomainError::Validation(format!(
                "stock of product {product_id} cannot be decremented by {quantity}"
            ))),
            _ => Ok(()),
        }
    }
}

/// An ordered group of mutations committed all-or-nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    mutations: Vec<Mutation>,
}

impl ChangeSet {
    /// Creates an empty change set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a mutation.
    pub fn push(&mut self, mutation: Mutation) {
        self.mutations.push(mutation);
    }

    /// Returns `true` if nothing has been staged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mutations.is_empty()
    }

    /// Number of staged mutations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.mutations.len()
    }

    /// The staged mutations, in commit order.
    #[must_use]
    pub fn mutations(&self) -> &[Mutation] {
        &self.mutations
    }
}

impl From<Mutation> for ChangeSet {
    fn from(mutation: Mutation) -> Self {
        Self {
            mutations: vec![mutation],
        }
    }
}

impl IntoIterator for ChangeSet {
    type Item = Mutation;
    type IntoIter = std::vec::IntoIter<Mutation>;

    fn into_iter(self) -> Self::IntoIter {
        self.mutations.into_iter()
    }
}

/// Repository trait for products, cart lines and orders.
#[async_trait]
pub trait Store: Send + Sync {
    /// Load a product by id.
    async fn find_product(&self, id: ProductId) -> Result<Option<Product>, DomainError>;

    /// Load every product accepted by `filter`, ordered by id.
    async fn find_products(&self, filter: &ProductFilter) -> Result<Vec<Product>, DomainError>;

    /// Load a cart line by id.
    async fn find_cart_line(&self, id: CartLineId) -> Result<Option<CartLine>, DomainError>;

    /// Load the line a customer holds for a product, if any.
    async fn find_cart_line_for(
        &self,
        customer_id: CustomerId,
        product_id: ProductId,
    ) -> Result<Option<CartLine>, DomainError>;

    /// Load a customer's cart lines joined with their products, oldest line
    /// first.
    async fn find_cart_entries(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<CartEntry>, DomainError>;

    /// Load a customer's orders, newest first.
    async fn find_orders(&self, customer_id: CustomerId) -> Result<Vec<Order>, DomainError>;

    /// Apply every mutation in `changes` atomically, in order.
    async fn commit(&self, changes: ChangeSet) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_non_positive_stock_decrement() {
        for quantity in [0, -3] {
            let mutation = Mutation::DecrementStock {
                product_id: ProductId(7),
                quantity,
            };

            let result = mutation.validate();

            assert!(matches!(result, Err(DomainError::Validation(_))), "{quantity}");
        }
    }

    #[test]
    fn test_validate_rejects_negative_cart_quantity() {
        let mutation = Mutation::SetCartQuantity {
            line_id: CartLineId::generate(),
            quantity: -1,
        };

        assert!(matches!(mutation.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_validate_accepts_zero_cart_quantity_and_positive_decrement() {
        let keep = Mutation::SetCartQuantity {
            line_id: CartLineId::generate(),
            quantity: 0,
        };
        let decrement = Mutation::DecrementStock {
            product_id: ProductId(7),
            quantity: 1,
        };

        assert!(keep.validate().is_ok());
        assert!(decrement.validate().is_ok());
    }
}
