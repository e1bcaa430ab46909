//! Domain error types.

use thiserror::Error;

use crate::model::{CartLineId, ProductId};

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A product or cart line does not exist (or is not visible to the caller).
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of entity that was looked up.
        entity: &'static str,
        /// The identifier that was looked up.
        id: String,
    },

    /// The persistence layer failed to read or commit.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Order placement was requested for an empty cart.
    #[error("cart is empty")]
    EmptyCart,

    /// A protected action was attempted without a customer identity.
    #[error("authentication required")]
    Unauthenticated,

    /// A cart line asks for more units than the product has in stock.
    #[error(
        "insufficient stock for product {product_id}: requested {requested}, available {available}"
    )]
    InsufficientStock {
        /// The product that ran short.
        product_id: ProductId,
        /// Units requested by the cart line.
        requested: i32,
        /// Units in stock at the time of the check.
        available: i32,
    },

    /// Input rejected by domain rules.
    #[error("validation error: {0}")]
    Validation(String),
}

impl DomainError {
    /// Shorthand for a missing product.
    #[must_use]
    pub fn product_not_found(id: ProductId) -> Self {
        Self::NotFound {
            entity: "product",
            id: id.to_string(),
        }
    }

    /// Shorthand for a missing cart line.
    #[must_use]
    pub fn cart_line_not_found(id: CartLineId) -> Self {
        Self::NotFound {
            entity: "cart line",
            id: id.to_string(),
        }
    }
}
