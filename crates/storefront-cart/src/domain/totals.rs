//! Cart pricing.

use rust_decimal::Decimal;
use serde::Serialize;
use storefront_core::model::{CartEntry, Money};

/// Flat fee added to every cart total.
pub const FIXED_FEE: Money = Decimal::TEN;

/// Subtotal and total of a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CartTotals {
    /// Sum of price times quantity over all lines.
    pub subtotal: Money,
    /// Subtotal plus the fixed fee.
    pub total: Money,
}

impl CartTotals {
    /// Prices a cart from its entries. An empty cart costs only the fee.
    #[must_use]
    pub fn from_entries(entries: &[CartEntry]) -> Self {
        let subtotal: Money = entries.iter().map(CartEntry::amount).sum();
        Self {
            subtotal,
            total: subtotal + FIXED_FEE,
        }
    }
}
