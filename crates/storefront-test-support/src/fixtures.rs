//! Entity builders for tests.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use storefront_core::model::{CartLine, CartLineId, CustomerId, Product, ProductId};

/// A product that is not on flash sale.
#[must_use]
pub fn product(id: i64, name: &str, price: Decimal, in_stock: i32) -> Product {
    Product {
        id: ProductId(id),
        name: name.to_owned(),
        current_price: price,
        in_stock,
        flash_sale: false,
    }
}

/// A cart line with a freshly generated id.
#[must_use]
pub fn cart_line(
    customer_id: i64,
    product_id: i64,
    quantity: i32,
    added_at: DateTime<Utc>,
) -> CartLine {
    CartLine {
        id: CartLineId::generate(),
        customer_id: CustomerId(customer_id),
        product_id: ProductId(product_id),
        quantity,
        added_at,
    }
}
