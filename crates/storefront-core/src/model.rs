//! Storefront entities and identifiers.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Monetary amount in the shop currency.
pub type Money = Decimal;

/// Identifier of a product in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub i64);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a customer, issued by the external authenticator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(pub i64);

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a cart line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartLineId(pub Uuid);

impl CartLineId {
    /// Generates a fresh, time-ordered cart line id.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::now_v7())
    }
}

impl fmt::Display for CartLineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub Uuid);

impl OrderId {
    /// Generates a fresh, time-ordered order id.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::now_v7())
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A product as offered in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Product identifier.
    pub id: ProductId,
    /// Display name, also the target of category and search matching.
    pub name: String,
    /// Current unit price.
    pub current_price: Money,
    /// Units available for ordering.
    pub in_stock: i32,
    /// Whether the product is featured on the home page.
    pub flash_sale: bool,
}

/// One product line in a customer's cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Line identifier.
    pub id: CartLineId,
    /// Owning customer.
    pub customer_id: CustomerId,
    /// Referenced product.
    pub product_id: ProductId,
    /// Number of units.
    pub quantity: i32,
    /// When the line was first created.
    pub added_at: DateTime<Utc>,
}

impl CartLine {
    /// Creates a new line holding a single unit of `product_id`.
    #[must_use]
    pub fn first_unit(
        customer_id: CustomerId,
        product_id: ProductId,
        added_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: CartLineId::generate(),
            customer_id,
            product_id,
            quantity: 1,
            added_at,
        }
    }
}

/// A cart line joined with the product it references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartEntry {
    /// The cart line.
    pub line: CartLine,
    /// The referenced product, as currently stored.
    pub product: Product,
}

impl CartEntry {
    /// Current price multiplied by the line quantity.
    #[must_use]
    pub fn amount(&self) -> Money {
        self.product.current_price * Decimal::from(self.line.quantity)
    }
}

/// Lifecycle state of an order.
///
/// Orders are always created `Pending`; the later states are set by the
/// fulfilment side and only read here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Placed, awaiting fulfilment.
    Pending,
    /// Accepted by the shop.
    Accepted,
    /// Handed over to delivery.
    #[serde(rename = "Out for delivery")]
    OutForDelivery,
    /// Delivered to the customer.
    Delivered,
    /// Cancelled.
    Canceled,
}

impl OrderStatus {
    /// Stored and displayed name of the status.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Accepted => "Accepted",
            Self::OutForDelivery => "Out for delivery",
            Self::Delivered => "Delivered",
            Self::Canceled => "Canceled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown order status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown order status: {0}")]
pub struct UnknownOrderStatus(pub String);

impl FromStr for OrderStatus {
    type Err = UnknownOrderStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Accepted" => Ok(Self::Accepted),
            "Out for delivery" => Ok(Self::OutForDelivery),
            "Delivered" => Ok(Self::Delivered),
            "Canceled" => Ok(Self::Canceled),
            other => Err(UnknownOrderStatus(other.to_owned())),
        }
    }
}

/// Payment id stored on orders until a payment provider is integrated.
pub const PLACEHOLDER_PAYMENT_ID: &str = "Placeholder";

/// An order for one product, snapshotting price and quantity at placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Order identifier.
    pub id: OrderId,
    /// Ordering customer.
    pub customer_id: CustomerId,
    /// Ordered product.
    pub product_id: ProductId,
    /// Ordered units.
    pub quantity: i32,
    /// Unit price at the moment of placement.
    pub price: Money,
    /// Fulfilment state.
    pub status: OrderStatus,
    /// Payment reference.
    pub payment_id: String,
    /// When the order was placed.
    pub placed_at: DateTime<Utc>,
}
