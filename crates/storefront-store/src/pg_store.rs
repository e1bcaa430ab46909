//! `PostgreSQL` implementation of the `Store` trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgConnection, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use storefront_core::error::DomainError;
use storefront_core::filter::ProductFilter;
use storefront_core::model::{
    CartEntry, CartLine, CartLineId, CustomerId, Order, OrderId, OrderStatus, Product, ProductId,
};
use storefront_core::repository::{ChangeSet, Mutation, Store};

const PRODUCT_COLUMNS: &str = "id, name, current_price, in_stock, flash_sale";
const CART_LINE_COLUMNS: &str = "id, customer_id, product_id, quantity, added_at";
const ORDER_COLUMNS: &str =
    "id, customer_id, product_id, quantity, price, status, payment_id, placed_at";

#[allow(clippy::needless_pass_by_value)]
fn db_error(err: sqlx::Error) -> DomainError {
    DomainError::Persistence(err.to_string())
}

/// Escapes `LIKE` wildcards so a keyword only matches literally.
fn escape_like(keyword: &str) -> String {
    let mut escaped = String::with_capacity(keyword.len());
    for c in keyword.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[derive(Debug, FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    current_price: Decimal,
    in_stock: i32,
    flash_sale: bool,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId(row.id),
            name: row.name,
            current_price: row.current_price,
            in_stock: row.in_stock,
            flash_sale: row.flash_sale,
        }
    }
}

#[derive(Debug, FromRow)]
struct CartLineRow {
    id: Uuid,
    customer_id: i64,
    product_id: i64,
    quantity: i32,
    added_at: DateTime<Utc>,
}

impl From<CartLineRow> for CartLine {
    fn from(row: CartLineRow) -> Self {
        Self {
            id: CartLineId(row.id),
            customer_id: CustomerId(row.customer_id),
            product_id: ProductId(row.product_id),
            quantity: row.quantity,
            added_at: row.added_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct CartEntryRow {
    #[sqlx(flatten)]
    line: CartLineRow,
    name: String,
    current_price: Decimal,
    in_stock: i32,
    flash_sale: bool,
}

impl From<CartEntryRow> for CartEntry {
    fn from(row: CartEntryRow) -> Self {
        let product = Product {
            id: ProductId(row.line.product_id),
            name: row.name,
            current_price: row.current_price,
            in_stock: row.in_stock,
            flash_sale: row.flash_sale,
        };
        Self {
            line: row.line.into(),
            product,
        }
    }
}

#[derive(Debug, FromRow)]
struct OrderRow {
    id: Uuid,
    customer_id: i64,
    product_id: i64,
    quantity: i32,
    price: Decimal,
    status: String,
    payment_id: String,
    placed_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = DomainError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let status: OrderStatus = row
            .status
            .parse()
            .map_err(|e| DomainError::Persistence(format!("order {}: {e}", row.id)))?;
        Ok(Self {
            id: OrderId(row.id),
            customer_id: CustomerId(row.customer_id),
            product_id: ProductId(row.product_id),
            quantity: row.quantity,
            price: row.price,
            status,
            payment_id: row.payment_id,
            placed_at: row.placed_at,
        })
    }
}

/// PostgreSQL-backed store.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Creates a new `PgStore`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn apply(conn: &mut PgConnection, mutation: Mutation) -> Result<(), DomainError> {
        mutation.validate()?;
        match mutation {
            Mutation::InsertCartLine(line) => {
                sqlx::query(
                    "INSERT INTO cart_lines (id, customer_id, product_id, quantity, added_at) \
                     VALUES ($1, $2, $3, $4, $5)",
                )
                .bind(line.id.0)
                .bind(line.customer_id.0)
                .bind(line.product_id.0)
                .bind(line.quantity)
                .bind(line.added_at)
                .execute(&mut *conn)
                .await
                .map_err(db_error)?;
            }
            Mutation::SetCartQuantity { line_id, quantity } => {
                let result = sqlx::query("UPDATE cart_lines SET quantity = $2 WHERE id = $1")
                    .bind(line_id.0)
                    .bind(quantity)
                    .execute(&mut *conn)
                    .await
                    .map_err(db_error)?;
                if result.rows_affected() == 0 {
                    return Err(DomainError::cart_line_not_found(line_id));
                }
            }
            Mutation::DeleteCartLine(line_id) => {
                let result = sqlx::query("DELETE FROM cart_lines WHERE id = $1")
                    .bind(line_id.0)
                    .execute(&mut *conn)
                    .await
                    .map_err(db_error)?;
                if result.rows_affected() == 0 {
                    return Err(DomainError::cart_line_not_found(line_id));
                }
            }
            Mutation::InsertOrder(order) => {
                sqlx::query(
                    "INSERT INTO orders \
                     (id, customer_id, product_id, quantity, price, status, payment_id, placed_at) \
                     VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
                )
                .bind(order.id.0)
                .bind(order.customer_id.0)
                .bind(order.product_id.0)
                .bind(order.quantity)
                .bind(order.price)
                .bind(order.status.as_str())
                .bind(&order.payment_id)
                .bind(order.placed_at)
                .execute(&mut *conn)
                .await
                .map_err(db_error)?;
            }
            Mutation::DecrementStock {
                product_id,
                quantity,
            } => {
                let result = sqlx::query(
                    "UPDATE products SET in_stock = in_stock - $2 \
                     WHERE id = $1 AND in_stock >= $2",
                )
                .bind(product_id.0)
                .bind(quantity)
                .execute(&mut *conn)
                .await
                .map_err(db_error)?;
                if result.rows_affected() == 0 {
                    let available: Option<i32> =
                        sqlx::query_scalar("SELECT in_stock FROM products WHERE id = $1")
                            .bind(product_id.0)
                            .fetch_optional(&mut *conn)
                            .await
                            .map_err(db_error)?;
                    return Err(match available {
                        None => DomainError::product_not_found(product_id),
                        Some(available) => DomainError::InsufficientStock {
                            product_id,
                            requested: quantity,
                            available,
                        },
                    });
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl Store for PgStore {
    async fn find_product(&self, id: ProductId) -> Result<Option<Product>, DomainError> {
        let row: Option<ProductRow> =
            sqlx::query_as(&format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"))
                .bind(id.0)
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error)?;
        Ok(row.map(Product::from))
    }

    async fn find_products(&self, filter: &ProductFilter) -> Result<Vec<Product>, DomainError> {
        let mut query: QueryBuilder<'_, Postgres> =
            QueryBuilder::new(format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE TRUE"));

        if let Some(flash_sale) = filter.flash_sale() {
            query.push(" AND flash_sale = ").push_bind(flash_sale);
        }

        match filter.keywords() {
            None => {}
            Some([]) => {
                query.push(" AND FALSE");
            }
            Some(keywords) => {
                let patterns: Vec<String> = keywords
                    .iter()
                    .map(|k| format!("%{}%", escape_like(k)))
                    .collect();
                query
                    .push(" AND name ILIKE ANY(")
                    .push_bind(patterns)
                    .push(")");
            }
        }

        query.push(" ORDER BY id");

        let rows: Vec<ProductRow> = query
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn find_cart_line(&self, id: CartLineId) -> Result<Option<CartLine>, DomainError> {
        let row: Option<CartLineRow> = sqlx::query_as(&format!(
            "SELECT {CART_LINE_COLUMNS} FROM cart_lines WHERE id = $1"
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(row.map(CartLine::from))
    }

    async fn find_cart_line_for(
        &self,
        customer_id: CustomerId,
        product_id: ProductId,
    ) -> Result<Option<CartLine>, DomainError> {
        let row: Option<CartLineRow> = sqlx::query_as(&format!(
            "SELECT {CART_LINE_COLUMNS} FROM cart_lines WHERE customer_id = $1 AND product_id = $2"
        ))
        .bind(customer_id.0)
        .bind(product_id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(row.map(CartLine::from))
    }

    async fn find_cart_entries(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<CartEntry>, DomainError> {
        let rows: Vec<CartEntryRow> = sqlx::query_as(
            "SELECT c.id, c.customer_id, c.product_id, c.quantity, c.added_at, \
                    p.name, p.current_price, p.in_stock, p.flash_sale \
             FROM cart_lines c \
             JOIN products p ON p.id = c.product_id \
             WHERE c.customer_id = $1 \
             ORDER BY c.added_at, c.id",
        )
        .bind(customer_id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(rows.into_iter().map(CartEntry::from).collect())
    }

    async fn find_orders(&self, customer_id: CustomerId) -> Result<Vec<Order>, DomainError> {
        let rows: Vec<OrderRow> = sqlx::query_as(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE customer_id = $1 \
             ORDER BY placed_at DESC, id DESC"
        ))
        .bind(customer_id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;
        rows.into_iter().map(Order::try_from).collect()
    }

    async fn commit(&self, changes: ChangeSet) -> Result<(), DomainError> {
        let mutations = changes.len();
        let mut tx = self.pool.begin().await.map_err(db_error)?;
        for mutation in changes {
            // Dropping `tx` on the error path rolls the transaction back.
            Self::apply(&mut tx, mutation).await?;
        }
        tx.commit().await.map_err(db_error)?;
        tracing::debug!(mutations, "change set committed");
        Ok(())
    }
}
