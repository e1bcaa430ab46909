//! Test stores — in-memory `Store` implementations for tests.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Mutex;

use async_trait::async_trait;
use storefront_core::error::DomainError;
use storefront_core::filter::ProductFilter;
use storefront_core::model::{
    CartEntry, CartLine, CartLineId, CustomerId, Order, Product, ProductId,
};
use storefront_core::repository::{ChangeSet, Mutation, Store};

type FaultPredicate = Box<dyn Fn(&Mutation) -> bool + Send + Sync>;

#[derive(Debug, Clone, Default)]
struct Tables {
    products: BTreeMap<ProductId, Product>,
    cart_lines: BTreeMap<CartLineId, CartLine>,
    orders: Vec<Order>,
}

impl Tables {
    fn apply(&mut self, mutation: Mutation) -> Result<(), DomainError> {
        mutation.validate()?;
        match mutation {
            Mutation::InsertCartLine(line) => {
                let duplicate = self.cart_lines.contains_key(&line.id)
                    || self.cart_lines.values().any(|existing| {
                        existing.customer_id == line.customer_id
                            && existing.product_id == line.product_id
                    });
                if duplicate {
                    return Err(DomainError::Persistence(format!(
                        "duplicate cart line for customer {} and product {}",
                        line.customer_id, line.product_id
                    )));
                }
                self.cart_lines.insert(line.id, line);
            }
            Mutation::SetCartQuantity { line_id, quantity } => {
                let line = self
                    .cart_lines
                    .get_mut(&line_id)
                    .ok_or_else(|| DomainError::cart_line_not_found(line_id))?;
                line.quantity = quantity;
            }
            Mutation::DeleteCartLine(line_id) => {
                self.cart_lines
                    .remove(&line_id)
                    .ok_or_else(|| DomainError::cart_line_not_found(line_id))?;
            }
            Mutation::InsertOrder(order) => self.orders.push(order),
            Mutation::DecrementStock {
                product_id,
                quantity,
            } => {
                let product = self
                    .products
                    .get_mut(&product_id)
                    .ok_or_else(|| DomainError::product_not_found(product_id))?;
                if product.in_stock < quantity {
                    return Err(DomainError::InsufficientStock {
                        product_id,
                        requested: quantity,
                        available: product.in_stock,
                    });
                }
                product.in_stock -= quantity;
            }
        }
        Ok(())
    }
}

/// A store that keeps every table in memory and commits change sets
/// atomically: mutations are applied to a staged copy that replaces the live
/// tables only if every mutation succeeds.
///
/// A fault predicate can be installed with [`InMemoryStore::fail_when`] to
/// make `commit` fail on a chosen mutation.
pub struct InMemoryStore {
    tables: Mutex<Tables>,
    fault: Mutex<Option<FaultPredicate>>,
    commit_attempts: Mutex<usize>,
}

impl fmt::Debug for InMemoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryStore")
            .field("tables", &self.tables)
            .field("commit_attempts", &self.commit_attempts)
            .finish_non_exhaustive()
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(Tables::default()),
            fault: Mutex::new(None),
            commit_attempts: Mutex::new(0),
        }
    }

    /// Create a store seeded with `products`.
    #[must_use]
    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        let store = Self::new();
        for product in products {
            store.insert_product(product);
        }
        store
    }

    /// Seed or replace a product.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn insert_product(&self, product: Product) {
        self.tables
            .lock()
            .unwrap()
            .products
            .insert(product.id, product);
    }

    /// Seed a cart line without going through `commit`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn insert_cart_line(&self, line: CartLine) {
        self.tables
            .lock()
            .unwrap()
            .cart_lines
            .insert(line.id, line);
    }

    /// Make every later `commit` fail when it reaches a mutation accepted by
    /// `predicate`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn fail_when(&self, predicate: impl Fn(&Mutation) -> bool + Send + Sync + 'static) {
        *self.fault.lock().unwrap() = Some(Box::new(predicate));
    }

    /// Snapshot of a product.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn product(&self, id: ProductId) -> Option<Product> {
        self.tables.lock().unwrap().products.get(&id).cloned()
    }

    /// Snapshot of every cart line.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn cart_lines(&self) -> Vec<CartLine> {
        self.tables
            .lock()
            .unwrap()
            .cart_lines
            .values()
            .cloned()
            .collect()
    }

    /// Snapshot of every order, in insertion order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn orders(&self) -> Vec<Order> {
        self.tables.lock().unwrap().orders.clone()
    }

    /// Number of `commit` calls, successful or not.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn commit_attempts(&self) -> usize {
        *self.commit_attempts.lock().unwrap()
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn find_product(&self, id: ProductId) -> Result<Option<Product>, DomainError> {
        Ok(self.product(id))
    }

    async fn find_products(&self, filter: &ProductFilter) -> Result<Vec<Product>, DomainError> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .products
            .values()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect())
    }

    async fn find_cart_line(&self, id: CartLineId) -> Result<Option<CartLine>, DomainError> {
        Ok(self.tables.lock().unwrap().cart_lines.get(&id).cloned())
    }

    async fn find_cart_line_for(
        &self,
        customer_id: CustomerId,
        product_id: ProductId,
    ) -> Result<Option<CartLine>, DomainError> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .cart_lines
            .values()
            .find(|l| l.customer_id == customer_id && l.product_id == product_id)
            .cloned())
    }

    async fn find_cart_entries(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<CartEntry>, DomainError> {
        let tables = self.tables.lock().unwrap();
        let mut lines: Vec<&CartLine> = tables
            .cart_lines
            .values()
            .filter(|l| l.customer_id == customer_id)
            .collect();
        lines.sort_by_key(|l| (l.added_at, l.id));
        lines
            .into_iter()
            .map(|line| {
                let product = tables.products.get(&line.product_id).cloned().ok_or_else(|| {
                    DomainError::Persistence(format!(
                        "cart line {} references missing product {}",
                        line.id, line.product_id
                    ))
                })?;
                Ok(CartEntry {
                    line: line.clone(),
                    product,
                })
            })
            .collect()
    }

    async fn find_orders(&self, customer_id: CustomerId) -> Result<Vec<Order>, DomainError> {
        let mut orders: Vec<Order> = self
            .tables
            .lock()
            .unwrap()
            .orders
            .iter()
            .filter(|o| o.customer_id == customer_id)
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.placed_at.cmp(&a.placed_at).then(b.id.cmp(&a.id)));
        Ok(orders)
    }

    async fn commit(&self, changes: ChangeSet) -> Result<(), DomainError> {
        *self.commit_attempts.lock().unwrap() += 1;

        let fault = self.fault.lock().unwrap();
        let mut tables = self.tables.lock().unwrap();
        let mut staged = tables.clone();
        for mutation in changes {
            if fault.as_ref().is_some_and(|fails| fails(&mutation)) {
                return Err(DomainError::Persistence(format!(
                    "injected failure on {mutation:?}"
                )));
            }
            staged.apply(mutation)?;
        }
        *tables = staged;
        Ok(())
    }
}

/// A store that fails every call with a persistence error. Useful for
/// testing error-handling paths.
#[derive(Debug)]
pub struct FailingStore;

fn connection_refused() -> DomainError {
    DomainError::Persistence("connection refused".into())
}

#[async_trait]
impl Store for FailingStore {
    async fn find_product(&self, _id: ProductId) -> Result<Option<Product>, DomainError> {
        Err(connection_refused())
    }

    async fn find_products(&self, _filter: &ProductFilter) -> Result<Vec<Product>, DomainError> {
        Err(connection_refused())
    }

    async fn find_cart_line(&self, _id: CartLineId) -> Result<Option<CartLine>, DomainError> {
        Err(connection_refused())
    }

    async fn find_cart_line_for(
        &self,
        _customer_id: CustomerId,
        _product_id: ProductId,
    ) -> Result<Option<CartLine>, DomainError> {
        Err(connection_refused())
    }

    async fn find_cart_entries(
        &self,
        _customer_id: CustomerId,
    ) -> Result<Vec<CartEntry>, DomainError> {
        Err(connection_refused())
    }

    async fn find_orders(&self, _customer_id: CustomerId) -> Result<Vec<Order>, DomainError> {
        Err(connection_refused())
    }

    async fn commit(&self, _changes: ChangeSet) -> Result<(), DomainError> {
        Err(connection_refused())
    }
}
