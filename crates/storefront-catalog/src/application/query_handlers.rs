//! Query handlers for the catalog context.

use storefront_core::error::DomainError;
use storefront_core::filter::ProductFilter;
use storefront_core::model::Product;
use storefront_core::repository::Store;
use tracing::debug;

use crate::domain::category::Category;

/// Finds every product whose name contains any of `keywords`, ignoring case.
///
/// # Errors
///
/// Returns `DomainError::Persistence` if the products cannot be loaded.
pub async fn find_by_category<I, S>(
    keywords: I,
    store: &dyn Store,
) -> Result<Vec<Product>, DomainError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let filter = ProductFilter::name_contains_any(keywords);
    store.find_products(&filter).await
}

/// Lists the products of a predefined category.
///
/// # Errors
///
/// Returns `DomainError::Persistence` if the products cannot be loaded.
pub async fn list_category(
    category: Category,
    store: &dyn Store,
) -> Result<Vec<Product>, DomainError> {
    debug!(category = category.slug(), "listing category");
    find_by_category(category.keywords().iter().copied(), store).await
}

/// Free-text product search on names, ignoring case.
///
/// An absent or blank query yields no results and does not hit the store.
///
/// # Errors
///
/// Returns `DomainError::Persistence` if the products cannot be loaded.
pub async fn search(query: Option<&str>, store: &dyn Store) -> Result<Vec<Product>, DomainError> {
    match query.map(str::trim) {
        Some(query) if !query.is_empty() => find_by_category([query], store).await,
        _ => Ok(Vec::new()),
    }
}

/// Lists the products currently on flash sale.
///
/// # Errors
///
/// Returns `DomainError::Persistence` if the products cannot be loaded.
pub async fn flash_sale_products(store: &dyn Store) -> Result<Vec<Product>, DomainError> {
    store
        .find_products(&ProductFilter::all().with_flash_sale(true))
        .await
}
