//! Product selection predicate.
//!
//! Callers build a `ProductFilter` and hand it to
//! [`Store::find_products`](crate::repository::Store::find_products); stores
//! only evaluate it. [`ProductFilter::matches`] is the reference semantics
//! every store implementation must agree with.

use crate::model::Product;

/// Criteria for selecting products.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    name_contains_any: Option<Vec<String>>,
    flash_sale: Option<bool>,
}

impl ProductFilter {
    /// A filter that selects every product.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Selects products whose name contains any of `keywords`, ignoring case.
    ///
    /// Blank keywords are dropped. A filter left without keywords matches no
    /// product.
    #[must_use]
    pub fn name_contains_any<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        Self {
            name_contains_any: Some(keywords),
            flash_sale: None,
        }
    }

    /// Further restricts the filter on the flash-sale flag.
    #[must_use]
    pub fn with_flash_sale(mut self, flash_sale: bool) -> Self {
        self.flash_sale = Some(flash_sale);
        self
    }

    /// Lower-cased name keywords, or `None` when names are unconstrained.
    #[must_use]
    pub fn keywords(&self) -> Option<&[String]> {
        self.name_contains_any.as_deref()
    }

    /// Required flash-sale flag, if any.
    #[must_use]
    pub fn flash_sale(&self) -> Option<bool> {
        self.flash_sale
    }

    /// Returns `true` if `product` satisfies the filter.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        if self.flash_sale.is_some_and(|flag| product.flash_sale != flag) {
            return false;
        }
        match &self.name_contains_any {
            None => true,
            Some(keywords) => {
                let name = product.name.to_lowercase();
                keywords.iter().any(|k| name.contains(k.as_str()))
            }
        }
    }
}
