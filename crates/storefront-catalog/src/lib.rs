//! Storefront — catalog browsing and search bounded context.
//!
//! Read-only product listings: category pages, free-text search and the
//! flash-sale selection shown on the home page.

pub mod application;
pub mod domain;
