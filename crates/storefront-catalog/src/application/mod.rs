//! Catalog application services.

pub mod query_handlers;
