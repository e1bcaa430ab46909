//! PostgreSQL-backed persistence for the storefront backend.

pub mod migrate;
pub mod pg_store;
