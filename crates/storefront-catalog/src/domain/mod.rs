//! Catalog domain.

pub mod category;
