//! Storefront Core — shared domain abstractions.
//!
//! This crate defines the entities, the error taxonomy and the persistence
//! contract that the cart, order and catalog contexts depend on. It contains
//! no infrastructure code.

pub mod clock;
pub mod error;
pub mod filter;
pub mod model;
pub mod repository;
