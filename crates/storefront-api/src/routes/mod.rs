//! Route modules organized by bounded context.

pub mod cart;
pub mod catalog;
pub mod health;
pub mod orders;
