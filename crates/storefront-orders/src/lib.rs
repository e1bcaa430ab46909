//! Storefront — order placement bounded context.
//!
//! Turns a customer's cart into orders, taking the ordered units out of
//! stock, and lists the orders a customer has placed.

pub mod application;
pub mod domain;
