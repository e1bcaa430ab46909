//! Storefront — shopping cart bounded context.
//!
//! Responsible for the per-customer cart: adding products, adjusting line
//! quantities, removing lines, and pricing the cart with the fixed fee.

pub mod application;
pub mod domain;
