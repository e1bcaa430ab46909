//! Shared test fakes and fixtures for the storefront backend.

mod clock;
mod fixtures;
mod store;

pub use clock::FixedClock;
pub use fixtures::{cart_line, product};
pub use store::{FailingStore, InMemoryStore};
