//! Shared application state.

use std::fmt;
use std::sync::Arc;

use axum::http::HeaderName;
use storefront_cart::domain::policy::ZeroQuantityPolicy;
use storefront_core::clock::Clock;
use storefront_core::repository::Store;

/// Header carrying the authenticated customer id when none is configured.
pub const DEFAULT_IDENTITY_HEADER: &str = "x-customer-id";

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Persistence for products, carts and orders.
    pub store: Arc<dyn Store>,
    /// Time source for cart and order timestamps.
    pub clock: Arc<dyn Clock + Send + Sync>,
    /// Trusted header set by the upstream authenticator.
    pub identity_header: HeaderName,
    /// What a decrement below one unit does.
    pub zero_quantity_policy: ZeroQuantityPolicy,
}

impl AppState {
    /// Create new application state with the default identity header and
    /// zero-quantity policy.
    #[must_use]
    pub fn new(store: Arc<dyn Store>, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        Self {
            store,
            clock,
            identity_header: HeaderName::from_static(DEFAULT_IDENTITY_HEADER),
            zero_quantity_policy: ZeroQuantityPolicy::default(),
        }
    }

    /// Replace the identity header.
    #[must_use]
    pub fn with_identity_header(mut self, header: HeaderName) -> Self {
        self.identity_header = header;
        self
    }

    /// Replace the zero-quantity policy.
    #[must_use]
    pub fn with_zero_quantity_policy(mut self, policy: ZeroQuantityPolicy) -> Self {
        self.zero_quantity_policy = policy;
        self
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("identity_header", &self.identity_header)
            .field("zero_quantity_policy", &self.zero_quantity_policy)
            .finish_non_exhaustive()
    }
}
