//! Storefront HTTP API.
//!
//! The binary in `main.rs` wires configuration, telemetry and the
//! PostgreSQL store together; everything else lives here so the router can
//! be driven in tests against any `Store`.

pub mod config;
pub mod error;
pub mod flash;
pub mod identity;
pub mod routes;
pub mod state;
pub mod telemetry;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Builds the application router with every route and middleware layer.
pub fn build_router(state: AppState) -> Router {
    // TODO: Replace CorsLayer::permissive() with the storefront's origins once they are configurable.
    Router::new()
        .merge(routes::health::router())
        .merge(routes::catalog::router())
        .merge(routes::cart::router())
        .merge(routes::orders::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
