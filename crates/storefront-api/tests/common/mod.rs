//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use http_body_util::BodyExt;
use storefront_core::clock::Clock;
use storefront_core::repository::Store;
use storefront_test_support::FixedClock;
use tower::ServiceExt;

use storefront_api::build_router;
use storefront_api::state::AppState;

/// Customer id sent by `get_as`.
pub const CUSTOMER: &str = "1";

/// Fixed timestamp used across all integration tests.
fn fixed_clock() -> Arc<dyn Clock + Send + Sync> {
    Arc::new(FixedClock::default())
}

/// Build the full app router over `store` with a fixed clock. Uses the same
/// router as `main.rs`.
pub fn build_test_app(store: Arc<dyn Store>) -> Router {
    build_test_app_with_state(AppState::new(store, fixed_clock()))
}

/// Build the full app router from a prepared state.
pub fn build_test_app_with_state(state: AppState) -> Router {
    build_router(state)
}

/// Send a GET request as `customer` (or anonymously) and return status,
/// headers and the JSON body (`Null` when the body is empty).
pub async fn get_as(
    app: Router,
    uri: &str,
    customer: Option<&str>,
) -> (StatusCode, HeaderMap, serde_json::Value) {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(customer) = customer {
        builder = builder.header("x-customer-id", customer);
    }
    let request = builder.body(Body::empty()).unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if body_bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };

    (status, headers, json)
}

/// Send a GET request as the default customer and return status and JSON.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let (status, _, json) = get_as(app, uri, Some(CUSTOMER)).await;
    (status, json)
}

/// Read a response header as a string.
pub fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}
