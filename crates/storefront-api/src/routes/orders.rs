//! Routes for the order bounded context.

use axum::extract::State;
use axum::{Json, Router, routing::get};
use serde::Serialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use storefront_core::error::DomainError;
use storefront_orders::application::command_handlers;
use storefront_orders::application::query_handlers::{self, OrderView};
use storefront_orders::domain::commands;

use crate::error::ApiError;
use crate::flash::FlashRedirect;
use crate::identity::Customer;
use crate::state::AppState;

/// Response body of GET /orders.
#[derive(Debug, Serialize)]
pub struct OrdersResponse {
    /// The customer's orders, newest first.
    pub orders: Vec<OrderView>,
}

/// GET /place-order
///
/// Redirects to `/orders` once the cart has been converted, or back home
/// with an error notification.
#[instrument(skip(state), fields(customer_id = %customer.0))]
async fn place_order(State(state): State<AppState>, customer: Customer) -> FlashRedirect {
    let command = commands::PlaceOrder {
        correlation_id: Uuid::new_v4(),
        customer_id: customer.0,
    };

    info!(correlation_id = %command.correlation_id, "handling place_order command");

    match command_handlers::handle_place_order(&command, state.clock.as_ref(), &*state.store).await
    {
        Ok(_) => FlashRedirect::success("/orders", "Order Placed Successfully"),
        Err(DomainError::EmptyCart) => FlashRedirect::error("/", "Your cart is Empty"),
        Err(e) => {
            warn!(correlation_id = %command.correlation_id, error = %e, "order placement failed");
            FlashRedirect::error("/", "Order not placed. An error occurred")
        }
    }
}

/// GET /orders
#[instrument(skip(state), fields(customer_id = %customer.0))]
async fn list_orders(
    State(state): State<AppState>,
    customer: Customer,
) -> Result<Json<OrdersResponse>, ApiError> {
    let orders = query_handlers::list_orders(customer.0, &*state.store).await?;
    Ok(Json(OrdersResponse { orders }))
}

/// Returns the router for the order context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/place-order", get(place_order))
        .route("/orders", get(list_orders))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::header::LOCATION;
    use axum::http::{Request, StatusCode};
    use rust_decimal_macros::dec;
    use serde_json::Value;
    use storefront_core::clock::Clock;
    use storefront_core::model::{ProductId, PLACEHOLDER_PAYMENT_ID};
    use storefront_core::repository::{Mutation, Store};
    use storefront_test_support::{FixedClock, InMemoryStore, cart_line, product};
    use tower::ServiceExt;

    use crate::flash::{FLASH_CATEGORY_HEADER, FLASH_MESSAGE_HEADER};

    fn app_state_with(store: Arc<dyn Store>) -> AppState {
        let clock: Arc<dyn Clock + Send + Sync> = Arc::new(FixedClock::default());
        AppState::new(store, clock)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(uri)
            .header("x-customer-id", "1")
            .body(Body::empty())
            .unwrap()
    }

    fn stocked_store() -> Arc<InMemoryStore> {
        let store = InMemoryStore::with_products([
            product(7, "Phone X", dec!(100), 5),
            product(8, "Gaming Mouse", dec!(40), 1),
        ]);
        let now = FixedClock::default().now();
        store.insert_cart_line(cart_line(1, 7, 2, now));
        store.insert_cart_line(cart_line(1, 8, 1, now));
        Arc::new(store)
    }

    #[tokio::test]
    async fn test_place_order_redirects_to_orders_on_success() {
        // Arrange
        let store = stocked_store();
        let app = router().with_state(app_state_with(store.clone()));

        // Act
        let response = app.oneshot(get("/place-order")).await.unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[LOCATION], "/orders");
        assert_eq!(
            response.headers()[FLASH_MESSAGE_HEADER],
            "Order Placed Successfully"
        );
        assert_eq!(store.orders().len(), 2);
        assert!(store.cart_lines().is_empty());
        assert_eq!(store.product(ProductId(7)).unwrap().in_stock, 3);
        assert_eq!(store.product(ProductId(8)).unwrap().in_stock, 0);
    }

    #[tokio::test]
    async fn test_place_order_with_empty_cart_redirects_home() {
        let store = Arc::new(InMemoryStore::new());
        let app = router().with_state(app_state_with(store.clone()));

        let response = app.oneshot(get("/place-order")).await.unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[LOCATION], "/");
        assert_eq!(response.headers()[FLASH_MESSAGE_HEADER], "Your cart is Empty");
        assert_eq!(store.commit_attempts(), 0);
    }

    #[tokio::test]
    async fn test_place_order_failure_leaves_everything_unchanged() {
        // Arrange
        let store = stocked_store();
        store.fail_when(|m| matches!(m, Mutation::DeleteCartLine(_)));
        let app = router().with_state(app_state_with(store.clone()));

        // Act
        let response = app.oneshot(get("/place-order")).await.unwrap();

        // Assert
        assert_eq!(response.headers()[LOCATION], "/");
        assert_eq!(response.headers()[FLASH_CATEGORY_HEADER], "error");
        assert_eq!(
            response.headers()[FLASH_MESSAGE_HEADER],
            "Order not placed. An error occurred"
        );
        assert!(store.orders().is_empty());
        assert_eq!(store.cart_lines().len(), 2);
        assert_eq!(store.product(ProductId(7)).unwrap().in_stock, 5);
    }

    #[tokio::test]
    async fn test_list_orders_returns_placed_orders() {
        // Arrange
        let store = stocked_store();
        let app = router().with_state(app_state_with(store));
        app.clone().oneshot(get("/place-order")).await.unwrap();

        // Act
        let response = app.oneshot(get("/orders")).await.unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::OK);
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body_bytes).unwrap();
        let orders = json["orders"].as_array().unwrap();
        assert_eq!(orders.len(), 2);
        for order in orders {
            assert_eq!(order["status"], "Pending");
            assert_eq!(order["payment_id"], PLACEHOLDER_PAYMENT_ID);
        }
    }

    #[tokio::test]
    async fn test_list_orders_without_identity_returns_401() {
        let app = router().with_state(app_state_with(stocked_store()));
        let request = Request::builder()
            .method("GET")
            .uri("/orders")
            .header("x-customer-id", "not-a-number")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
