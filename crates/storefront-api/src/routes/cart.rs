//! Routes for the cart bounded context.

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::{Json, Router, routing::get};
use serde::Deserialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use storefront_cart::application::command_handlers::{self, AddToCartKind, LineUpdate};
use storefront_cart::application::query_handlers::{self, CartView};
use storefront_cart::domain::commands;
use storefront_cart::domain::policy::QuantityDelta;
use storefront_core::model::{CartLineId, ProductId};

use crate::error::ApiError;
use crate::flash::{FlashRedirect, back_to_referer};
use crate::identity::Customer;
use crate::state::AppState;

/// Query string of the line-level cart actions.
#[derive(Debug, Deserialize)]
pub struct CartLineQuery {
    /// The cart line to act on.
    pub cart_id: Uuid,
}

/// GET /add-to-cart/{product_id}
///
/// Always answers with a redirect back to the referring page; failures are
/// reported through the flash notification.
#[instrument(skip(state, headers), fields(customer_id = %customer.0))]
async fn add_to_cart(
    State(state): State<AppState>,
    customer: Customer,
    Path(product_id): Path<i64>,
    headers: HeaderMap,
) -> FlashRedirect {
    let back = back_to_referer(&headers);
    let command = commands::AddToCart {
        correlation_id: Uuid::new_v4(),
        customer_id: customer.0,
        product_id: ProductId(product_id),
    };

    info!(correlation_id = %command.correlation_id, "handling add_to_cart command");

    match command_handlers::handle_add_to_cart(&command, state.clock.as_ref(), &*state.store)
        .await
    {
        Ok(outcome) => match outcome.kind {
            AddToCartKind::Added => {
                FlashRedirect::success(back, format!("{} added to cart", outcome.product_name))
            }
            AddToCartKind::Incremented => FlashRedirect::success(
                back,
                format!("Quantity of {} has been updated", outcome.product_name),
            ),
        },
        Err(e) => {
            warn!(correlation_id = %command.correlation_id, error = %e, "add to cart failed");
            FlashRedirect::error(back, add_failure_message(&state, &command).await)
        }
    }
}

/// Names the product in the failure notification when it can still be
/// loaded, and says whether an existing line or a new one was affected.
async fn add_failure_message(state: &AppState, command: &commands::AddToCart) -> String {
    let Ok(Some(product)) = state.store.find_product(command.product_id).await else {
        return "Item has not been added to cart".to_owned();
    };
    match state
        .store
        .find_cart_line_for(command.customer_id, command.product_id)
        .await
    {
        Ok(Some(_)) => format!("Quantity of {} not updated", product.name),
        _ => format!("{} has not been added to cart", product.name),
    }
}

/// GET /cart
#[instrument(skip(state), fields(customer_id = %customer.0))]
async fn view_cart(
    State(state): State<AppState>,
    customer: Customer,
) -> Result<Json<CartView>, ApiError> {
    let cart = query_handlers::get_cart(customer.0, &*state.store).await?;
    Ok(Json(cart))
}

async fn change_quantity(
    state: &AppState,
    customer: Customer,
    line_id: Uuid,
    delta: QuantityDelta,
) -> Result<Json<LineUpdate>, ApiError> {
    let command = commands::ChangeQuantity {
        correlation_id: Uuid::new_v4(),
        customer_id: customer.0,
        line_id: CartLineId(line_id),
        delta,
    };

    info!(correlation_id = %command.correlation_id, ?delta, "handling change_quantity command");

    let update = command_handlers::handle_change_quantity(
        &command,
        state.zero_quantity_policy,
        &*state.store,
    )
    .await?;
    Ok(Json(update))
}

/// GET /pluscart?cart_id=
#[instrument(skip(state), fields(customer_id = %customer.0, cart_id = %query.cart_id))]
async fn plus_cart(
    State(state): State<AppState>,
    customer: Customer,
    Query(query): Query<CartLineQuery>,
) -> Result<Json<LineUpdate>, ApiError> {
    change_quantity(&state, customer, query.cart_id, QuantityDelta::Increment).await
}

/// GET /minuscart?cart_id=
#[instrument(skip(state), fields(customer_id = %customer.0, cart_id = %query.cart_id))]
async fn minus_cart(
    State(state): State<AppState>,
    customer: Customer,
    Query(query): Query<CartLineQuery>,
) -> Result<Json<LineUpdate>, ApiError> {
    change_quantity(&state, customer, query.cart_id, QuantityDelta::Decrement).await
}

/// GET /removecart?cart_id=
#[instrument(skip(state), fields(customer_id = %customer.0, cart_id = %query.cart_id))]
async fn remove_cart(
    State(state): State<AppState>,
    customer: Customer,
    Query(query): Query<CartLineQuery>,
) -> Result<Json<LineUpdate>, ApiError> {
    let command = commands::RemoveLine {
        correlation_id: Uuid::new_v4(),
        customer_id: customer.0,
        line_id: CartLineId(query.cart_id),
    };

    info!(correlation_id = %command.correlation_id, "handling remove_line command");

    let update = command_handlers::handle_remove_line(&command, &*state.store).await?;
    Ok(Json(update))
}

/// Returns the router for the cart context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/add-to-cart/{product_id}", get(add_to_cart))
        .route("/cart", get(view_cart))
        .route("/pluscart", get(plus_cart))
        .route("/minuscart", get(minus_cart))
        .route("/removecart", get(remove_cart))
}
