//! Routes for the catalog bounded context: home page, search and the
//! category pages.

use axum::extract::{Form, Query, State};
use axum::{Json, Router, routing::get};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use storefront_cart::application::query_handlers::{self as cart_queries, CartView};
use storefront_catalog::application::query_handlers;
use storefront_catalog::domain::category::Category;
use storefront_core::model::Product;

use crate::error::ApiError;
use crate::identity::MaybeCustomer;
use crate::state::AppState;

/// Query string of GET /search, and form body of POST /search.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    /// Free-text query matched against product names.
    pub search: Option<String>,
}

/// Response body of GET /.
#[derive(Debug, Serialize)]
pub struct HomeResponse {
    /// Products on flash sale.
    pub flash_sale: Vec<Product>,
    /// The caller's cart, when the request is identified.
    pub cart: Option<CartView>,
}

/// Response body of the category pages.
#[derive(Debug, Serialize)]
pub struct ProductsResponse {
    /// Matching products, by id.
    pub products: Vec<Product>,
    /// The caller's cart, when the request is identified.
    pub cart: Option<CartView>,
}

/// Response body of the search endpoints.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    /// The query as received.
    pub query: Option<String>,
    /// Matching products, by id.
    pub products: Vec<Product>,
    /// The caller's cart, when the request is identified.
    pub cart: Option<CartView>,
}

async fn cart_for(
    state: &AppState,
    customer: MaybeCustomer,
) -> Result<Option<CartView>, ApiError> {
    match customer.0 {
        Some(customer_id) => Ok(Some(
            cart_queries::get_cart(customer_id, &*state.store).await?,
        )),
        None => Ok(None),
    }
}

/// GET /
#[instrument(skip(state))]
async fn home(
    State(state): State<AppState>,
    customer: MaybeCustomer,
) -> Result<Json<HomeResponse>, ApiError> {
    let flash_sale = query_handlers::flash_sale_products(&*state.store).await?;
    let cart = cart_for(&state, customer).await?;
    Ok(Json(HomeResponse { flash_sale, cart }))
}

async fn run_search(
    state: &AppState,
    customer: MaybeCustomer,
    query: Option<String>,
) -> Result<Json<SearchResponse>, ApiError> {
    let products = query_handlers::search(query.as_deref(), &*state.store).await?;
    let cart = cart_for(state, customer).await?;
    Ok(Json(SearchResponse {
        query,
        products,
        cart,
    }))
}

/// GET /search?search=
#[instrument(skip(state))]
async fn search_get(
    State(state): State<AppState>,
    customer: MaybeCustomer,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    run_search(&state, customer, params.search).await
}

/// POST /search
#[instrument(skip(state))]
async fn search_post(
    State(state): State<AppState>,
    customer: MaybeCustomer,
    Form(params): Form<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    run_search(&state, customer, params.search).await
}

#[instrument(skip(state, category), fields(category = category.slug()))]
async fn category_page(
    state: AppState,
    customer: MaybeCustomer,
    category: Category,
) -> Result<Json<ProductsResponse>, ApiError> {
    let products = query_handlers::list_category(category, &*state.store).await?;
    let cart = cart_for(&state, customer).await?;
    Ok(Json(ProductsResponse { products, cart }))
}

/// Returns the router for the catalog context. Every category is served at
/// `/{slug}`.
pub fn router() -> Router<AppState> {
    let mut router = Router::new()
        .route("/", get(home))
        .route("/search", get(search_get).post(search_post));

    for category in Category::ALL {
        router = router.route(
            &format!("/{}", category.slug()),
            get(move |State(state): State<AppState>, customer: MaybeCustomer| {
                category_page(state, customer, category)
            }),
        );
    }

    router
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use rust_decimal_macros::dec;
    use serde_json::Value;
    use storefront_core::clock::Clock;
    use storefront_core::repository::Store;
    use storefront_test_support::{FailingStore, FixedClock, InMemoryStore, cart_line, product};
    use tower::ServiceExt;

    fn app_state_with(store: Arc<dyn Store>) -> AppState {
        let clock: Arc<dyn Clock + Send + Sync> = Arc::new(FixedClock::default());
        AppState::new(store, clock)
    }

    fn catalog_store() -> Arc<InMemoryStore> {
        Arc::new(InMemoryStore::with_products([
            product(1, "iPhone 15", dec!(999), 3),
            Product {
                flash_sale: true,
                ..product(2, "Noise Cancelling Headphones", dec!(199), 10)
            },
            product(3, "Android Tablet", dec!(299), 4),
            product(4, "4K TV", dec!(799), 2),
        ]))
    }

    async fn get_json(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body_bytes).unwrap())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    fn ids(json: &Value) -> Vec<i64> {
        json["products"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["id"].as_i64().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_phones_tablets_page_matches_names_ignoring_case() {
        // Arrange
        let app = router().with_state(app_state_with(catalog_store()));

        // Act
        let (status, json) = get_json(app, get("/phones_tablets")).await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ids(&json), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_every_category_page_is_routed() {
        let app = router().with_state(app_state_with(catalog_store()));

        for category in Category::ALL {
            let (status, json) =
                get_json(app.clone(), get(&format!("/{}", category.slug()))).await;
            assert_eq!(status, StatusCode::OK, "{}", category.slug());
            assert!(json["products"].is_array());
        }
    }

    #[tokio::test]
    async fn test_search_get_matches_query() {
        let app = router().with_state(app_state_with(catalog_store()));

        let (status, json) = get_json(app, get("/search?search=tablet")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["query"], "tablet");
        assert_eq!(ids(&json), vec![3]);
    }

    #[tokio::test]
    async fn test_search_without_query_returns_nothing() {
        let app = router().with_state(app_state_with(Arc::new(FailingStore)));

        let (status, json) = get_json(app, get("/search")).await;

        assert_eq!(status, StatusCode::OK);
        assert!(json["query"].is_null());
        assert!(ids(&json).is_empty());
    }

    #[tokio::test]
    async fn test_search_post_reads_form_field() {
        // Arrange
        let app = router().with_state(app_state_with(catalog_store()));
        let request = Request::builder()
            .method("POST")
            .uri("/search")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from("search=TV"))
            .unwrap();

        // Act
        let (status, json) = get_json(app, request).await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ids(&json), vec![4]);
    }

    #[tokio::test]
    async fn test_home_lists_flash_sale_without_cart_for_anonymous_caller() {
        let app = router().with_state(app_state_with(catalog_store()));

        let (status, json) = get_json(app, get("/")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["flash_sale"].as_array().unwrap().len(), 1);
        assert_eq!(json["flash_sale"][0]["id"], 2);
        assert!(json["cart"].is_null());
    }

    #[tokio::test]
    async fn test_home_includes_cart_for_identified_caller() {
        // Arrange
        let store = catalog_store();
        store.insert_cart_line(cart_line(5, 4, 1, FixedClock::default().now()));
        let app = router().with_state(app_state_with(store));
        let request = Request::builder()
            .method("GET")
            .uri("/")
            .header("x-customer-id", "5")
            .body(Body::empty())
            .unwrap();

        // Act
        let (status, json) = get_json(app, request).await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["cart"]["lines"].as_array().unwrap().len(), 1);
        assert_eq!(json["cart"]["total"], 809.0);
    }

    #[tokio::test]
    async fn test_category_page_includes_cart_for_identified_caller() {
        // Arrange
        let store = catalog_store();
        store.insert_cart_line(cart_line(5, 1, 2, FixedClock::default().now()));
        let app = router().with_state(app_state_with(store));
        let request = Request::builder()
            .method("GET")
            .uri("/phones_tablets")
            .header("x-customer-id", "5")
            .body(Body::empty())
            .unwrap();

        // Act
        let (status, json) = get_json(app, request).await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["cart"]["lines"].as_array().unwrap().len(), 1);
        assert_eq!(json["cart"]["total"], 2008.0);
    }

    #[tokio::test]
    async fn test_search_includes_cart_only_for_identified_caller() {
        // Arrange
        let store = catalog_store();
        store.insert_cart_line(cart_line(5, 4, 1, FixedClock::default().now()));
        let app = router().with_state(app_state_with(store));
        let identified = Request::builder()
            .method("GET")
            .uri("/search?search=tv")
            .header("x-customer-id", "5")
            .body(Body::empty())
            .unwrap();

        // Act
        let (_, with_cart) = get_json(app.clone(), identified).await;
        let (_, anonymous) = get_json(app, get("/search?search=tv")).await;

        // Assert
        assert_eq!(ids(&with_cart), vec![4]);
        assert_eq!(with_cart["cart"]["total"], 809.0);
        assert!(anonymous["cart"].is_null());
    }

    #[tokio::test]
    async fn test_category_page_returns_500_when_store_fails() {
        let app = router().with_state(app_state_with(Arc::new(FailingStore)));

        let (status, json) = get_json(app, get("/cameras")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], "persistence_error");
    }
}
