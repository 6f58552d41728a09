//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Featured bundles and trending products
//! GET  /health                 - Health check
//!
//! # Catalog API
//! GET  /api/products           - All products, or search with ?q=&limit=
//! GET  /api/products/trending  - Trending by ?city=&region=&weather=&limit=
//! GET  /api/products/{id}      - Product detail
//! GET  /api/categories         - All categories
//! GET  /api/categories/{id}    - Category detail
//! GET  /api/bundles            - Bundles, filtered by ?q= | ?category= | ?max_time=
//! GET  /api/bundles/featured   - Featured bundles
//! GET  /api/bundles/{id}       - Bundle detail
//! POST   /api/bundles/{id}/components              - Add a component
//! PATCH  /api/bundles/{id}/components/{product_id} - Change a component
//! DELETE /api/bundles/{id}/components/{product_id} - Remove a component
//!
//! # Admin area
//! GET  /admin                  - Gate, then dashboard or redirect
//! GET  /unauthorized           - Denial details and demo options
//! POST /unauthorized/simulate-admin - Demo admin login
//! POST /unauthorized/simulate-user  - Demo shopper login
//! POST /auth/logout            - Clear the session
//!
//! # Admin API (403 unless the session user is an admin)
//! POST   /api/admin/products            - Create product
//! POST   /api/admin/products/bulk       - Bulk update products
//! GET    /api/admin/products/low-stock  - Low stock report
//! PATCH  /api/admin/products/{id}       - Update product
//! DELETE /api/admin/products/{id}       - Delete product
//! PUT    /api/admin/products/{id}/stock - Set stock
//! POST   /api/admin/categories          - Create category
//! PATCH  /api/admin/categories/{id}     - Update category
//! DELETE /api/admin/categories/{id}     - Delete category
//! POST   /api/admin/bundles             - Create bundle
//! POST   /api/admin/bundles/status      - Bulk status change
//! GET    /api/admin/bundles/analytics   - Bundle analytics
//! PATCH  /api/admin/bundles/{id}        - Update bundle
//! DELETE /api/admin/bundles/{id}        - Delete bundle
//! ```

pub mod admin;
pub mod admin_api;
pub mod auth;
pub mod bundles;
pub mod categories;
pub mod home;
pub mod products;
pub mod unauthorized;

use axum::{
    Router,
    routing::{get, patch, post, put},
};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::middleware::{create_session_layer, request_id_middleware};
use crate::state::AppState;

/// Create the product API router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/trending", get(products::trending))
        .route("/{id}", get(products::show))
}

/// Create the category API router.
pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(categories::index))
        .route("/{id}", get(categories::show))
}

/// Create the bundle API router.
pub fn bundle_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(bundles::index))
        .route("/featured", get(bundles::featured))
        .route("/{id}", get(bundles::show))
        .route("/{id}/components", post(bundles::add_component))
        .route(
            "/{id}/components/{product_id}",
            patch(bundles::update_component).delete(bundles::remove_component),
        )
}

/// Create the admin API router.
pub fn admin_api_routes() -> Router<AppState> {
    Router::new()
        .route("/products", post(admin_api::create_product))
        .route("/products/bulk", post(admin_api::bulk_update_products))
        .route("/products/low-stock", get(admin_api::low_stock_products))
        .route(
            "/products/{id}",
            patch(admin_api::update_product).delete(admin_api::delete_product),
        )
        .route("/products/{id}/stock", put(admin_api::update_stock))
        .route("/categories", post(admin_api::create_category))
        .route(
            "/categories/{id}",
            patch(admin_api::update_category).delete(admin_api::delete_category),
        )
        .route("/bundles", post(admin_api::create_bundle))
        .route("/bundles/status", post(admin_api::bulk_bundle_status))
        .route("/bundles/analytics", get(admin_api::bundle_analytics))
        .route(
            "/bundles/{id}",
            patch(admin_api::update_bundle).delete(admin_api::delete_bundle),
        )
}

/// Create the unauthorized page and demo login router.
pub fn unauthorized_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(unauthorized::show))
        .route("/simulate-admin", post(unauthorized::simulate_admin))
        .route("/simulate-user", post(unauthorized::simulate_user))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/health", get(health))
        .nest("/api/products", product_routes())
        .nest("/api/categories", category_routes())
        .nest("/api/bundles", bundle_routes())
        .nest("/api/admin", admin_api_routes())
        .route("/admin", get(admin::dashboard))
        .nest("/unauthorized", unauthorized_routes())
        .route("/auth/logout", post(auth::logout))
}

/// Build the application with sessions, request IDs, and tracing applied.
///
/// Sentry layers are added by the binary so tests can run without a client.
pub fn app(state: AppState) -> Router {
    let session_layer = create_session_layer(state.config());

    routes()
        .layer(session_layer)
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        user_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}
