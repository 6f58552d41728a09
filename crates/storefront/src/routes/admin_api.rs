//! Admin JSON API.
//!
//! Every handler passes the request's [`SessionContext`] to the service, which
//! refuses non-admins with 403 before touching the catalog.
//!
//! [`SessionContext`]: crate::session::SessionContext

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};
use bazaar_core::{BundleId, BundleStatus, CategoryId, ProductId};
use serde::Deserialize;

use crate::error::Result;
use crate::middleware::CurrentSession;
use crate::models::{BundleAnalytics, Category, Patch, Product, RecipeBundle};
use crate::services::products::DEFAULT_LOW_STOCK_THRESHOLD;
use crate::state::AppState;

type JsonBody<T> = std::result::Result<Json<T>, JsonRejection>;
type PathId<T> = std::result::Result<Path<T>, PathRejection>;

/// Body of `PUT /api/admin/products/{id}/stock`.
#[derive(Debug, Deserialize)]
pub struct StockUpdate {
    pub stock: u32,
}

#[derive(Debug, Default, Deserialize)]
pub struct LowStockQuery {
    pub threshold: Option<u32>,
}

/// Body of `POST /api/admin/bundles/status`.
#[derive(Debug, Deserialize)]
pub struct BulkStatusUpdate {
    pub ids: Vec<BundleId>,
    pub status: BundleStatus,
}

// =============================================================================
// Products
// =============================================================================

pub async fn create_product(
    State(state): State<AppState>,
    CurrentSession(ctx): CurrentSession,
    payload: JsonBody<Patch>,
) -> Result<(StatusCode, Json<Product>)> {
    let Json(fields) = payload?;
    let product = state.catalog_mut()?.products.admin_create(&ctx, fields)?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn bulk_update_products(
    State(state): State<AppState>,
    CurrentSession(ctx): CurrentSession,
    payload: JsonBody<Vec<Patch>>,
) -> Result<Json<Vec<Product>>> {
    let Json(updates) = payload?;
    let products = state
        .catalog_mut()?
        .products
        .admin_bulk_update(&ctx, &updates)?;
    Ok(Json(products))
}

pub async fn low_stock_products(
    State(state): State<AppState>,
    CurrentSession(ctx): CurrentSession,
    query: std::result::Result<Query<LowStockQuery>, QueryRejection>,
) -> Result<Json<Vec<Product>>> {
    let Query(query) = query?;
    let threshold = query.threshold.unwrap_or(DEFAULT_LOW_STOCK_THRESHOLD);
    let products = state
        .catalog()?
        .products
        .admin_low_stock_items(&ctx, threshold)?;
    Ok(Json(products))
}

pub async fn update_product(
    State(state): State<AppState>,
    CurrentSession(ctx): CurrentSession,
    id: PathId<ProductId>,
    payload: JsonBody<Patch>,
) -> Result<Json<Product>> {
    let Path(id) = id?;
    let Json(patch) = payload?;
    let product = state
        .catalog_mut()?
        .products
        .admin_update(&ctx, id, &patch)?;
    Ok(Json(product))
}

pub async fn delete_product(
    State(state): State<AppState>,
    CurrentSession(ctx): CurrentSession,
    id: PathId<ProductId>,
) -> Result<Json<Product>> {
    let Path(id) = id?;
    let product = state.catalog_mut()?.products.admin_delete(&ctx, id)?;
    Ok(Json(product))
}

pub async fn update_stock(
    State(state): State<AppState>,
    CurrentSession(ctx): CurrentSession,
    id: PathId<ProductId>,
    payload: JsonBody<StockUpdate>,
) -> Result<Json<Product>> {
    let Path(id) = id?;
    let Json(update) = payload?;
    let product = state
        .catalog_mut()?
        .products
        .admin_update_stock(&ctx, id, update.stock)?;
    Ok(Json(product))
}

// =============================================================================
// Categories
// =============================================================================

pub async fn create_category(
    State(state): State<AppState>,
    CurrentSession(ctx): CurrentSession,
    payload: JsonBody<Patch>,
) -> Result<(StatusCode, Json<Category>)> {
    let Json(fields) = payload?;
    let category = state.catalog_mut()?.categories.admin_create(&ctx, fields)?;
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn update_category(
    State(state): State<AppState>,
    CurrentSession(ctx): CurrentSession,
    id: PathId<CategoryId>,
    payload: JsonBody<Patch>,
) -> Result<Json<Category>> {
    let Path(id) = id?;
    let Json(patch) = payload?;
    let category = state
        .catalog_mut()?
        .categories
        .admin_update(&ctx, id, &patch)?;
    Ok(Json(category))
}

pub async fn delete_category(
    State(state): State<AppState>,
    CurrentSession(ctx): CurrentSession,
    id: PathId<CategoryId>,
) -> Result<Json<Category>> {
    let Path(id) = id?;
    let category = state.catalog_mut()?.categories.admin_delete(&ctx, id)?;
    Ok(Json(category))
}

// =============================================================================
// Bundles
// =============================================================================

pub async fn create_bundle(
    State(state): State<AppState>,
    CurrentSession(ctx): CurrentSession,
    payload: JsonBody<Patch>,
) -> Result<(StatusCode, Json<RecipeBundle>)> {
    let Json(fields) = payload?;
    let bundle = state.catalog_mut()?.bundles.admin_create(&ctx, fields)?;
    Ok((StatusCode::CREATED, Json(bundle)))
}

pub async fn bulk_bundle_status(
    State(state): State<AppState>,
    CurrentSession(ctx): CurrentSession,
    payload: JsonBody<BulkStatusUpdate>,
) -> Result<Json<Vec<RecipeBundle>>> {
    let Json(update) = payload?;
    let bundles = state
        .catalog_mut()?
        .bundles
        .admin_bulk_status_update(&ctx, &update.ids, update.status)?;
    Ok(Json(bundles))
}

pub async fn bundle_analytics(
    State(state): State<AppState>,
    CurrentSession(ctx): CurrentSession,
) -> Result<Json<BundleAnalytics>> {
    let analytics = state.catalog()?.bundles.admin_analytics(&ctx)?;
    Ok(Json(analytics))
}

pub async fn update_bundle(
    State(state): State<AppState>,
    CurrentSession(ctx): CurrentSession,
    id: PathId<BundleId>,
    payload: JsonBody<Patch>,
) -> Result<Json<RecipeBundle>> {
    let Path(id) = id?;
    let Json(patch) = payload?;
    let bundle = state
        .catalog_mut()?
        .bundles
        .admin_update(&ctx, id, &patch)?;
    Ok(Json(bundle))
}

pub async fn delete_bundle(
    State(state): State<AppState>,
    CurrentSession(ctx): CurrentSession,
    id: PathId<BundleId>,
) -> Result<Json<RecipeBundle>> {
    let Path(id) = id?;
    let bundle = state.catalog_mut()?.bundles.admin_delete(&ctx, id)?;
    Ok(Json(bundle))
}
