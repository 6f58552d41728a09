//! Recipe bundle API handlers, including component editing.

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};
use bazaar_core::{BundleId, ProductId};
use serde::Deserialize;
use tracing::info;

use crate::error::{AppError, Result};
use crate::models::{ComponentUpdate, Product, RecipeBundle};
use crate::services::CatalogError;
use crate::services::recipe_bundles::{
    DEFAULT_CATEGORY_LIMIT, DEFAULT_FEATURED_LIMIT, DEFAULT_SEARCH_LIMIT, DEFAULT_TIME_LIMIT,
};
use crate::state::AppState;

/// Listing filters. The first one present wins, in field order.
#[derive(Debug, Default, Deserialize)]
pub struct BundleQuery {
    pub q: Option<String>,
    pub category: Option<String>,
    pub max_time: Option<u32>,
    pub limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

/// Body of `POST /api/bundles/{id}/components`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddComponentRequest {
    pub product_id: ProductId,
    pub quantity: f64,
    pub unit: Option<String>,
}

fn check_quantity(quantity: f64) -> Result<()> {
    if quantity.is_finite() && quantity > 0.0 {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!(
            "quantity must be a positive number, got {quantity}"
        )))
    }
}

pub async fn index(
    State(state): State<AppState>,
    query: std::result::Result<Query<BundleQuery>, QueryRejection>,
) -> Result<Json<Vec<RecipeBundle>>> {
    let Query(query) = query?;
    let catalog = state.catalog()?;
    let bundles = &catalog.bundles;

    let result = if let Some(q) = &query.q {
        bundles.search(q, query.limit.unwrap_or(DEFAULT_SEARCH_LIMIT))
    } else if let Some(category) = &query.category {
        bundles.by_category(category, query.limit.unwrap_or(DEFAULT_CATEGORY_LIMIT))
    } else if let Some(max_time) = query.max_time {
        bundles.by_time(max_time, query.limit.unwrap_or(DEFAULT_TIME_LIMIT))
    } else {
        let mut all = bundles.all();
        if let Some(limit) = query.limit {
            all.truncate(limit);
        }
        all
    };

    Ok(Json(result))
}

pub async fn featured(
    State(state): State<AppState>,
    query: std::result::Result<Query<LimitQuery>, QueryRejection>,
) -> Result<Json<Vec<RecipeBundle>>> {
    let Query(query) = query?;
    let bundles = state
        .catalog()?
        .bundles
        .featured(query.limit.unwrap_or(DEFAULT_FEATURED_LIMIT));
    Ok(Json(bundles))
}

pub async fn show(
    State(state): State<AppState>,
    id: std::result::Result<Path<BundleId>, PathRejection>,
) -> Result<Json<RecipeBundle>> {
    let Path(id) = id?;
    state
        .catalog()?
        .bundles
        .get(id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("bundle {id}")))
}

/// Add a catalog product to a bundle. The product is snapshotted into the
/// component as it is right now.
pub async fn add_component(
    State(state): State<AppState>,
    id: std::result::Result<Path<BundleId>, PathRejection>,
    payload: std::result::Result<Json<AddComponentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RecipeBundle>)> {
    let Path(id) = id?;
    let Json(request) = payload?;
    check_quantity(request.quantity)?;

    let mut catalog = state.catalog_mut()?;
    let product = catalog
        .products
        .get(request.product_id)
        .ok_or_else(|| CatalogError::not_found::<Product>(request.product_id))?;
    let bundle = catalog
        .bundles
        .add_component(id, product, request.quantity, request.unit.as_deref())?;

    info!(bundle_id = %id, product_id = %request.product_id, "Component added");
    Ok((StatusCode::CREATED, Json(bundle)))
}

pub async fn update_component(
    State(state): State<AppState>,
    ids: std::result::Result<Path<(BundleId, ProductId)>, PathRejection>,
    payload: std::result::Result<Json<ComponentUpdate>, JsonRejection>,
) -> Result<Json<RecipeBundle>> {
    let Path((id, product_id)) = ids?;
    let Json(update) = payload?;
    if let Some(quantity) = update.quantity {
        check_quantity(quantity)?;
    }

    let bundle = state
        .catalog_mut()?
        .bundles
        .update_component(id, product_id, &update)?;
    Ok(Json(bundle))
}

pub async fn remove_component(
    State(state): State<AppState>,
    ids: std::result::Result<Path<(BundleId, ProductId)>, PathRejection>,
) -> Result<Json<RecipeBundle>> {
    let Path((id, product_id)) = ids?;
    let bundle = state
        .catalog_mut()?
        .bundles
        .remove_component(id, product_id)?;
    Ok(Json(bundle))
}
