//! Product API handlers.

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
};
use bazaar_core::ProductId;
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::Product;
use crate::services::LocationContext;
use crate::services::products::{DEFAULT_SEARCH_LIMIT, DEFAULT_TRENDING_LIMIT};
use crate::state::AppState;

/// Listing query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    pub q: Option<String>,
    pub limit: Option<usize>,
}

/// Trending query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct TrendingQuery {
    pub city: Option<String>,
    pub region: Option<String>,
    pub weather: Option<String>,
    pub limit: Option<usize>,
}

/// List products, or search them when `q` is given.
pub async fn index(
    State(state): State<AppState>,
    query: std::result::Result<Query<ProductQuery>, QueryRejection>,
) -> Result<Json<Vec<Product>>> {
    let Query(query) = query?;
    let catalog = state.catalog()?;

    let products = match query.q {
        Some(q) => catalog
            .products
            .search(&q, query.limit.unwrap_or(DEFAULT_SEARCH_LIMIT)),
        None => {
            let mut all = catalog.products.all();
            if let Some(limit) = query.limit {
                all.truncate(limit);
            }
            all
        }
    };

    Ok(Json(products))
}

/// Location-aware trending products.
pub async fn trending(
    State(state): State<AppState>,
    query: std::result::Result<Query<TrendingQuery>, QueryRejection>,
) -> Result<Json<Vec<Product>>> {
    let Query(query) = query?;
    let location = LocationContext {
        city: query.city,
        region: query.region,
        weather: query.weather,
    };
    let location = (!location.is_empty()).then_some(&location);

    let products = state
        .catalog()?
        .products
        .trending_by_location(location, query.limit.unwrap_or(DEFAULT_TRENDING_LIMIT));
    Ok(Json(products))
}

/// Product detail.
pub async fn show(
    State(state): State<AppState>,
    id: std::result::Result<Path<ProductId>, PathRejection>,
) -> Result<Json<Product>> {
    let Path(id) = id?;
    state
        .catalog()?
        .products
        .get(id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))
}
