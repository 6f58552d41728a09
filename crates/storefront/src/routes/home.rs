//! Store front page.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use crate::error::Result;
use crate::models::{Product, RecipeBundle};
use crate::services::products::DEFAULT_TRENDING_LIMIT;
use crate::services::recipe_bundles::DEFAULT_FEATURED_LIMIT;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeView {
    pub featured_bundles: Vec<RecipeBundle>,
    pub trending_products: Vec<Product>,
}

/// Featured bundles and location-independent trending products.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> Result<Json<HomeView>> {
    let catalog = state.catalog()?;
    Ok(Json(HomeView {
        featured_bundles: catalog.bundles.featured(DEFAULT_FEATURED_LIMIT),
        trending_products: catalog
            .products
            .trending_by_location(None, DEFAULT_TRENDING_LIMIT),
    }))
}
