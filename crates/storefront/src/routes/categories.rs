//! Category API handlers.

use axum::{
    Json,
    extract::{Path, State, rejection::PathRejection},
};
use bazaar_core::CategoryId;

use crate::error::{AppError, Result};
use crate::models::Category;
use crate::state::AppState;

pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Category>>> {
    Ok(Json(state.catalog()?.categories.all()))
}

pub async fn show(
    State(state): State<AppState>,
    id: std::result::Result<Path<CategoryId>, PathRejection>,
) -> Result<Json<Category>> {
    let Path(id) = id?;
    state
        .catalog()?
        .categories
        .get(id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("category {id}")))
}
