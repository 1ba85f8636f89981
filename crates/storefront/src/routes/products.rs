//! Product catalog route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use icedelights_core::{Product, ProductId};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Query parameters for the product listing.
#[derive(Debug, Default, Deserialize)]
pub struct ProductsQuery {
    /// Only list products in this category.
    pub category: Option<String>,
}

/// Category list response.
#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub categories: Vec<String>,
}

/// List products, optionally filtered by category.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ProductsQuery>,
) -> Json<Vec<Product>> {
    let catalog = state.catalog();
    let products = match query.category.as_deref().map(str::trim) {
        Some(category) if !category.is_empty() => {
            catalog.in_category(category).cloned().collect()
        }
        _ => catalog.products().to_vec(),
    };
    Json(products)
}

/// Show one product.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>> {
    let id = ProductId::new(id);
    state
        .catalog()
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Product not found: {id}")))
}

/// Distinct categories in menu order.
#[instrument(skip(state))]
pub async fn categories(State(state): State<AppState>) -> Json<CategoriesResponse> {
    Json(CategoriesResponse {
        categories: state
            .catalog()
            .categories()
            .into_iter()
            .map(str::to_string)
            .collect(),
    })
}
