//! Catalog route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use crate::db::catalog::CatalogRepository;
use crate::error::{AppError, Result};
use crate::models::product::{Category, Product};
use crate::state::AppState;

/// Product listing query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ProductListQuery {
    /// Filter to a category slug.
    pub category: Option<String>,
    /// Only featured products.
    #[serde(default)]
    pub featured: bool,
}

/// List active categories.
#[instrument(skip(state))]
pub async fn categories(State(state): State<AppState>) -> Result<Json<Vec<Category>>> {
    let categories = CatalogRepository::new(state.pool()).list_categories().await?;
    Ok(Json(categories))
}

/// List active products with optional filters.
///
/// An unknown category slug is a 404, not an empty listing.
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ProductListQuery>,
) -> Result<Json<Vec<Product>>> {
    let repo = CatalogRepository::new(state.pool());

    let category_id = match query.category.as_deref() {
        Some(slug) => Some(
            repo.get_category_by_slug(slug)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("category {slug}")))?
                .id,
        ),
        None => None,
    };

    let products = repo.list_products(category_id, query.featured).await?;
    Ok(Json(products))
}

/// Product detail by slug.
#[instrument(skip(state))]
pub async fn detail(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Product>> {
    let product = CatalogRepository::new(state.pool())
        .get_product_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {slug}")))?;
    Ok(Json(product))
}
