//! Cart route handlers.
//!
//! All handlers resolve the shopper's identity (user or anonymous session
//! token) to a single cart before operating on it. Responses return the
//! repaired cart contents for the caller to render.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use paperleaf_core::{CartLineId, ProductId, Quantity};

use crate::error::Result;
use crate::models::cart::CartView;
use crate::models::identity::ShopperIdentity;
use crate::services::{CartError, CartService};
use crate::state::AppState;

/// Add to cart request body.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    /// Product to add.
    pub product_id: ProductId,
    /// Units to add; defaults to 1.
    pub quantity: Option<i32>,
}

/// Update cart request body.
#[derive(Debug, Deserialize)]
pub struct UpdateCartRequest {
    /// Line to update.
    pub line_id: CartLineId,
    /// New quantity; zero or less removes the line.
    pub quantity: i32,
}

/// Remove from cart request body.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartRequest {
    /// Line to remove.
    pub line_id: CartLineId,
}

/// Cart count badge response.
#[derive(Debug, Serialize)]
pub struct CartCount {
    /// Total units across the cart.
    pub count: i64,
}

/// Get the cart contents with totals.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    identity: ShopperIdentity,
) -> Result<Json<CartView>> {
    let service = CartService::new(state.pool());
    let cart = service.resolve_cart(&identity).await?;
    let view = service.contents(&cart).await?;
    Ok(Json(view))
}

/// Get the cart item count badge.
#[instrument(skip(state))]
pub async fn count(
    State(state): State<AppState>,
    identity: ShopperIdentity,
) -> Result<Json<CartCount>> {
    let service = CartService::new(state.pool());
    let cart = service.resolve_cart(&identity).await?;
    let count = service.item_count(&cart).await?;
    Ok(Json(CartCount { count }))
}

/// Add a product to the cart, merging repeat adds.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    identity: ShopperIdentity,
    Json(request): Json<AddToCartRequest>,
) -> Result<Json<CartView>> {
    let quantity = match request.quantity {
        Some(value) => Quantity::new(value).map_err(|_| CartError::InvalidQuantity)?,
        None => Quantity::ONE,
    };

    let service = CartService::new(state.pool());
    let cart = service.resolve_cart(&identity).await?;
    service.add_line(&cart, request.product_id, quantity).await?;

    let view = service.contents(&cart).await?;
    Ok(Json(view))
}

/// Set a line's quantity; zero or less removes the line.
#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    identity: ShopperIdentity,
    Json(request): Json<UpdateCartRequest>,
) -> Result<Json<CartView>> {
    let service = CartService::new(state.pool());
    let cart = service.resolve_cart(&identity).await?;
    service
        .set_line_quantity(&cart, request.line_id, request.quantity)
        .await?;

    let view = service.contents(&cart).await?;
    Ok(Json(view))
}

/// Remove a line from the cart.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    identity: ShopperIdentity,
    Json(request): Json<RemoveFromCartRequest>,
) -> Result<Json<CartView>> {
    let service = CartService::new(state.pool());
    let cart = service.resolve_cart(&identity).await?;
    service.remove_line(&cart, request.line_id).await?;

    let view = service.contents(&cart).await?;
    Ok(Json(view))
}
