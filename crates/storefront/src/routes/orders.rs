//! Order route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use paperleaf_core::OrderId;

use crate::error::{AppError, Result};
use crate::models::identity::ShopperIdentity;
use crate::models::order::{Order, OrderView};
use crate::services::OrderService;
use crate::state::AppState;

/// Order detail, ownership-checked against the requesting identity.
#[instrument(skip(state))]
pub async fn detail(
    State(state): State<AppState>,
    identity: ShopperIdentity,
    Path(id): Path<i32>,
) -> Result<Json<OrderView>> {
    let view = OrderService::new(state.pool())
        .get_order(OrderId::new(id), &identity)
        .await?;
    Ok(Json(view))
}

/// The authenticated user's order history, newest first.
#[instrument(skip(state))]
pub async fn history(
    State(state): State<AppState>,
    identity: ShopperIdentity,
) -> Result<Json<Vec<Order>>> {
    let user_id = identity
        .user_id()
        .ok_or_else(|| AppError::Unauthorized("login required".to_string()))?;

    let orders = OrderService::new(state.pool()).list_for_user(user_id).await?;
    Ok(Json(orders))
}
