//! Checkout route handler.

use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

use crate::error::Result;
use crate::models::identity::ShopperIdentity;
use crate::models::order::OrderView;
use crate::services::{CartService, CheckoutService, ContactForm};
use crate::state::AppState;

/// Materialize an order from the shopper's cart.
///
/// Validates the contact payload and the cart's non-emptiness before any
/// write; on success the cart is gone and the created order (with its
/// snapshotted lines) is returned.
#[instrument(skip(state, form), fields(anonymous = identity.is_anonymous()))]
pub async fn create(
    State(state): State<AppState>,
    identity: ShopperIdentity,
    Json(form): Json<ContactForm>,
) -> Result<(StatusCode, Json<OrderView>)> {
    let cart = CartService::new(state.pool()).resolve_cart(&identity).await?;

    let order = CheckoutService::new(state.pool())
        .checkout(&cart, &form, identity.user_id())
        .await?;

    Ok((StatusCode::CREATED, Json(order)))
}
