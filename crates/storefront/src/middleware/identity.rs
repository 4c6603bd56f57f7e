//! Shopper identity extraction.
//!
//! Resolves an inbound request to exactly one cart owner key. Handlers take
//! [`ShopperIdentity`] as an extractor argument instead of reading session
//! state themselves.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tower_sessions::Session;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::identity::{CurrentUser, ShopperIdentity, keys};

impl<S> FromRequestParts<S> for ShopperIdentity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    /// Resolve the request's identity from the session.
    ///
    /// A logged-in user wins. Otherwise the anonymous cart token is read,
    /// or allocated and written into the session before the first cart
    /// lookup - the token must be durable before a cart is keyed to it,
    /// else every request would create a fresh cart.
    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, msg)| AppError::Internal(format!("session unavailable: {msg}")))?;

        if let Some(user) = session
            .get::<CurrentUser>(keys::CURRENT_USER)
            .await
            .map_err(|e| AppError::Internal(format!("session read failed: {e}")))?
        {
            return Ok(Self::User(user.id));
        }

        if let Some(token) = session
            .get::<Uuid>(keys::CART_TOKEN)
            .await
            .map_err(|e| AppError::Internal(format!("session read failed: {e}")))?
        {
            return Ok(Self::Anonymous(token));
        }

        let token = Uuid::new_v4();
        session
            .insert(keys::CART_TOKEN, token)
            .await
            .map_err(|e| AppError::Internal(format!("session write failed: {e}")))?;

        tracing::debug!(%token, "allocated anonymous cart token");

        Ok(Self::Anonymous(token))
    }
}
