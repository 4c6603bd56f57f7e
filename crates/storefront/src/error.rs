//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::{CartError, CheckoutError, OrderError};

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Cart operation failed.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Checkout failed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Order access or lifecycle operation failed.
    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn is_server_error(&self) -> bool {
        match self {
            Self::Database(_) | Self::Internal(_) => true,
            Self::Cart(CartError::Repository(_))
            | Self::Checkout(CheckoutError::Repository(_))
            | Self::Order(OrderError::Repository(_)) => true,
            _ => false,
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Cart(err) => match err {
                CartError::NotFound => StatusCode::NOT_FOUND,
                CartError::InvalidQuantity => StatusCode::UNPROCESSABLE_ENTITY,
                CartError::InsufficientStock { .. } => StatusCode::CONFLICT,
                CartError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Checkout(err) => match err {
                CheckoutError::EmptyCart => StatusCode::BAD_REQUEST,
                CheckoutError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
                CheckoutError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Order(err) => match err {
                OrderError::NotFound => StatusCode::NOT_FOUND,
                OrderError::Forbidden => StatusCode::FORBIDDEN,
                OrderError::InvalidTransition { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                OrderError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn body(&self) -> serde_json::Value {
        // Don't expose internal error details to clients
        if self.is_server_error() {
            return json!({ "error": "Internal server error" });
        }

        if let Self::Checkout(CheckoutError::Validation(fields)) = self {
            return json!({ "error": "validation failed", "fields": fields });
        }

        json!({ "error": self.to_string() })
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        (self.status(), Json(self.body())).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::FieldError;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("order 123".to_string());
        assert_eq!(err.to_string(), "Not found: order 123");

        let err = AppError::Cart(CartError::InsufficientStock { available: 4 });
        assert_eq!(err.to_string(), "Cart error: only 4 in stock");
    }

    #[test]
    fn test_cart_error_status_codes() {
        assert_eq!(get_status(AppError::Cart(CartError::NotFound)), StatusCode::NOT_FOUND);
        assert_eq!(
            get_status(AppError::Cart(CartError::InvalidQuantity)),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            get_status(AppError::Cart(CartError::InsufficientStock { available: 0 })),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_checkout_error_status_codes() {
        assert_eq!(
            get_status(AppError::Checkout(CheckoutError::EmptyCart)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Checkout(CheckoutError::Validation(vec![FieldError {
                field: "email",
                message: "email is required".to_string(),
            }]))),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_order_error_status_codes() {
        assert_eq!(get_status(AppError::Order(OrderError::NotFound)), StatusCode::NOT_FOUND);
        assert_eq!(get_status(AppError::Order(OrderError::Forbidden)), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_server_errors_hide_details() {
        let err = AppError::Internal("pool exhausted".to_string());
        let body = err.body();
        assert_eq!(body.get("error").unwrap(), "Internal server error");
    }

    #[test]
    fn test_validation_body_lists_fields() {
        let err = AppError::Checkout(CheckoutError::Validation(vec![FieldError {
            field: "city",
            message: "city is required".to_string(),
        }]));
        let body = err.body();
        assert_eq!(body.get("fields").unwrap().as_array().unwrap().len(), 1);
    }
}
