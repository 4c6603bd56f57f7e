//! Checkout service: the order materializer.
//!
//! Consumes a cart and a contact/shipping payload, validates both, and
//! produces an immutable order in a single transaction. Validation failures
//! abort before any write.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use thiserror::Error;

use paperleaf_core::{Email, UserId};

use crate::db::RepositoryError;
use crate::db::carts::CartRepository;
use crate::db::orders::OrderRepository;
use crate::models::cart::Cart;
use crate::models::order::{ContactDetails, OrderView};

/// Maximum lengths for contact fields, matching the original form bounds.
const MAX_NAME_LENGTH: usize = 50;
const MAX_ADDRESS_LENGTH: usize = 250;
const MAX_POSTAL_CODE_LENGTH: usize = 20;
const MAX_CITY_LENGTH: usize = 100;

/// The raw checkout payload submitted by a view collaborator.
#[derive(Debug, Clone, Deserialize)]
pub struct ContactForm {
    /// Customer first name.
    pub first_name: String,
    /// Customer last name.
    pub last_name: String,
    /// Contact email.
    pub email: String,
    /// Shipping street address.
    pub address: String,
    /// Shipping postal code.
    pub postal_code: String,
    /// Shipping city.
    pub city: String,
}

/// A single field validation failure.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    /// Name of the offending field.
    pub field: &'static str,
    /// Human-readable message.
    pub message: String,
}

/// Errors from checkout.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The cart has no lines; an empty cart is an error, not a zero-item
    /// order.
    #[error("cart is empty")]
    EmptyCart,

    /// One or more contact fields failed validation.
    #[error("validation failed")]
    Validation(Vec<FieldError>),

    /// Storage-layer failure; the transaction was rolled back in full.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Checkout service.
pub struct CheckoutService<'a> {
    carts: CartRepository<'a>,
    orders: OrderRepository<'a>,
}

impl<'a> CheckoutService<'a> {
    /// Create a new checkout service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            carts: CartRepository::new(pool),
            orders: OrderRepository::new(pool),
        }
    }

    /// Materialize an order from a cart.
    ///
    /// Validates the contact payload and cart non-emptiness before any
    /// write, then runs the order transaction (order row, snapshot lines,
    /// cart teardown). After success the cart is gone; the next
    /// add-to-cart allocates a fresh one.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::Validation` with per-field errors for a bad
    /// payload.
    /// Returns `CheckoutError::EmptyCart` if the cart has no lines.
    /// Returns `CheckoutError::Repository` on storage failure (full
    /// rollback, no orphan order).
    pub async fn checkout(
        &self,
        cart: &Cart,
        form: &ContactForm,
        user_id: Option<UserId>,
    ) -> Result<OrderView, CheckoutError> {
        let contact = validate_contact(form).map_err(CheckoutError::Validation)?;

        let lines = self.carts.lines(cart.id).await?;
        if lines.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let (order, order_lines) = match self
            .orders
            .create_from_cart(cart.id, &contact, user_id)
            .await
        {
            Ok(created) => created,
            // Another request drained the cart between the check and the
            // transaction.
            Err(RepositoryError::Conflict(_)) => return Err(CheckoutError::EmptyCart),
            Err(e) => return Err(CheckoutError::Repository(e)),
        };

        tracing::info!(
            order_id = %order.id,
            cart_id = %cart.id,
            line_count = order_lines.len(),
            "order placed"
        );

        Ok(OrderView::new(order, order_lines))
    }
}

/// Validate the checkout payload, collecting per-field errors.
///
/// # Errors
///
/// Returns every failing field, not just the first.
pub fn validate_contact(form: &ContactForm) -> Result<ContactDetails, Vec<FieldError>> {
    let mut errors = Vec::new();

    check_text(&mut errors, "first_name", &form.first_name, MAX_NAME_LENGTH);
    check_text(&mut errors, "last_name", &form.last_name, MAX_NAME_LENGTH);
    check_text(&mut errors, "address", &form.address, MAX_ADDRESS_LENGTH);
    check_text(
        &mut errors,
        "postal_code",
        &form.postal_code,
        MAX_POSTAL_CODE_LENGTH,
    );
    check_text(&mut errors, "city", &form.city, MAX_CITY_LENGTH);

    let email = match Email::parse(form.email.trim()) {
        Ok(email) => Some(email),
        Err(e) => {
            errors.push(FieldError {
                field: "email",
                message: e.to_string(),
            });
            None
        }
    };

    if !errors.is_empty() {
        return Err(errors);
    }

    // All checks passed; email is present by construction
    let Some(email) = email else {
        return Err(vec![FieldError {
            field: "email",
            message: "email is required".to_owned(),
        }]);
    };

    Ok(ContactDetails {
        first_name: form.first_name.trim().to_owned(),
        last_name: form.last_name.trim().to_owned(),
        email,
        address: form.address.trim().to_owned(),
        postal_code: form.postal_code.trim().to_owned(),
        city: form.city.trim().to_owned(),
    })
}

fn check_text(errors: &mut Vec<FieldError>, field: &'static str, value: &str, max: usize) {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.push(FieldError {
            field,
            message: format!("{} is required", field.replace('_', " ")),
        });
    } else if trimmed.len() > max {
        errors.push(FieldError {
            field,
            message: format!("{} must be at most {max} characters", field.replace('_', " ")),
        });
    }
}
