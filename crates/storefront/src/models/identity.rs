//! Shopper identity types.
//!
//! Every cart and checkout operation takes an explicit [`ShopperIdentity`]
//! rather than reading ambient session state. The identity is the cart
//! owner key: exactly one of an authenticated user ID or a durable
//! anonymous session token.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use paperleaf_core::{Email, UserId};

/// Session-stored user identity.
///
/// Minimal data stored in the session to identify the logged-in user.
/// Written by the external authentication collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's database ID.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
}

/// The single identity a cart is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShopperIdentity {
    /// An authenticated user.
    User(UserId),
    /// An anonymous shopper, keyed by a durable session token.
    Anonymous(Uuid),
}

impl ShopperIdentity {
    /// The user ID, if this identity is authenticated.
    #[must_use]
    pub const fn user_id(&self) -> Option<UserId> {
        match self {
            Self::User(id) => Some(*id),
            Self::Anonymous(_) => None,
        }
    }

    /// Whether this identity is an anonymous session.
    #[must_use]
    pub const fn is_anonymous(&self) -> bool {
        matches!(self, Self::Anonymous(_))
    }
}

/// Session keys for shopper identity data.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the anonymous cart token.
    pub const CART_TOKEN: &str = "cart_token";
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_user_identity_accessors() {
        let identity = ShopperIdentity::User(UserId::new(5));
        assert_eq!(identity.user_id(), Some(UserId::new(5)));
        assert!(!identity.is_anonymous());
    }

    #[test]
    fn test_anonymous_identity_accessors() {
        let identity = ShopperIdentity::Anonymous(Uuid::new_v4());
        assert_eq!(identity.user_id(), None);
        assert!(identity.is_anonymous());
    }
}
