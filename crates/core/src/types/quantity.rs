//! Cart line quantity type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Quantity`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum QuantityError {
    /// The value is outside the allowed range.
    #[error("quantity must be between {min} and {max}", min = Quantity::MIN, max = Quantity::MAX)]
    OutOfRange,
}

/// A per-request cart quantity, constrained to 1..=99.
///
/// The range bounds a single add/update request; a cart line's stored
/// quantity can exceed the maximum through merging, which is capped by
/// stock validation rather than here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct Quantity(i32);

impl Quantity {
    /// Minimum allowed quantity per request.
    pub const MIN: i32 = 1;
    /// Maximum allowed quantity per request.
    pub const MAX: i32 = 99;

    /// A quantity of one.
    pub const ONE: Self = Self(1);

    /// Create a `Quantity`, validating the allowed range.
    ///
    /// # Errors
    ///
    /// Returns [`QuantityError::OutOfRange`] if `value` is not in 1..=99.
    pub const fn new(value: i32) -> Result<Self, QuantityError> {
        if value < Self::MIN || value > Self::MAX {
            return Err(QuantityError::OutOfRange);
        }
        Ok(Self(value))
    }

    /// Get the underlying i32 value.
    #[must_use]
    pub const fn as_i32(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i32> for Quantity {
    type Error = QuantityError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quantity> for i32 {
    fn from(quantity: Quantity) -> Self {
        quantity.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_accepts_bounds() {
        assert_eq!(Quantity::new(1).unwrap().as_i32(), 1);
        assert_eq!(Quantity::new(99).unwrap().as_i32(), 99);
    }

    #[test]
    fn test_new_rejects_out_of_range() {
        assert_eq!(Quantity::new(0), Err(QuantityError::OutOfRange));
        assert_eq!(Quantity::new(-3), Err(QuantityError::OutOfRange));
        assert_eq!(Quantity::new(100), Err(QuantityError::OutOfRange));
    }

    #[test]
    fn test_serde_rejects_out_of_range() {
        assert!(serde_json::from_str::<Quantity>("5").is_ok());
        assert!(serde_json::from_str::<Quantity>("0").is_err());
        assert!(serde_json::from_str::<Quantity>("100").is_err());
    }
}
