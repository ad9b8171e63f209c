//! # Error Types
//!
//! Domain-specific error types for shop-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  shop-core errors (this file)                                          │
//! │  ├── CoreError        - Cart engine contract violations                │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  shop-db errors (separate crate)                                       │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  shop-api errors                                                       │
//! │  └── ApiError         - What the caller sees (code + status)           │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError (400)                    │
//! │        DbError ───────────────────► ApiError (404 / 409 / 500)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The cart engine never talks to storage, so a `CoreError` always means the
//! caller broke the contract (bad quantity, bad input). It is reported
//! synchronously and never retried.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Cart engine and domain errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Quantity below 1 was passed to a cart operation.
    ///
    /// ## When This Occurs
    /// - `add_item(cart, item, 0)`
    /// - `remove_item(cart, item, -3)`
    ///
    /// The cart is left untouched.
    #[error("Invalid quantity {quantity}: must be at least 1")]
    InvalidQuantity { quantity: i64 },

    /// Quantity exceeds the per-operation maximum.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// An item with a negative price was offered to a cart.
    #[error("Item {item_id} has invalid price {cents}: must not be negative")]
    InvalidPrice { item_id: i64, cents: i64 },

    /// The resulting total would not fit in `Money`.
    ///
    /// Raised before anything changes, so the cart is left untouched.
    #[error("Total exceeds the representable amount")]
    TotalOverflow,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any business logic or storage access runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Two fields that must agree do not (password confirmation).
    #[error("{field} does not match {other}")]
    Mismatch { field: String, other: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InvalidQuantity { quantity: 0 };
        assert_eq!(err.to_string(), "Invalid quantity 0: must be at least 1");

        let err = CoreError::QuantityTooLarge {
            requested: 1000,
            max: 999,
        };
        assert_eq!(
            err.to_string(),
            "Quantity 1000 exceeds maximum allowed (999)"
        );

        let err = CoreError::InvalidPrice {
            item_id: 3,
            cents: -1,
        };
        assert_eq!(
            err.to_string(),
            "Item 3 has invalid price -1: must not be negative"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "username".to_string(),
        };
        assert_eq!(err.to_string(), "username is required");

        let err = ValidationError::Mismatch {
            field: "password".to_string(),
            other: "confirmPassword".to_string(),
        };
        assert_eq!(err.to_string(), "password does not match confirmPassword");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::TooShort {
            field: "password".to_string(),
            min: 7,
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
