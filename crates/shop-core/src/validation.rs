//! # Validation Module
//!
//! Input validation for user registration and catalog data.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Controller (shop-api)                                        │
//! │  └── THIS MODULE: request shape + business rules → 400 on failure      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Cart engine                                                  │
//! │  └── quantity rules (InvalidQuantity)                                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── UNIQUE(username)                                                  │
//! │  └── CHECK(price_cents >= 0)                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::{MAX_PRICE_CENTS, MAX_USERNAME_LENGTH};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// User Validators
// =============================================================================

/// Validates a username and returns it trimmed.
///
/// ## Example
/// ```rust
/// use shop_core::validation::validate_username;
///
/// assert_eq!(validate_username("  test ").unwrap(), "test");
/// assert!(validate_username("").is_err());
/// ```
pub fn validate_username(username: &str) -> ValidationResult<String> {
    let username = username.trim();

    if username.is_empty() {
        return Err(ValidationError::Required {
            field: "username".to_string(),
        });
    }

    if username.chars().count() > MAX_USERNAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: "username".to_string(),
            max: MAX_USERNAME_LENGTH,
        });
    }

    Ok(username.to_string())
}

/// Validates a new password against its confirmation.
///
/// ## Rules
/// - Password and confirmation must both be present
/// - Password must be at least `min_length` characters
/// - Confirmation must match exactly
///
/// ## User Workflow
/// ```text
/// create_user { password, confirmPassword }
///      │
///      ├── missing?          → Required        → 400
///      ├── too short?        → TooShort        → 400
///      ├── not equal?        → Mismatch        → 400
///      └── OK → hash + store
/// ```
pub fn validate_new_password(
    password: Option<&str>,
    confirm_password: Option<&str>,
    min_length: usize,
) -> ValidationResult<()> {
    let password = password.ok_or_else(|| ValidationError::Required {
        field: "password".to_string(),
    })?;
    let confirm_password = confirm_password.ok_or_else(|| ValidationError::Required {
        field: "confirmPassword".to_string(),
    })?;

    if password.chars().count() < min_length {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: min_length,
        });
    }

    if password != confirm_password {
        return Err(ValidationError::Mismatch {
            field: "password".to_string(),
            other: "confirmPassword".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Catalog Validators
// =============================================================================

/// Validates an item name.
///
/// ## Rules
/// - Must not be empty
/// - At most 200 characters
pub fn validate_item_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a price in cents. Zero is allowed (free items); anything above
/// [`MAX_PRICE_CENTS`] is rejected.
///
/// ## Example
/// ```rust
/// use shop_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(7999).is_ok());
/// assert!(validate_price_cents(0).is_ok());
/// assert!(validate_price_cents(-100).is_err());
/// assert!(validate_price_cents(i64::MAX).is_err());
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if !(0..=MAX_PRICE_CENTS).contains(&cents) {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: MAX_PRICE_CENTS,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MIN_PASSWORD_LENGTH;

    #[test]
    fn test_validate_username() {
        assert_eq!(validate_username("test").unwrap(), "test");
        assert_eq!(validate_username("  padded  ").unwrap(), "padded");

        assert!(validate_username("").is_err());
        assert!(validate_username("   ").is_err());
        assert!(validate_username(&"u".repeat(MAX_USERNAME_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_validate_new_password_happy_path() {
        assert!(validate_new_password(
            Some("testPassword"),
            Some("testPassword"),
            MIN_PASSWORD_LENGTH
        )
        .is_ok());
    }

    #[test]
    fn test_validate_new_password_rejections() {
        // mismatch
        assert_eq!(
            validate_new_password(Some("testtest"), Some("testtesX"), MIN_PASSWORD_LENGTH),
            Err(ValidationError::Mismatch {
                field: "password".to_string(),
                other: "confirmPassword".to_string(),
            })
        );

        // missing password
        assert!(matches!(
            validate_new_password(None, None, MIN_PASSWORD_LENGTH),
            Err(ValidationError::Required { ref field }) if field == "password"
        ));

        // missing confirmation
        assert!(matches!(
            validate_new_password(Some("longenough"), None, MIN_PASSWORD_LENGTH),
            Err(ValidationError::Required { ref field }) if field == "confirmPassword"
        ));

        // too short, even when confirmed
        assert_eq!(
            validate_new_password(Some("test"), Some("test"), MIN_PASSWORD_LENGTH),
            Err(ValidationError::TooShort {
                field: "password".to_string(),
                min: MIN_PASSWORD_LENGTH,
            })
        );
    }

    #[test]
    fn test_password_length_boundary() {
        assert!(validate_new_password(Some("1234567"), Some("1234567"), 7).is_ok());
        assert!(validate_new_password(Some("123456"), Some("123456"), 7).is_err());
    }

    #[test]
    fn test_validate_item_name() {
        assert!(validate_item_name("Shoe").is_ok());
        assert!(validate_item_name("").is_err());
        assert!(validate_item_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_price_cents() {
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(1099).is_ok());
        assert!(validate_price_cents(MAX_PRICE_CENTS).is_ok());

        let expected = Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: MAX_PRICE_CENTS,
        });
        assert_eq!(validate_price_cents(-1), expected);
        assert_eq!(validate_price_cents(MAX_PRICE_CENTS + 1), expected);
        assert_eq!(validate_price_cents(4_611_686_018_427_387_904), expected);
    }
}
