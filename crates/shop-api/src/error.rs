//! # API Error Type
//!
//! Unified error type for controller operations.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Controller                                                            │
//! │  Result<T, ApiError>                                                   │
//! │         │                                                               │
//! │         ├── missing user/item ──────────► NotFound         → 404       │
//! │         ├── CoreError::Validation ──────► ValidationError  → 400       │
//! │         ├── CoreError::InvalidQuantity ─► CartError        → 400       │
//! │         ├── CoreError::TotalOverflow ───► CartError        → 400       │
//! │         ├── DbError::UniqueViolation ───► ValidationError  → 400       │
//! │         ├── DbError::Validation ────────► ValidationError  → 400       │
//! │         ├── DbError::Conflict ──────────► Conflict         → 409       │
//! │         └── DbError (infrastructure) ───► DatabaseError    → 500       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Serialization
//! ```json
//! { "code": "NOT_FOUND", "message": "User not found: test" }
//! ```

use serde::Serialize;
use shop_core::CoreError;
use shop_db::DbError;

/// Error returned from controller operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation failed (400)
    ValidationError,

    /// Cart mutation rejected by the engine (400)
    CartError,

    /// Stale write lost against a concurrent one; reload and retry (409)
    Conflict,

    /// Database operation failed (500)
    DatabaseError,
}

impl ErrorCode {
    /// HTTP-style status code for this error.
    pub fn status(self) -> u16 {
        match self {
            ErrorCode::NotFound => 404,
            ErrorCode::ValidationError | ErrorCode::CartError => 400,
            ErrorCode::Conflict => 409,
            ErrorCode::DatabaseError => 500,
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: impl std::fmt::Display) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{resource} not found: {id}"))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates a cart error.
    pub fn cart(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::CartError, message)
    }

    /// Status code of this error.
    pub fn status(&self) -> u16 {
        self.code.status()
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, id),
            DbError::UniqueViolation { field, value } => ApiError::new(
                ErrorCode::ValidationError,
                format!("{field} '{value}' already exists"),
            ),
            DbError::Validation(e) => ApiError::validation(e.to_string()),
            DbError::Conflict { entity, id } => {
                tracing::warn!(%entity, %id, "Write conflict");
                ApiError::new(
                    ErrorCode::Conflict,
                    format!("{entity} {id} was modified concurrently, reload and retry"),
                )
            }
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                ApiError::new(ErrorCode::ValidationError, "Invalid reference")
            }
            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Database migration failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database transaction failed")
            }
            DbError::PoolExhausted => {
                tracing::error!("Database pool exhausted");
                ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidQuantity { .. }
            | CoreError::QuantityTooLarge { .. }
            | CoreError::InvalidPrice { .. }
            | CoreError::TotalOverflow => ApiError::cart(err.to_string()),
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Result type for controller operations. `Ok` is a 200.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use shop_core::ValidationError;

    #[test]
    fn test_status_codes() {
        assert_eq!(ErrorCode::NotFound.status(), 404);
        assert_eq!(ErrorCode::ValidationError.status(), 400);
        assert_eq!(ErrorCode::CartError.status(), 400);
        assert_eq!(ErrorCode::Conflict.status(), 409);
        assert_eq!(ErrorCode::DatabaseError.status(), 500);
    }

    #[test]
    fn test_core_errors_are_bad_requests() {
        let err = ApiError::from(CoreError::InvalidQuantity { quantity: 0 });
        assert_eq!(err.code, ErrorCode::CartError);
        assert_eq!(err.status(), 400);

        let err = ApiError::from(CoreError::Validation(ValidationError::Required {
            field: "username".to_string(),
        }));
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "username is required");

        let err = ApiError::from(CoreError::TotalOverflow);
        assert_eq!(err.code, ErrorCode::CartError);
        assert_eq!(err.status(), 400);
    }

    #[test]
    fn test_db_errors() {
        let err = ApiError::from(DbError::duplicate("username", "test"));
        assert_eq!(err.status(), 400);
        assert_eq!(err.message, "username 'test' already exists");

        let err = ApiError::from(DbError::not_found("Cart", 3));
        assert_eq!(err.status(), 404);

        let err = ApiError::from(DbError::conflict("Cart", 3));
        assert_eq!(err.code, ErrorCode::Conflict);
        assert_eq!(err.status(), 409);

        // rejected input is the caller's fault, not a server failure
        let err = ApiError::from(DbError::Validation(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: 100,
        }));
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.status(), 400);
        assert_eq!(err.message, "price must be between 0 and 100");

        // internals are not leaked
        let err = ApiError::from(DbError::QueryFailed("syntax error near FROM".into()));
        assert_eq!(err.status(), 500);
        assert_eq!(err.message, "Database operation failed");
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(ApiError::not_found("Item", 7)).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["message"], "Item not found: 7");

        let json = serde_json::to_value(ApiError::from(DbError::conflict("Cart", 1))).unwrap();
        assert_eq!(json["code"], "CONFLICT");
    }
}
