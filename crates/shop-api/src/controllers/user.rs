//! # User Controller
//!
//! Registration and user lookup.
//!
//! ## Registration
//! ```text
//! create_user { username, password, confirmPassword }
//!      │
//!      ├── username blank / too long ─────────────► 400
//!      ├── password missing / short / mismatched ─► 400
//!      ├── encoder.encode(password)
//!      ├── users.create(username, hash)
//!      │       └── username taken ────────────────► 400
//!      └── 200 + user (with its new empty cart)
//! ```
//!
//! The raw password never leaves this module; only the encoded form is
//! stored, and `User` never serializes it.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::controllers::require_user;
use crate::error::{ApiError, ApiResult};
use crate::store::{PasswordEncoder, UserStore};
use shop_core::validation::{validate_new_password, validate_username};
use shop_core::{CoreError, User};

/// Registration body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[serde(default)]
    pub username: String,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
}

impl CreateUserRequest {
    pub fn new(username: impl Into<String>, password: &str, confirm_password: &str) -> Self {
        CreateUserRequest {
            username: username.into(),
            password: Some(password.to_string()),
            confirm_password: Some(confirm_password.to_string()),
        }
    }
}

pub struct UserController {
    users: Arc<dyn UserStore>,
    encoder: Arc<dyn PasswordEncoder>,
    min_password_length: usize,
}

impl UserController {
    pub fn new(
        users: Arc<dyn UserStore>,
        encoder: Arc<dyn PasswordEncoder>,
        min_password_length: usize,
    ) -> Self {
        UserController {
            users,
            encoder,
            min_password_length,
        }
    }

    pub async fn find_by_id(&self, id: i64) -> ApiResult<User> {
        debug!(user_id = id, "find_by_id");

        self.users.find_by_id(id).await?.ok_or_else(|| {
            warn!(user_id = id, "User not found");
            ApiError::not_found("User", id)
        })
    }

    pub async fn find_by_username(&self, username: &str) -> ApiResult<User> {
        debug!(username = %username, "find_by_username");
        require_user(self.users.as_ref(), username).await
    }

    /// Registers a user and creates its cart.
    pub async fn create_user(&self, request: &CreateUserRequest) -> ApiResult<User> {
        debug!(username = %request.username, "create_user");

        let username = validate_username(&request.username).map_err(|e| {
            warn!(error = %e, "Registration rejected");
            ApiError::from(CoreError::from(e))
        })?;

        validate_new_password(
            request.password.as_deref(),
            request.confirm_password.as_deref(),
            self.min_password_length,
        )
        .map_err(|e| {
            warn!(username = %username, error = %e, "Registration rejected");
            ApiError::from(CoreError::from(e))
        })?;

        // validated above
        let password = request.password.as_deref().unwrap_or_default();
        let password_hash = self.encoder.encode(password);

        let user = self.users.create(&username, &password_hash).await?;

        info!(user_id = user.id, username = %user.username, "User registered");
        Ok(user)
    }
}
