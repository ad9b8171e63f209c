//! # Controllers
//!
//! One controller per resource. Each takes its stores by constructor
//! injection and returns [`ApiResult`](crate::error::ApiResult): `Ok` maps
//! to 200, errors carry their own status via [`ApiError::status`].
//!
//! ## Command Categories
//!
//! | Controller          | Operations                                         |
//! |---------------------|----------------------------------------------------|
//! | [`CartController`]  | add_to_cart, remove_from_cart                      |
//! | [`ItemController`]  | get_items, get_item_by_id, get_items_by_name       |
//! | [`UserController`]  | create_user, find_by_id, find_by_username          |
//! | [`OrderController`] | submit, get_orders_for_user                        |
//!
//! [`ApiError::status`]: crate::error::ApiError::status

pub mod cart;
pub mod item;
pub mod order;
pub mod user;

pub use cart::{CartController, ModifyCartRequest};
pub use item::ItemController;
pub use order::OrderController;
pub use user::{CreateUserRequest, UserController};

use tracing::warn;

use crate::error::ApiError;
use crate::store::UserStore;
use shop_core::User;

/// Loads a user by username, mapping absence to a 404.
pub(crate) async fn require_user(users: &dyn UserStore, username: &str) -> Result<User, ApiError> {
    match users.find_by_username(username).await? {
        Some(user) => Ok(user),
        None => {
            warn!(username = %username, "User not found");
            Err(ApiError::not_found("User", username))
        }
    }
}
