//! # Cart Controller
//!
//! Adds items to and removes items from a user's cart.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  add_to_cart { username, itemId, quantity }                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  1. users.find_by_username ── None ──► 404 (items, carts untouched)    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  2. items.find_by_id ──────── None ──► 404 (carts untouched)           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  3. cart.add_item(item, qty) ─ Err ──► 400 (nothing saved)             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  4. carts.save(cart) ─────────────────► 200 + updated cart             │
//! │                     └─ stale version ──► 409 (nothing saved)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `remove_from_cart` follows the same steps with `remove_item`.
//!
//! ## Concurrency
//! Steps 1-4 run under a per-username async lock, so two requests for the
//! same cart inside one controller apply one after the other and both land.
//! A writer outside this controller (another process on the same database)
//! is caught by the store's version check and reported as a 409.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, warn};

use crate::controllers::require_user;
use crate::error::{ApiError, ApiResult};
use crate::store::{CartStore, ItemStore, UserStore};
use shop_core::{Cart, Item};

/// Body of both cart mutations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifyCartRequest {
    pub username: String,
    pub item_id: i64,
    pub quantity: i64,
}

impl ModifyCartRequest {
    pub fn new(username: impl Into<String>, item_id: i64, quantity: i64) -> Self {
        ModifyCartRequest {
            username: username.into(),
            item_id,
            quantity,
        }
    }
}

/// One async lock per username with a cart operation in flight.
#[derive(Debug, Default)]
struct CartLocks {
    locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl CartLocks {
    fn for_user(&self, username: &str) -> Arc<AsyncMutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        // drop entries nobody holds or waits on
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        locks.entry(username.to_string()).or_default().clone()
    }
}

pub struct CartController {
    users: Arc<dyn UserStore>,
    items: Arc<dyn ItemStore>,
    carts: Arc<dyn CartStore>,
    locks: CartLocks,
}

impl CartController {
    pub fn new(
        users: Arc<dyn UserStore>,
        items: Arc<dyn ItemStore>,
        carts: Arc<dyn CartStore>,
    ) -> Self {
        CartController {
            users,
            items,
            carts,
            locks: CartLocks::default(),
        }
    }

    /// Adds `quantity` copies of the item to the user's cart.
    pub async fn add_to_cart(&self, request: &ModifyCartRequest) -> ApiResult<Cart> {
        debug!(
            username = %request.username,
            item_id = request.item_id,
            quantity = request.quantity,
            "add_to_cart"
        );

        let lock = self.locks.for_user(&request.username);
        let _guard = lock.lock().await;

        let (mut cart, item) = self.load(request).await?;

        cart.add_item(&item, request.quantity).map_err(|e| {
            warn!(error = %e, "Cart add rejected");
            ApiError::from(e)
        })?;

        self.carts.save(&mut cart).await?;
        Ok(cart)
    }

    /// Removes up to `quantity` copies of the item from the user's cart.
    ///
    /// Asking for more copies than the cart holds removes all of them.
    pub async fn remove_from_cart(&self, request: &ModifyCartRequest) -> ApiResult<Cart> {
        debug!(
            username = %request.username,
            item_id = request.item_id,
            quantity = request.quantity,
            "remove_from_cart"
        );

        let lock = self.locks.for_user(&request.username);
        let _guard = lock.lock().await;

        let (mut cart, item) = self.load(request).await?;

        let removed = cart.remove_item(&item, request.quantity).map_err(|e| {
            warn!(error = %e, "Cart remove rejected");
            ApiError::from(e)
        })?;
        debug!(removed, "Copies removed");

        self.carts.save(&mut cart).await?;
        Ok(cart)
    }

    async fn load(&self, request: &ModifyCartRequest) -> ApiResult<(Cart, Item)> {
        let user = require_user(self.users.as_ref(), &request.username).await?;

        let item = match self.items.find_by_id(request.item_id).await? {
            Some(item) => item,
            None => {
                warn!(item_id = request.item_id, "Item not found");
                return Err(ApiError::not_found("Item", request.item_id));
            }
        };

        Ok((user.cart, item))
    }
}
