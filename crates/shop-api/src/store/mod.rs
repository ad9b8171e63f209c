//! # Store Traits
//!
//! The storage seams the controllers depend on. Controllers hold
//! `Arc<dyn ...Store>` handles given at construction, so any backend can
//! sit behind them.
//!
//! ## Implementations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  UserStore / ItemStore / CartStore / OrderStore                        │
//! │       │                                                                 │
//! │       ├── sqlite.rs  → shop-db repositories (production)               │
//! │       └── memory.rs  → MemoryStore, one process-local map per table    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every store method returns [`DbResult`]; "not found" is `Ok(None)` (or an
//! empty list), never an error. Controllers decide what absence means.

pub mod memory;
pub mod sqlite;

use async_trait::async_trait;

use shop_core::{Cart, Item, User, UserOrder};
use shop_db::DbResult;

pub use memory::MemoryStore;

/// Users and the cart each one owns.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Looks a user up by id, cart included.
    async fn find_by_id(&self, id: i64) -> DbResult<Option<User>>;

    /// Looks a user up by exact username, cart included.
    async fn find_by_username(&self, username: &str) -> DbResult<Option<User>>;

    /// Creates a user together with an empty cart.
    ///
    /// A taken username fails with `DbError::UniqueViolation`.
    async fn create(&self, username: &str, password_hash: &str) -> DbResult<User>;
}

/// The item catalog (read side).
#[async_trait]
pub trait ItemStore: Send + Sync {
    async fn find_all(&self) -> DbResult<Vec<Item>>;

    async fn find_by_id(&self, id: i64) -> DbResult<Option<Item>>;

    /// Every item whose name equals `name` exactly.
    async fn find_by_name(&self, name: &str) -> DbResult<Vec<Item>>;
}

/// Cart persistence. Carts are created by [`UserStore::create`].
#[async_trait]
pub trait CartStore: Send + Sync {
    /// Persists the cart's full contents and total.
    ///
    /// Fails with `DbError::Conflict` when the stored cart changed since
    /// `cart` was loaded; on success `cart` carries the new version.
    async fn save(&self, cart: &mut Cart) -> DbResult<()>;
}

/// Submitted orders.
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn save(&self, order: &UserOrder) -> DbResult<()>;

    /// All orders of one user, oldest first.
    async fn find_by_user(&self, user_id: i64) -> DbResult<Vec<UserOrder>>;
}

/// Turns a raw password into the stored hash.
///
/// No algorithm ships with this crate; the embedding application supplies
/// one (argon2, bcrypt, ...).
pub trait PasswordEncoder: Send + Sync {
    fn encode(&self, raw_password: &str) -> String;
}
