//! # Repository Module
//!
//! SQLite repositories for the shop.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Controller                                                            │
//! │       │  users.find_by_username("test")                                │
//! │       ▼                                                                 │
//! │  Store trait (shop-api)                                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  UserRepository / ItemRepository / CartRepository / OrderRepository    │
//! │       │  SQL                                                            │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`user::UserRepository`] - Registration and lookup, cart loaded alongside
//! - [`item::ItemRepository`] - Catalog reads and inserts
//! - [`cart::CartRepository`] - Cart load and full-replace save
//! - [`order::OrderRepository`] - Order snapshots

pub mod cart;
pub mod item;
pub mod order;
pub mod user;

/// Shared fixtures for repository tests.
#[cfg(test)]
pub(crate) mod test_support {
    use crate::pool::{Database, DbConfig};

    pub async fn test_db() -> Database {
        Database::new(DbConfig::in_memory())
            .await
            .expect("in-memory database")
    }
}
