//! # In-Memory Store
//!
//! A process-local implementation of every store trait, for tests, demos
//! and embedding without SQLite. It enforces the same rules the SQLite
//! schema does: unique usernames, one cart per user, cart items must exist
//! in the catalog, unique order ids. Cart saves carry the same version
//! check as the SQLite repository.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use shop_core::validation::{validate_item_name, validate_price_cents};
use shop_core::{Cart, Item, Money, User, UserOrder};
use shop_db::{DbError, DbResult};

use super::{CartStore, ItemStore, OrderStore, UserStore};

#[derive(Debug, Clone)]
struct StoredUser {
    username: String,
    password_hash: String,
    cart_id: i64,
}

#[derive(Debug, Default)]
struct Tables {
    next_user_id: i64,
    next_cart_id: i64,
    next_item_id: i64,
    users: HashMap<i64, StoredUser>,
    carts: HashMap<i64, Cart>,
    // insertion order = id order
    items: Vec<Item>,
    orders: Vec<UserOrder>,
}

impl Tables {
    fn load_user(&self, id: i64, stored: &StoredUser) -> DbResult<User> {
        let cart = self
            .carts
            .get(&stored.cart_id)
            .cloned()
            .ok_or_else(|| DbError::not_found("Cart for user", id))?;

        Ok(User::new(
            id,
            stored.username.clone(),
            stored.password_hash.clone(),
            cart,
        ))
    }
}

/// All four stores behind one `RwLock`.
///
/// ## Usage
/// ```rust,ignore
/// let store = Arc::new(MemoryStore::new());
/// let shoe = store.insert_item("Shoe", None, Money::from_cents(7999)).await?;
/// let carts = CartController::new(store.clone(), store.clone(), store.clone());
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a catalog item and returns it with its assigned id.
    pub async fn insert_item(
        &self,
        name: &str,
        description: Option<&str>,
        price: Money,
    ) -> DbResult<Item> {
        validate_item_name(name)?;
        validate_price_cents(price.cents())?;

        let mut tables = self.tables.write().await;
        tables.next_item_id += 1;

        let mut item = Item::new(tables.next_item_id, name.trim(), price);
        if let Some(description) = description {
            item = item.with_description(description);
        }
        tables.items.push(item.clone());

        debug!(item_id = item.id, "Item inserted (memory)");
        Ok(item)
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_id(&self, id: i64) -> DbResult<Option<User>> {
        let tables = self.tables.read().await;
        match tables.users.get(&id) {
            Some(stored) => tables.load_user(id, stored).map(Some),
            None => Ok(None),
        }
    }

    async fn find_by_username(&self, username: &str) -> DbResult<Option<User>> {
        let tables = self.tables.read().await;
        let found = tables
            .users
            .iter()
            .find(|(_, stored)| stored.username == username);

        match found {
            Some((id, stored)) => tables.load_user(*id, stored).map(Some),
            None => Ok(None),
        }
    }

    async fn create(&self, username: &str, password_hash: &str) -> DbResult<User> {
        let mut tables = self.tables.write().await;

        if tables.users.values().any(|u| u.username == username) {
            return Err(DbError::duplicate("username", username));
        }

        tables.next_user_id += 1;
        tables.next_cart_id += 1;
        let user_id = tables.next_user_id;
        let cart = Cart::new(tables.next_cart_id, user_id);

        tables.carts.insert(cart.id(), cart.clone());
        tables.users.insert(
            user_id,
            StoredUser {
                username: username.to_string(),
                password_hash: password_hash.to_string(),
                cart_id: cart.id(),
            },
        );

        debug!(user_id, "User created (memory)");
        Ok(User::new(user_id, username, password_hash, cart))
    }
}

#[async_trait]
impl ItemStore for MemoryStore {
    async fn find_all(&self) -> DbResult<Vec<Item>> {
        Ok(self.tables.read().await.items.clone())
    }

    async fn find_by_id(&self, id: i64) -> DbResult<Option<Item>> {
        let tables = self.tables.read().await;
        Ok(tables.items.iter().find(|i| i.id == id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> DbResult<Vec<Item>> {
        let tables = self.tables.read().await;
        Ok(tables
            .items
            .iter()
            .filter(|i| i.name == name)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl CartStore for MemoryStore {
    async fn save(&self, cart: &mut Cart) -> DbResult<()> {
        let mut tables = self.tables.write().await;

        match tables.carts.get(&cart.id()) {
            Some(stored) if stored.user_id() != cart.user_id() => {
                return Err(DbError::not_found("Cart", cart.id()))
            }
            Some(stored) if stored.version() != cart.version() => {
                return Err(DbError::conflict("Cart", cart.id()))
            }
            Some(_) => {}
            None => return Err(DbError::not_found("Cart", cart.id())),
        }

        if let Some(missing) = cart
            .items()
            .iter()
            .find(|item| !tables.items.iter().any(|i| i.id == item.id))
        {
            return Err(DbError::ForeignKeyViolation {
                message: format!("item {} is not in the catalog", missing.id),
            });
        }

        cart.mark_saved(cart.version() + 1);
        tables.carts.insert(cart.id(), cart.clone());
        Ok(())
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn save(&self, order: &UserOrder) -> DbResult<()> {
        let mut tables = self.tables.write().await;

        if !tables.users.contains_key(&order.user().id) {
            return Err(DbError::ForeignKeyViolation {
                message: format!("user {} does not exist", order.user().id),
            });
        }
        if tables.orders.iter().any(|o| o.id() == order.id()) {
            return Err(DbError::duplicate("order id", order.id()));
        }

        tables.orders.push(order.clone());
        Ok(())
    }

    async fn find_by_user(&self, user_id: i64) -> DbResult<Vec<UserOrder>> {
        let tables = self.tables.read().await;
        Ok(tables
            .orders
            .iter()
            .filter(|o| o.user().id == user_id)
            .cloned()
            .collect())
    }
}
