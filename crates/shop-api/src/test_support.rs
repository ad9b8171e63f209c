//! Spy stores for controller tests.
//!
//! `SpyStore` forwards to a [`MemoryStore`] and records every call as
//! `"<store>.<method>"`, so tests can assert that a store was never touched.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use shop_core::{Cart, Item, Money, User, UserOrder};
use shop_db::DbResult;

use crate::store::{CartStore, ItemStore, MemoryStore, OrderStore, PasswordEncoder, UserStore};

#[derive(Debug, Default)]
pub struct SpyStore {
    pub inner: MemoryStore,
    calls: Mutex<Vec<String>>,
}

impl SpyStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn record(&self, call: &str) {
        self.calls.lock().unwrap().push(call.to_string());
    }

    /// Every recorded call, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of calls made to one store, e.g. `calls_to("cart")`.
    pub fn calls_to(&self, store: &str) -> usize {
        let prefix = format!("{store}.");
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.starts_with(&prefix))
            .count()
    }

    pub fn reset(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Creates user `username` and returns it, without recording the call.
    pub async fn seed_user(&self, username: &str) -> User {
        self.inner.create(username, "hashed").await.unwrap()
    }

    /// Adds a catalog item without recording the call.
    pub async fn seed_item(&self, name: &str, cents: i64) -> Item {
        self.inner
            .insert_item(name, None, Money::from_cents(cents))
            .await
            .unwrap()
    }
}

#[async_trait]
impl UserStore for SpyStore {
    async fn find_by_id(&self, id: i64) -> DbResult<Option<User>> {
        self.record("user.find_by_id");
        UserStore::find_by_id(&self.inner, id).await
    }

    async fn find_by_username(&self, username: &str) -> DbResult<Option<User>> {
        self.record("user.find_by_username");
        self.inner.find_by_username(username).await
    }

    async fn create(&self, username: &str, password_hash: &str) -> DbResult<User> {
        self.record("user.create");
        self.inner.create(username, password_hash).await
    }
}

#[async_trait]
impl ItemStore for SpyStore {
    async fn find_all(&self) -> DbResult<Vec<Item>> {
        self.record("item.find_all");
        self.inner.find_all().await
    }

    async fn find_by_id(&self, id: i64) -> DbResult<Option<Item>> {
        self.record("item.find_by_id");
        ItemStore::find_by_id(&self.inner, id).await
    }

    async fn find_by_name(&self, name: &str) -> DbResult<Vec<Item>> {
        self.record("item.find_by_name");
        self.inner.find_by_name(name).await
    }
}

#[async_trait]
impl CartStore for SpyStore {
    async fn save(&self, cart: &mut Cart) -> DbResult<()> {
        self.record("cart.save");
        CartStore::save(&self.inner, cart).await
    }
}

#[async_trait]
impl OrderStore for SpyStore {
    async fn save(&self, order: &UserOrder) -> DbResult<()> {
        self.record("order.save");
        OrderStore::save(&self.inner, order).await
    }

    async fn find_by_user(&self, user_id: i64) -> DbResult<Vec<UserOrder>> {
        self.record("order.find_by_user");
        self.inner.find_by_user(user_id).await
    }
}

/// Reversible stand-in for a real hasher.
#[derive(Debug, Default)]
pub struct FakeEncoder;

impl PasswordEncoder for FakeEncoder {
    fn encode(&self, raw_password: &str) -> String {
        format!("hashed:{raw_password}")
    }
}
