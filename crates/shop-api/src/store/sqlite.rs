//! SQLite-backed stores: thin adapters from the store traits onto the
//! shop-db repositories.

use async_trait::async_trait;

use shop_core::{Cart, Item, User, UserOrder};
use shop_db::{CartRepository, DbResult, ItemRepository, OrderRepository, UserRepository};

use super::{CartStore, ItemStore, OrderStore, UserStore};

#[async_trait]
impl UserStore for UserRepository {
    async fn find_by_id(&self, id: i64) -> DbResult<Option<User>> {
        UserRepository::find_by_id(self, id).await
    }

    async fn find_by_username(&self, username: &str) -> DbResult<Option<User>> {
        UserRepository::find_by_username(self, username).await
    }

    async fn create(&self, username: &str, password_hash: &str) -> DbResult<User> {
        UserRepository::create(self, username, password_hash).await
    }
}

#[async_trait]
impl ItemStore for ItemRepository {
    async fn find_all(&self) -> DbResult<Vec<Item>> {
        ItemRepository::find_all(self).await
    }

    async fn find_by_id(&self, id: i64) -> DbResult<Option<Item>> {
        self.get_by_id(id).await
    }

    async fn find_by_name(&self, name: &str) -> DbResult<Vec<Item>> {
        ItemRepository::find_by_name(self, name).await
    }
}

#[async_trait]
impl CartStore for CartRepository {
    async fn save(&self, cart: &mut Cart) -> DbResult<()> {
        CartRepository::save(self, cart).await
    }
}

#[async_trait]
impl OrderStore for OrderRepository {
    async fn save(&self, order: &UserOrder) -> DbResult<()> {
        OrderRepository::save(self, order).await
    }

    async fn find_by_user(&self, user_id: i64) -> DbResult<Vec<UserOrder>> {
        OrderRepository::find_by_user(self, user_id).await
    }
}
