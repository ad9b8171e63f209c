//! # shop-api: Controllers and Store Wiring
//!
//! The application layer of the shop backend.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Application Startup                               │
//! │                                                                         │
//! │  1. AppConfig::load() ───── SHOP_DB_PATH, SHOP_MIN_PASSWORD_LENGTH ... │
//! │                                                                         │
//! │  2. init_tracing(&config.log_filter) ── RUST_LOG wins when set         │
//! │                                                                         │
//! │  3. Database::new(config.db_config()) ── SQLite + migrations           │
//! │                                                                         │
//! │  4. ShopApp::from_database(&db, &config, encoder)                      │
//! │     • repositories wrapped as Arc<dyn ...Store>                        │
//! │     • one controller per resource                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! HTTP routing stays with the embedding application: it deserializes the
//! request bodies defined in [`controllers`], calls a controller and turns
//! an [`ApiError`] into a response via [`ApiError::status`].

pub mod config;
pub mod controllers;
pub mod error;
pub mod store;

#[cfg(test)]
pub(crate) mod test_support;

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

pub use config::{AppConfig, ConfigError};
pub use controllers::{
    CartController, CreateUserRequest, ItemController, ModifyCartRequest, OrderController,
    UserController,
};
pub use error::{ApiError, ApiResult, ErrorCode};
pub use store::{CartStore, ItemStore, MemoryStore, OrderStore, PasswordEncoder, UserStore};

use shop_db::Database;

/// All four controllers, wired to one set of stores.
pub struct ShopApp {
    pub users: UserController,
    pub items: ItemController,
    pub carts: CartController,
    pub orders: OrderController,
}

impl ShopApp {
    /// Wires explicit store handles.
    pub fn new(
        users: Arc<dyn UserStore>,
        items: Arc<dyn ItemStore>,
        carts: Arc<dyn CartStore>,
        orders: Arc<dyn OrderStore>,
        encoder: Arc<dyn PasswordEncoder>,
        config: &AppConfig,
    ) -> Self {
        ShopApp {
            users: UserController::new(users.clone(), encoder, config.min_password_length),
            items: ItemController::new(items.clone()),
            carts: CartController::new(users.clone(), items, carts),
            orders: OrderController::new(users, orders),
        }
    }

    /// Wires the SQLite repositories of `db`.
    pub fn from_database(
        db: &Database,
        config: &AppConfig,
        encoder: Arc<dyn PasswordEncoder>,
    ) -> Self {
        info!("Wiring controllers to SQLite stores");
        ShopApp::new(
            Arc::new(db.users()),
            Arc::new(db.items()),
            Arc::new(db.carts()),
            Arc::new(db.orders()),
            encoder,
            config,
        )
    }

    /// Wires one shared [`MemoryStore`], returned so callers can seed it.
    pub fn in_memory(
        config: &AppConfig,
        encoder: Arc<dyn PasswordEncoder>,
    ) -> (Self, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let app = ShopApp::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            encoder,
            config,
        );
        (app, store)
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - overrides everything
/// - otherwise `filter` (from `SHOP_LOG`, default `info,shop=debug,sqlx=warn`)
///
/// Calling it twice is harmless; the second call leaves the first
/// subscriber in place.
pub fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeEncoder;
    use shop_core::Money;
    use shop_db::DbConfig;

    #[tokio::test]
    async fn test_shopping_flow_on_sqlite() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let shoe = db.items().insert("Shoe", None, 7999).await.unwrap();
        let config = AppConfig::default();
        let app = ShopApp::from_database(&db, &config, Arc::new(FakeEncoder));

        app.users
            .create_user(&CreateUserRequest::new("test", "testPassword", "testPassword"))
            .await
            .unwrap();

        let cart = app
            .carts
            .add_to_cart(&ModifyCartRequest::new("test", shoe.id, 2))
            .await
            .unwrap();
        assert_eq!(cart.total(), Money::from_cents(15998));

        let order = app.orders.submit("test").await.unwrap();
        assert_eq!(order.total(), Money::from_cents(15998));

        // order unaffected by later cart changes
        app.carts
            .remove_from_cart(&ModifyCartRequest::new("test", shoe.id, 2))
            .await
            .unwrap();
        let orders = app.orders.get_orders_for_user("test").await.unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].total(), Money::from_cents(15998));

        let user = app.users.find_by_username("test").await.unwrap();
        assert!(user.cart.is_empty());
    }

    #[tokio::test]
    async fn test_shopping_flow_in_memory() {
        let (app, store) = ShopApp::in_memory(&AppConfig::default(), Arc::new(FakeEncoder));
        let hat = store
            .insert_item("Hat", None, Money::from_cents(1500))
            .await
            .unwrap();

        app.users
            .create_user(&CreateUserRequest::new("test", "testPassword", "testPassword"))
            .await
            .unwrap();
        app.carts
            .add_to_cart(&ModifyCartRequest::new("test", hat.id, 1))
            .await
            .unwrap();

        let hats = app.items.get_items_by_name("Hat").await.unwrap();
        assert_eq!(hats, vec![hat]);

        let order = app.orders.submit("test").await.unwrap();
        assert_eq!(order.total(), Money::from_cents(1500));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_adds_on_file_database_all_land() {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let path = std::env::temp_dir().join(format!(
            "shop-concurrent-{}-{}.db",
            std::process::id(),
            nanos
        ));

        let db = Database::new(DbConfig::new(path.clone())).await.unwrap();
        let pen = db.items().insert("Pen", None, 100).await.unwrap();
        let app = Arc::new(ShopApp::from_database(
            &db,
            &AppConfig::default(),
            Arc::new(FakeEncoder),
        ));
        app.users
            .create_user(&CreateUserRequest::new("test", "testPassword", "testPassword"))
            .await
            .unwrap();

        let tasks: Vec<_> = (0..40)
            .map(|_| {
                let app = app.clone();
                let item_id = pen.id;
                tokio::spawn(async move {
                    app.carts
                        .add_to_cart(&ModifyCartRequest::new("test", item_id, 1))
                        .await
                })
            })
            .collect();
        let mut results = Vec::with_capacity(tasks.len());
        for task in tasks {
            results.push(task.await.unwrap());
        }

        let user = app.users.find_by_username("test").await.unwrap();
        db.close().await;
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{}", path.display(), suffix));
        }

        for result in results {
            result.unwrap();
        }
        assert_eq!(user.cart.len(), 40);
        assert_eq!(user.cart.total(), Money::from_cents(4000));
    }

    #[tokio::test]
    async fn test_add_that_would_overflow_total_is_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        // the CHECK constraint only requires >= 0; catalog validation is bypassed
        let item_id = sqlx::query("INSERT INTO items (name, price_cents) VALUES ('Gold', ?1)")
            .bind(4_611_686_018_427_387_904_i64)
            .execute(db.pool())
            .await
            .unwrap()
            .last_insert_rowid();
        let app = ShopApp::from_database(&db, &AppConfig::default(), Arc::new(FakeEncoder));
        app.users
            .create_user(&CreateUserRequest::new("test", "testPassword", "testPassword"))
            .await
            .unwrap();

        let err = app
            .carts
            .add_to_cart(&ModifyCartRequest::new("test", item_id, 2))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::CartError);
        assert_eq!(err.status(), 400);
        let user = app.users.find_by_username("test").await.unwrap();
        assert!(user.cart.is_empty());
        assert_eq!(user.cart.version(), 0);
    }

    #[test]
    fn test_init_tracing_twice() {
        init_tracing("debug");
        init_tracing("info");
    }
}
