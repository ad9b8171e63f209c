//! # Order Repository
//!
//! Stores order snapshots. Item name, description and price are copied into
//! `order_items`, so an order never changes when the catalog does.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use shop_core::{Item, OrderOwner, UserOrder};

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: String,
    user_id: i64,
    username: String,
    created_at: DateTime<Utc>,
}

/// Repository for submitted orders.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Saves an order and its item copies in one transaction.
    ///
    /// ## Errors
    /// * `UniqueViolation` - Order id already stored
    /// * `ForeignKeyViolation` - Owner is not a known user
    pub async fn save(&self, order: &UserOrder) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO orders (id, user_id, username, total_cents, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(order.id())
        .bind(order.user().id)
        .bind(&order.user().username)
        .bind(order.total().cents())
        .bind(order.created_at())
        .execute(&mut *tx)
        .await?;

        for (position, item) in order.items().iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO order_items
                    (order_id, position, item_id, name, description, price_cents)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )
            .bind(order.id())
            .bind(position as i64)
            .bind(item.id)
            .bind(&item.name)
            .bind(&item.description)
            .bind(item.price_cents)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            order_id = %order.id(),
            user_id = order.user().id,
            items = order.items().len(),
            total_cents = order.total().cents(),
            "Order saved"
        );
        Ok(())
    }

    /// Gets an order by id.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<UserOrder>> {
        let row = sqlx::query_as::<_, OrderRow>(
            "SELECT id, user_id, username, created_at FROM orders WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(self.hydrate(row).await?)),
            None => Ok(None),
        }
    }

    /// Lists a user's orders, oldest first.
    pub async fn find_by_user(&self, user_id: i64) -> DbResult<Vec<UserOrder>> {
        let rows = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT id, user_id, username, created_at
            FROM orders
            WHERE user_id = ?1
            ORDER BY created_at, rowid
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let mut orders = Vec::with_capacity(rows.len());
        for row in rows {
            orders.push(self.hydrate(row).await?);
        }

        debug!(user_id, count = orders.len(), "Orders listed");
        Ok(orders)
    }

    async fn hydrate(&self, row: OrderRow) -> DbResult<UserOrder> {
        let items = sqlx::query_as::<_, Item>(
            r#"
            SELECT item_id AS id, name, description, price_cents
            FROM order_items
            WHERE order_id = ?1
            ORDER BY position
            "#,
        )
        .bind(&row.id)
        .fetch_all(&self.pool)
        .await?;

        let owner = OrderOwner {
            id: row.user_id,
            username: row.username,
        };

        let order_id = row.id.clone();
        UserOrder::from_parts(row.id, owner, items, row.created_at)
            .map_err(|e| DbError::Internal(format!("order {order_id}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::test_db;
    use shop_core::Money;

    #[tokio::test]
    async fn test_save_and_reload_order() {
        let db = test_db().await;
        let mut user = db.users().create("test", "hash").await.unwrap();
        let shoe = db.items().insert("Shoe", Some("Left"), 7999).await.unwrap();
        user.cart.add_item(&shoe, 2).unwrap();

        let order = UserOrder::from_user_cart(&user);
        db.orders().save(&order).await.unwrap();

        let loaded = db.orders().get_by_id(order.id()).await.unwrap().unwrap();
        assert_eq!(loaded.id(), order.id());
        assert_eq!(loaded.user(), order.user());
        assert_eq!(loaded.items(), order.items());
        assert_eq!(loaded.total(), Money::from_cents(15998));
    }

    #[tokio::test]
    async fn test_find_by_user_returns_only_theirs() {
        let db = test_db().await;
        let mut alice = db.users().create("alice", "hash").await.unwrap();
        let bob = db.users().create("bob", "hash").await.unwrap();
        let pen = db.items().insert("Pen", None, 100).await.unwrap();

        alice.cart.add_item(&pen, 1).unwrap();
        db.orders().save(&UserOrder::from_user_cart(&alice)).await.unwrap();
        alice.cart.add_item(&pen, 1).unwrap();
        db.orders().save(&UserOrder::from_user_cart(&alice)).await.unwrap();

        let orders = db.orders().find_by_user(alice.id).await.unwrap();
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].total(), Money::from_cents(100));
        assert_eq!(orders[1].total(), Money::from_cents(200));

        assert!(db.orders().find_by_user(bob.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_order_survives_catalog_change() {
        let db = test_db().await;
        let mut user = db.users().create("test", "hash").await.unwrap();
        let pen = db.items().insert("Pen", None, 100).await.unwrap();
        user.cart.add_item(&pen, 1).unwrap();
        let order = UserOrder::from_user_cart(&user);
        db.orders().save(&order).await.unwrap();

        sqlx::query("UPDATE items SET price_cents = 999 WHERE id = ?1")
            .bind(pen.id)
            .execute(db.pool())
            .await
            .unwrap();

        let loaded = db.orders().get_by_id(order.id()).await.unwrap().unwrap();
        assert_eq!(loaded.total(), Money::from_cents(100));
    }

    #[tokio::test]
    async fn test_duplicate_order_id_rejected() {
        let db = test_db().await;
        let user = db.users().create("test", "hash").await.unwrap();
        let order = UserOrder::snapshot("fixed-id", &user, Utc::now());

        db.orders().save(&order).await.unwrap();
        let err = db.orders().save(&order).await.unwrap_err();

        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }
}
