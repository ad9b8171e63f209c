//! # User Repository
//!
//! Registration and lookup. Every user owns exactly one cart, so both rows
//! are written in the same transaction and a user is always loaded
//! together with its cart.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::repository::cart::CartRepository;
use shop_core::{Cart, User};

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    password_hash: String,
}

/// Repository for users.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Creates a user and its empty cart.
    ///
    /// ## Errors
    /// * `UniqueViolation` - Username already taken
    pub async fn create(&self, username: &str, password_hash: &str) -> DbResult<User> {
        let mut tx = self.pool.begin().await?;
        let now = Utc::now();

        let user_id = sqlx::query(
            r#"
            INSERT INTO users (username, password_hash, created_at)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { .. } => DbError::duplicate("username", username),
            other => other,
        })?
        .last_insert_rowid();

        let cart_id = sqlx::query(
            r#"
            INSERT INTO carts (user_id, total_cents, updated_at)
            VALUES (?1, 0, ?2)
            "#,
        )
        .bind(user_id)
        .bind(now)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(user_id, cart_id, username = %username, "User created");

        Ok(User::new(
            user_id,
            username,
            password_hash,
            Cart::new(cart_id, user_id),
        ))
    }

    /// Finds a user by id.
    pub async fn find_by_id(&self, id: i64) -> DbResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, password_hash FROM users WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        self.with_cart(row).await
    }

    /// Finds a user by exact username.
    pub async fn find_by_username(&self, username: &str) -> DbResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, password_hash FROM users WHERE username = ?1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        self.with_cart(row).await
    }

    async fn with_cart(&self, row: Option<UserRow>) -> DbResult<Option<User>> {
        let Some(row) = row else {
            return Ok(None);
        };

        let cart = CartRepository::new(self.pool.clone())
            .get_by_user(row.id)
            .await?
            .ok_or_else(|| DbError::not_found("Cart for user", row.id))?;

        debug!(user_id = row.id, "User loaded");
        Ok(Some(User::new(row.id, row.username, row.password_hash, cart)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::test_db;

    #[tokio::test]
    async fn test_create_user_with_empty_cart() {
        let db = test_db().await;

        let user = db.users().create("test", "hash").await.unwrap();

        assert_eq!(user.username, "test");
        assert_eq!(user.cart.user_id(), user.id);
        assert!(user.cart.is_empty());
    }

    #[tokio::test]
    async fn test_find_by_username_and_id() {
        let db = test_db().await;
        let created = db.users().create("test", "hash").await.unwrap();

        let by_name = db.users().find_by_username("test").await.unwrap().unwrap();
        assert_eq!(by_name.id, created.id);
        assert_eq!(by_name.password_hash, "hash");
        assert_eq!(by_name.cart, created.cart);

        let by_id = db.users().find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(by_id.username, "test");

        assert!(db.users().find_by_username("nobody").await.unwrap().is_none());
        assert!(db.users().find_by_id(404).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username() {
        let db = test_db().await;
        db.users().create("test", "hash").await.unwrap();

        let err = db.users().create("test", "other").await.unwrap_err();

        match err {
            DbError::UniqueViolation { field, value } => {
                assert_eq!(field, "username");
                assert_eq!(value, "test");
            }
            other => panic!("expected UniqueViolation, got {other:?}"),
        }
    }
}
