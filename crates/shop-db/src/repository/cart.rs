//! # Cart Repository
//!
//! Loads and saves carts. A cart is stored as its header row plus one
//! `cart_items` row per copy of an item, so quantity is row count.
//!
//! ## Save Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  save(cart)                                                            │
//! │    BEGIN                                                                │
//! │      UPDATE carts SET …, version = version + 1                         │
//! │        WHERE id = ? AND user_id = ? AND version = ?                    │
//! │        0 rows → row exists ? Conflict : NotFound   (rollback)          │
//! │      DELETE FROM cart_items WHERE cart_id = ?                          │
//! │      INSERT cart_items (position 0..n)                                 │
//! │    COMMIT                                                               │
//! │    cart.mark_saved(version + 1)                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The full replace keeps the stored order identical to the in-memory one.
//! The version check turns a save based on a stale load into a `Conflict`
//! instead of silently overwriting the newer contents.
//! On load the total is recomputed from the items; `total_cents` in the
//! header is only a denormalized copy.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::error::{DbError, DbResult};
use shop_core::{Cart, Item};

/// Repository for carts.
#[derive(Debug, Clone)]
pub struct CartRepository {
    pool: SqlitePool,
}

impl CartRepository {
    /// Creates a new CartRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CartRepository { pool }
    }

    /// Loads the cart owned by `user_id`.
    ///
    /// ## Returns
    /// * `Ok(Some(Cart))` - Cart with items in insertion order
    /// * `Ok(None)` - User has no cart row
    pub async fn get_by_user(&self, user_id: i64) -> DbResult<Option<Cart>> {
        let header: Option<(i64, i64)> =
            sqlx::query_as("SELECT id, version FROM carts WHERE user_id = ?1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        let Some((cart_id, version)) = header else {
            return Ok(None);
        };

        let items = self.load_items(cart_id).await?;
        debug!(cart_id, user_id, version, count = items.len(), "Cart loaded");

        let cart = Cart::from_parts(cart_id, user_id, version, items)
            .map_err(|e| DbError::Internal(format!("cart {cart_id}: {e}")))?;
        Ok(Some(cart))
    }

    async fn load_items(&self, cart_id: i64) -> DbResult<Vec<Item>> {
        let items = sqlx::query_as::<_, Item>(
            r#"
            SELECT i.id, i.name, i.description, i.price_cents
            FROM cart_items ci
            INNER JOIN items i ON i.id = ci.item_id
            WHERE ci.cart_id = ?1
            ORDER BY ci.position
            "#,
        )
        .bind(cart_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Persists the cart's current contents, replacing what was stored.
    ///
    /// On success the cart's version is advanced to the stored one, so the
    /// same value can be saved again.
    ///
    /// ## Errors
    /// * `NotFound` - No cart row with this id and owner
    /// * `Conflict` - The stored cart was saved since `cart` was loaded
    /// * `ForeignKeyViolation` - An item is not in the catalog
    pub async fn save(&self, cart: &mut Cart) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            r#"
            UPDATE carts
            SET total_cents = ?1, updated_at = ?2, version = version + 1
            WHERE id = ?3 AND user_id = ?4 AND version = ?5
            "#,
        )
        .bind(cart.total().cents())
        .bind(Utc::now())
        .bind(cart.id())
        .bind(cart.user_id())
        .bind(cart.version())
        .execute(&mut *tx)
        .await?
        .rows_affected();

        // dropping tx rolls back
        if updated == 0 {
            let exists: i64 =
                sqlx::query_scalar("SELECT COUNT(*) FROM carts WHERE id = ?1 AND user_id = ?2")
                    .bind(cart.id())
                    .bind(cart.user_id())
                    .fetch_one(&mut *tx)
                    .await?;

            if exists > 0 {
                warn!(
                    cart_id = cart.id(),
                    version = cart.version(),
                    "Stale cart save rejected"
                );
                return Err(DbError::conflict("Cart", cart.id()));
            }
            return Err(DbError::not_found("Cart", cart.id()));
        }

        sqlx::query("DELETE FROM cart_items WHERE cart_id = ?1")
            .bind(cart.id())
            .execute(&mut *tx)
            .await?;

        for (position, item) in cart.items().iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO cart_items (cart_id, position, item_id)
                VALUES (?1, ?2, ?3)
                "#,
            )
            .bind(cart.id())
            .bind(position as i64)
            .bind(item.id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;
        cart.mark_saved(cart.version() + 1);

        debug!(
            cart_id = cart.id(),
            version = cart.version(),
            items = cart.len(),
            total_cents = cart.total().cents(),
            "Cart saved"
        );
        Ok(())
    }
}
