//! # Item Repository
//!
//! Catalog reads for the shop, plus inserts used by seeding and tests.
//! Name lookups are exact matches; the catalog is small enough that there
//! is no search index beyond `idx_items_name`.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use shop_core::validation::{validate_item_name, validate_price_cents};
use shop_core::Item;

/// Repository for catalog items.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ItemRepository::new(pool);
///
/// let shoes = repo.find_by_name("Shoe").await?;
/// let item = repo.get_by_id(1).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ItemRepository {
    pool: SqlitePool,
}

impl ItemRepository {
    /// Creates a new ItemRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ItemRepository { pool }
    }

    /// Inserts a catalog item and returns it with its assigned id.
    ///
    /// Name and price are checked before touching the database, so a bad
    /// row never reaches the `CHECK` constraint.
    ///
    /// ## Errors
    /// * `Validation` - Empty or overlong name, price outside `0..=MAX_PRICE_CENTS`
    pub async fn insert(
        &self,
        name: &str,
        description: Option<&str>,
        price_cents: i64,
    ) -> DbResult<Item> {
        validate_item_name(name)?;
        validate_price_cents(price_cents)?;

        let name = name.trim();

        let id = sqlx::query(
            r#"
            INSERT INTO items (name, description, price_cents)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(name)
        .bind(description)
        .bind(price_cents)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        debug!(item_id = id, name = %name, price_cents, "Item inserted");

        Ok(Item {
            id,
            name: name.to_string(),
            description: description.map(str::to_string),
            price_cents,
        })
    }

    /// Gets an item by id.
    ///
    /// ## Returns
    /// * `Ok(Some(Item))` - Item found
    /// * `Ok(None)` - No such item
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Item>> {
        let item = sqlx::query_as::<_, Item>(
            r#"
            SELECT id, name, description, price_cents
            FROM items
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// Lists the whole catalog in insertion order.
    pub async fn find_all(&self) -> DbResult<Vec<Item>> {
        let items = sqlx::query_as::<_, Item>(
            r#"
            SELECT id, name, description, price_cents
            FROM items
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = items.len(), "Catalog listed");
        Ok(items)
    }

    /// Lists every item whose name equals `name` exactly.
    pub async fn find_by_name(&self, name: &str) -> DbResult<Vec<Item>> {
        let items = sqlx::query_as::<_, Item>(
            r#"
            SELECT id, name, description, price_cents
            FROM items
            WHERE name = ?1
            ORDER BY id
            "#,
        )
        .bind(name)
        .fetch_all(&self.pool)
        .await?;

        debug!(name = %name, count = items.len(), "Items found by name");
        Ok(items)
    }

    /// Number of catalog items.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
