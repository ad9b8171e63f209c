//! # Domain Types
//!
//! Catalog items and users.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Item       │   │      User       │   │      Cart       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  id, user_id    │       │
//! │  │  name           │   │  username       │◄─►│  items (copies) │       │
//! │  │  price_cents    │   │  password_hash  │1:1│  total (derived)│       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Items are immutable from the cart's point of view: a cart stores copies
//! and never writes back to the catalog.

use serde::{Deserialize, Serialize};

use crate::cart::Cart;
use crate::money::Money;

// =============================================================================
// Item
// =============================================================================

/// A catalog entry with a fixed price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Unique identifier, assigned by the catalog store.
    pub id: i64,

    /// Display name.
    pub name: String,

    /// Optional long description.
    pub description: Option<String>,

    /// Price in cents (smallest currency unit). Never negative.
    pub price_cents: i64,
}

impl Item {
    /// Creates an item without a description.
    pub fn new(id: i64, name: impl Into<String>, price: Money) -> Self {
        Item {
            id,
            name: name.into(),
            description: None,
            price_cents: price.cents(),
        }
    }

    /// Attaches a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

// =============================================================================
// User
// =============================================================================

/// A registered shopper. Exclusively owns one cart.
///
/// The password hash is opaque here: it is produced by whatever encoder the
/// surrounding application injects and is never serialized.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub cart: Cart,
}

impl User {
    /// Creates a user that owns the given cart.
    pub fn new(
        id: i64,
        username: impl Into<String>,
        password_hash: impl Into<String>,
        cart: Cart,
    ) -> Self {
        User {
            id,
            username: username.into(),
            password_hash: password_hash.into(),
            cart,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_price() {
        let item = Item::new(1, "Shoe", Money::from_cents(7999));
        assert_eq!(item.price(), Money::from_cents(7999));
        assert!(item.description.is_none());

        let item = item.with_description("Running shoe");
        assert_eq!(item.description.as_deref(), Some("Running shoe"));
    }

    #[test]
    fn test_user_serialization_hides_password_hash() {
        let user = User::new(1, "test", "thisIsHashed", Cart::new(1, 1));
        let json = serde_json::to_value(&user).unwrap();

        assert_eq!(json["username"], "test");
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["cart"]["total"], 0);
    }
}
