//! # Order Snapshots
//!
//! A `UserOrder` is a point-in-time copy of a cart, stamped with its owner.
//!
//! ## Snapshot Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  user.cart ──copy items + total──► UserOrder ──► saved independently   │
//! │      │                                                                  │
//! │      └── later add/remove ✗ never reaches the order                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Item details (name, price) are copied, so an order keeps its history even
//! if the catalog changes afterwards. There is no back-reference to the cart.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Item, User};

/// The user an order belongs to, without credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderOwner {
    pub id: i64,
    pub username: String,
}

impl From<&User> for OrderOwner {
    fn from(user: &User) -> Self {
        OrderOwner {
            id: user.id,
            username: user.username.clone(),
        }
    }
}

/// An immutable order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOrder {
    id: String,
    user: OrderOwner,
    items: Vec<Item>,
    total: Money,
    created_at: DateTime<Utc>,
}

impl UserOrder {
    /// Snapshots the user's current cart with a fresh UUID v4 id.
    pub fn from_user_cart(user: &User) -> Self {
        Self::snapshot(Uuid::new_v4().to_string(), user, Utc::now())
    }

    /// Snapshots the user's current cart with an explicit id and timestamp.
    pub fn snapshot(id: impl Into<String>, user: &User, created_at: DateTime<Utc>) -> Self {
        UserOrder {
            id: id.into(),
            user: OrderOwner::from(user),
            items: user.cart.items().to_vec(),
            total: user.cart.total(),
            created_at,
        }
    }

    /// Rebuilds a persisted order. The total is taken from the stored items.
    ///
    /// ## Errors
    /// `TotalOverflow` if the stored items do not sum to a valid `Money`.
    pub fn from_parts(
        id: impl Into<String>,
        user: OrderOwner,
        items: Vec<Item>,
        created_at: DateTime<Utc>,
    ) -> CoreResult<Self> {
        let total =
            Money::checked_sum(items.iter().map(Item::price)).ok_or(CoreError::TotalOverflow)?;
        Ok(UserOrder {
            id: id.into(),
            user,
            items,
            total,
            created_at,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn user(&self) -> &OrderOwner {
        &self.user
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn total(&self) -> Money {
        self.total
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::Cart;

    fn user_with_three_tens() -> User {
        let mut cart = Cart::new(1, 1);
        let item = Item::new(1, "Pen", Money::from_cents(1000));
        cart.add_item(&item, 3).unwrap();
        User::new(1, "test", "hash", cart)
    }

    #[test]
    fn test_snapshot_copies_items_and_total() {
        let user = user_with_three_tens();

        let order = UserOrder::from_user_cart(&user);

        assert_eq!(order.items().len(), 3);
        assert_eq!(order.total(), Money::from_cents(3000));
        assert_eq!(order.user().username, "test");
        assert!(Uuid::parse_str(order.id()).is_ok());
    }

    #[test]
    fn test_snapshot_independent_of_later_cart_mutation() {
        let mut user = user_with_three_tens();
        let order = UserOrder::from_user_cart(&user);

        let pen = user.cart.items()[0].clone();
        user.cart.remove_item(&pen, 3).unwrap();
        user.cart.add_item(&Item::new(2, "Ink", Money::from_cents(5)), 1).unwrap();

        assert_eq!(order.items().len(), 3);
        assert_eq!(order.total(), Money::from_cents(3000));
        assert_eq!(user.cart.total(), Money::from_cents(5));
    }

    #[test]
    fn test_from_parts_derives_total() {
        let owner = OrderOwner {
            id: 9,
            username: "alice".to_string(),
        };
        let items = vec![
            Item::new(1, "A", Money::from_cents(250)),
            Item::new(2, "B", Money::from_cents(750)),
        ];
        let now = Utc::now();

        let order = UserOrder::from_parts("order-1", owner.clone(), items, now).unwrap();

        assert_eq!(order.id(), "order-1");
        assert_eq!(order.user(), &owner);
        assert_eq!(order.total(), Money::from_cents(1000));
        assert_eq!(order.created_at(), now);

        let huge = Item::new(3, "C", Money::from_cents(i64::MAX));
        assert_eq!(
            UserOrder::from_parts("order-2", owner, vec![huge.clone(), huge], now),
            Err(CoreError::TotalOverflow)
        );
    }

    #[test]
    fn test_serialized_shape_hides_credentials() {
        let user = user_with_three_tens();
        let order = UserOrder::snapshot("fixed", &user, Utc::now());

        let json = serde_json::to_value(&order).unwrap();

        assert_eq!(json["id"], "fixed");
        assert_eq!(json["user"]["username"], "test");
        assert!(json["user"].get("passwordHash").is_none());
        assert_eq!(json["total"], 3000);
    }
}
