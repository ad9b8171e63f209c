//! # Order Controller
//!
//! Turns a user's cart into an order snapshot, and lists past orders.
//!
//! ## Submission
//! ```text
//! submit(username)
//!      │
//!      ├── users.find_by_username ── None ──► 404 (orders untouched)
//!      ├── UserOrder::from_user_cart(&user)   copy items + total
//!      ├── orders.save(order)
//!      └── 200 + order
//! ```
//!
//! The cart itself is left as it was.

use std::sync::Arc;

use tracing::{debug, info};

use crate::controllers::require_user;
use crate::error::ApiResult;
use crate::store::{OrderStore, UserStore};
use shop_core::UserOrder;

pub struct OrderController {
    users: Arc<dyn UserStore>,
    orders: Arc<dyn OrderStore>,
}

impl OrderController {
    pub fn new(users: Arc<dyn UserStore>, orders: Arc<dyn OrderStore>) -> Self {
        OrderController { users, orders }
    }

    /// Snapshots the user's cart as a new order.
    pub async fn submit(&self, username: &str) -> ApiResult<UserOrder> {
        debug!(username = %username, "submit");

        let user = require_user(self.users.as_ref(), username).await?;
        let order = UserOrder::from_user_cart(&user);

        self.orders.save(&order).await?;

        info!(
            order_id = %order.id(),
            username = %username,
            items = order.items().len(),
            total = %order.total(),
            "Order submitted"
        );
        Ok(order)
    }

    pub async fn get_orders_for_user(&self, username: &str) -> ApiResult<Vec<UserOrder>> {
        debug!(username = %username, "get_orders_for_user");

        let user = require_user(self.users.as_ref(), username).await?;
        Ok(self.orders.find_by_user(user.id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::CartStore;
    use crate::test_support::SpyStore;
    use shop_core::Money;

    fn controller(spy: &Arc<SpyStore>) -> OrderController {
        OrderController::new(spy.clone(), spy.clone())
    }

    #[tokio::test]
    async fn test_submit_happy_path() {
        let spy = SpyStore::new();
        let user = spy.seed_user("test").await;
        let pen = spy.seed_item("Pen", 1000).await;
        let mut cart = user.cart;
        cart.add_item(&pen, 3).unwrap();
        CartStore::save(&spy.inner, &mut cart).await.unwrap();

        let order = controller(&spy).submit("test").await.unwrap();

        assert_eq!(order.items().len(), 3);
        assert_eq!(order.total(), Money::from_cents(3000));
        assert_eq!(order.user().username, "test");
        assert_eq!(spy.calls(), ["user.find_by_username", "order.save"]);
    }

    #[tokio::test]
    async fn test_submit_user_not_found() {
        let spy = SpyStore::new();

        let err = controller(&spy).submit("missing").await.unwrap_err();

        assert_eq!(err.status(), 404);
        assert_eq!(spy.calls_to("order"), 0);
    }

    #[tokio::test]
    async fn test_get_orders_for_user() {
        let spy = SpyStore::new();
        spy.seed_user("test").await;
        let controller = controller(&spy);
        controller.submit("test").await.unwrap();
        controller.submit("test").await.unwrap();
        spy.reset();

        let orders = controller.get_orders_for_user("test").await.unwrap();

        assert_eq!(orders.len(), 2);
        assert_eq!(
            spy.calls(),
            ["user.find_by_username", "order.find_by_user"]
        );
    }

    #[tokio::test]
    async fn test_get_orders_for_user_not_found() {
        let spy = SpyStore::new();

        let err = controller(&spy)
            .get_orders_for_user("missing")
            .await
            .unwrap_err();

        assert_eq!(err.status(), 404);
        assert_eq!(spy.calls(), ["user.find_by_username"]);
    }
}
