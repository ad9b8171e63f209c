//! Catalog lookups.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::{ApiError, ApiResult};
use crate::store::ItemStore;
use shop_core::Item;

pub struct ItemController {
    items: Arc<dyn ItemStore>,
}

impl ItemController {
    pub fn new(items: Arc<dyn ItemStore>) -> Self {
        ItemController { items }
    }

    /// The whole catalog. An empty catalog is still a 200.
    pub async fn get_items(&self) -> ApiResult<Vec<Item>> {
        debug!("get_items");
        Ok(self.items.find_all().await?)
    }

    pub async fn get_item_by_id(&self, id: i64) -> ApiResult<Item> {
        debug!(item_id = id, "get_item_by_id");

        self.items.find_by_id(id).await?.ok_or_else(|| {
            warn!(item_id = id, "Item not found");
            ApiError::not_found("Item", id)
        })
    }

    /// Items named exactly `name`; no match is a 404.
    pub async fn get_items_by_name(&self, name: &str) -> ApiResult<Vec<Item>> {
        debug!(name = %name, "get_items_by_name");

        let items = self.items.find_by_name(name).await?;
        if items.is_empty() {
            warn!(name = %name, "No items with this name");
            return Err(ApiError::not_found("Item", name));
        }

        Ok(items)
    }
}
