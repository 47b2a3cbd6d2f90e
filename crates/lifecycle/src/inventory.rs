//! Inventory counter: the single entry point for order-driven stock moves.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use catalog::{CatalogError, ItemCatalog};
use common::{ItemId, ItemType};
use orders::Order;

/// Returns the item an order moves stock for, if any.
///
/// A qualifying order is a stock order (not special, not a return) that
/// names a concrete catalog item. Only qualifying orders move inventory,
/// and qualification is evaluated exactly twice in an order's life: at
/// creation and at arrival.
pub fn qualifying_item(order: &Order) -> Option<ItemId> {
    if order.special_order || order.is_return {
        return None;
    }
    order.item_id
}

/// Returns true if the order moves inventory.
pub fn qualifies(order: &Order) -> bool {
    qualifying_item(order).is_some()
}

/// Applies ±1 deltas to an item's `on_hand` counter.
///
/// The catalog only offers get and an unconditional counter-set, so the
/// read-modify-write here is serialized per (kind, id) through an async
/// lock. Two concurrent adjustments of the same item queue behind each
/// other; adjustments of different items do not contend.
pub struct InventoryCounter<C> {
    catalog: C,
    locks: Mutex<HashMap<(ItemType, ItemId), Arc<tokio::sync::Mutex<()>>>>,
}

impl<C: ItemCatalog> InventoryCounter<C> {
    /// Creates a new counter over the given catalog.
    pub fn new(catalog: C) -> Self {
        Self {
            catalog,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Takes one unit of stock for a newly created qualifying order.
    /// Returns the new `on_hand`.
    #[tracing::instrument(skip(self))]
    pub async fn reserve(&self, item_type: ItemType, item_id: ItemId) -> Result<i64, CatalogError> {
        self.adjust(item_type, item_id, -1).await
    }

    /// Returns one unit of stock for an arrived qualifying order.
    /// Returns the new `on_hand`.
    #[tracing::instrument(skip(self))]
    pub async fn restock(&self, item_type: ItemType, item_id: ItemId) -> Result<i64, CatalogError> {
        self.adjust(item_type, item_id, 1).await
    }

    async fn adjust(
        &self,
        item_type: ItemType,
        item_id: ItemId,
        delta: i64,
    ) -> Result<i64, CatalogError> {
        let lock = self.item_lock(item_type, item_id);
        let _guard = lock.lock().await;

        let item = self
            .catalog
            .get(item_type, item_id)
            .await?
            .ok_or(CatalogError::ItemNotFound {
                item_type,
                id: item_id,
            })?;

        let value = item.on_hand + delta;
        self.catalog.set_on_hand(item_type, item_id, value).await?;

        metrics::counter!("inventory_adjustments_total").increment(1);
        tracing::debug!(%item_type, %item_id, delta, on_hand = value, "stock adjusted");
        Ok(value)
    }

    fn item_lock(&self, item_type: ItemType, item_id: ItemId) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.locks.lock().unwrap();
        locks
            .entry((item_type, item_id))
            .or_default()
            .clone()
    }
}
