//! Collaborator interfaces and the records they serve.

use async_trait::async_trait;
use common::{ItemId, ItemType, SupplierId};
use serde::{Deserialize, Serialize};

use crate::Result;

/// A stock item row as served by the item catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub supplier_id: Option<SupplierId>,
    /// Units physically on hand. Mutated only through the inventory counter
    /// for lifecycle-driven changes.
    pub on_hand: i64,
}

/// A supplier row as served by the supplier directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: SupplierId,
    pub name: String,
}

/// Per-kind store of stock items.
///
/// The interface is deliberately narrow: get-by-id and an unconditional
/// counter-set. There is no atomic increment — callers that need
/// read-modify-write consistency must serialize their own updates.
#[async_trait]
pub trait ItemCatalog: Send + Sync {
    /// Loads an item by kind and id. Returns `None` when absent.
    async fn get(&self, item_type: ItemType, id: ItemId) -> Result<Option<Item>>;

    /// Overwrites the `on_hand` counter of one item row.
    ///
    /// Fails with [`CatalogError::ItemNotFound`] when the row is absent.
    ///
    /// [`CatalogError::ItemNotFound`]: crate::CatalogError::ItemNotFound
    async fn set_on_hand(&self, item_type: ItemType, id: ItemId, value: i64) -> Result<()>;
}

/// Keyed lookup of supplier rows. Suppliers are referenced, never mutated.
#[async_trait]
pub trait SupplierDirectory: Send + Sync {
    /// Loads a supplier by id. Returns `None` when absent.
    async fn get(&self, id: SupplierId) -> Result<Option<Supplier>>;
}
