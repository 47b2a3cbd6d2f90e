//! In-memory catalog and supplier directory for tests and the default binary.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::{ItemId, ItemType, SupplierId};
use tokio::sync::RwLock;

use crate::store::{Item, ItemCatalog, Supplier, SupplierDirectory};
use crate::{CatalogError, Result};

#[derive(Debug, Default)]
struct CatalogState {
    items: HashMap<(ItemType, ItemId), Item>,
    next_id: i64,
    fail_reads: bool,
    fail_writes: bool,
}

/// In-memory item catalog with failure injection for tests.
#[derive(Clone, Default)]
pub struct InMemoryItemCatalog {
    state: Arc<RwLock<CatalogState>>,
}

impl InMemoryItemCatalog {
    /// Creates a new empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds an item and returns its assigned id.
    pub async fn insert(
        &self,
        item_type: ItemType,
        name: impl Into<String>,
        supplier_id: Option<SupplierId>,
        on_hand: i64,
    ) -> ItemId {
        let mut state = self.state.write().await;
        state.next_id += 1;
        let id = ItemId::new(state.next_id);
        state.items.insert(
            (item_type, id),
            Item {
                id,
                name: name.into(),
                supplier_id,
                on_hand,
            },
        );
        id
    }

    /// Returns the current `on_hand` of an item, if it exists.
    pub async fn on_hand(&self, item_type: ItemType, id: ItemId) -> Option<i64> {
        self.state
            .read()
            .await
            .items
            .get(&(item_type, id))
            .map(|item| item.on_hand)
    }

    /// Configures the catalog to fail all reads.
    pub async fn set_fail_reads(&self, fail: bool) {
        self.state.write().await.fail_reads = fail;
    }

    /// Configures the catalog to fail all counter writes.
    pub async fn set_fail_writes(&self, fail: bool) {
        self.state.write().await.fail_writes = fail;
    }
}

#[async_trait]
impl ItemCatalog for InMemoryItemCatalog {
    async fn get(&self, item_type: ItemType, id: ItemId) -> Result<Option<Item>> {
        let state = self.state.read().await;
        if state.fail_reads {
            return Err(CatalogError::Backend("catalog unavailable".to_string()));
        }
        Ok(state.items.get(&(item_type, id)).cloned())
    }

    async fn set_on_hand(&self, item_type: ItemType, id: ItemId, value: i64) -> Result<()> {
        let mut state = self.state.write().await;
        if state.fail_writes {
            return Err(CatalogError::Backend("catalog unavailable".to_string()));
        }
        match state.items.get_mut(&(item_type, id)) {
            Some(item) => {
                item.on_hand = value;
                Ok(())
            }
            None => Err(CatalogError::ItemNotFound { item_type, id }),
        }
    }
}

#[derive(Debug, Default)]
struct DirectoryState {
    suppliers: HashMap<SupplierId, Supplier>,
    next_id: i64,
    fail_reads: bool,
}

/// In-memory supplier directory with failure injection for tests.
#[derive(Clone, Default)]
pub struct InMemorySupplierDirectory {
    state: Arc<RwLock<DirectoryState>>,
}

impl InMemorySupplierDirectory {
    /// Creates a new empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a supplier and returns its assigned id.
    pub async fn insert(&self, name: impl Into<String>) -> SupplierId {
        let mut state = self.state.write().await;
        state.next_id += 1;
        let id = SupplierId::new(state.next_id);
        state.suppliers.insert(
            id,
            Supplier {
                id,
                name: name.into(),
            },
        );
        id
    }

    /// Configures the directory to fail all reads.
    pub async fn set_fail_reads(&self, fail: bool) {
        self.state.write().await.fail_reads = fail;
    }
}

#[async_trait]
impl SupplierDirectory for InMemorySupplierDirectory {
    async fn get(&self, id: SupplierId) -> Result<Option<Supplier>> {
        let state = self.state.read().await;
        if state.fail_reads {
            return Err(CatalogError::Backend("directory unavailable".to_string()));
        }
        Ok(state.suppliers.get(&id).cloned())
    }
}
