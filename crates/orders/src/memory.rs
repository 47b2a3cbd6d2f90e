//! In-memory order store for tests and the default binary.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::OrderId;
use tokio::sync::RwLock;

use crate::record::{NewOrder, Order, OrderPatch};
use crate::store::OrderStore;
use crate::{Result, StoreError};

#[derive(Debug, Default)]
struct OrderStoreState {
    orders: HashMap<OrderId, Order>,
    next_id: i64,
    fail_writes: bool,
    fail_deletes: bool,
}

/// In-memory order store with failure injection for tests.
///
/// Provides the same interface as the PostgreSQL implementation.
#[derive(Clone, Default)]
pub struct InMemoryOrderStore {
    state: Arc<RwLock<OrderStoreState>>,
}

impl InMemoryOrderStore {
    /// Creates a new empty order store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored orders.
    pub async fn order_count(&self) -> usize {
        self.state.read().await.orders.len()
    }

    /// Configures the store to fail inserts and updates.
    pub async fn set_fail_writes(&self, fail: bool) {
        self.state.write().await.fail_writes = fail;
    }

    /// Configures the store to fail deletes.
    pub async fn set_fail_deletes(&self, fail: bool) {
        self.state.write().await.fail_deletes = fail;
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn insert(&self, order: NewOrder) -> Result<Order> {
        let mut state = self.state.write().await;
        if state.fail_writes {
            return Err(StoreError::Backend("order store unavailable".to_string()));
        }
        state.next_id += 1;
        let id = OrderId::new(state.next_id);
        let order = order.into_order(id);
        state.orders.insert(id, order.clone());
        Ok(order)
    }

    async fn get(&self, id: OrderId) -> Result<Option<Order>> {
        Ok(self.state.read().await.orders.get(&id).cloned())
    }

    async fn update(&self, id: OrderId, patch: OrderPatch) -> Result<Order> {
        let mut state = self.state.write().await;
        if state.fail_writes {
            return Err(StoreError::Backend("order store unavailable".to_string()));
        }
        let order = state
            .orders
            .get_mut(&id)
            .ok_or(StoreError::NotFound(id))?;
        patch.apply(order);
        Ok(order.clone())
    }

    async fn delete(&self, id: OrderId) -> Result<bool> {
        let mut state = self.state.write().await;
        if state.fail_deletes {
            return Err(StoreError::Backend("order store unavailable".to_string()));
        }
        Ok(state.orders.remove(&id).is_some())
    }

    async fn list(&self) -> Result<Vec<Order>> {
        let state = self.state.read().await;
        let mut orders: Vec<_> = state.orders.values().cloned().collect();
        orders.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then(b.id.cmp(&a.id))
        });
        Ok(orders)
    }
}
