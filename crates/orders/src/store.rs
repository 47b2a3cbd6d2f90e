//! Order store interface.

use async_trait::async_trait;
use common::OrderId;

use crate::Result;
use crate::record::{NewOrder, Order, OrderPatch};

/// Persistent store of order rows.
///
/// Every operation is a single-row atomic write or read; the store offers
/// no multi-row transaction, which is why the lifecycle layer compensates
/// instead of rolling back.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Inserts a new order row and returns it with its assigned id.
    async fn insert(&self, order: NewOrder) -> Result<Order>;

    /// Loads an order by id. Returns `None` when absent.
    async fn get(&self, id: OrderId) -> Result<Option<Order>>;

    /// Applies a partial patch to one order row and returns the updated
    /// row. Fails with [`StoreError::NotFound`] when the row is absent.
    ///
    /// [`StoreError::NotFound`]: crate::StoreError::NotFound
    async fn update(&self, id: OrderId, patch: OrderPatch) -> Result<Order>;

    /// Removes an order row. Returns false when the row was absent.
    async fn delete(&self, id: OrderId) -> Result<bool>;

    /// Lists all orders, newest `created_at` first (id descending as
    /// tie-break).
    async fn list(&self) -> Result<Vec<Order>>;
}
