//! Order lifecycle orchestration with compensating actions.

use catalog::ItemCatalog;
use chrono::Utc;
use common::OrderId;
use orders::{
    ArriveOrder, CreateOrder, Order, OrderPatch, OrderStatus, OrderStore, UpdateOrder,
};

use crate::error::{CompensationOutcome, LifecycleError, Result};
use crate::inventory::{InventoryCounter, qualifying_item};

/// Orchestrates create/update/arrive/delete over single-row writes.
///
/// The order store and the item catalog cannot be mutated in one
/// transaction, so the two-step operations (create, arrive) run as a
/// small saga: order-side write first, inventory write second, and a
/// compensating order-side write when the inventory step fails. The
/// caller never observes a created-but-unreserved or
/// arrived-but-unrestocked order as a success.
pub struct OrderLifecycleService<O, C> {
    store: O,
    counter: InventoryCounter<C>,
}

impl<O, C> OrderLifecycleService<O, C>
where
    O: OrderStore,
    C: ItemCatalog,
{
    /// Creates a new lifecycle service.
    pub fn new(store: O, catalog: C) -> Self {
        Self {
            store,
            counter: InventoryCounter::new(catalog),
        }
    }

    /// Creates an order and reserves one unit of stock when it qualifies.
    ///
    /// On reserve failure the inserted row is deleted again and the
    /// inventory error is returned; the compensation outcome records
    /// whether that delete succeeded.
    #[tracing::instrument(skip(self, cmd), fields(po_number = %cmd.po_number))]
    pub async fn create(&self, cmd: CreateOrder) -> Result<Order> {
        let started = std::time::Instant::now();
        let order = self.store.insert(cmd.into_new_order(Utc::now())).await?;

        if let Some(item_id) = qualifying_item(&order) {
            if let Err(source) = self.counter.reserve(order.item_type, item_id).await {
                let compensation = match self.store.delete(order.id).await {
                    Ok(_) => CompensationOutcome::Reverted,
                    Err(err) => {
                        tracing::error!(
                            order_id = %order.id,
                            error = %err,
                            "compensating delete failed; orphaned order row remains"
                        );
                        CompensationOutcome::Failed(err.to_string())
                    }
                };
                metrics::counter!("lifecycle_compensations_total").increment(1);
                tracing::warn!(order_id = %order.id, error = %source, "order creation compensated");
                return Err(LifecycleError::InventoryAdjustment {
                    source,
                    compensation,
                });
            }
        }

        metrics::counter!("orders_created_total").increment(1);
        metrics::histogram!("lifecycle_op_duration_seconds")
            .record(started.elapsed().as_secs_f64());
        tracing::info!(order_id = %order.id, status = %order.status, "order created");
        Ok(order)
    }

    /// Applies a partial patch, then recomputes status unless the order
    /// has arrived. Inventory is never touched by updates.
    #[tracing::instrument(skip(self, cmd))]
    pub async fn update(&self, id: OrderId, cmd: UpdateOrder) -> Result<Order> {
        let updated = self.store.update(id, cmd.into_patch()).await?;

        if updated.status.is_terminal() {
            return Ok(updated);
        }

        // Second single-row write; the derivation is idempotent, so
        // re-running it on any write path cannot drift.
        let status = updated.recomputed_status();
        let order = self.store.update(id, OrderPatch::status_only(status)).await?;
        tracing::info!(order_id = %id, status = %order.status, "order updated");
        Ok(order)
    }

    /// Marks an order as arrived and restocks one unit when it qualifies.
    ///
    /// Arrival is guarded: an already-arrived order is rejected with
    /// [`LifecycleError::AlreadyArrived`] before any write, so a repeated
    /// call can never move stock twice. On restock failure the order's
    /// `status`, `arrived_at` and `received_by` are restored from the
    /// pre-image.
    #[tracing::instrument(skip(self, cmd))]
    pub async fn arrive(&self, id: OrderId, cmd: ArriveOrder) -> Result<Order> {
        let started = std::time::Instant::now();
        let before = self
            .store
            .get(id)
            .await?
            .ok_or(LifecycleError::OrderNotFound(id))?;

        if before.status.is_terminal() {
            return Err(LifecycleError::AlreadyArrived(id));
        }

        let received_by = cmd.received_by.or_else(|| before.received_by.clone());
        let arrived = self
            .store
            .update(
                id,
                OrderPatch {
                    status: Some(OrderStatus::Arrived),
                    arrived_at: Some(Some(Utc::now())),
                    received_by: Some(received_by),
                    ..OrderPatch::default()
                },
            )
            .await?;

        if let Some(item_id) = qualifying_item(&arrived) {
            if let Err(source) = self.counter.restock(arrived.item_type, item_id).await {
                let restore = OrderPatch {
                    status: Some(before.status),
                    arrived_at: Some(before.arrived_at),
                    received_by: Some(before.received_by.clone()),
                    ..OrderPatch::default()
                };
                let compensation = match self.store.update(id, restore).await {
                    Ok(_) => CompensationOutcome::Reverted,
                    Err(err) => {
                        tracing::error!(
                            order_id = %id,
                            error = %err,
                            "compensating restore failed; order marked arrived without restock"
                        );
                        CompensationOutcome::Failed(err.to_string())
                    }
                };
                metrics::counter!("lifecycle_compensations_total").increment(1);
                tracing::warn!(order_id = %id, error = %source, "order arrival compensated");
                return Err(LifecycleError::InventoryAdjustment {
                    source,
                    compensation,
                });
            }
        }

        metrics::counter!("orders_arrived_total").increment(1);
        metrics::histogram!("lifecycle_op_duration_seconds")
            .record(started.elapsed().as_secs_f64());
        tracing::info!(order_id = %id, "order arrived");
        Ok(arrived)
    }

    /// Removes an order row.
    ///
    /// Deletion never reverses stock already moved by the order; it is an
    /// administrative correction outside the stock ledger.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: OrderId) -> Result<()> {
        if !self.store.delete(id).await? {
            return Err(LifecycleError::OrderNotFound(id));
        }
        metrics::counter!("orders_deleted_total").increment(1);
        tracing::info!(order_id = %id, "order deleted");
        Ok(())
    }

    /// Loads an order by id.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>> {
        Ok(self.store.get(id).await?)
    }
}
