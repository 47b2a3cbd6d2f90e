//! Order record and its single-row write shapes.

use chrono::{DateTime, NaiveDate, Utc};
use common::{ItemId, ItemType, OrderId, SupplierId};
use serde::{Deserialize, Serialize};

use crate::status::OrderStatus;

/// A purchase order row.
///
/// `created_at` is assigned once at insertion and never changes;
/// `arrived_at` and `received_by` are assigned by the arrive transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub item_type: ItemType,
    pub item_id: Option<ItemId>,
    pub item_name: Option<String>,
    pub supplier_id: Option<SupplierId>,
    pub po_number: String,
    pub expected_date: Option<NaiveDate>,
    pub status: OrderStatus,
    pub backordered: bool,
    /// Expected date not known yet; when set, `expected_date` is null.
    pub tbd_expected: bool,
    pub special_order: bool,
    pub deceased_name: Option<String>,
    pub need_by_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub is_return: bool,
    pub return_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub arrived_at: Option<DateTime<Utc>>,
    pub received_by: Option<String>,
}

impl Order {
    /// Recomputes the active status of this order from its current fields.
    ///
    /// Only meaningful while the order has not arrived.
    pub fn recomputed_status(&self) -> OrderStatus {
        OrderStatus::derive_active(self.backordered, self.item_name.as_deref())
    }
}

/// Field set for inserting a new order row. The store assigns the id.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub item_type: ItemType,
    pub item_id: Option<ItemId>,
    pub item_name: Option<String>,
    pub supplier_id: Option<SupplierId>,
    pub po_number: String,
    pub expected_date: Option<NaiveDate>,
    pub status: OrderStatus,
    pub backordered: bool,
    pub tbd_expected: bool,
    pub special_order: bool,
    pub deceased_name: Option<String>,
    pub need_by_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub is_return: bool,
    pub return_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl NewOrder {
    pub(crate) fn into_order(self, id: OrderId) -> Order {
        Order {
            id,
            item_type: self.item_type,
            item_id: self.item_id,
            item_name: self.item_name,
            supplier_id: self.supplier_id,
            po_number: self.po_number,
            expected_date: self.expected_date,
            status: self.status,
            backordered: self.backordered,
            tbd_expected: self.tbd_expected,
            special_order: self.special_order,
            deceased_name: self.deceased_name,
            need_by_date: self.need_by_date,
            notes: self.notes,
            is_return: self.is_return,
            return_reason: self.return_reason,
            created_at: self.created_at,
            arrived_at: None,
            received_by: None,
        }
    }
}

/// Partial update of one order row.
///
/// Outer `None` leaves a column untouched; for nullable columns the inner
/// `Option` distinguishes set-to-value from set-to-null. A patch never
/// touches `created_at`, `item_type`, `item_id` or the other
/// creation-only columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderPatch {
    pub po_number: Option<String>,
    pub expected_date: Option<Option<NaiveDate>>,
    pub backordered: Option<bool>,
    pub tbd_expected: Option<bool>,
    pub need_by_date: Option<Option<NaiveDate>>,
    pub is_return: Option<bool>,
    pub return_reason: Option<Option<String>>,
    pub status: Option<OrderStatus>,
    pub arrived_at: Option<Option<DateTime<Utc>>>,
    pub received_by: Option<Option<String>>,
}

impl OrderPatch {
    /// A patch writing only the status column.
    pub fn status_only(status: OrderStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Returns true if the patch writes no columns.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Applies the patch to an order in place (in-memory store path).
    pub fn apply(&self, order: &mut Order) {
        if let Some(po_number) = &self.po_number {
            order.po_number = po_number.clone();
        }
        if let Some(expected_date) = self.expected_date {
            order.expected_date = expected_date;
        }
        if let Some(backordered) = self.backordered {
            order.backordered = backordered;
        }
        if let Some(tbd_expected) = self.tbd_expected {
            order.tbd_expected = tbd_expected;
        }
        if let Some(need_by_date) = self.need_by_date {
            order.need_by_date = need_by_date;
        }
        if let Some(is_return) = self.is_return {
            order.is_return = is_return;
        }
        if let Some(return_reason) = &self.return_reason {
            order.return_reason = return_reason.clone();
        }
        if let Some(status) = self.status {
            order.status = status;
        }
        if let Some(arrived_at) = self.arrived_at {
            order.arrived_at = arrived_at;
        }
        if let Some(received_by) = &self.received_by {
            order.received_by = received_by.clone();
        }
    }
}
