//! PostgreSQL-backed order store.

use async_trait::async_trait;
use common::{ItemId, ItemType, OrderId, SupplierId};
use sqlx::{PgPool, QueryBuilder, Row, postgres::PgRow};

use crate::record::{NewOrder, Order, OrderPatch};
use crate::status::OrderStatus;
use crate::store::OrderStore;
use crate::{Result, StoreError};

const ORDER_COLUMNS: &str = "id, item_type, item_id, item_name, supplier_id, po_number, \
     expected_date, status, backordered, tbd_expected, special_order, deceased_name, \
     need_by_date, notes, is_return, return_reason, created_at, arrived_at, received_by";

/// PostgreSQL order store. Every statement touches exactly one row.
#[derive(Clone)]
pub struct PostgresOrderStore {
    pool: PgPool,
}

impl PostgresOrderStore {
    /// Creates a new PostgreSQL order store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    fn row_to_order(row: PgRow) -> Result<Order> {
        let item_type: String = row.try_get("item_type")?;
        let item_type = ItemType::parse(&item_type)
            .ok_or_else(|| StoreError::Backend(format!("unknown item_type '{item_type}'")))?;

        let status: String = row.try_get("status")?;
        let status = OrderStatus::parse(&status)
            .ok_or_else(|| StoreError::Backend(format!("unknown status '{status}'")))?;

        Ok(Order {
            id: OrderId::new(row.try_get("id")?),
            item_type,
            item_id: row.try_get::<Option<i64>, _>("item_id")?.map(ItemId::new),
            item_name: row.try_get("item_name")?,
            supplier_id: row
                .try_get::<Option<i64>, _>("supplier_id")?
                .map(SupplierId::new),
            po_number: row.try_get("po_number")?,
            expected_date: row.try_get("expected_date")?,
            status,
            backordered: row.try_get("backordered")?,
            tbd_expected: row.try_get("tbd_expected")?,
            special_order: row.try_get("special_order")?,
            deceased_name: row.try_get("deceased_name")?,
            need_by_date: row.try_get("need_by_date")?,
            notes: row.try_get("notes")?,
            is_return: row.try_get("is_return")?,
            return_reason: row.try_get("return_reason")?,
            created_at: row.try_get("created_at")?,
            arrived_at: row.try_get("arrived_at")?,
            received_by: row.try_get("received_by")?,
        })
    }
}

#[async_trait]
impl OrderStore for PostgresOrderStore {
    async fn insert(&self, order: NewOrder) -> Result<Order> {
        let row = sqlx::query(&format!(
            "INSERT INTO orders (item_type, item_id, item_name, supplier_id, po_number, \
             expected_date, status, backordered, tbd_expected, special_order, deceased_name, \
             need_by_date, notes, is_return, return_reason, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16) \
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(order.item_type.as_str())
        .bind(order.item_id.map(|id| id.as_i64()))
        .bind(&order.item_name)
        .bind(order.supplier_id.map(|id| id.as_i64()))
        .bind(&order.po_number)
        .bind(order.expected_date)
        .bind(order.status.as_str())
        .bind(order.backordered)
        .bind(order.tbd_expected)
        .bind(order.special_order)
        .bind(&order.deceased_name)
        .bind(order.need_by_date)
        .bind(&order.notes)
        .bind(order.is_return)
        .bind(&order.return_reason)
        .bind(order.created_at)
        .fetch_one(&self.pool)
        .await?;

        Self::row_to_order(row)
    }

    async fn get(&self, id: OrderId) -> Result<Option<Order>> {
        let row = sqlx::query(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
        ))
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_order).transpose()
    }

    async fn update(&self, id: OrderId, patch: OrderPatch) -> Result<Order> {
        // A no-op patch still reads the row back so callers observe
        // NotFound consistently.
        if patch.is_empty() {
            return self.get(id).await?.ok_or(StoreError::NotFound(id));
        }

        let mut builder: QueryBuilder<sqlx::Postgres> = QueryBuilder::new("UPDATE orders SET ");
        {
            let mut columns = builder.separated(", ");
            if let Some(po_number) = &patch.po_number {
                columns.push("po_number = ");
                columns.push_bind_unseparated(po_number.clone());
            }
            if let Some(expected_date) = patch.expected_date {
                columns.push("expected_date = ");
                columns.push_bind_unseparated(expected_date);
            }
            if let Some(backordered) = patch.backordered {
                columns.push("backordered = ");
                columns.push_bind_unseparated(backordered);
            }
            if let Some(tbd_expected) = patch.tbd_expected {
                columns.push("tbd_expected = ");
                columns.push_bind_unseparated(tbd_expected);
            }
            if let Some(need_by_date) = patch.need_by_date {
                columns.push("need_by_date = ");
                columns.push_bind_unseparated(need_by_date);
            }
            if let Some(is_return) = patch.is_return {
                columns.push("is_return = ");
                columns.push_bind_unseparated(is_return);
            }
            if let Some(return_reason) = &patch.return_reason {
                columns.push("return_reason = ");
                columns.push_bind_unseparated(return_reason.clone());
            }
            if let Some(status) = patch.status {
                columns.push("status = ");
                columns.push_bind_unseparated(status.as_str());
            }
            if let Some(arrived_at) = patch.arrived_at {
                columns.push("arrived_at = ");
                columns.push_bind_unseparated(arrived_at);
            }
            if let Some(received_by) = &patch.received_by {
                columns.push("received_by = ");
                columns.push_bind_unseparated(received_by.clone());
            }
        }
        builder.push(" WHERE id = ");
        builder.push_bind(id.as_i64());
        builder.push(format!(" RETURNING {ORDER_COLUMNS}"));

        let row = builder.build().fetch_optional(&self.pool).await?;
        match row {
            Some(row) => Self::row_to_order(row),
            None => Err(StoreError::NotFound(id)),
        }
    }

    async fn delete(&self, id: OrderId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self) -> Result<Vec<Order>> {
        let rows = sqlx::query(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_order).collect()
    }
}
