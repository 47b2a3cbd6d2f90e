//! PostgreSQL-backed catalog and supplier directory.

use async_trait::async_trait;
use common::{ItemId, ItemType, SupplierId};
use sqlx::{PgPool, Row, postgres::PgRow};

use crate::store::{Item, ItemCatalog, Supplier, SupplierDirectory};
use crate::{CatalogError, Result};

/// PostgreSQL item catalog. Both merchandise kinds share one table,
/// namespaced by the `item_type` column.
#[derive(Clone)]
pub struct PostgresItemCatalog {
    pool: PgPool,
}

impl PostgresItemCatalog {
    /// Creates a new catalog over an existing connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn row_to_item(row: PgRow) -> Result<Item> {
        Ok(Item {
            id: ItemId::new(row.try_get("id")?),
            name: row.try_get("name")?,
            supplier_id: row
                .try_get::<Option<i64>, _>("supplier_id")?
                .map(SupplierId::new),
            on_hand: row.try_get("on_hand")?,
        })
    }
}

#[async_trait]
impl ItemCatalog for PostgresItemCatalog {
    async fn get(&self, item_type: ItemType, id: ItemId) -> Result<Option<Item>> {
        let row = sqlx::query(
            "SELECT id, name, supplier_id, on_hand FROM items WHERE item_type = $1 AND id = $2",
        )
        .bind(item_type.as_str())
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_item).transpose()
    }

    async fn set_on_hand(&self, item_type: ItemType, id: ItemId, value: i64) -> Result<()> {
        let result = sqlx::query("UPDATE items SET on_hand = $3 WHERE item_type = $1 AND id = $2")
            .bind(item_type.as_str())
            .bind(id.as_i64())
            .bind(value)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::ItemNotFound { item_type, id });
        }
        Ok(())
    }
}

/// PostgreSQL supplier directory.
#[derive(Clone)]
pub struct PostgresSupplierDirectory {
    pool: PgPool,
}

impl PostgresSupplierDirectory {
    /// Creates a new directory over an existing connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SupplierDirectory for PostgresSupplierDirectory {
    async fn get(&self, id: SupplierId) -> Result<Option<Supplier>> {
        let row = sqlx::query("SELECT id, name FROM suppliers WHERE id = $1")
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row
            .map(|row| -> Result<Supplier> {
                Ok(Supplier {
                    id: SupplierId::new(row.try_get("id")?),
                    name: row.try_get("name")?,
                })
            })
            .transpose()?)
    }
}
