//! PostgreSQL integration tests
//!
//! These tests use a shared PostgreSQL container for efficiency.
//! Run with:
//!
//! ```bash
//! cargo test -p orders --test postgres_integration -- --test-threads=1
//! ```

use std::sync::Arc;

use chrono::Utc;
use common::{ItemType, OrderId};
use orders::{NewOrder, OrderPatch, OrderStatus, OrderStore, PostgresOrderStore};
use serial_test::serial;
use sqlx::PgPool;
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

/// Global shared container
static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            // Create a temporary pool just for migrations
            let temp_pool = PgPool::connect(&connection_string).await.unwrap();

            sqlx::raw_sql(include_str!("../../../migrations/001_create_tables.sql"))
                .execute(&temp_pool)
                .await
                .unwrap();

            temp_pool.close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

/// Get a fresh pool with cleared tables
async fn get_test_pool() -> PgPool {
    let info = get_container_info().await;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&info.connection_string)
        .await
        .unwrap();

    sqlx::query("TRUNCATE TABLE orders, items, suppliers RESTART IDENTITY")
        .execute(&pool)
        .await
        .unwrap();

    pool
}

fn new_order(po_number: &str) -> NewOrder {
    NewOrder {
        item_type: ItemType::Casket,
        item_id: None,
        item_name: None,
        supplier_id: None,
        po_number: po_number.to_string(),
        expected_date: None,
        status: OrderStatus::Pending,
        backordered: false,
        tbd_expected: false,
        special_order: false,
        deceased_name: None,
        need_by_date: None,
        notes: None,
        is_return: false,
        return_reason: None,
        created_at: Utc::now(),
    }
}

#[tokio::test]
#[serial]
async fn insert_and_get_roundtrip() {
    let store = PostgresOrderStore::new(get_test_pool().await);

    let mut row = new_order("PO-1");
    row.item_name = Some("Oak Casket".to_string());
    row.expected_date = chrono::NaiveDate::from_ymd_opt(2024, 3, 1);
    let inserted = store.insert(row).await.unwrap();

    let loaded = store.get(inserted.id).await.unwrap().unwrap();
    assert_eq!(loaded, inserted);
    assert_eq!(loaded.po_number, "PO-1");
    assert_eq!(loaded.item_name.as_deref(), Some("Oak Casket"));
    assert_eq!(
        loaded.expected_date,
        chrono::NaiveDate::from_ymd_opt(2024, 3, 1)
    );
}

#[tokio::test]
#[serial]
async fn get_missing_returns_none() {
    let store = PostgresOrderStore::new(get_test_pool().await);
    assert!(store.get(OrderId::new(12345)).await.unwrap().is_none());
}

#[tokio::test]
#[serial]
async fn update_patches_named_columns_only() {
    let store = PostgresOrderStore::new(get_test_pool().await);
    let inserted = store.insert(new_order("PO-1")).await.unwrap();

    let patch = OrderPatch {
        backordered: Some(true),
        status: Some(OrderStatus::Backordered),
        ..OrderPatch::default()
    };
    let updated = store.update(inserted.id, patch).await.unwrap();

    assert!(updated.backordered);
    assert_eq!(updated.status, OrderStatus::Backordered);
    assert_eq!(updated.po_number, "PO-1");
    assert_eq!(updated.created_at, inserted.created_at);
}

#[tokio::test]
#[serial]
async fn update_clears_nullable_columns() {
    let store = PostgresOrderStore::new(get_test_pool().await);

    let mut row = new_order("PO-1");
    row.expected_date = chrono::NaiveDate::from_ymd_opt(2024, 3, 1);
    row.return_reason = Some("damaged".to_string());
    let inserted = store.insert(row).await.unwrap();

    let patch = OrderPatch {
        expected_date: Some(None),
        return_reason: Some(None),
        ..OrderPatch::default()
    };
    let updated = store.update(inserted.id, patch).await.unwrap();

    assert_eq!(updated.expected_date, None);
    assert_eq!(updated.return_reason, None);
}

#[tokio::test]
#[serial]
async fn update_missing_is_not_found() {
    let store = PostgresOrderStore::new(get_test_pool().await);
    let result = store
        .update(OrderId::new(999), OrderPatch::status_only(OrderStatus::Pending))
        .await;
    assert!(matches!(result, Err(orders::StoreError::NotFound(_))));
}

#[tokio::test]
#[serial]
async fn empty_patch_reads_row_back() {
    let store = PostgresOrderStore::new(get_test_pool().await);
    let inserted = store.insert(new_order("PO-1")).await.unwrap();

    let updated = store.update(inserted.id, OrderPatch::default()).await.unwrap();
    assert_eq!(updated, inserted);

    let result = store.update(OrderId::new(999), OrderPatch::default()).await;
    assert!(matches!(result, Err(orders::StoreError::NotFound(_))));
}

#[tokio::test]
#[serial]
async fn delete_reports_presence() {
    let store = PostgresOrderStore::new(get_test_pool().await);
    let inserted = store.insert(new_order("PO-1")).await.unwrap();

    assert!(store.delete(inserted.id).await.unwrap());
    assert!(!store.delete(inserted.id).await.unwrap());
}

#[tokio::test]
#[serial]
async fn list_is_newest_first() {
    let store = PostgresOrderStore::new(get_test_pool().await);

    let base = Utc::now();
    let mut older = new_order("PO-old");
    older.created_at = base - chrono::Duration::hours(1);
    let mut newer = new_order("PO-new");
    newer.created_at = base;

    store.insert(older).await.unwrap();
    store.insert(newer).await.unwrap();

    let listed = store.list().await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].po_number, "PO-new");
    assert_eq!(listed[1].po_number, "PO-old");
}

#[tokio::test]
#[serial]
async fn arrival_fields_roundtrip() {
    let store = PostgresOrderStore::new(get_test_pool().await);
    let inserted = store.insert(new_order("PO-1")).await.unwrap();

    let arrived_at = Utc::now();
    let patch = OrderPatch {
        status: Some(OrderStatus::Arrived),
        arrived_at: Some(Some(arrived_at)),
        received_by: Some(Some("Alice".to_string())),
        ..OrderPatch::default()
    };
    let updated = store.update(inserted.id, patch).await.unwrap();

    assert_eq!(updated.status, OrderStatus::Arrived);
    assert_eq!(updated.received_by.as_deref(), Some("Alice"));
    // TIMESTAMPTZ keeps microsecond precision.
    let stored = updated.arrived_at.unwrap();
    assert!((stored - arrived_at).num_milliseconds().abs() < 1);
}

mod catalog_backend {
    use super::*;
    use catalog::{
        CatalogError, ItemCatalog, PostgresItemCatalog, PostgresSupplierDirectory,
        SupplierDirectory,
    };
    use common::{ItemId, SupplierId};

    async fn seed_item(pool: &PgPool, item_type: ItemType, name: &str, on_hand: i64) -> ItemId {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO items (item_type, name, on_hand) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(item_type.as_str())
        .bind(name)
        .bind(on_hand)
        .fetch_one(pool)
        .await
        .unwrap();
        ItemId::new(id)
    }

    #[tokio::test]
    #[serial]
    async fn item_get_and_set_on_hand() {
        let pool = get_test_pool().await;
        let id = seed_item(&pool, ItemType::Casket, "Oak Casket", 3).await;
        let catalog = PostgresItemCatalog::new(pool);

        let item = catalog.get(ItemType::Casket, id).await.unwrap().unwrap();
        assert_eq!(item.name, "Oak Casket");
        assert_eq!(item.on_hand, 3);

        catalog.set_on_hand(ItemType::Casket, id, 2).await.unwrap();
        let item = catalog.get(ItemType::Casket, id).await.unwrap().unwrap();
        assert_eq!(item.on_hand, 2);

        // The other kind is a separate namespace.
        assert!(catalog.get(ItemType::Urn, id).await.unwrap().is_none());
    }

    #[tokio::test]
    #[serial]
    async fn set_on_hand_missing_item() {
        let catalog = PostgresItemCatalog::new(get_test_pool().await);
        let result = catalog.set_on_hand(ItemType::Urn, ItemId::new(999), 1).await;
        assert!(matches!(result, Err(CatalogError::ItemNotFound { .. })));
    }

    #[tokio::test]
    #[serial]
    async fn supplier_lookup() {
        let pool = get_test_pool().await;
        let id: i64 =
            sqlx::query_scalar("INSERT INTO suppliers (name) VALUES ($1) RETURNING id")
                .bind("Batesville")
                .fetch_one(&pool)
                .await
                .unwrap();

        let directory = PostgresSupplierDirectory::new(pool);
        let supplier = directory.get(SupplierId::new(id)).await.unwrap().unwrap();
        assert_eq!(supplier.name, "Batesville");

        assert!(directory.get(SupplierId::new(999)).await.unwrap().is_none());
    }
}
