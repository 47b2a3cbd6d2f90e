//! Item catalog and supplier directory collaborators.
//!
//! The order lifecycle engine treats these as external systems and only
//! depends on the narrow interfaces here: get-by-id for both, plus an
//! unconditional counter-set on items. Two implementations are provided
//! per interface: an in-memory one (tests, default binary) and a
//! PostgreSQL one.

pub mod error;
pub mod memory;
pub mod postgres;
pub mod store;

pub use error::{CatalogError, Result};
pub use memory::{InMemoryItemCatalog, InMemorySupplierDirectory};
pub use postgres::{PostgresItemCatalog, PostgresSupplierDirectory};
pub use store::{Item, ItemCatalog, Supplier, SupplierDirectory};
