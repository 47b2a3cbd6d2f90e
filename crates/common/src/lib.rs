//! Shared types used across the back-office inventory system.

pub mod types;

pub use types::{ItemId, ItemType, OrderId, SupplierId};
