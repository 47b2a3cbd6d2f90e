//! Order lifecycle engine.
//!
//! This crate ties the order store and the item catalog together without
//! a cross-entity transaction: every mutation is a single-row write, and
//! a failed dependent write is undone by an explicit compensating action.
//!
//! The two-step mutations:
//! 1. create — insert order row, then reserve one unit of stock
//! 2. arrive — mark the row arrived, then restock one unit
//!
//! If the inventory step fails, the order-side write is compensated and
//! the caller receives the inventory error together with the outcome of
//! the compensation.

pub mod error;
pub mod inventory;
pub mod service;

pub use error::{CompensationOutcome, LifecycleError};
pub use inventory::InventoryCounter;
pub use service::OrderLifecycleService;
