//! Purchase order domain.
//!
//! This crate provides the order side of the system:
//! - [`Order`] record and its single-row patch shapes
//! - [`OrderStatus`] state machine with the pure status derivation rule
//! - Typed commands with validating constructors ([`CreateOrder`],
//!   [`UpdateOrder`], [`ArriveOrder`])
//! - [`OrderStore`] trait with in-memory and PostgreSQL implementations

pub mod commands;
pub mod error;
pub mod memory;
pub mod postgres;
pub mod record;
pub mod status;
pub mod store;

pub use commands::{
    ArriveOrder, CreateOrder, CreateOrderInput, UpdateOrder, UpdateOrderInput,
};
pub use error::{Result, StoreError, ValidationError};
pub use memory::InMemoryOrderStore;
pub use postgres::PostgresOrderStore;
pub use record::{NewOrder, Order, OrderPatch};
pub use status::OrderStatus;
pub use store::OrderStore;
