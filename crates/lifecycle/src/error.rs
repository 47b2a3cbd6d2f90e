//! Lifecycle error types.

use catalog::CatalogError;
use common::OrderId;
use orders::{StoreError, ValidationError};
use serde::Serialize;
use thiserror::Error;

/// What happened to the already-applied order mutation after the paired
/// inventory write failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome", content = "detail")]
pub enum CompensationOutcome {
    /// The order-side write was rolled back; no partial state remains.
    Reverted,

    /// The compensating write itself failed; the order row is left in the
    /// post-mutation state and needs operator attention.
    Failed(String),
}

impl CompensationOutcome {
    /// Returns true if the compensating write succeeded.
    pub fn succeeded(&self) -> bool {
        matches!(self, CompensationOutcome::Reverted)
    }
}

impl std::fmt::Display for CompensationOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompensationOutcome::Reverted => write!(f, "compensation reverted"),
            CompensationOutcome::Failed(reason) => {
                write!(f, "compensation failed: {reason}")
            }
        }
    }
}

/// Errors that can occur during lifecycle operations.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// A request field failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The referenced order does not exist.
    #[error("Order {0} not found")]
    OrderNotFound(OrderId),

    /// The order has already arrived; the transition is not repeatable.
    #[error("Order {0} has already arrived")]
    AlreadyArrived(OrderId),

    /// The paired stock update failed after the order-side write; the
    /// compensation outcome says whether the order write was undone.
    #[error("Inventory adjustment failed ({compensation}): {source}")]
    InventoryAdjustment {
        source: CatalogError,
        compensation: CompensationOutcome,
    },

    /// The order store failed.
    #[error("Order store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for LifecycleError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => LifecycleError::OrderNotFound(id),
            other => LifecycleError::Store(other),
        }
    }
}

/// Result type for lifecycle operations.
pub type Result<T> = std::result::Result<T, LifecycleError>;
