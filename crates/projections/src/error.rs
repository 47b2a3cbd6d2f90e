//! Projection error types.

use thiserror::Error;

/// Errors that can occur while building the read-side view.
///
/// Enrichment lookup failures never surface here — they degrade the
/// listing to raw rows instead. Only the base order read can fail.
#[derive(Debug, Error)]
pub enum ProjectionError {
    /// The base order read failed; there is nothing to fall back to.
    #[error("Order store error: {0}")]
    Store(#[from] orders::StoreError),
}

/// Result type for projection operations.
pub type Result<T> = std::result::Result<T, ProjectionError>;
