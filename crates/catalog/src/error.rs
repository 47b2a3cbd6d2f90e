use common::{ItemId, ItemType};
use thiserror::Error;

/// Errors that can occur when interacting with the catalog collaborators.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The referenced item does not exist in its catalog.
    #[error("{item_type} {id} not found in catalog")]
    ItemNotFound { item_type: ItemType, id: ItemId },

    /// The backing store failed in a non-specific way.
    #[error("Catalog backend error: {0}")]
    Backend(String),

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl CatalogError {
    /// Returns true if this error means the referenced item is absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::ItemNotFound { .. })
    }
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
