//! Cart error types.

use market_storage::StorageError;
use thiserror::Error;

/// Errors that can occur in cart operations.
#[derive(Error, Debug)]
pub enum CartError {
    /// The storage backend failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The persisted snapshot is not valid JSON for a cart.
    #[error("Corrupt cart snapshot: {0}")]
    CorruptSnapshot(#[from] serde_json::Error),

    /// The persisted snapshot parsed but breaks a cart invariant.
    #[error("Invalid cart snapshot: {0}")]
    InvalidSnapshot(String),

    /// The most recent write of the cart to storage failed.
    #[error("Failed to persist cart: {0}")]
    Persist(String),

    /// Hydration failed; the store will not persist until restarted.
    #[error("Cart hydration failed: {0}")]
    Hydration(String),

    /// The persistence task has stopped.
    #[error("Cart writer is no longer running")]
    WriterClosed,
}
