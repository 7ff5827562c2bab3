//! The key-value storage port.

use async_trait::async_trait;

use crate::StorageError;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// An async string key-value store.
///
/// Values are opaque strings; callers decide the encoding (the cart stores one
/// JSON blob under a single key). Implementations must apply writes to the same
/// key in the order they are awaited.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value. Returns `None` if the key doesn't exist.
    async fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Write a value, replacing any previous one.
    async fn set(&self, key: &str, value: String) -> StorageResult<()>;

    /// Remove a value. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> StorageResult<()>;

    /// Check if a key exists.
    async fn exists(&self, key: &str) -> StorageResult<bool> {
        Ok(self.get(key).await?.is_some())
    }

    /// List all keys in the store.
    async fn keys(&self) -> StorageResult<Vec<String>>;
}
