//! Async key-value storage for the GoMarketplace cart.
//!
//! Provides the [`KeyValueStore`] port the cart persists through, two
//! backends, and a typed [`Cache`] wrapper with automatic JSON serialization.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use market_storage::{cache_key, Cache, FileStore};
//!
//! let store = FileStore::open("/var/lib/gomarketplace").await?;
//! let cache = Cache::new(Arc::new(store));
//!
//! // Store a value
//! cache.set(&cache_key!("@GoMarketplace", "products"), &items).await?;
//!
//! // Retrieve a value
//! let items: Option<Vec<LineItem>> = cache.get("@GoMarketplace:products").await?;
//! ```

mod error;
mod file;
mod kv;
mod memory;
mod port;

pub use error::StorageError;
pub use file::FileStore;
pub use kv::Cache;
pub use memory::MemoryStore;
pub use port::{KeyValueStore, StorageResult};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, FileStore, KeyValueStore, MemoryStore, StorageError};
}
