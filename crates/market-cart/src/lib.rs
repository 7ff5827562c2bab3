//! Persistent shopping cart for the GoMarketplace storefront.
//!
//! This crate provides:
//!
//! - **Cart**: products, line items, and the immutable [`CartCollection`]
//! - **Store**: [`CartStore`], which owns the live cart, hydrates it from a
//!   [`KeyValueStore`](market_storage::KeyValueStore) once at startup and
//!   writes it back after every change
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use market_cart::prelude::*;
//! use market_storage::FileStore;
//!
//! let storage = FileStore::open(data_dir).await?;
//! let store = CartStore::open(Arc::new(storage), CartConfig::default()).await?;
//!
//! store.add_to_cart(Product::new("a", "Shirt", "https://img/a.png", 19.9));
//! store.add_to_cart(Product::new("a", "Shirt", "https://img/a.png", 19.9));
//! store.decrement(&ProductId::new("a"));
//!
//! for item in store.products().iter() {
//!     println!("{} x{}", item.title, item.quantity);
//! }
//!
//! store.shutdown().await?;
//! ```

pub mod cart;
pub mod config;
pub mod error;
pub mod ids;
pub mod store;

pub use cart::{CartCollection, LineItem, Product};
pub use config::{CartConfig, CorruptSnapshotPolicy};
pub use error::CartError;
pub use ids::ProductId;
pub use store::{CartState, CartStore, Phase};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::cart::{CartCollection, LineItem, Product};
    pub use crate::config::{CartConfig, CorruptSnapshotPolicy};
    pub use crate::error::CartError;
    pub use crate::ids::ProductId;
    pub use crate::store::{CartState, CartStore, Phase};
}
