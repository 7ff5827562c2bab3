//! Shopping cart module.
//!
//! Contains the line item types and the immutable cart collection.

mod collection;
mod item;

pub use collection::CartCollection;
pub use item::{LineItem, Product};
