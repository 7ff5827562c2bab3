//! Product and line item types.

use crate::ids::ProductId;
use serde::{ser, Deserialize, Serialize, Serializer};

/// A product as the storefront shows it.
///
/// Everything except `id` is display data the cart carries but never reads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Product identifier.
    pub id: ProductId,
    /// Display name.
    pub title: String,
    /// Product image.
    pub image_url: String,
    /// Unit price.
    pub price: f64,
}

impl Product {
    /// Create a new product.
    pub fn new(
        id: impl Into<ProductId>,
        title: impl Into<String>,
        image_url: impl Into<String>,
        price: f64,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            image_url: image_url.into(),
            price,
        }
    }
}

/// A product and its quantity in the cart.
///
/// Serializes flat, matching the persisted snapshot format:
/// `{"id", "title", "image_url", "price", "quantity"}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItem {
    /// Product identifier.
    pub id: ProductId,
    /// Display name.
    pub title: String,
    /// Product image.
    pub image_url: String,
    /// Unit price. Must be finite to be persisted.
    #[serde(serialize_with = "serialize_price")]
    pub price: f64,
    /// Quantity, at least 1 while the item is in a cart.
    pub quantity: u32,
}

impl LineItem {
    /// Create a line item for a product.
    pub fn new(product: Product, quantity: u32) -> Self {
        Self {
            id: product.id,
            title: product.title,
            image_url: product.image_url,
            price: product.price,
            quantity,
        }
    }
}

/// Rejects NaN and infinity, which JSON cannot represent.
fn serialize_price<S: Serializer>(price: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if !price.is_finite() {
        return Err(ser::Error::custom(format!("non-finite price {}", price)));
    }
    serializer.serialize_f64(*price)
}

impl From<LineItem> for Product {
    fn from(item: LineItem) -> Self {
        Self {
            id: item.id,
            title: item.title,
            image_url: item.image_url,
            price: item.price,
        }
    }
}
