//! The cart collection.

use std::collections::HashSet;

use crate::cart::{LineItem, Product};
use crate::error::CartError;
use crate::ids::ProductId;
use serde::{Deserialize, Serialize};

/// An ordered set of line items, unique by product id.
///
/// Values are immutable. Each operation returns a new collection, or `None`
/// when the operation would not change anything, so callers never alias a
/// collection someone else is reading.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "Vec<LineItem>", into = "Vec<LineItem>")]
pub struct CartCollection {
    items: Vec<LineItem>,
}

impl CartCollection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collection from line items, checking its invariants.
    ///
    /// Returns an error if two items share an id, an item has quantity 0, or
    /// a price is not finite.
    pub fn from_items(items: Vec<LineItem>) -> Result<Self, CartError> {
        check_invariants(&items)?;
        Ok(Self { items })
    }

    /// Parse a persisted snapshot.
    pub fn from_json(raw: &str) -> Result<Self, CartError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Encode as a persisted snapshot.
    ///
    /// Fails with [`CartError::InvalidSnapshot`] if a price is not finite.
    pub fn to_json(&self) -> Result<String, CartError> {
        check_prices(&self.items)?;
        Ok(serde_json::to_string(&self.items)?)
    }

    /// Add one unit of a product.
    ///
    /// An existing item keeps its position and display fields and gains one
    /// unit; a new product is appended with quantity 1. Returns `None` only
    /// if the existing quantity is already at its maximum.
    pub fn with_added(&self, product: Product) -> Option<Self> {
        match self.position(&product.id) {
            Some(index) => self.with_quantity_at(index, 1),
            None => {
                let mut items = self.items.clone();
                items.push(LineItem::new(product, 1));
                Some(Self { items })
            }
        }
    }

    /// Add one unit of an item already in the cart.
    ///
    /// Returns `None` if the id is not in the cart.
    pub fn with_incremented(&self, id: &ProductId) -> Option<Self> {
        let index = self.position(id)?;
        self.with_quantity_at(index, 1)
    }

    /// Remove one unit of an item, dropping the item when none remain.
    ///
    /// Returns `None` if the id is not in the cart.
    pub fn with_decremented(&self, id: &ProductId) -> Option<Self> {
        let index = self.position(id)?;
        let mut items = self.items.clone();
        if items[index].quantity <= 1 {
            items.remove(index);
        } else {
            items[index].quantity -= 1;
        }
        Some(Self { items })
    }

    fn with_quantity_at(&self, index: usize, delta: u32) -> Option<Self> {
        let quantity = self.items[index].quantity.checked_add(delta)?;
        let mut items = self.items.clone();
        items[index].quantity = quantity;
        Some(Self { items })
    }

    fn position(&self, id: &ProductId) -> Option<usize> {
        self.items.iter().position(|i| &i.id == id)
    }

    /// Get an item by product id.
    pub fn get(&self, id: &ProductId) -> Option<&LineItem> {
        self.items.iter().find(|i| &i.id == id)
    }

    /// Check if a product is in the cart.
    pub fn contains(&self, id: &ProductId) -> bool {
        self.position(id).is_some()
    }

    /// Number of unique items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total item count (sum of quantities).
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Items in cart order.
    pub fn iter(&self) -> std::slice::Iter<'_, LineItem> {
        self.items.iter()
    }

    /// Items in cart order, as a slice.
    pub fn as_slice(&self) -> &[LineItem] {
        &self.items
    }
}

fn check_invariants(items: &[LineItem]) -> Result<(), CartError> {
    let mut seen: HashSet<&ProductId> = HashSet::with_capacity(items.len());
    for item in items {
        if item.quantity == 0 {
            return Err(CartError::InvalidSnapshot(format!(
                "item {} has quantity 0",
                item.id
            )));
        }
        if !seen.insert(&item.id) {
            return Err(CartError::InvalidSnapshot(format!(
                "duplicate item {}",
                item.id
            )));
        }
    }
    check_prices(items)
}

fn check_prices(items: &[LineItem]) -> Result<(), CartError> {
    match items.iter().find(|i| !i.price.is_finite()) {
        Some(item) => Err(CartError::InvalidSnapshot(format!(
            "item {} has non-finite price {}",
            item.id, item.price
        ))),
        None => Ok(()),
    }
}

impl TryFrom<Vec<LineItem>> for CartCollection {
    type Error = CartError;

    fn try_from(items: Vec<LineItem>) -> Result<Self, Self::Error> {
        Self::from_items(items)
    }
}

impl From<CartCollection> for Vec<LineItem> {
    fn from(collection: CartCollection) -> Self {
        collection.items
    }
}

impl<'a> IntoIterator for &'a CartCollection {
    type Item = &'a LineItem;
    type IntoIter = std::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str) -> Product {
        Product::new(id, "T", "u", 10.0)
    }

    fn quantities(cart: &CartCollection) -> Vec<(&str, u32)> {
        cart.iter().map(|i| (i.id.as_str(), i.quantity)).collect()
    }

    #[test]
    fn test_add_to_empty_cart() {
        let cart = CartCollection::new().with_added(product("a")).unwrap();

        assert_eq!(cart.len(), 1);
        let item = cart.get(&ProductId::new("a")).unwrap();
        assert_eq!(item.quantity, 1);
        assert_eq!(item.title, "T");
        assert_eq!(item.image_url, "u");
        assert_eq!(item.price, 10.0);
    }

    #[test]
    fn test_add_ignores_incoming_quantity() {
        let candidate = LineItem::new(product("a"), 0);
        let cart = CartCollection::new().with_added(candidate.into()).unwrap();

        assert_eq!(quantities(&cart), vec![("a", 1)]);
    }

    #[test]
    fn test_repeated_add_increments_single_entry() {
        let mut cart = CartCollection::new();
        for _ in 0..5 {
            cart = cart.with_added(product("a")).unwrap();
        }

        assert_eq!(quantities(&cart), vec![("a", 5)]);
    }

    #[test]
    fn test_add_existing_keeps_display_fields() {
        let cart = CartCollection::new()
            .with_added(product("a"))
            .unwrap()
            .with_added(Product::new("a", "Renamed", "other", 99.0))
            .unwrap();

        let item = cart.get(&ProductId::new("a")).unwrap();
        assert_eq!(item.title, "T");
        assert_eq!(item.quantity, 2);
    }

    #[test]
    fn test_add_preserves_insertion_order() {
        let cart = CartCollection::new()
            .with_added(product("a"))
            .unwrap()
            .with_added(product("b"))
            .unwrap()
            .with_added(product("a"))
            .unwrap();

        assert_eq!(quantities(&cart), vec![("a", 2), ("b", 1)]);
    }

    #[test]
    fn test_increment() {
        let cart = CartCollection::new().with_added(product("a")).unwrap();
        let cart = cart.with_incremented(&ProductId::new("a")).unwrap();

        assert_eq!(quantities(&cart), vec![("a", 2)]);
    }

    #[test]
    fn test_increment_and_decrement_missing_are_noops() {
        let cart = CartCollection::new().with_added(product("a")).unwrap();
        let missing = ProductId::new("zzz");

        assert!(cart.with_incremented(&missing).is_none());
        assert!(cart.with_decremented(&missing).is_none());
    }

    #[test]
    fn test_decrement_at_one_removes() {
        let cart = CartCollection::new().with_added(product("a")).unwrap();
        let cart = cart.with_decremented(&ProductId::new("a")).unwrap();

        assert!(cart.is_empty());
        assert!(!cart.contains(&ProductId::new("a")));
    }

    #[test]
    fn test_decrement_at_two_keeps_item() {
        let cart = CartCollection::new()
            .with_added(product("a"))
            .unwrap()
            .with_added(product("a"))
            .unwrap();
        let cart = cart.with_decremented(&ProductId::new("a")).unwrap();

        assert_eq!(quantities(&cart), vec![("a", 1)]);
    }

    #[test]
    fn test_decrement_keeps_position() {
        let cart = CartCollection::from_items(vec![
            LineItem::new(product("a"), 1),
            LineItem::new(product("b"), 3),
            LineItem::new(product("c"), 1),
        ])
        .unwrap();
        let cart = cart.with_decremented(&ProductId::new("b")).unwrap();

        assert_eq!(quantities(&cart), vec![("a", 1), ("b", 2), ("c", 1)]);
    }

    #[test]
    fn test_operations_leave_original_untouched() {
        let original = CartCollection::new().with_added(product("a")).unwrap();
        let _ = original.with_incremented(&ProductId::new("a")).unwrap();
        let _ = original.with_decremented(&ProductId::new("a")).unwrap();

        assert_eq!(quantities(&original), vec![("a", 1)]);
    }

    #[test]
    fn test_increment_saturates() {
        let cart =
            CartCollection::from_items(vec![LineItem::new(product("a"), u32::MAX)]).unwrap();

        assert!(cart.with_incremented(&ProductId::new("a")).is_none());
        assert!(cart.with_added(product("a")).is_none());
    }

    #[test]
    fn test_item_count() {
        let cart = CartCollection::from_items(vec![
            LineItem::new(product("a"), 2),
            LineItem::new(product("b"), 3),
        ])
        .unwrap();

        assert_eq!(cart.item_count(), 5);
        assert_eq!(cart.len(), 2);
    }

    #[test]
    fn test_json_round_trip_keeps_order_and_quantities() {
        let cart = CartCollection::from_items(vec![
            LineItem::new(product("b"), 4),
            LineItem::new(Product::new("a", "Shirt", "https://img/a.png", 19.9), 1),
        ])
        .unwrap();

        let parsed = CartCollection::from_json(&cart.to_json().unwrap()).unwrap();
        assert_eq!(parsed, cart);
    }

    #[test]
    fn test_empty_collection_serializes_as_empty_array() {
        assert_eq!(CartCollection::new().to_json().unwrap(), "[]");
    }

    #[test]
    fn test_from_json_rejects_duplicates() {
        let raw = r#"[
            {"id":"a","title":"T","image_url":"u","price":1,"quantity":1},
            {"id":"a","title":"T","image_url":"u","price":1,"quantity":2}
        ]"#;

        assert!(matches!(
            CartCollection::from_json(raw),
            Err(CartError::CorruptSnapshot(_))
        ));
    }

    #[test]
    fn test_from_items_rejects_zero_quantity() {
        let result = CartCollection::from_items(vec![LineItem::new(product("a"), 0)]);
        assert!(matches!(result, Err(CartError::InvalidSnapshot(_))));
    }

    #[test]
    fn test_to_json_rejects_non_finite_price() {
        let cart = CartCollection::new()
            .with_added(Product::new("a", "T", "u", f64::NAN))
            .unwrap();

        assert!(matches!(cart.to_json(), Err(CartError::InvalidSnapshot(_))));
        assert!(serde_json::to_string(&cart).is_err());
    }

    #[test]
    fn test_from_items_rejects_non_finite_price() {
        let result =
            CartCollection::from_items(vec![LineItem::new(Product::new("a", "T", "u", f64::INFINITY), 1)]);
        assert!(matches!(result, Err(CartError::InvalidSnapshot(_))));
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(CartCollection::from_json("{oops").is_err());
        assert!(CartCollection::from_json(r#"{"id":"a"}"#).is_err());
    }

    mod sequences {
        use super::*;
        use proptest::prelude::*;
        use std::collections::HashMap;

        #[derive(Debug, Clone)]
        enum Op {
            Add(usize),
            Increment(usize),
            Decrement(usize),
        }

        const IDS: [&str; 4] = ["a", "b", "c", "d"];

        fn op() -> impl Strategy<Value = Op> {
            prop_oneof![
                (0..IDS.len()).prop_map(Op::Add),
                (0..IDS.len()).prop_map(Op::Increment),
                (0..IDS.len()).prop_map(Op::Decrement),
            ]
        }

        proptest! {
            #[test]
            fn test_any_sequence_keeps_invariants(ops in prop::collection::vec(op(), 0..200)) {
                let mut cart = CartCollection::new();
                let mut expected: HashMap<&str, u32> = HashMap::new();

                for op in ops {
                    let (id, next) = match op {
                        Op::Add(i) => {
                            *expected.entry(IDS[i]).or_insert(0) += 1;
                            (IDS[i], cart.with_added(product(IDS[i])))
                        }
                        Op::Increment(i) => {
                            if let Some(n) = expected.get_mut(IDS[i]) {
                                *n += 1;
                            }
                            (IDS[i], cart.with_incremented(&ProductId::new(IDS[i])))
                        }
                        Op::Decrement(i) => {
                            match expected.get(IDS[i]).copied() {
                                Some(1) => { expected.remove(IDS[i]); }
                                Some(n) => { expected.insert(IDS[i], n - 1); }
                                None => {}
                            }
                            (IDS[i], cart.with_decremented(&ProductId::new(IDS[i])))
                        }
                    };

                    let was_present = cart.contains(&ProductId::new(id));
                    match next {
                        Some(next) => cart = next,
                        None => {
                            prop_assert!(!was_present);
                        }
                    }

                    prop_assert!(check_invariants(cart.as_slice()).is_ok());
                    prop_assert!(cart.iter().all(|i| i.quantity >= 1));
                    prop_assert_eq!(cart.len(), expected.len());
                    for item in &cart {
                        prop_assert_eq!(Some(&item.quantity), expected.get(item.id.as_str()));
                    }
                }
            }
        }
    }
}
