//! Cart and wishlist collections.
//!
//! These types own the collection invariants; they perform no I/O. The
//! storefront's `CartStore` wraps them with persistence and change
//! notification.
//!
//! Field names and shapes on the wire (`id`, numeric `price`, `image`)
//! match the records the storefront has always written to local storage, so
//! existing carts load unchanged.

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// One distinct purchasable configuration in the cart.
///
/// Identified by `(product_id, size)`. `quantity` is always at least 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Product this line refers to.
    #[serde(rename = "id")]
    pub product_id: ProductId,
    /// Product title at the time it was added.
    pub title: String,
    /// Price of a single unit.
    #[serde(rename = "price")]
    pub unit_price: Price,
    /// Image URL, if the product had one.
    #[serde(rename = "image", default, skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
    /// Selected size (the variant key).
    pub size: String,
    /// Number of units, never zero.
    pub quantity: u32,
}

impl CartLine {
    /// Whether this line has the given identity key.
    #[must_use]
    pub fn matches(&self, product_id: &ProductId, size: &str) -> bool {
        self.product_id == *product_id && self.size == size
    }

    /// `unit_price * quantity`.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price.times(self.quantity)
    }
}

/// Input for adding a product to the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItem {
    pub product_id: ProductId,
    pub title: String,
    pub unit_price: Price,
    pub image_ref: Option<String>,
    pub size: String,
    /// Units to add; `None` means one.
    pub quantity: Option<u32>,
}

impl CartItem {
    /// Create an item for a single unit of `product_id` in `size`.
    #[must_use]
    pub fn new(
        product_id: ProductId,
        title: impl Into<String>,
        unit_price: Price,
        size: impl Into<String>,
    ) -> Self {
        Self {
            product_id,
            title: title.into(),
            unit_price,
            image_ref: None,
            size: size.into(),
            quantity: None,
        }
    }

    /// Set the image URL.
    #[must_use]
    pub fn with_image(mut self, image_ref: impl Into<String>) -> Self {
        self.image_ref = Some(image_ref.into());
        self
    }

    /// Set an explicit quantity.
    #[must_use]
    pub const fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = Some(quantity);
        self
    }
}

/// The ordered collection of cart lines.
///
/// Lines keep insertion order: merging into an existing line never moves it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<CartLine>", into = "Vec<CartLine>")]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Lines in display order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Find the line with the given identity key.
    #[must_use]
    pub fn find(&self, product_id: &ProductId, size: &str) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.matches(product_id, size))
    }

    /// Add an item, merging into an existing `(product_id, size)` line.
    ///
    /// Returns `false` (and changes nothing) when the item asks for zero units.
    pub fn add(&mut self, item: CartItem) -> bool {
        let quantity = item.quantity.unwrap_or(1);
        if quantity == 0 {
            return false;
        }

        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| line.matches(&item.product_id, &item.size))
        {
            line.quantity = line.quantity.saturating_add(quantity);
        } else {
            self.lines.push(CartLine {
                product_id: item.product_id,
                title: item.title,
                unit_price: item.unit_price,
                image_ref: item.image_ref,
                size: item.size,
                quantity,
            });
        }
        true
    }

    /// Remove the line matching both keys. Returns whether a line was removed.
    pub fn remove(&mut self, product_id: &ProductId, size: &str) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| !line.matches(product_id, size));
        self.lines.len() != before
    }

    /// Set a line's quantity to `max(0, quantity)`, removing it at zero.
    ///
    /// Returns whether the cart changed. Unknown keys are a no-op.
    pub fn set_quantity(&mut self, product_id: &ProductId, size: &str, quantity: i64) -> bool {
        let Some(index) = self
            .lines
            .iter()
            .position(|line| line.matches(product_id, size))
        else {
            return false;
        };

        let clamped = u32::try_from(quantity.max(0)).unwrap_or(u32::MAX);
        if clamped == 0 {
            self.lines.remove(index);
            return true;
        }

        match self.lines.get_mut(index) {
            Some(line) if line.quantity != clamped => {
                line.quantity = clamped;
                true
            }
            _ => false,
        }
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of `unit_price * quantity` over all lines.
    #[must_use]
    pub fn total(&self) -> Price {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0u32, |acc, line| acc.saturating_add(line.quantity))
    }
}

impl From<Vec<CartLine>> for Cart {
    /// Rebuild a cart from stored lines, re-applying the invariants:
    /// zero-quantity lines are dropped and duplicate keys are merged.
    fn from(lines: Vec<CartLine>) -> Self {
        let mut cart = Self::new();
        for line in lines {
            cart.add(CartItem {
                product_id: line.product_id,
                title: line.title,
                unit_price: line.unit_price,
                image_ref: line.image_ref,
                size: line.size,
                quantity: Some(line.quantity),
            });
        }
        cart
    }
}

impl From<Cart> for Vec<CartLine> {
    fn from(cart: Cart) -> Self {
        cart.lines
    }
}

/// A saved-for-later product reference, unique per product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WishlistEntry {
    #[serde(rename = "id")]
    pub product_id: ProductId,
    pub title: String,
    pub price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// The ordered collection of wishlist entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<WishlistEntry>", into = "Vec<WishlistEntry>")]
pub struct Wishlist {
    entries: Vec<WishlistEntry>,
}

impl Wishlist {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    #[must_use]
    pub fn entries(&self) -> &[WishlistEntry] {
        &self.entries
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.entries.iter().any(|entry| entry.product_id == *product_id)
    }

    /// Append the entry unless its product is already saved.
    pub fn add(&mut self, entry: WishlistEntry) -> bool {
        if self.contains(&entry.product_id) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    /// Remove the entry for `product_id`. Returns whether one was removed.
    pub fn remove(&mut self, product_id: &ProductId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.product_id != *product_id);
        self.entries.len() != before
    }
}

impl From<Vec<WishlistEntry>> for Wishlist {
    fn from(entries: Vec<WishlistEntry>) -> Self {
        let mut wishlist = Self::new();
        for entry in entries {
            wishlist.add(entry);
        }
        wishlist
    }
}

impl From<Wishlist> for Vec<WishlistEntry> {
    fn from(wishlist: Wishlist) -> Self {
        wishlist.entries
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn item(id: &str, size: &str, cents: u32) -> CartItem {
        CartItem::new(ProductId::new(id), format!("Product {id}"), Price::from_cents(cents), size)
    }

    #[test]
    fn test_add_merges_same_key() {
        let mut cart = Cart::new();
        assert!(cart.add(item("A", "M", 1000)));
        assert!(cart.add(item("A", "M", 1000)));

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.lines()[0].quantity, 2);
    }

    #[test]
    fn test_add_distinguishes_sizes() {
        let mut cart = Cart::new();
        cart.add(item("A", "M", 1000));
        cart.add(item("A", "L", 1000));

        assert_eq!(cart.len(), 2);
        assert!(cart.find(&ProductId::new("A"), "M").is_some());
        assert!(cart.find(&ProductId::new("A"), "L").is_some());
    }

    #[test]
    fn test_merge_keeps_position() {
        let mut cart = Cart::new();
        cart.add(item("A", "M", 1000));
        cart.add(item("B", "S", 500));
        cart.add(item("A", "M", 1000).with_quantity(3));

        let ids: Vec<_> = cart.lines().iter().map(|l| l.product_id.as_str()).collect();
        assert_eq!(ids, ["A", "B"]);
        assert_eq!(cart.lines()[0].quantity, 4);
    }

    #[test]
    fn test_add_zero_quantity_is_noop() {
        let mut cart = Cart::new();
        assert!(!cart.add(item("A", "M", 1000).with_quantity(0)));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_clamps_and_removes() {
        let mut cart = Cart::new();
        cart.add(item("A", "M", 1000));
        cart.add(item("B", "L", 500));

        assert!(cart.set_quantity(&ProductId::new("A"), "M", 0));
        assert!(cart.find(&ProductId::new("A"), "M").is_none());

        assert!(cart.set_quantity(&ProductId::new("B"), "L", -5));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_unknown_key_is_noop() {
        let mut cart = Cart::new();
        cart.add(item("A", "M", 1000));
        assert!(!cart.set_quantity(&ProductId::new("A"), "XL", 3));
        assert_eq!(cart.lines()[0].quantity, 1);
    }

    #[test]
    fn test_total_and_count() {
        let mut cart = Cart::new();
        cart.add(item("A", "M", 1000));
        cart.add(item("B", "L", 500).with_quantity(2));

        assert_eq!(cart.total(), Price::from_cents(2000));
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_stored_shape_uses_legacy_field_names() {
        let mut cart = Cart::new();
        cart.add(item("A", "M", 1000).with_image("https://img.example/a.jpg"));

        let json: serde_json::Value = serde_json::to_value(&cart).unwrap();
        let line = &json[0];
        assert_eq!(line["id"], "A");
        assert!(line["price"].is_number());
        assert!((line["price"].as_f64().unwrap() - 10.0).abs() < 1e-9);
        assert_eq!(line["image"], "https://img.example/a.jpg");
        assert_eq!(line["quantity"], 1);
    }

    #[test]
    fn test_loading_repairs_invalid_lines() {
        let json = r#"[
            {"id":"A","title":"A","price":10,"size":"M","quantity":1},
            {"id":"B","title":"B","price":5,"size":"L","quantity":0},
            {"id":"A","title":"A","price":10,"size":"M","quantity":2}
        ]"#;
        let cart: Cart = serde_json::from_str(json).unwrap();

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.lines()[0].quantity, 3);
    }

    #[test]
    fn test_wishlist_is_idempotent() {
        let entry = WishlistEntry {
            product_id: ProductId::new("P"),
            title: "Parka".to_string(),
            price: Price::from_cents(12000),
            image: None,
        };
        let mut wishlist = Wishlist::new();
        assert!(wishlist.add(entry.clone()));
        assert!(!wishlist.add(entry));

        assert_eq!(wishlist.len(), 1);
        assert!(wishlist.remove(&ProductId::new("P")));
        assert!(!wishlist.remove(&ProductId::new("P")));
    }
}
