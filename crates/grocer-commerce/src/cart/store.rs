//! Cart store and line types.

use crate::cart::CartItem;
use crate::ids::ProductId;
use crate::money::Money;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;

/// One product's presence in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Product identifier, unique within the cart.
    pub id: ProductId,
    /// Display name copied at add-time.
    pub name: String,
    /// Unit price copied at add-time.
    pub price: Money,
    /// Quantity; a line never holds zero.
    pub quantity: NonZeroU32,
}

impl CartLine {
    fn from_item(item: CartItem) -> Self {
        Self {
            id: item.id,
            name: item.name,
            price: item.price,
            quantity: NonZeroU32::MIN,
        }
    }

    /// Quantity as a plain integer.
    pub fn quantity(&self) -> u32 {
        self.quantity.get()
    }

    /// Price times quantity.
    pub fn line_total(&self) -> Money {
        self.price.times(self.quantity.get())
    }
}

/// The user's in-progress order.
///
/// Lines keep insertion order and are keyed by product id. Quantities are
/// always at least one, and the total is recomputed from the lines on every
/// call. The store is an owned value: whoever drives the UI holds it and
/// passes it by reference to the code that reads or mutates it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<CartLine>", into = "Vec<CartLine>")]
pub struct CartStore {
    lines: Vec<CartLine>,
}

impl CartStore {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a cart from persisted lines.
    ///
    /// Lines sharing an id are merged into the first occurrence with their
    /// quantities summed.
    pub fn from_lines(lines: impl IntoIterator<Item = CartLine>) -> Self {
        let mut cart = Self::new();
        for line in lines {
            match cart.position(&line.id) {
                Some(index) => {
                    let existing = &mut cart.lines[index];
                    existing.quantity = existing.quantity.saturating_add(line.quantity.get());
                }
                None => cart.lines.push(line),
            }
        }
        cart
    }

    /// Add one unit of a product.
    ///
    /// An existing line is incremented; otherwise a new line with quantity
    /// one is appended. Returns the line's resulting quantity.
    pub fn add_item(&mut self, item: CartItem) -> u32 {
        match self.position(&item.id) {
            Some(index) => {
                let line = &mut self.lines[index];
                line.quantity = line.quantity.saturating_add(1);
                line.quantity.get()
            }
            None => {
                self.lines.push(CartLine::from_item(item));
                1
            }
        }
    }

    /// Set a line's quantity.
    ///
    /// A quantity of zero removes the line. Unknown ids are a no-op.
    /// Returns whether the cart changed.
    pub fn update_quantity(&mut self, id: &ProductId, quantity: u32) -> bool {
        let Some(quantity) = NonZeroU32::new(quantity) else {
            return self.remove_item(id);
        };
        match self.lines.iter_mut().find(|l| &l.id == id) {
            Some(line) if line.quantity != quantity => {
                line.quantity = quantity;
                true
            }
            _ => false,
        }
    }

    /// Add one to a line's quantity. Unknown ids are a no-op.
    pub fn increment(&mut self, id: &ProductId) -> bool {
        match self.line(id) {
            Some(line) => {
                let next = line.quantity().saturating_add(1);
                self.update_quantity(id, next)
            }
            None => false,
        }
    }

    /// Take one from a line's quantity, removing the line at zero.
    pub fn decrement(&mut self, id: &ProductId) -> bool {
        match self.line(id) {
            Some(line) => {
                let next = line.quantity() - 1;
                self.update_quantity(id, next)
            }
            None => false,
        }
    }

    /// Remove a line. Absent ids are a no-op.
    pub fn remove_item(&mut self, id: &ProductId) -> bool {
        let len_before = self.lines.len();
        self.lines.retain(|l| &l.id != id);
        self.lines.len() < len_before
    }

    /// Empty the cart.
    pub fn clear_cart(&mut self) {
        self.lines.clear();
    }

    /// Sum of price times quantity over all lines.
    pub fn total(&self) -> Money {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// All lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Iterate over the lines.
    pub fn iter(&self) -> impl Iterator<Item = &CartLine> {
        self.lines.iter()
    }

    /// Get a line by product id.
    pub fn line(&self, id: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|l| &l.id == id)
    }

    /// Quantity of a product in the cart, zero when absent.
    pub fn quantity_of(&self, id: &ProductId) -> u32 {
        self.line(id).map(CartLine::quantity).unwrap_or(0)
    }

    /// Total item count (sum of quantities).
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity())).sum()
    }

    /// Number of distinct products.
    pub fn unique_item_count(&self) -> usize {
        self.lines.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn position(&self, id: &ProductId) -> Option<usize> {
        self.lines.iter().position(|l| &l.id == id)
    }
}

impl From<Vec<CartLine>> for CartStore {
    fn from(lines: Vec<CartLine>) -> Self {
        Self::from_lines(lines)
    }
}

impl From<CartStore> for Vec<CartLine> {
    fn from(cart: CartStore) -> Self {
        cart.lines
    }
}

impl<'a> IntoIterator for &'a CartStore {
    type Item = &'a CartLine;
    type IntoIter = std::slice::Iter<'a, CartLine>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}
