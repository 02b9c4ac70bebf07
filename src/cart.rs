//! Cart
//!
//! The in-progress, unpersisted set of selected products and quantities for
//! the current transaction. Lines are value copies of catalog entries taken
//! at add-to-cart time; later catalog edits do not reach into them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::products::{Product, ProductId};

/// One selected product with a requested quantity.
///
/// Serializes as the product's fields plus `quantity`, matching the persisted
/// sale-item shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    #[serde(flatten)]
    product: Product,
    quantity: u32,
}

impl CartLine {
    /// Creates a line holding a copy of the product and the given quantity.
    pub fn new(product: Product, quantity: u32) -> Self {
        Self { product, quantity }
    }

    /// The product copy taken when the line was created.
    pub fn product(&self) -> &Product {
        &self.product
    }

    /// Requested quantity, always positive.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Line total: unit price times quantity.
    pub fn total(&self) -> Decimal {
        self.product.price * Decimal::from(self.quantity)
    }
}

/// Insertion-ordered cart with at most one line per product identifier.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    lines: SmallVec<[CartLine; 8]>,
}

impl Cart {
    /// Creates an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one unit of the product.
    ///
    /// Merges into the existing line for the same identifier when present,
    /// otherwise appends a new line with quantity 1. Stock is not checked
    /// here; gating over-quantity adds is the caller's concern.
    pub fn add(&mut self, product: &Product) {
        if let Some(line) = self.line_mut(&product.id) {
            line.quantity = line.quantity.saturating_add(1);
            return;
        }

        self.lines.push(CartLine::new(product.clone(), 1));
    }

    /// Removes the line for the given identifier; no-op when absent.
    pub fn remove(&mut self, id: &ProductId) {
        self.lines.retain(|line| line.product.id != *id);
    }

    /// Sets the quantity of the line for the given identifier.
    ///
    /// A quantity of zero or below removes the line entirely. No-op when no
    /// line matches. The value is not clamped to stock.
    pub fn set_quantity(&mut self, id: &ProductId, quantity: i64) {
        if quantity <= 0 {
            self.remove(id);
            return;
        }

        if let Some(line) = self.line_mut(id) {
            line.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        }
    }

    /// Empties the cart unconditionally.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Returns the line for the given identifier, if any.
    pub fn line(&self, id: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.product.id == *id)
    }

    fn line_mut(&mut self, id: &ProductId) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|line| line.product.id == *id)
    }

    /// All lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Number of lines in the cart.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart holds no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of all line totals.
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(CartLine::total).sum()
    }

    /// Copies the current lines out as a snapshot.
    pub(crate) fn snapshot(&self) -> Vec<CartLine> {
        self.lines.to_vec()
    }
}
