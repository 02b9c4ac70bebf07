//! Products

use std::fmt::{Display, Formatter, Result as FmtResult};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque product identifier, unique within a catalog.
///
/// Callers may supply any opaque string; [`ProductId::generate`] produces a
/// fresh random identifier for products created without one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Creates a product identifier from an arbitrary opaque string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ProductId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&self.0, f)
    }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ProductId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A catalog entry: the source of truth for a product's price and stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier within the catalog.
    pub id: ProductId,

    /// Display name.
    pub name: String,

    /// Unit price, non-negative.
    pub price: Decimal,

    /// Remaining sellable quantity.
    pub stock: u32,

    /// Category label used for display grouping.
    pub category: String,

    /// Image reference (URL or path).
    pub image: String,
}
