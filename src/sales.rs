//! Sales

use std::fmt::{Display, Formatter, Result as FmtResult};

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{cart::CartLine, customers::Customer};

/// Unique sale identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SaleId(Uuid);

impl SaleId {
    /// Generates a fresh random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SaleId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for SaleId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&self.0, f)
    }
}

/// An immutable record of one completed transaction.
///
/// Items are value snapshots of the cart lines at checkout time; later
/// catalog edits never alter a recorded sale. There is no refund or void
/// operation, so a sale never changes after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    id: SaleId,
    date: Timestamp,
    items: Vec<CartLine>,
    total: Decimal,
    customer: Customer,
}

impl Sale {
    /// Assembles a sale record.
    ///
    /// Normally done by the store engine during checkout; exposed for tools
    /// and tests that build histories directly.
    pub fn new(
        id: SaleId,
        date: Timestamp,
        items: Vec<CartLine>,
        total: Decimal,
        customer: Customer,
    ) -> Self {
        Self {
            id,
            date,
            items,
            total,
            customer,
        }
    }

    /// Unique identifier.
    pub fn id(&self) -> SaleId {
        self.id
    }

    /// Creation timestamp.
    pub fn date(&self) -> Timestamp {
        self.date
    }

    /// Cart-line snapshots taken at checkout time.
    pub fn items(&self) -> &[CartLine] {
        &self.items
    }

    /// Total at creation time: the sum of each line's price times quantity.
    pub fn total(&self) -> Decimal {
        self.total
    }

    /// Customer captured by value at checkout.
    pub fn customer(&self) -> &Customer {
        &self.customer
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::products::{Product, ProductId};

    use super::*;

    fn sale() -> Sale {
        let product = Product {
            id: ProductId::new("1"),
            name: "Sandwich Club".to_string(),
            price: "12.00".parse().unwrap(),
            stock: 35,
            category: "Comidas".to_string(),
            image: String::new(),
        };

        Sale::new(
            SaleId::new(),
            Timestamp::UNIX_EPOCH,
            vec![CartLine::new(product, 2)],
            "24.00".parse().unwrap(),
            Customer {
                name: "Ana".to_string(),
                email: "a@x.com".to_string(),
                nit: "1".to_string(),
            },
        )
    }

    #[test]
    fn date_serializes_as_iso_8601_string() -> TestResult {
        let json = serde_json::to_value(sale())?;

        assert_eq!(json["date"], "1970-01-01T00:00:00Z");

        Ok(())
    }

    #[test]
    fn items_serialize_as_product_fields_plus_quantity() -> TestResult {
        let json = serde_json::to_value(sale())?;

        assert_eq!(json["items"][0]["id"], "1");
        assert_eq!(json["items"][0]["quantity"], 2);
        assert_eq!(json["total"], 24.0);
        assert_eq!(json["customer"]["nit"], "1");

        Ok(())
    }

    #[test]
    fn round_trips_through_json() -> TestResult {
        let original = sale();
        let json = serde_json::to_string(&original)?;
        let decoded: Sale = serde_json::from_str(&json)?;

        assert_eq!(decoded, original);

        Ok(())
    }
}
