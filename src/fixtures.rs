//! Fixtures

use serde::Deserialize;
use thiserror::Error;

use crate::products::{Product, ProductId};

/// Seed catalog used when no persisted snapshot exists yet.
const SEED_CATALOG_YAML: &str = include_str!("../fixtures/catalog/seed.yml");

/// Fixture parsing errors.
#[derive(Debug, Error)]
pub enum FixtureError {
    /// YAML parsing error
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("invalid price format: {0}")]
    InvalidPrice(String),
}

/// Wrapper for a catalog in YAML.
#[derive(Debug, Deserialize)]
struct CatalogFixture {
    products: Vec<ProductFixture>,
}

/// Product fixture from YAML. Prices are decimal strings.
#[derive(Debug, Deserialize)]
struct ProductFixture {
    id: String,
    name: String,
    price: String,
    stock: u32,
    category: String,
    image: String,
}

impl TryFrom<ProductFixture> for Product {
    type Error = FixtureError;

    fn try_from(fixture: ProductFixture) -> Result<Self, Self::Error> {
        let price = fixture
            .price
            .parse()
            .map_err(|_| FixtureError::InvalidPrice(fixture.price.clone()))?;

        Ok(Product {
            id: ProductId::new(fixture.id),
            name: fixture.name,
            price,
            stock: fixture.stock,
            category: fixture.category,
            image: fixture.image,
        })
    }
}

/// Parses a catalog from YAML.
///
/// # Errors
///
/// Returns a [`FixtureError`] if the YAML is malformed or a price does not
/// parse as a decimal.
pub fn catalog_from_yaml(yaml: &str) -> Result<Vec<Product>, FixtureError> {
    let fixture: CatalogFixture = serde_norway::from_str(yaml)?;

    fixture.products.into_iter().map(Product::try_from).collect()
}

/// The embedded seed catalog.
///
/// # Errors
///
/// Returns a [`FixtureError`] if the embedded fixture fails to parse.
pub fn seed_catalog() -> Result<Vec<Product>, FixtureError> {
    catalog_from_yaml(SEED_CATALOG_YAML)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use testresult::TestResult;

    use super::*;

    #[test]
    fn seed_catalog_parses_five_products() -> TestResult {
        let catalog = seed_catalog()?;

        assert_eq!(catalog.len(), 5);

        Ok(())
    }

    #[test]
    fn seed_catalog_ids_are_unique() -> TestResult {
        let catalog = seed_catalog()?;

        let ids: HashSet<&str> = catalog.iter().map(|p| p.id.as_str()).collect();

        assert_eq!(ids.len(), catalog.len(), "seed ids must not repeat");

        Ok(())
    }

    #[test]
    fn seed_catalog_first_product_matches_expected_values() -> TestResult {
        let catalog = seed_catalog()?;
        let first = catalog.first().expect("seed catalog is non-empty");

        assert_eq!(first.id.as_str(), "1");
        assert_eq!(first.name, "Café Premium Tostado");
        assert_eq!(first.price, "15.50".parse::<rust_decimal::Decimal>()?);
        assert_eq!(first.stock, 50);
        assert_eq!(first.category, "Bebidas");

        Ok(())
    }

    #[test]
    fn invalid_price_is_rejected() {
        let yaml = "products:\n  - id: \"1\"\n    name: Bad\n    price: \"abc\"\n    stock: 1\n    category: Test\n    image: \"\"\n";

        let result = catalog_from_yaml(yaml);

        assert!(
            matches!(result, Err(FixtureError::InvalidPrice(ref price)) if price == "abc"),
            "expected InvalidPrice, got {result:?}"
        );
    }
}
