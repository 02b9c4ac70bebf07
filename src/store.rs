//! Store
//!
//! The store state engine owns three collections: the product catalog, the
//! active cart, and the completed sales history. Views call its operations
//! and render the snapshots it exposes; nothing outside the engine holds a
//! mutable reference into its state.
//!
//! Catalog and history survive restarts as whole JSON snapshots in a
//! [`BlobStore`]; the cart lives only for the current transaction and is
//! never persisted.

use jiff::Timestamp;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    cart::Cart,
    customers::Customer,
    fixtures::{self, FixtureError},
    persistence::{self, BlobStore, BlobStoreError, PRODUCTS_KEY, SALES_KEY},
    products::{Product, ProductId},
    sales::{Sale, SaleId},
};

/// Errors surfaced by engine operations.
///
/// Not-found mutations are deliberately not errors: removing or updating an
/// unknown id is a silent no-op, and callers that need to distinguish must
/// check membership first.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An `add_product` call reused an identifier already in the catalog.
    #[error("product {0} already exists in the catalog")]
    DuplicateProduct(ProductId),

    /// A snapshot write failed. In-memory state is already consistent; only
    /// the persisted snapshot is stale.
    #[error("failed to persist snapshot")]
    Persistence(#[from] BlobStoreError),

    /// A snapshot failed to serialize.
    #[error("failed to encode snapshot")]
    Snapshot(#[from] serde_json::Error),

    /// The embedded seed catalog failed to parse.
    #[error(transparent)]
    Fixture(#[from] FixtureError),
}

/// The store state engine.
///
/// One instance per composition root, owned by the application and passed by
/// reference to whatever needs it. Each instance is independent, so tests
/// construct their own over a [`MemoryStore`](crate::persistence::MemoryStore).
#[derive(Debug)]
pub struct StoreEngine<S> {
    store: S,
    catalog: Vec<Product>,
    cart: Cart,
    sales: Vec<Sale>,
}

impl<S: BlobStore> StoreEngine<S> {
    /// Opens the engine over a blob store.
    ///
    /// The catalog is loaded from the `"products"` key, falling back to the
    /// seed catalog when the key is absent or unreadable. The history is
    /// loaded from `"sales"`, falling back to empty. The cart always starts
    /// empty.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] only if the embedded seed catalog itself
    /// fails to parse; unreadable snapshots fall back rather than fail.
    pub fn open(store: S) -> Result<Self, StoreError> {
        let catalog = match store.read(PRODUCTS_KEY) {
            Ok(Some(blob)) => match persistence::decode_products(&blob) {
                Ok(catalog) => catalog,
                Err(error) => {
                    warn!(%error, "unreadable products snapshot, using seed catalog");
                    fixtures::seed_catalog()?
                }
            },
            Ok(None) => fixtures::seed_catalog()?,
            Err(error) => {
                warn!(%error, "failed to read products snapshot, using seed catalog");
                fixtures::seed_catalog()?
            }
        };

        let sales = match store.read(SALES_KEY) {
            Ok(Some(blob)) => match persistence::decode_sales(&blob) {
                Ok(sales) => sales,
                Err(error) => {
                    warn!(%error, "unreadable sales snapshot, starting with empty history");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(error) => {
                warn!(%error, "failed to read sales snapshot, starting with empty history");
                Vec::new()
            }
        };

        debug!(
            products = catalog.len(),
            sales = sales.len(),
            "opened store engine"
        );

        Ok(Self {
            store,
            catalog,
            cart: Cart::new(),
            sales,
        })
    }

    /// Opens the engine with an explicit starting catalog, ignoring any
    /// persisted `"products"` snapshot. Used by tests and tools.
    pub fn with_catalog(store: S, catalog: Vec<Product>) -> Self {
        Self {
            store,
            catalog,
            cart: Cart::new(),
            sales: Vec::new(),
        }
    }

    /// The catalog in display order.
    pub fn catalog(&self) -> &[Product] {
        &self.catalog
    }

    /// Looks up a catalog entry by identifier.
    pub fn product(&self, id: &ProductId) -> Option<&Product> {
        self.catalog.iter().find(|product| product.id == *id)
    }

    /// The active cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// The sales history, newest first.
    pub fn sales(&self) -> &[Sale] {
        &self.sales
    }

    /// The underlying blob store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Adds one unit of the product to the cart, merging with any existing
    /// line for the same identifier.
    ///
    /// Stock is not checked here; the view layer gates adds on `stock > 0`.
    pub fn add_to_cart(&mut self, product: &Product) {
        self.cart.add(product);
        debug!(product = %product.id, "added product to cart");
    }

    /// Removes the cart line for the given identifier; no-op when absent.
    pub fn remove_from_cart(&mut self, id: &ProductId) {
        self.cart.remove(id);
    }

    /// Sets a cart line's quantity; zero or below removes the line, and an
    /// unknown identifier is a no-op. The value is not clamped to stock.
    pub fn update_cart_quantity(&mut self, id: &ProductId, quantity: i64) {
        self.cart.set_quantity(id, quantity);
    }

    /// Empties the cart unconditionally.
    pub fn clear_cart(&mut self) {
        self.cart.clear();
    }

    /// Completes the current transaction.
    ///
    /// Computes the total over the cart lines, decrements each matching
    /// product's stock floored at zero, records a new sale at the front of
    /// the history, and clears the cart. All in-memory mutation finishes
    /// before any snapshot write, so no caller ever observes partial state.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Persistence`] or [`StoreError::Snapshot`] when
    /// a snapshot write fails; in-memory state is already consistent.
    pub fn complete_sale(&mut self, customer: Customer) -> Result<Sale, StoreError> {
        let total = self.cart.total();
        let items = self.cart.snapshot();

        for line in &items {
            if let Some(product) = self.catalog_entry_mut(&line.product().id) {
                // Floored at zero: the cart may over-request, stock may not go negative.
                product.stock = product.stock.saturating_sub(line.quantity());
            }
        }

        let sale = Sale::new(SaleId::new(), Timestamp::now(), items, total, customer);
        self.sales.insert(0, sale.clone());
        self.cart.clear();

        info!(sale = %sale.id(), %total, lines = sale.items().len(), "completed sale");

        self.persist_catalog()?;
        self.persist_sales()?;

        Ok(sale)
    }

    /// Appends a product to the catalog.
    ///
    /// The caller supplies the identifier; this path never generates one.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateProduct`] when the identifier is
    /// already in the catalog, or a persistence error from the snapshot
    /// write.
    pub fn add_product(&mut self, product: Product) -> Result<(), StoreError> {
        if self.product(&product.id).is_some() {
            return Err(StoreError::DuplicateProduct(product.id));
        }

        info!(product = %product.id, "added product to catalog");
        self.catalog.push(product);
        self.persist_catalog()
    }

    /// Replaces the catalog entry with a matching identifier, leaving all
    /// others untouched; silent no-op when no entry matches.
    ///
    /// # Errors
    ///
    /// Returns a persistence error from the snapshot write.
    pub fn update_product(&mut self, product: Product) -> Result<(), StoreError> {
        let Some(existing) = self.catalog_entry_mut(&product.id) else {
            return Ok(());
        };

        *existing = product;
        self.persist_catalog()
    }

    /// Removes the catalog entry with the given identifier; silent no-op
    /// when absent.
    ///
    /// Never cascades: cart lines and historical sales keep their value
    /// copies of the product as it was when they were taken.
    ///
    /// # Errors
    ///
    /// Returns a persistence error from the snapshot write.
    pub fn delete_product(&mut self, id: &ProductId) -> Result<(), StoreError> {
        let before = self.catalog.len();
        self.catalog.retain(|product| product.id != *id);

        if self.catalog.len() == before {
            return Ok(());
        }

        info!(product = %id, "deleted product from catalog");
        self.persist_catalog()
    }

    fn catalog_entry_mut(&mut self, id: &ProductId) -> Option<&mut Product> {
        self.catalog.iter_mut().find(|product| product.id == *id)
    }

    fn persist_catalog(&mut self) -> Result<(), StoreError> {
        let blob = persistence::encode_products(&self.catalog)?;
        self.store.write(PRODUCTS_KEY, &blob)?;
        Ok(())
    }

    fn persist_sales(&mut self) -> Result<(), StoreError> {
        let blob = persistence::encode_sales(&self.sales)?;
        self.store.write(SALES_KEY, &blob)?;
        Ok(())
    }
}
