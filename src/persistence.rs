//! Persistence
//!
//! The engine persists its catalog and sales history as whole-collection
//! JSON snapshots in an external key-value blob store: two keys, each
//! overwritten in full after every mutation. No deltas, no partial-write
//! recovery.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::debug;

use crate::{products::Product, sales::Sale};

/// Blob key holding the JSON array of catalog products.
pub const PRODUCTS_KEY: &str = "products";

/// Blob key holding the JSON array of sales, newest first.
pub const SALES_KEY: &str = "sales";

/// Errors raised by a blob store implementation.
#[derive(Debug, Error)]
pub enum BlobStoreError {
    /// Reading the blob under the given key failed.
    #[error("failed to read blob {key:?}")]
    Read {
        /// The key being read.
        key: String,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// Writing the blob under the given key failed.
    #[error("failed to write blob {key:?}")]
    Write {
        /// The key being written.
        key: String,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
}

/// A key-value facility holding whole-collection snapshots.
///
/// Implementations only need get/put of UTF-8 blobs; the engine owns the
/// snapshot encoding.
pub trait BlobStore {
    /// Reads the blob stored under `key`, or `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns a [`BlobStoreError`] when the store itself fails; a missing
    /// key is not an error.
    fn read(&self, key: &str) -> Result<Option<String>, BlobStoreError>;

    /// Overwrites the blob stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`BlobStoreError`] when the write fails. The previous blob
    /// may or may not survive a failed write.
    fn write(&mut self, key: &str, value: &str) -> Result<(), BlobStoreError>;
}

/// File-backed blob store keeping one `<key>.json` file per key.
///
/// The crate's stand-in for browser local storage.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    /// Creates a store rooted at the given directory.
    ///
    /// The directory is created lazily on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory holding the blob files.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl BlobStore for JsonFileStore {
    fn read(&self, key: &str) -> Result<Option<String>, BlobStoreError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(BlobStoreError::Read {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), BlobStoreError> {
        let wrap = |source| BlobStoreError::Write {
            key: key.to_string(),
            source,
        };

        fs::create_dir_all(&self.root).map_err(wrap)?;
        fs::write(self.path_for(key), value).map_err(wrap)?;

        debug!(key, bytes = value.len(), "wrote blob snapshot");

        Ok(())
    }
}

/// In-memory blob store for tests and embedders that do not need a disk.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    blobs: FxHashMap<String, String>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the blob stored under `key`, if any.
    pub fn blob(&self, key: &str) -> Option<&str> {
        self.blobs.get(key).map(String::as_str)
    }

    /// Pre-seeds a blob, as if a previous process had written it.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.blobs.insert(key.into(), value.into());
    }
}

impl BlobStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, BlobStoreError> {
        Ok(self.blobs.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), BlobStoreError> {
        self.blobs.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Encodes the catalog as the `"products"` snapshot.
///
/// # Errors
///
/// Returns a [`serde_json::Error`] if serialization fails.
pub fn encode_products(catalog: &[Product]) -> Result<String, serde_json::Error> {
    serde_json::to_string(catalog)
}

/// Decodes a `"products"` snapshot back into a catalog.
///
/// # Errors
///
/// Returns a [`serde_json::Error`] if the blob is not a valid product array.
pub fn decode_products(blob: &str) -> Result<Vec<Product>, serde_json::Error> {
    serde_json::from_str(blob)
}

/// Encodes the sales history as the `"sales"` snapshot, newest first.
///
/// # Errors
///
/// Returns a [`serde_json::Error`] if serialization fails.
pub fn encode_sales(sales: &[Sale]) -> Result<String, serde_json::Error> {
    serde_json::to_string(sales)
}

/// Decodes a `"sales"` snapshot back into a history, newest first.
///
/// # Errors
///
/// Returns a [`serde_json::Error`] if the blob is not a valid sale array.
pub fn decode_sales(blob: &str) -> Result<Vec<Sale>, serde_json::Error> {
    serde_json::from_str(blob)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::products::ProductId;

    use super::*;

    fn catalog() -> Vec<Product> {
        vec![
            Product {
                id: ProductId::new("1"),
                name: "Café Premium Tostado".to_string(),
                price: "15.50".parse().unwrap(),
                stock: 50,
                category: "Bebidas".to_string(),
                image: "https://example.com/1.png".to_string(),
            },
            Product {
                id: ProductId::new("2"),
                name: "Tarta de Queso Artesanal".to_string(),
                price: "8.00".parse().unwrap(),
                stock: 20,
                category: "Postres".to_string(),
                image: "https://example.com/2.png".to_string(),
            },
        ]
    }

    #[test]
    fn products_snapshot_round_trips_identically() -> TestResult {
        let original = catalog();

        let decoded = decode_products(&encode_products(&original)?)?;

        assert_eq!(decoded, original, "round trip must preserve every field");

        Ok(())
    }

    #[test]
    fn memory_store_read_of_missing_key_is_none() -> TestResult {
        let store = MemoryStore::new();

        assert!(store.read("products")?.is_none());

        Ok(())
    }

    #[test]
    fn memory_store_write_then_read() -> TestResult {
        let mut store = MemoryStore::new();

        store.write("products", "[]")?;

        assert_eq!(store.read("products")?.as_deref(), Some("[]"));

        Ok(())
    }

    #[test]
    fn file_store_read_of_missing_key_is_none() -> TestResult {
        let dir = tempfile::tempdir()?;
        let store = JsonFileStore::new(dir.path());

        assert!(store.read("products")?.is_none());

        Ok(())
    }

    #[test]
    fn file_store_round_trips_a_snapshot() -> TestResult {
        let dir = tempfile::tempdir()?;
        let mut store = JsonFileStore::new(dir.path().join("data"));

        let blob = encode_products(&catalog())?;
        store.write(PRODUCTS_KEY, &blob)?;

        let read_back = store.read(PRODUCTS_KEY)?;
        assert_eq!(read_back.as_deref(), Some(blob.as_str()));

        let decoded = decode_products(&blob)?;
        assert_eq!(decoded, catalog());

        Ok(())
    }

    #[test]
    fn file_store_overwrites_whole_snapshot() -> TestResult {
        let dir = tempfile::tempdir()?;
        let mut store = JsonFileStore::new(dir.path());

        store.write(SALES_KEY, "[1]")?;
        store.write(SALES_KEY, "[]")?;

        assert_eq!(store.read(SALES_KEY)?.as_deref(), Some("[]"));

        Ok(())
    }
}
