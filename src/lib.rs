//! Till
//!
//! Till is a point-of-sale store state engine: a product catalog, an
//! in-progress cart, and an immutable sales history, persisted as whole
//! JSON snapshots to a local key-value blob store.
//!
//! The [`store::StoreEngine`] owns all state and exposes the lifecycle
//! operations; [`reports`] and [`receipt`] are read-only collaborators over
//! the recorded sales.

pub mod cart;
pub mod customers;
pub mod fixtures;
pub mod persistence;
pub mod products;
pub mod receipt;
pub mod reports;
pub mod sales;
pub mod store;
