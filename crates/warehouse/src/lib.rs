//! Warehouse access for Breedbox.
//!
//! Two [`breedbox_core::QueryExecutor`] implementations: a SQLite-backed
//! warehouse holding the dimension tables, and a read-through TTL cache
//! that wraps any executor.

pub mod cache;
pub mod sqlite;

pub use cache::CachedExecutor;
pub use sqlite::SqliteWarehouse;
