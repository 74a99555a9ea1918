//! Read-through query cache.
//!
//! Keyed by exact query text. Entries expire after a fixed TTL, so results
//! may lag the warehouse by up to that long. Only successful results are
//! cached; failures always reach the caller and are retried on the next call.

use async_trait::async_trait;
use breedbox_core::error::DataError;
use breedbox_core::executor::QueryExecutor;
use breedbox_core::table::Table;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tracing::debug;

struct CacheEntry {
    table: Table,
    stored_at: Instant,
}

/// Caches successful query results from an inner executor.
pub struct CachedExecutor {
    inner: Arc<dyn QueryExecutor>,
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl CachedExecutor {
    pub fn new(inner: Arc<dyn QueryExecutor>, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lookup(&self, sql: &str) -> Option<Table> {
        let entries = self.entries();
        let entry = entries.get(sql)?;
        (entry.stored_at.elapsed() < self.ttl).then(|| entry.table.clone())
    }

    fn store(&self, sql: &str, table: &Table) {
        self.entries().insert(
            sql.to_string(),
            CacheEntry {
                table: table.clone(),
                stored_at: Instant::now(),
            },
        );
    }
}

#[async_trait]
impl QueryExecutor for CachedExecutor {
    async fn run_query(&self, sql: &str) -> Result<Table, DataError> {
        if let Some(table) = self.lookup(sql) {
            debug!("Query cache hit");
            return Ok(table);
        }

        let table = self.inner.run_query(sql).await?;
        self.store(sql, &table);
        Ok(table)
    }
}
