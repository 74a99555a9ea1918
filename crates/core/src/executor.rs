//! The query-execution seam between the explorer and a warehouse.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::DataError;
use crate::table::Table;

/// Executes read-only SQL against a warehouse and returns a tabular result.
///
/// Connection handling, auth, and any caching policy live behind this
/// trait. The explorer only ever formats SQL text and interprets tables.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    async fn run_query(&self, sql: &str) -> Result<Table, DataError>;
}

/// The two logical dimension tables the explorer queries.
///
/// These are injected identifiers: the explorer splices them into SQL but
/// never creates or alters them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableNames {
    pub breeds: String,
    pub temperament: String,
}

impl TableNames {
    pub fn new(breeds: impl Into<String>, temperament: impl Into<String>) -> Self {
        Self {
            breeds: breeds.into(),
            temperament: temperament.into(),
        }
    }
}

impl Default for TableNames {
    fn default() -> Self {
        Self::new("dim_breeds", "dim_temperament")
    }
}

/// True when `name` is safe to splice into SQL as a table identifier.
///
/// Accepts dotted and hyphenated warehouse paths alongside plain names.
pub fn is_valid_identifier(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
}
