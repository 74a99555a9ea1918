//! Staging-table loader.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use tracing::info;

use crate::pipeline::StampedBreed;
use crate::IngestError;

/// Loads stamped records into a SQLite staging table, replacing the
/// previous contents atomically.
pub struct StagingLoader {
    pool: SqlitePool,
}

impl StagingLoader {
    /// Open (or create) the staging database at `path`.
    pub async fn new(path: &str) -> Result<Self, IngestError> {
        let options = SqliteConnectOptions::from_str(path)
            .map_err(|e| IngestError::Load(format!("invalid SQLite path: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .max_connections(2)
            .connect_with(options)
            .await
            .map_err(|e| IngestError::Load(format!("failed to open SQLite: {e}")))?;

        Ok(Self { pool })
    }

    /// Replace the staging table with `records` in one transaction.
    /// Returns the number of rows loaded.
    pub async fn replace(&self, table: &str, records: &[StampedBreed]) -> Result<u64, IngestError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| IngestError::Load(format!("begin transaction: {e}")))?;

        let schema = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {table} (
                id                 INTEGER,
                name               TEXT NOT NULL,
                breed_group        TEXT,
                bred_for           TEXT,
                life_span          TEXT,
                temperament        TEXT,
                origin             TEXT,
                weight_metric      TEXT,
                height_metric      TEXT,
                reference_image_id TEXT,
                extracted_at       TEXT NOT NULL,
                extraction_date    TEXT NOT NULL
            )
            "#
        );
        sqlx::query(&schema)
            .execute(&mut *tx)
            .await
            .map_err(|e| IngestError::Load(format!("staging table: {e}")))?;

        sqlx::query(&format!("DELETE FROM {table}"))
            .execute(&mut *tx)
            .await
            .map_err(|e| IngestError::Load(format!("clear staging table: {e}")))?;

        let insert = format!(
            "INSERT INTO {table} (id, name, breed_group, bred_for, life_span, temperament, \
             origin, weight_metric, height_metric, reference_image_id, extracted_at, \
             extraction_date) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)"
        );
        for stamped in records {
            let record = &stamped.record;
            sqlx::query(&insert)
                .bind(record.id)
                .bind(&record.name)
                .bind(record.breed_group.as_deref())
                .bind(record.bred_for.as_deref())
                .bind(record.life_span.as_deref())
                .bind(record.temperament.as_deref())
                .bind(record.origin.as_deref())
                .bind(record.weight.as_ref().and_then(|m| m.metric.as_deref()))
                .bind(record.height.as_ref().and_then(|m| m.metric.as_deref()))
                .bind(record.reference_image_id.as_deref())
                .bind(&stamped.extracted_at)
                .bind(&stamped.extraction_date)
                .execute(&mut *tx)
                .await
                .map_err(|e| IngestError::Load(format!("insert {}: {e}", record.name)))?;
        }

        tx.commit()
            .await
            .map_err(|e| IngestError::Load(format!("commit: {e}")))?;

        let loaded = records.len() as u64;
        info!(table, loaded, "Replaced staging table");
        Ok(loaded)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::api::BreedRecord;
    use crate::pipeline::stamp;

    fn records(names: &[&str]) -> Vec<BreedRecord> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                serde_json::from_str(&format!(
                    r#"{{"id": {}, "name": "{name}", "weight": {{"metric": "3 - 6"}}}}"#,
                    i + 1
                ))
                .unwrap()
            })
            .collect()
    }

    #[tokio::test]
    async fn replace_swaps_the_whole_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("staging.db");
        let loader = StagingLoader::new(path.to_str().unwrap()).await.unwrap();
        let at = Utc.with_ymd_and_hms(2024, 3, 7, 12, 0, 0).unwrap();

        let first = loader
            .replace("stg_dog_breeds", &stamp(records(&["Akita", "Beagle"]), at))
            .await
            .unwrap();
        assert_eq!(first, 2);

        let second = loader
            .replace("stg_dog_breeds", &stamp(records(&["Pug"]), at))
            .await
            .unwrap();
        assert_eq!(second, 1);

        let count: i64 = sqlx::query_scalar("SELECT count(*) FROM stg_dog_breeds")
            .fetch_one(&loader.pool)
            .await
            .unwrap();
        assert_eq!(count, 1);

        let (name, metric): (String, Option<String>) =
            sqlx::query_as("SELECT name, weight_metric FROM stg_dog_breeds")
                .fetch_one(&loader.pool)
                .await
                .unwrap();
        assert_eq!(name, "Pug");
        assert_eq!(metric.as_deref(), Some("3 - 6"));
    }

    #[tokio::test]
    async fn stamps_land_in_their_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("staging.db");
        let loader = StagingLoader::new(path.to_str().unwrap()).await.unwrap();
        let at = Utc.with_ymd_and_hms(2024, 3, 7, 12, 0, 0).unwrap();

        loader
            .replace("stg_dog_breeds", &stamp(records(&["Akita"]), at))
            .await
            .unwrap();

        let (extracted_at, extraction_date): (String, String) =
            sqlx::query_as("SELECT extracted_at, extraction_date FROM stg_dog_breeds")
                .fetch_one(&loader.pool)
                .await
                .unwrap();
        assert!(extracted_at.starts_with("2024-03-07T12:00:00"));
        assert_eq!(extraction_date, "2024-03-07");
    }
}
