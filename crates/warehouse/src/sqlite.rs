//! SQLite-backed warehouse executor.
//!
//! Holds the two dimension tables (breeds, temperament) and runs read
//! queries for the explorer. Trait lists are stored comma-joined per breed;
//! `total_traits` keeps the count queryable without splitting.

use async_trait::async_trait;
use breedbox_core::breed::{Breed, TemperamentRecord};
use breedbox_core::error::DataError;
use breedbox_core::executor::{QueryExecutor, TableNames};
use breedbox_core::table::{Row, Table, Value};
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow, SqliteSynchronous,
};
use sqlx::{Column as _, Row as _, SqlitePool, TypeInfo as _, ValueRef as _};
use std::str::FromStr;
use tracing::{debug, info};

/// A SQLite warehouse holding the breed and temperament dimensions.
pub struct SqliteWarehouse {
    pool: SqlitePool,
    tables: TableNames,
}

impl SqliteWarehouse {
    /// Open (or create) the warehouse at `path` and ensure the dimension
    /// tables exist. Pass `"sqlite::memory:"` for an ephemeral database.
    pub async fn new(path: &str, tables: TableNames) -> Result<Self, DataError> {
        let options = SqliteConnectOptions::from_str(path)
            .map_err(|e| DataError::Storage(format!("Invalid SQLite path: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await
            .map_err(|e| DataError::Storage(format!("Failed to open SQLite: {e}")))?;

        let warehouse = Self { pool, tables };
        warehouse.ensure_schema().await?;
        info!("SQLite warehouse ready at {path}");
        Ok(warehouse)
    }

    pub fn tables(&self) -> &TableNames {
        &self.tables
    }

    /// Create the dimension tables if they are missing.
    async fn ensure_schema(&self) -> Result<(), DataError> {
        let breeds = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                breed_id            INTEGER PRIMARY KEY,
                breed_name          TEXT NOT NULL,
                breed_group         TEXT,
                size_category       TEXT,
                avg_weight_kg       REAL,
                avg_life_span_years REAL
            )
            "#,
            self.tables.breeds
        );
        sqlx::query(&breeds)
            .execute(&self.pool)
            .await
            .map_err(|e| DataError::MigrationFailed(format!("breeds table: {e}")))?;

        let temperament = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                breed_id           INTEGER PRIMARY KEY,
                family_suitability TEXT,
                traits             TEXT NOT NULL DEFAULT '',
                total_traits       INTEGER NOT NULL DEFAULT 0
            )
            "#,
            self.tables.temperament
        );
        sqlx::query(&temperament)
            .execute(&self.pool)
            .await
            .map_err(|e| DataError::MigrationFailed(format!("temperament table: {e}")))?;

        debug!("Warehouse schema ensured");
        Ok(())
    }

    /// Insert or replace one breeds-dimension row.
    pub async fn upsert_breed(&self, breed: &Breed) -> Result<(), DataError> {
        let sql = format!(
            "INSERT OR REPLACE INTO {} \
             (breed_id, breed_name, breed_group, size_category, avg_weight_kg, avg_life_span_years) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            self.tables.breeds
        );
        sqlx::query(&sql)
            .bind(breed.breed_id)
            .bind(&breed.breed_name)
            .bind(&breed.breed_group)
            .bind(&breed.size_category)
            .bind(breed.avg_weight_kg)
            .bind(breed.avg_life_span_years)
            .execute(&self.pool)
            .await
            .map_err(|e| DataError::Storage(format!("breed insert: {e}")))?;
        Ok(())
    }

    /// Insert or replace one temperament-dimension row.
    pub async fn upsert_temperament(&self, record: &TemperamentRecord) -> Result<(), DataError> {
        let sql = format!(
            "INSERT OR REPLACE INTO {} \
             (breed_id, family_suitability, traits, total_traits) \
             VALUES (?1, ?2, ?3, ?4)",
            self.tables.temperament
        );
        sqlx::query(&sql)
            .bind(record.breed_id)
            .bind(&record.family_suitability)
            .bind(record.joined_traits())
            .bind(record.total_traits() as i64)
            .execute(&self.pool)
            .await
            .map_err(|e| DataError::Storage(format!("temperament insert: {e}")))?;
        Ok(())
    }

    /// Decode one SQLite row into a backend-agnostic [`Row`] by storage class.
    fn decode_row(row: &SqliteRow) -> Result<Row, DataError> {
        let mut out = Row::new();
        for (idx, column) in row.columns().iter().enumerate() {
            let raw = row
                .try_get_raw(idx)
                .map_err(|e| DataError::QueryFailed(format!("column {}: {e}", column.name())))?;

            let value = if raw.is_null() {
                Value::Null
            } else {
                let type_name = raw.type_info().name().to_string();
                match type_name.as_str() {
                    "INTEGER" => Value::Integer(Self::decode_cell(row, idx, column.name())?),
                    "REAL" => Value::Real(Self::decode_cell(row, idx, column.name())?),
                    "TEXT" => Value::Text(Self::decode_cell(row, idx, column.name())?),
                    other => {
                        return Err(DataError::QueryFailed(format!(
                            "unsupported storage class {other} in column {}",
                            column.name()
                        )));
                    }
                }
            };
            out.set(column.name(), value);
        }
        Ok(out)
    }

    fn decode_cell<'r, T>(row: &'r SqliteRow, idx: usize, column: &str) -> Result<T, DataError>
    where
        T: sqlx::Decode<'r, sqlx::Sqlite> + sqlx::Type<sqlx::Sqlite>,
    {
        row.try_get(idx)
            .map_err(|e| DataError::QueryFailed(format!("column {column}: {e}")))
    }
}

#[async_trait]
impl QueryExecutor for SqliteWarehouse {
    async fn run_query(&self, sql: &str) -> Result<Table, DataError> {
        let rows = sqlx::query(sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DataError::QueryFailed(e.to_string()))?;

        let mut table = Table::default();
        if let Some(first) = rows.first() {
            table.columns = first.columns().iter().map(|c| c.name().to_string()).collect();
        }
        for row in &rows {
            table.push(Self::decode_row(row)?);
        }

        debug!(rows = table.len(), "Query executed");
        Ok(table)
    }
}
