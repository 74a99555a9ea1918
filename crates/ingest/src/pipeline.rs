//! The fetch → archive → stage pipeline.

use std::path::PathBuf;

use breedbox_config::IngestConfig;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::api::{BreedRecord, DogApiClient};
use crate::archive::RawArchive;
use crate::loader::StagingLoader;
use crate::IngestError;

/// A breed record plus its extraction stamps, as archived and staged.
#[derive(Debug, Clone, Serialize)]
pub struct StampedBreed {
    #[serde(flatten)]
    pub record: BreedRecord,

    /// Extraction instant, RFC 3339
    pub extracted_at: String,

    /// Extraction day, `YYYY-MM-DD`; names the archive partition
    pub extraction_date: String,
}

/// Stamp every record with the same extraction instant.
pub fn stamp(records: Vec<BreedRecord>, at: DateTime<Utc>) -> Vec<StampedBreed> {
    let extracted_at = at.to_rfc3339();
    let extraction_date = at.date_naive().to_string();
    records
        .into_iter()
        .map(|record| StampedBreed {
            record,
            extracted_at: extracted_at.clone(),
            extraction_date: extraction_date.clone(),
        })
        .collect()
}

/// What one pipeline run did.
#[derive(Debug)]
pub struct IngestReport {
    pub fetched: usize,
    pub archived_to: PathBuf,
    pub loaded: u64,
    pub staging_table: String,
    pub extracted_at: DateTime<Utc>,
}

/// Run the full pipeline: fetch from the API, then archive and stage.
pub async fn run(config: &IngestConfig, database_path: &str) -> Result<IngestReport, IngestError> {
    let records = DogApiClient::from_config(config).fetch().await?;
    load_records(config, database_path, records, Utc::now()).await
}

/// Archive and stage already-fetched records. Split from [`run`] so the
/// disk and database stages work without network access.
pub async fn load_records(
    config: &IngestConfig,
    database_path: &str,
    records: Vec<BreedRecord>,
    at: DateTime<Utc>,
) -> Result<IngestReport, IngestError> {
    let fetched = records.len();
    let stamped = stamp(records, at);

    let archived_to = RawArchive::new(&config.raw_data_dir).write(at.date_naive(), &stamped)?;

    let loader = StagingLoader::new(database_path).await?;
    let loaded = loader.replace(&config.staging_table, &stamped).await?;

    info!(fetched, loaded, "Ingestion complete");
    Ok(IngestReport {
        fetched,
        archived_to,
        loaded,
        staging_table: config.staging_table.clone(),
        extracted_at: at,
    })
}
