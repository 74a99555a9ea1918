//! The ingestion pipeline.
//!
//! Runs independently of the explorer: fetch the full breed list from the
//! Dog API, archive the stamped payload as a dated JSON partition, and
//! replace the staging table in SQLite. Each stage fails on its own error
//! variant so a partial run is diagnosable.

use thiserror::Error;

pub mod api;
pub mod archive;
pub mod loader;
pub mod pipeline;

pub use api::{BreedRecord, DogApiClient, Measurement};
pub use archive::RawArchive;
pub use loader::StagingLoader;
pub use pipeline::{load_records, run, stamp, IngestReport, StampedBreed};

/// Errors from the ingestion pipeline, one variant per stage.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Fetch failed: {0}")]
    Fetch(String),

    #[error("Unexpected API payload: {0}")]
    Payload(String),

    #[error("Archive failed: {0}")]
    Archive(String),

    #[error("Staging load failed: {0}")]
    Load(String),
}
