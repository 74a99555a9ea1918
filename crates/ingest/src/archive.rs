//! Dated raw-payload archive.
//!
//! Every run writes the stamped payload under a date partition, so the
//! staging table can always be rebuilt from disk without refetching.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::info;

use crate::pipeline::StampedBreed;
use crate::IngestError;

/// Writes raw payloads into `<root>/raw_data_YYYY_MM_DD/dog_breeds.json`.
pub struct RawArchive {
    root: PathBuf,
}

impl RawArchive {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn partition_dir(&self, date: NaiveDate) -> PathBuf {
        self.root.join(format!("raw_data_{}", date.format("%Y_%m_%d")))
    }

    /// Write the payload for `date`, replacing any earlier file for the
    /// same day. Returns the file path.
    pub fn write(&self, date: NaiveDate, records: &[StampedBreed]) -> Result<PathBuf, IngestError> {
        let dir = self.partition_dir(date);
        fs::create_dir_all(&dir)
            .map_err(|e| IngestError::Archive(format!("create {}: {e}", dir.display())))?;

        let path = dir.join("dog_breeds.json");
        let bytes = serde_json::to_vec_pretty(records)
            .map_err(|e| IngestError::Archive(format!("serialize payload: {e}")))?;
        fs::write(&path, bytes)
            .map_err(|e| IngestError::Archive(format!("write {}: {e}", path.display())))?;

        info!(path = %path.display(), count = records.len(), "Archived raw payload");
        Ok(path)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}
