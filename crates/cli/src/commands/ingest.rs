//! `breedbox ingest` — Fetch, archive, and stage the breed catalog.

use breedbox_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    println!("  Fetching {} ...", config.ingest.api_url);
    let report = breedbox_ingest::run(&config.ingest, &config.warehouse.database_path)
        .await
        .map_err(|e| format!("Ingestion failed: {e}"))?;

    println!("  Fetched:  {} breeds", report.fetched);
    println!("  Archived: {}", report.archived_to.display());
    println!("  Loaded:   {} rows into {}", report.loaded, report.staging_table);

    Ok(())
}
