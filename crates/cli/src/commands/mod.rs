//! Command implementations for the `breedbox` CLI.

pub mod filters;
pub mod finder;
pub mod ingest;
pub mod overview;
pub mod status;

use std::sync::Arc;
use std::time::Duration;

use breedbox_config::AppConfig;
use breedbox_core::executor::QueryExecutor;
use breedbox_core::filter::FilterSelection;
use breedbox_explorer::FilterCatalog;
use breedbox_warehouse::{CachedExecutor, SqliteWarehouse};
use clap::Args;

/// Filter flags shared by `overview` and `finder`.
#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    /// Restrict to a breed group (repeatable)
    #[arg(long = "group", value_name = "GROUP")]
    pub groups: Vec<String>,

    /// Restrict to a size category (repeatable)
    #[arg(long = "size", value_name = "SIZE")]
    pub sizes: Vec<String>,

    /// Restrict to a family-suitability level (repeatable)
    #[arg(long = "family", value_name = "LEVEL")]
    pub family: Vec<String>,

    /// Lower bound for average weight, kg
    #[arg(long)]
    pub weight_min: Option<f64>,

    /// Upper bound for average weight, kg
    #[arg(long)]
    pub weight_max: Option<f64>,
}

impl FilterArgs {
    /// Resolve the flags into a selection, clamping any weight flags to
    /// the catalog's observed bounds.
    pub fn into_selection(self, catalog: &FilterCatalog) -> FilterSelection {
        let bounds = catalog.weight_bounds;
        let weight_range = bounds.clamp(
            self.weight_min.unwrap_or(bounds.low),
            self.weight_max.unwrap_or(bounds.high),
        );
        FilterSelection {
            breed_groups: self.groups,
            size_categories: self.sizes,
            family_suitability: self.family,
            weight_range,
        }
    }
}

/// Open the warehouse and wrap it in the read-through query cache.
pub async fn open_executor(
    config: &AppConfig,
) -> Result<Arc<dyn QueryExecutor>, Box<dyn std::error::Error>> {
    let warehouse = SqliteWarehouse::new(
        &config.warehouse.database_path,
        config.warehouse.table_names(),
    )
    .await
    .map_err(|e| format!("Failed to open warehouse: {e}"))?;

    Ok(Arc::new(CachedExecutor::new(
        Arc::new(warehouse),
        Duration::from_secs(config.warehouse.cache_ttl_secs),
    )))
}
