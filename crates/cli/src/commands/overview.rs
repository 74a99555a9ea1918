//! `breedbox overview` — Dataset insights for the current filters.

use breedbox_config::AppConfig;
use breedbox_explorer::{compile, lifespan_leaders, size_distribution, trait_frequency, FilterCatalog};

use super::{open_executor, FilterArgs};

pub async fn run(filters: FilterArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let executor = open_executor(&config).await?;
    let tables = config.warehouse.table_names();

    let catalog = FilterCatalog::load(executor.as_ref(), &tables)
        .await
        .map_err(|e| format!("Failed to load filter options: {e}"))?;
    let selection = filters.into_selection(&catalog);
    let compiled = compile(&selection);

    let leaders = lifespan_leaders(executor.as_ref(), &tables, &compiled)
        .await
        .map_err(|e| format!("Lifespan query failed: {e}"))?;
    println!("Lifespan leaders");
    println!("================");
    if leaders.is_empty() {
        println!("    No data for current filters.");
    }
    for leader in &leaders {
        println!("  {:<28}{:.1} years", leader.breed_name, leader.avg_life_span_years);
    }

    let sizes = size_distribution(executor.as_ref(), &tables, &compiled)
        .await
        .map_err(|e| format!("Size distribution query failed: {e}"))?;
    println!();
    println!("Breeds per size category");
    println!("========================");
    if sizes.is_empty() {
        println!("    No data for current filters.");
    }
    for bucket in &sizes {
        let label = if bucket.size_category.is_empty() {
            "(unknown)"
        } else {
            bucket.size_category.as_str()
        };
        println!("  {:<28}{}", label, bucket.breed_count);
    }

    let traits = trait_frequency(executor.as_ref(), &tables, &compiled)
        .await
        .map_err(|e| format!("Trait frequency query failed: {e}"))?;
    println!();
    println!("Most common temperament traits");
    println!("==============================");
    if traits.is_empty() {
        println!("    No data for current filters.");
    }
    for count in &traits {
        println!("  {:<28}{}", count.trait_name, count.occurrences);
    }

    Ok(())
}
