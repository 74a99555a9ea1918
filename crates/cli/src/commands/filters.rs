//! `breedbox filters` — List the selectable filter options.

use breedbox_config::AppConfig;
use breedbox_explorer::FilterCatalog;

use super::open_executor;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let executor = open_executor(&config).await?;
    let tables = config.warehouse.table_names();

    let catalog = FilterCatalog::load(executor.as_ref(), &tables)
        .await
        .map_err(|e| format!("Failed to load filter options: {e}"))?;

    println!("Filter options");
    println!("==============");
    print_options("Breed groups:", &catalog.breed_groups);
    print_options("Size categories:", &catalog.size_categories);
    print_options("Family suitability:", &catalog.family_suitability);
    println!(
        "  {:<20}{:.1} - {:.1}",
        "Avg weight (kg):", catalog.weight_bounds.low, catalog.weight_bounds.high
    );

    Ok(())
}

fn print_options(label: &str, options: &[String]) {
    let rendered = if options.is_empty() {
        "(none)".to_string()
    } else {
        options.join(", ")
    };
    println!("  {label:<20}{rendered}");
}
