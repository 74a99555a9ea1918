//! `breedbox status` — Show configuration and warehouse status.

use breedbox_config::AppConfig;

use super::open_executor;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    println!("Breedbox Status");
    println!("===============");
    println!("  Config dir:   {}", AppConfig::config_dir().display());
    println!("  Warehouse:    {}", config.warehouse.database_path);
    println!("  Cache TTL:    {}s", config.warehouse.cache_ttl_secs);
    println!("  Model:        {}", config.llm.model);
    println!(
        "  Assistant:    {}",
        if config.has_llm_key() {
            "configured"
        } else {
            "not configured (set OPENAI_API_KEY)"
        }
    );

    let executor = open_executor(&config).await?;
    let tables = config.warehouse.table_names();

    println!();
    for table in [&tables.breeds, &tables.temperament] {
        let sql = format!("select count(*) as row_count from {table}");
        match executor.run_query(&sql).await {
            Ok(result) => {
                let count = result
                    .rows
                    .first()
                    .and_then(|row| row.integer("row_count"))
                    .unwrap_or(0);
                println!("  {table}: {count} rows");
            }
            Err(e) => println!("  {table}: unavailable ({e})"),
        }
    }

    let config_path = AppConfig::config_dir().join("config.toml");
    println!();
    if config_path.exists() {
        println!("  Config file: {}", config_path.display());
    } else {
        println!("  No config file; defaults in effect ({})", config_path.display());
    }

    Ok(())
}
