//! Configuration loading and validation for Breedbox.
//!
//! Loads configuration from `~/.breedbox/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use breedbox_core::executor::{is_valid_identifier, TableNames};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.breedbox/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Warehouse configuration
    #[serde(default)]
    pub warehouse: WarehouseConfig,

    /// LLM backend configuration
    #[serde(default)]
    pub llm: LlmConfig,

    /// Ingestion pipeline configuration
    #[serde(default)]
    pub ingest: IngestConfig,
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

/// Warehouse location and query-cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarehouseConfig {
    /// SQLite database file backing the warehouse
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Name of the breeds dimension table
    #[serde(default = "default_breeds_table")]
    pub breeds_table: String,

    /// Name of the temperament dimension table
    #[serde(default = "default_temperament_table")]
    pub temperament_table: String,

    /// TTL of the read-through query cache, in seconds
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

fn default_database_path() -> String {
    AppConfig::config_dir()
        .join("warehouse.db")
        .to_string_lossy()
        .into_owned()
}
fn default_breeds_table() -> String {
    "dim_breeds".into()
}
fn default_temperament_table() -> String {
    "dim_temperament".into()
}
fn default_cache_ttl_secs() -> u64 {
    600
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            breeds_table: default_breeds_table(),
            temperament_table: default_temperament_table(),
            cache_ttl_secs: default_cache_ttl_secs(),
        }
    }
}

impl WarehouseConfig {
    /// The configured dimension-table identifiers.
    pub fn table_names(&self) -> TableNames {
        TableNames::new(&self.breeds_table, &self.temperament_table)
    }
}

/// LLM backend settings for the finder assistant.
#[derive(Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// API key; `BREEDBOX_API_KEY` or `OPENAI_API_KEY` override this
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL of an OpenAI-compatible endpoint
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model name
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens per response
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".into()
}
fn default_model() -> String {
    "gpt-5-nano".into()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_max_tokens() -> u32 {
    1024
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &redact(&self.api_key))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

/// Breed-catalog ingestion settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Breed catalog endpoint
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Optional key sent as `x-api-key`; `DOG_API_KEY` overrides
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Root directory for raw partitioned archives
    #[serde(default = "default_raw_data_dir")]
    pub raw_data_dir: String,

    /// Staging table replaced on every run
    #[serde(default = "default_staging_table")]
    pub staging_table: String,

    /// Catalog fetch timeout, in seconds
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

fn default_api_url() -> String {
    "https://api.thedogapi.com/v1/breeds".into()
}
fn default_raw_data_dir() -> String {
    AppConfig::config_dir().join("raw").to_string_lossy().into_owned()
}
fn default_staging_table() -> String {
    "stg_dog_breeds".into()
}
fn default_fetch_timeout_secs() -> u64 {
    30
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_key: None,
            raw_data_dir: default_raw_data_dir(),
            staging_table: default_staging_table(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
        }
    }
}

impl std::fmt::Debug for IngestConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IngestConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &redact(&self.api_key))
            .field("raw_data_dir", &self.raw_data_dir)
            .field("staging_table", &self.staging_table)
            .field("fetch_timeout_secs", &self.fetch_timeout_secs)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.breedbox/config.toml).
    ///
    /// Also checks environment variables:
    /// - `BREEDBOX_API_KEY` / `OPENAI_API_KEY` for the LLM key
    /// - `BREEDBOX_MODEL` for the model name
    /// - `DOG_API_KEY` for the catalog API key
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;

        // Environment variable overrides (highest priority)
        if config.llm.api_key.is_none() {
            config.llm.api_key = std::env::var("BREEDBOX_API_KEY")
                .ok()
                .or_else(|| std::env::var("OPENAI_API_KEY").ok());
        }

        if let Ok(model) = std::env::var("BREEDBOX_MODEL") {
            config.llm.model = model;
        }

        if config.ingest.api_key.is_none() {
            config.ingest.api_key = std::env::var("DOG_API_KEY").ok();
        }

        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".breedbox")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.llm.temperature < 0.0 || self.llm.temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "llm.temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.warehouse.cache_ttl_secs == 0 {
            return Err(ConfigError::ValidationError(
                "warehouse.cache_ttl_secs must be greater than 0".into(),
            ));
        }

        // Table names end up spliced into SQL; reject anything unquotable.
        let identifiers = [
            ("warehouse.breeds_table", &self.warehouse.breeds_table),
            ("warehouse.temperament_table", &self.warehouse.temperament_table),
            ("ingest.staging_table", &self.ingest.staging_table),
        ];
        for (field, name) in identifiers {
            if !is_valid_identifier(name) {
                return Err(ConfigError::ValidationError(format!(
                    "{field} is not a valid table identifier: {name:?}"
                )));
            }
        }

        Ok(())
    }

    /// Check if an LLM API key is available (from config or environment).
    pub fn has_llm_key(&self) -> bool {
        self.llm.api_key.is_some()
    }

    /// Generate a default config TOML string (for first-run setup).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.warehouse.breeds_table, "dim_breeds");
        assert_eq!(config.warehouse.cache_ttl_secs, 600);
        assert_eq!(config.llm.model, "gpt-5-nano");
        assert!(config.ingest.api_url.contains("thedogapi.com"));
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.warehouse.breeds_table, config.warehouse.breeds_table);
        assert_eq!(parsed.llm.model, config.llm.model);
    }

    #[test]
    fn invalid_temperature_rejected() {
        let config = AppConfig {
            llm: LlmConfig {
                temperature: 5.0,
                ..LlmConfig::default()
            },
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn unsafe_table_name_rejected() {
        let config = AppConfig {
            warehouse: WarehouseConfig {
                breeds_table: "dim_breeds; drop table users".into(),
                ..WarehouseConfig::default()
            },
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_cache_ttl_rejected() {
        let config = AppConfig {
            warehouse: WarehouseConfig {
                cache_ttl_secs: 0,
                ..WarehouseConfig::default()
            },
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let result = AppConfig::load_from(Path::new("/nonexistent/config.toml"));
        assert!(result.is_ok());
        assert_eq!(result.unwrap().warehouse.breeds_table, "dim_breeds");
    }

    #[test]
    fn partial_config_file_fills_in_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[llm]\nmodel = \"gpt-4o-mini\"").unwrap();

        let config = AppConfig::load_from(file.path()).unwrap();
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.warehouse.breeds_table, "dim_breeds");
    }

    #[test]
    fn malformed_config_file_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "warehouse = 3").unwrap();

        let result = AppConfig::load_from(file.path());
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn debug_output_redacts_api_keys() {
        let config = AppConfig {
            llm: LlmConfig {
                api_key: Some("sk-secret".into()),
                ..LlmConfig::default()
            },
            ..AppConfig::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("dim_breeds"));
        assert!(toml_str.contains("stg_dog_breeds"));
    }

    #[test]
    fn table_names_come_from_config() {
        let config = WarehouseConfig {
            breeds_table: "analytics.breeds".into(),
            temperament_table: "analytics.temperament".into(),
            ..WarehouseConfig::default()
        };
        let tables = config.table_names();
        assert_eq!(tables.breeds, "analytics.breeds");
        assert_eq!(tables.temperament, "analytics.temperament");
    }
}
