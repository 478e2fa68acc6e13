//! Sale configuration.
//!
//! Loaded from YAML files and environment variables with the `config` crate. Every
//! field has a default, so an empty configuration runs the canonical flash sale.

use crate::ledger::{InventoryLedger, Latency};
use crate::model::{flash_sale_catalog, ProductSeed};
use crate::simulator::SaleSettings;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Default configuration file name (without extension).
pub const DEFAULT_CONFIG_FILE: &str = "flash_sale";
/// Environment variable naming an extra configuration file.
pub const CONFIG_ENV_VAR: &str = "FLASH_SALE_CONFIG";
/// Prefix for configuration environment variables (`FLASH_SALE__MAX_CONCURRENCY=8`).
pub const CONFIG_ENV_PREFIX: &str = "FLASH_SALE";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Seed data and timing for a flash sale.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SaleConfig {
    /// Products and their starting stock.
    pub catalog: Vec<ProductSeed>,
    /// Customers allowed to run at the same time.
    pub max_concurrency: usize,
    /// Deadline for collecting every customer's result.
    pub collect_timeout_ms: u64,
    /// Upper bound of each customer's random arrival delay.
    pub arrival_jitter_ms: u64,
    /// Quantities a customer picks from, uniformly; repeat a value to weight it.
    pub quantity_choices: Vec<u32>,
    /// Pause between check and decrement on the unsafe path.
    pub race_window: Latency,
    /// Pause inside the exclusive guard on the safe path.
    pub locked_latency: Latency,
}

impl Default for SaleConfig {
    fn default() -> Self {
        Self {
            catalog: flash_sale_catalog(),
            max_concurrency: 20,
            collect_timeout_ms: 30_000,
            arrival_jitter_ms: 500,
            quantity_choices: vec![1, 1, 1, 2],
            race_window: Latency::Jitter {
                min_ms: 10,
                max_ms: 100,
            },
            locked_latency: Latency::Jitter { min_ms: 1, max_ms: 10 },
        }
    }
}

impl SaleConfig {
    /// Load configuration from file and environment.
    ///
    /// Sources, later overriding earlier:
    /// 1. `flash_sale.yaml` in the current directory (if it exists)
    /// 2. The file at `path` (if given)
    /// 3. The file named by `FLASH_SALE_CONFIG` (if set)
    /// 4. `FLASH_SALE__*` environment variables
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        use ::config::{Config, Environment, File, FileFormat};

        let mut builder = Config::builder()
            .add_source(File::new(DEFAULT_CONFIG_FILE, FileFormat::Yaml).required(false));

        if let Some(config_path) = path {
            builder = builder.add_source(File::new(config_path, FileFormat::Yaml).required(true));
        }

        if let Ok(config_path) = std::env::var(CONFIG_ENV_VAR) {
            builder = builder.add_source(File::new(&config_path, FileFormat::Yaml).required(true));
        }

        let config: SaleConfig = builder
            .add_source(
                Environment::with_prefix(CONFIG_ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Defaults with every artificial delay removed.
    pub fn for_test() -> Self {
        Self {
            collect_timeout_ms: 10_000,
            arrival_jitter_ms: 0,
            race_window: Latency::None,
            locked_latency: Latency::None,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_concurrency == 0 {
            return Err(ConfigError::Invalid("max_concurrency must be at least 1".into()));
        }
        if self.quantity_choices.is_empty() {
            return Err(ConfigError::Invalid("quantity_choices must not be empty".into()));
        }
        if self.quantity_choices.contains(&0) {
            return Err(ConfigError::Invalid("quantity_choices must be positive".into()));
        }
        Ok(())
    }

    /// A fresh ledger seeded from the catalog, with this configuration's timing.
    pub fn ledger(&self) -> InventoryLedger {
        InventoryLedger::new(self.catalog.clone())
            .with_race_window(self.race_window)
            .with_locked_latency(self.locked_latency)
    }

    pub fn settings(&self) -> SaleSettings {
        SaleSettings {
            max_concurrency: self.max_concurrency,
            collect_timeout: Duration::from_millis(self.collect_timeout_ms),
            arrival_jitter: Duration::from_millis(self.arrival_jitter_ms),
            quantity_choices: self.quantity_choices.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::config::{Config, File, FileFormat};

    fn from_yaml(yaml: &str) -> SaleConfig {
        Config::builder()
            .add_source(File::from_str(yaml, FileFormat::Yaml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_config_default() {
        let config = SaleConfig::default();
        assert_eq!(config.catalog.len(), 4);
        assert_eq!(config.max_concurrency, 20);
        assert_eq!(config.quantity_choices, vec![1, 1, 1, 2]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_for_test_has_no_delays() {
        let config = SaleConfig::for_test();
        assert_eq!(config.race_window, Latency::None);
        assert_eq!(config.locked_latency, Latency::None);
        assert_eq!(config.settings().arrival_jitter, Duration::ZERO);
    }

    #[test]
    fn test_config_from_yaml_overrides_defaults() {
        let config = from_yaml(
            r#"
max_concurrency: 4
quantity_choices: [1]
race_window:
  kind: fixed
  ms: 5
catalog:
  - id: widget_1
    name: Widget
    price: 9.5
    stock: 7
"#,
        );

        assert_eq!(config.max_concurrency, 4);
        assert_eq!(config.quantity_choices, vec![1]);
        assert_eq!(config.race_window, Latency::Fixed { ms: 5 });
        assert_eq!(config.locked_latency, SaleConfig::default().locked_latency);
        assert_eq!(config.catalog, vec![ProductSeed::new("widget_1", "Widget", 9.5, 7)]);
    }

    #[test]
    fn test_config_rejects_zero_quantity() {
        let config = SaleConfig {
            quantity_choices: vec![1, 0],
            ..SaleConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }
}
