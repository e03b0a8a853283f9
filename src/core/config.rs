use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::debug;

use super::catalog::{Catalog, CatalogEntry};
use super::conversion::{AMOUNT_PRECISION, RATE_PRECISION};
use super::currency::{DEFAULT_BASE_CURRENCY, RateTable};
use super::history::DEFAULT_HISTORY_LIMIT;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PrecisionConfig {
    #[serde(default = "default_amount_precision")]
    pub amount: u32,
    #[serde(default = "default_rate_precision")]
    pub rate: u32,
}

impl Default for PrecisionConfig {
    fn default() -> Self {
        PrecisionConfig {
            amount: AMOUNT_PRECISION,
            rate: RATE_PRECISION,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SearchConfig {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            debounce_ms: default_debounce_ms(),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AppConfig {
    #[serde(default = "default_base_currency")]
    pub base_currency: String,
    #[serde(default)]
    pub precision: PrecisionConfig,
    /// Replaces the built-in rates when present.
    #[serde(default)]
    pub rates: Option<RateTable>,
    /// Extra destinations appended to the built-in catalog.
    #[serde(default)]
    pub catalog: Vec<CatalogEntry>,
    #[serde(default)]
    pub search: SearchConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            base_currency: default_base_currency(),
            precision: PrecisionConfig::default(),
            rates: None,
            catalog: Vec::new(),
            search: SearchConfig::default(),
        }
    }
}

fn default_base_currency() -> String {
    DEFAULT_BASE_CURRENCY.to_string()
}

fn default_amount_precision() -> u32 {
    AMOUNT_PRECISION
}

fn default_rate_precision() -> u32 {
    RATE_PRECISION
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

impl AppConfig {
    /// Loads the config from the default location, falling back to built-in
    /// defaults when no file has been created there yet.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using built-in defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "cards2cash", "cards2cash")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn rate_table(&self) -> RateTable {
        self.rates.clone().unwrap_or_else(RateTable::builtin)
    }

    pub fn catalog(&self) -> Result<Catalog> {
        Catalog::with_extra(&self.catalog).context("Invalid catalog in config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
base_currency: "EUR"
precision:
  amount: 3
rates:
  EUR:
    USD: 1.18
    GBP: 0.86
  USD:
    NGN: 1550.0
catalog:
  - id: "loans"
    title: "Quick Loans"
    description: "Borrow against your card balance"
    category: "services"
    url: "/loans"
search:
  debounce_ms: 150
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.base_currency, "EUR");
        assert_eq!(config.precision.amount, 3);
        assert_eq!(config.precision.rate, 4);

        let table = config.rate_table();
        assert_eq!(table.get("EUR", "GBP"), Some(0.86));
        assert_eq!(table.get("USD", "EUR"), None);

        assert_eq!(config.catalog.len(), 1);
        assert_eq!(config.catalog[0].id, "loans");
        let catalog = config.catalog().unwrap();
        assert_eq!(
            catalog.entries().last().map(|e| e.title.as_str()),
            Some("Quick Loans")
        );

        assert_eq!(config.search.debounce(), Duration::from_millis(150));
        assert_eq!(config.search.history_limit, 5);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.base_currency, "USD");
        assert_eq!(config.rate_table(), RateTable::builtin());
    }

    #[test]
    fn test_defaults_round_trip_through_yaml() {
        let config = AppConfig::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: AppConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, config);

        let with_rates = AppConfig {
            rates: Some(RateTable::builtin()),
            ..AppConfig::default()
        };
        let yaml = serde_yaml::to_string(&with_rates).unwrap();
        let parsed: AppConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, with_rates);
    }

    #[test]
    fn test_invalid_rates_fail_to_parse() {
        let yaml_str = r#"
rates:
  USD:
    EUR: 0
"#;
        let err = serde_yaml::from_str::<AppConfig>(yaml_str).unwrap_err();
        assert!(err.to_string().contains("USD -> EUR"));
    }

    #[test]
    fn test_duplicate_catalog_ids_fail_on_build() {
        let yaml_str = r#"
catalog:
  - id: "dashboard"
    title: "Home"
    description: "Duplicate"
    category: "pages"
    url: "/home"
"#;
        let config: AppConfig = serde_yaml::from_str(yaml_str).unwrap();
        let err = config.catalog().unwrap_err();
        assert!(format!("{err:#}").contains("Duplicate catalog entry id"));
    }

    #[test]
    fn test_load_from_missing_path_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = AppConfig::load_from_path(dir.path().join("missing.yaml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
