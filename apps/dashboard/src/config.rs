//! # Dashboard Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     STOCKROOM_STORE_NAME="Corner Shop"                                 │
//! │     STOCKROOM_NARRATIVE_ENABLED=true                                   │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/stockroom/stockroom.toml (Linux)                         │
//! │     ~/Library/Application Support/com.stockroom.dashboard/... (macOS)  │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     narrative off, sale deletion keeps stock as is                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [store]
//! name = "Corner Shop"
//! currency_symbol = "R$"
//! currency_decimals = 2
//!
//! [inventory]
//! restock_on_sale_deletion = false
//!
//! [narrative]
//! enabled = true
//! endpoint = "https://narrative.example.com/v1/generate"
//! timeout_secs = 15
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info, warn};

use stockroom_core::Money;
use stockroom_narrative::NarrativeConfig;

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read or write config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("No config path available")]
    NoConfigPath,
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Sections
// =============================================================================

/// Store identity and money formatting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSettings {
    #[serde(default = "default_store_name")]
    pub name: String,

    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    /// Minor-unit digits used when formatting amounts.
    #[serde(default = "default_currency_decimals")]
    pub currency_decimals: u8,
}

fn default_store_name() -> String {
    "Stockroom Demo Store".to_string()
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

fn default_currency_decimals() -> u8 {
    2
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            name: default_store_name(),
            currency_symbol: default_currency_symbol(),
            currency_decimals: default_currency_decimals(),
        }
    }
}

/// Ledger policies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySettings {
    /// Credit sold units back to the product when a sale is deleted.
    #[serde(default)]
    pub restock_on_sale_deletion: bool,
}

// =============================================================================
// Main Configuration
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub store: StoreSettings,

    #[serde(default)]
    pub inventory: InventorySettings,

    #[serde(default)]
    pub narrative: NarrativeConfig,
}

impl DashboardConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (stockroom.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading dashboard config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load dashboard config: {}. Using defaults.", e);
            Self::default()
        })
    }

    pub fn save(&self, config_path: Option<PathBuf>) -> ConfigResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or(ConfigError::NoConfigPath)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Dashboard config saved");
        Ok(())
    }

    pub fn validate(&self) -> ConfigResult<()> {
        let endpoint = &self.narrative.endpoint;
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(ConfigError::Invalid(format!(
                "Narrative endpoint must start with http:// or https://, got: {}",
                endpoint
            )));
        }

        if self.narrative.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "narrative.timeout_secs must be greater than 0".into(),
            ));
        }

        if self.store.currency_decimals > 4 {
            return Err(ConfigError::Invalid(format!(
                "store.currency_decimals must be at most 4, got {}",
                self.store.currency_decimals
            )));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies `STOCKROOM_*` overrides read through `lookup`.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(name) = lookup("STOCKROOM_STORE_NAME") {
            self.store.name = name;
        }

        if let Some(raw) = lookup("STOCKROOM_RESTOCK_ON_SALE_DELETION") {
            match parse_flag(&raw) {
                Some(flag) => self.inventory.restock_on_sale_deletion = flag,
                None => warn!(value = %raw, "Ignoring STOCKROOM_RESTOCK_ON_SALE_DELETION"),
            }
        }

        if let Some(endpoint) = lookup("STOCKROOM_NARRATIVE_ENDPOINT") {
            debug!(endpoint = %endpoint, "Overriding narrative endpoint from environment");
            self.narrative.endpoint = endpoint;
        }

        if let Some(token) = lookup("STOCKROOM_NARRATIVE_TOKEN") {
            self.narrative.api_token = Some(token).filter(|t| !t.is_empty());
        }

        if let Some(raw) = lookup("STOCKROOM_NARRATIVE_ENABLED") {
            match parse_flag(&raw) {
                Some(flag) => self.narrative.enabled = flag,
                None => warn!(value = %raw, "Ignoring STOCKROOM_NARRATIVE_ENABLED"),
            }
        }

        if let Some(raw) = lookup("STOCKROOM_NARRATIVE_TIMEOUT_SECS") {
            match raw.trim().parse::<u64>() {
                Ok(secs) => {
                    debug!(secs, "Overriding narrative timeout from environment");
                    self.narrative.timeout_secs = secs;
                }
                Err(_) => warn!(value = %raw, "Ignoring STOCKROOM_NARRATIVE_TIMEOUT_SECS"),
            }
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "stockroom", "dashboard")
            .map(|dirs| dirs.config_dir().join("stockroom.toml"))
    }

    /// Formats an amount in minor units with the store's currency settings.
    pub fn format_currency(&self, amount: Money) -> String {
        let cents = amount.cents();
        let decimals = u32::from(self.store.currency_decimals);
        let divisor = 10_i64.pow(decimals);
        let sign = if cents < 0 { "-" } else { "" };
        let whole = (cents / divisor).abs();

        if decimals == 0 {
            return format!("{}{}{}", sign, self.store.currency_symbol, whole);
        }

        format!(
            "{}{}{}.{:0width$}",
            sign,
            self.store.currency_symbol,
            whole,
            (cents % divisor).abs(),
            width = decimals as usize
        )
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = DashboardConfig::default();
        assert!(!config.inventory.restock_on_sale_deletion);
        assert!(!config.narrative.enabled);
        assert_eq!(config.store.currency_decimals, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = DashboardConfig::default();

        config.narrative.endpoint = "ftp://example.com".to_string();
        assert!(config.validate().is_err());

        config.narrative.endpoint = "https://example.com/v1/generate".to_string();
        assert!(config.validate().is_ok());

        config.narrative.timeout_secs = 0;
        assert!(config.validate().is_err());

        config.narrative.timeout_secs = 5;
        config.store.currency_decimals = 5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("STOCKROOM_STORE_NAME", "Corner Shop"),
            ("STOCKROOM_RESTOCK_ON_SALE_DELETION", "true"),
            ("STOCKROOM_NARRATIVE_ENABLED", "yes"),
            ("STOCKROOM_NARRATIVE_TOKEN", "abc123"),
            ("STOCKROOM_NARRATIVE_TIMEOUT_SECS", "not-a-number"),
        ]
        .into_iter()
        .collect();

        let mut config = DashboardConfig::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.store.name, "Corner Shop");
        assert!(config.inventory.restock_on_sale_deletion);
        assert!(config.narrative.enabled);
        assert_eq!(config.narrative.api_token.as_deref(), Some("abc123"));
        assert_eq!(config.narrative.timeout_secs, 15);
    }

    /// Collects formatted log lines for assertions.
    #[derive(Clone, Default)]
    struct LogBuffer(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn overrides_with_logs(vars: &[(&str, &str)]) -> (DashboardConfig, String) {
        let vars: HashMap<&str, &str> = vars.iter().copied().collect();
        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();

        let mut config = DashboardConfig::default();
        tracing::subscriber::with_default(subscriber, || {
            config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));
        });

        let text = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        (config, text)
    }

    #[test]
    fn test_bad_timeout_override_is_warned() {
        let (config, logs) =
            overrides_with_logs(&[("STOCKROOM_NARRATIVE_TIMEOUT_SECS", "not-a-number")]);

        assert_eq!(config.narrative.timeout_secs, 15);
        assert!(logs.contains("WARN"), "{}", logs);
        assert!(logs.contains("Ignoring STOCKROOM_NARRATIVE_TIMEOUT_SECS"), "{}", logs);
        assert!(logs.contains("not-a-number"), "{}", logs);
    }

    #[test]
    fn test_timeout_override_applies() {
        let (config, logs) = overrides_with_logs(&[("STOCKROOM_NARRATIVE_TIMEOUT_SECS", " 30 ")]);

        assert_eq!(config.narrative.timeout_secs, 30);
        assert!(!logs.contains("WARN"), "{}", logs);
    }

    #[test]
    fn test_toml_roundtrip_sections() {
        let config: DashboardConfig = toml::from_str(
            r#"
            [store]
            name = "Mercadinho"
            currency_symbol = "R$"

            [inventory]
            restock_on_sale_deletion = true
            "#,
        )
        .unwrap();

        assert_eq!(config.store.name, "Mercadinho");
        assert_eq!(config.store.currency_decimals, 2);
        assert!(config.inventory.restock_on_sale_deletion);
        assert_eq!(config.narrative, NarrativeConfig::default());

        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[store]"));
        assert!(toml_str.contains("[narrative]"));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let path = std::env::temp_dir().join("stockroom-missing-config-test.toml");
        let config = DashboardConfig::load_or_default(Some(path));
        assert_eq!(config.store.name, default_store_name());
    }

    #[test]
    fn test_format_currency() {
        let mut config = DashboardConfig::default();
        assert_eq!(config.format_currency(Money::from_cents(1234)), "$12.34");
        assert_eq!(config.format_currency(Money::from_cents(5)), "$0.05");
        assert_eq!(config.format_currency(Money::from_cents(-1234)), "-$12.34");

        config.store.currency_symbol = "R$".to_string();
        assert_eq!(config.format_currency(Money::from_cents(2890)), "R$28.90");

        config.store.currency_decimals = 0;
        assert_eq!(config.format_currency(Money::from_cents(500)), "R$500");
    }
}
