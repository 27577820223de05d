//! Configuration management for tallybook.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::service::DEFAULT_IMPORT_ICON;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "tallybook";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "ledger.db";

/// Prefix for environment variable overrides.
const ENV_PREFIX: &str = "TALLYBOOK_";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `TALLYBOOK_`, sections separated by `__`,
///    e.g. `TALLYBOOK_STORAGE__DATABASE_PATH`)
/// 2. TOML config file at `~/.config/tallybook/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Record listing configuration.
    pub records: RecordsConfig,
    /// Import configuration.
    pub import: ImportConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/tallybook/ledger.db`
    pub database_path: Option<PathBuf>,
}

/// Record listing configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordsConfig {
    /// Number of entries shown by `record recent` when no limit is given.
    pub recent_limit: usize,
}

/// Import-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Icon given to categories created implicitly during an import.
    pub default_icon: String,
}

impl Default for RecordsConfig {
    fn default() -> Self {
        Self { recent_limit: 10 }
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            default_icon: DEFAULT_IMPORT_ICON.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from all sources, reading the TOML layer from
    /// `config_path` or the default config file.
    ///
    /// A missing config file is not an error; defaults are used instead.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);
        Self::from_figment(
            Figment::new()
                .merge(Serialized::defaults(Config::default()))
                .merge(Toml::file(&config_file))
                .merge(Env::prefixed(ENV_PREFIX).split("__")),
        )
    }

    /// Extract and validate a configuration from a prepared figment.
    fn from_figment(figment: Figment) -> Result<Self> {
        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.records.recent_limit == 0 {
            return Err(Error::ConfigValidation {
                message: "recent_limit must be greater than 0".to_string(),
            });
        }

        if self.import.default_icon.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "default_icon must not be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(config.storage.database_path.is_none());
        assert_eq!(config.records.recent_limit, 10);
        assert_eq!(config.import.default_icon, "📦");
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_zero_recent_limit() {
        let mut config = Config::default();
        config.records.recent_limit = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("recent_limit"));
    }

    #[test]
    fn test_validate_blank_default_icon() {
        let mut config = Config::default();
        config.import.default_icon = "  ".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("default_icon"));
    }

    #[test]
    fn test_database_path_default() {
        let config = Config::default();
        let path = config.database_path();

        assert!(path.to_string_lossy().contains("tallybook"));
        assert!(path.to_string_lossy().ends_with("ledger.db"));
    }

    #[test]
    fn test_database_path_custom() {
        let mut config = Config::default();
        config.storage.database_path = Some(PathBuf::from("/custom/path/db.sqlite"));

        assert_eq!(
            config.database_path(),
            PathBuf::from("/custom/path/db.sqlite")
        );
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("tallybook"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        let config = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml"))).unwrap();
        assert_eq!(config.records, RecordsConfig::default());
        assert_eq!(config.import, ImportConfig::default());
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[storage]\ndatabase_path = \"/tmp/ledger-test.db\"\n\n[records]\nrecent_limit = 25\n"
        )
        .unwrap();

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(file.path()));
        let config = Config::from_figment(figment).unwrap();

        assert_eq!(
            config.storage.database_path,
            Some(PathBuf::from("/tmp/ledger-test.db"))
        );
        assert_eq!(config.records.recent_limit, 25);
        assert_eq!(config.import.default_icon, "📦");
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[records]\nrecent_limit = 0\n").unwrap();

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(file.path()));
        let result = Config::from_figment(figment);

        assert!(matches!(result, Err(Error::ConfigValidation { .. })));
    }

    #[test]
    fn test_config_serialize() {
        let json = serde_json::to_string(&Config::default()).unwrap();
        assert!(json.contains("recent_limit"));
        assert!(json.contains("default_icon"));
    }

    #[test]
    fn test_records_config_deserialize() {
        let json = r#"{"recent_limit": 3}"#;
        let records: RecordsConfig = serde_json::from_str(json).unwrap();
        assert_eq!(records.recent_limit, 3);
    }
}
