//! Configuration file parsing for the HTTP service.
//!
//! Loads settings from TOML files including bind address, database path
//! and the background regeneration settings.

use kinship_regen::RegenConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Router configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Missing required field
    #[error("Missing required configuration field: {0}")]
    MissingField(String),

    /// Field present but unusable
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Router configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct RouterConfig {
    /// Bind address (e.g., "127.0.0.1")
    pub bind_address: String,

    /// Bind port (e.g., 8080)
    pub bind_port: u16,

    /// SQLite database file
    pub database_path: PathBuf,

    /// Run the periodic regeneration worker alongside the server
    #[serde(default)]
    pub regen_enabled: bool,

    /// Regeneration settings; the dismissal cooldown also applies to requests served here
    #[serde(default)]
    pub regen: RegenConfig,
}

impl RouterConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: RouterConfig = toml::from_str(contents)?;

        if config.database_path.as_os_str().is_empty() {
            return Err(ConfigError::MissingField("database_path".to_string()));
        }
        config
            .regen
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        Ok(config)
    }

    /// Create a default configuration for testing
    pub fn default_test_config() -> Self {
        RouterConfig {
            bind_address: "127.0.0.1".to_string(),
            bind_port: 8080,
            database_path: PathBuf::from(":memory:"),
            regen_enabled: false,
            regen: RegenConfig::default(),
        }
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RouterConfig::default_test_config();
        assert_eq!(config.bind_address, "127.0.0.1");
        assert_eq!(config.bind_port, 8080);
        assert!(!config.regen_enabled);
        assert_eq!(config.regen, RegenConfig::default());
    }

    #[test]
    fn test_bind_addr() {
        let config = RouterConfig::default_test_config();
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
            bind_address = "0.0.0.0"
            bind_port = 9000
            database_path = "/var/lib/kinship/kinship.db"
            regen_enabled = true

            [regen]
            max_concurrent = 2
            interval_secs = 600
            dismissal_cooldown_days = 30
        "#;

        let config = RouterConfig::from_toml(toml).unwrap();
        assert_eq!(config.bind_address, "0.0.0.0");
        assert_eq!(config.bind_port, 9000);
        assert_eq!(config.database_path, PathBuf::from("/var/lib/kinship/kinship.db"));
        assert!(config.regen_enabled);
        assert_eq!(config.regen.max_concurrent, 2);
        assert_eq!(config.regen.interval_secs, 600);
        assert_eq!(config.regen.dismissal_cooldown_days, Some(30));
        assert!(!config.regen.dry_run);
    }

    #[test]
    fn test_regen_section_optional() {
        let toml = r#"
            bind_address = "127.0.0.1"
            bind_port = 8080
            database_path = "kinship.db"
        "#;
        let config = RouterConfig::from_toml(toml).unwrap();
        assert!(!config.regen_enabled);
        assert_eq!(config.regen, RegenConfig::default());
    }

    #[test]
    fn test_rejects_invalid_values() {
        let empty_path = r#"
            bind_address = "127.0.0.1"
            bind_port = 8080
            database_path = ""
        "#;
        assert!(matches!(
            RouterConfig::from_toml(empty_path),
            Err(ConfigError::MissingField(_))
        ));

        let zero_pool = r#"
            bind_address = "127.0.0.1"
            bind_port = 8080
            database_path = "kinship.db"

            [regen]
            max_concurrent = 0
        "#;
        assert!(matches!(
            RouterConfig::from_toml(zero_pool),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = RouterConfig::from_file("/nonexistent/kinship.toml").unwrap_err();
        assert!(matches!(err, ConfigError::FileRead(_)));
    }
}
