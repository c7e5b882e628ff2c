//! Configuration file parser for ~/.config/feedatlas/config.toml.
//!
//! The config file is optional and a missing file yields `Config::default()`.
//! Unknown keys are accepted by serde but logged as warnings, since they are
//! usually typos.
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::feed::CountryCodes;
use crate::storage::ImportDefaults;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config file exceeds maximum allowed size.
    #[error("Config file too large: {0}")]
    TooLarge(String),
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Top-level application configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
/// Missing keys fall back to `Default::default()`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Catalogue database location. `None` means `feeds.db` next to the
    /// config file.
    pub database_path: Option<PathBuf>,

    /// Category for records whose source section names none.
    pub default_category: String,

    /// Country code for records whose source section names none.
    pub default_country: String,

    /// Whole-request timeout for source fetches in seconds. 0 = transport default.
    pub request_timeout_secs: u64,

    /// User-Agent header sent with source fetches.
    pub user_agent: String,

    /// Extra country name → code entries, merged over the built-in table.
    pub country_codes: HashMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: None,
            default_category: "General".to_string(),
            default_country: "US".to_string(),
            request_timeout_secs: 30,
            user_agent: format!("feedatlas/{}", env!("CARGO_PKG_VERSION")),
            country_codes: HashMap::new(),
        }
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 6] = [
        "database_path",
        "default_category",
        "default_country",
        "request_timeout_secs",
        "user_agent",
        "country_codes",
    ];

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → accepted, logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        // Check the size before reading so a huge file is never buffered
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // File deleted between metadata and read
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        // Parse as a raw table first to detect unknown keys
        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(&content)?;
        tracing::info!(
            path = %path.display(),
            default_category = %config.default_category,
            default_country = %config.default_country,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Fetch deadline, or `None` when disabled.
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }

    /// Built-in country table with the `[country_codes]` entries merged on top.
    pub fn country_table(&self) -> CountryCodes {
        if self.country_codes.is_empty() {
            CountryCodes::default()
        } else {
            CountryCodes::with_overrides(&self.country_codes)
        }
    }

    pub fn import_defaults(&self) -> ImportDefaults {
        ImportDefaults::new(&self.default_category, &self.default_country)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.database_path.is_none());
        assert_eq!(config.default_category, "General");
        assert_eq!(config.default_country, "US");
        assert_eq!(config.request_timeout_secs, 30);
        assert!(config.user_agent.starts_with("feedatlas/"));
        assert!(config.country_codes.is_empty());
    }

    #[test]
    fn test_missing_file_returns_default() {
        let path = Path::new("/tmp/feedatlas_test_nonexistent_config.toml");
        let config = Config::load(path).unwrap();
        assert_eq!(config.default_category, "General");
    }

    #[test]
    fn test_empty_file_returns_default() {
        let dir = std::env::temp_dir().join("feedatlas_config_test_empty");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.default_country, "US");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_partial_config_uses_defaults_for_missing() {
        let dir = std::env::temp_dir().join("feedatlas_config_test_partial");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "default_category = \"AI/ML\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.default_category, "AI/ML");
        assert_eq!(config.default_country, "US"); // default
        assert_eq!(config.request_timeout_secs, 30); // default

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_full_config() {
        let dir = std::env::temp_dir().join("feedatlas_config_test_full");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");

        let content = r#"
database_path = "/var/lib/feedatlas/catalogue.db"
default_category = "News"
default_country = "GB"
request_timeout_secs = 0
user_agent = "my-importer/2.0"

[country_codes]
"United Kingdom" = "UK"
Freedonia = "FD"
"#;
        std::fs::write(&path, content).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(
            config.database_path.as_deref(),
            Some(Path::new("/var/lib/feedatlas/catalogue.db"))
        );
        assert_eq!(config.default_category, "News");
        assert_eq!(config.default_country, "GB");
        assert_eq!(config.request_timeout(), None);
        assert_eq!(config.user_agent, "my-importer/2.0");

        let table = config.country_table();
        assert_eq!(table.code_for("United Kingdom"), "UK");
        assert_eq!(table.code_for("Freedonia"), "FD");
        assert_eq!(table.code_for("Japan"), "JP");

        let defaults = config.import_defaults();
        assert_eq!(defaults.category, "News");
        assert_eq!(defaults.country_code, "GB");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_request_timeout_enabled() {
        let config = Config::default();
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let dir = std::env::temp_dir().join("feedatlas_config_test_invalid");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "this is not [valid toml").unwrap();

        let result = Config::load(&path);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("Invalid TOML"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_unknown_keys_accepted() {
        let dir = std::env::temp_dir().join("feedatlas_config_test_unknown");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");

        let content = r#"
default_country = "CA"
totally_fake_key = "should not fail"
another_unknown = 42
"#;
        std::fs::write(&path, content).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.default_country, "CA");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_wrong_type_returns_error() {
        let dir = std::env::temp_dir().join("feedatlas_config_test_wrongtype");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        // request_timeout_secs should be an integer, not a string
        std::fs::write(&path, "request_timeout_secs = \"soon\"\n").unwrap();

        let result = Config::load(&path);
        assert!(matches!(result, Err(ConfigError::Parse(_))));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_too_large_file_rejected() {
        let dir = std::env::temp_dir().join("feedatlas_config_test_too_large");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");

        let content = "a".repeat(1_048_577);
        std::fs::write(&path, content).unwrap();

        let result = Config::load(&path);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::TooLarge(_)));
        assert!(err.to_string().contains("too large"));

        std::fs::remove_dir_all(&dir).ok();
    }
}
