//! Configuration file support for Get Set Fit.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/setfit/config.toml`.
//! User-facing workout settings live in the store (see [`crate::store`]);
//! this file only covers machine-level concerns: where data lives and how
//! to reach the remote suggestion service.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub suggestions: SuggestionsConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Remote exercise suggestion service configuration
///
/// The API key may be omitted here and supplied through the
/// `SETFIT_API_KEY` environment variable instead. With no key at all the
/// service falls back to the built-in suggestion table.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SuggestionsConfig {
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_model")]
    pub model: String,
}

impl Default for SuggestionsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
        }
    }
}

impl SuggestionsConfig {
    /// Resolve the API key from config or the environment
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("SETFIT_API_KEY").ok())
            .filter(|k| !k.is_empty())
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        let home = std::env::var("HOME").expect("HOME environment variable not set");
        PathBuf::from(home).join(".local/share")
    });
    base.join("setfit")
}

fn default_model() -> String {
    "gemini-2.5-flash".into()
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            let home = std::env::var("HOME").expect("HOME environment variable not set");
            PathBuf::from(home).join(".config")
        });
        base.join("setfit").join("config.toml")
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.data.data_dir.ends_with("setfit"));
        assert_eq!(config.suggestions.model, "gemini-2.5-flash");
        assert!(config.suggestions.api_key.is_none());
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(config.data.data_dir, parsed.data.data_dir);
        assert_eq!(config.suggestions.model, parsed.suggestions.model);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[suggestions]
api_key = "test-key"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.suggestions.api_key.as_deref(), Some("test-key"));
        assert_eq!(config.suggestions.model, "gemini-2.5-flash"); // default
        assert!(config.data.data_dir.ends_with("setfit")); // default
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");

        let mut config = Config::default();
        config.suggestions.api_key = Some("abc123".into());
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.suggestions.api_key.as_deref(), Some("abc123"));
    }
}
