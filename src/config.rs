//! Optional user configuration (`config.toml`)
//!
//! ```toml
//! api_base = "https://api.meraki.com/api/v1"
//! output_dir = "~/fwguard-runs"
//! api_key_env = "MERAKI_DASHBOARD_API_KEY"
//! ```
//!
//! Every field is optional. Command-line flags override the file.

use crate::paths;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable holding the Dashboard API key by default
pub const DEFAULT_API_KEY_ENV: &str = "MERAKI_DASHBOARD_API_KEY";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Dashboard API base URL
    pub api_base: String,
    /// Where run logs and backup directories are written
    pub output_dir: String,
    /// Environment variable to read the API key from
    pub api_key_env: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: dashboard::backend::meraki::DEFAULT_API_BASE.to_string(),
            output_dir: ".".to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
        }
    }
}

impl Config {
    /// Load the config file, or defaults if there is none
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_file()?)
    }

    /// Load a specific config file, or defaults if it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Invalid config in {}", path.display()))
    }

    /// Output directory with `~` and variables expanded
    pub fn output_dir(&self) -> PathBuf {
        paths::expand(&self.output_dir)
    }

    /// API key from the configured environment variable, if set and non-empty
    pub fn api_key_from_env(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
    }

    /// Render as TOML for display
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Could not serialize config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.api_key_env, "MERAKI_DASHBOARD_API_KEY");
        assert_eq!(config.api_base, "https://api.meraki.com/api/v1");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "output_dir = \"/srv/fwguard\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.output_dir(), PathBuf::from("/srv/fwguard"));
        assert_eq!(config.api_key_env, DEFAULT_API_KEY_ENV);
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "api_key = \"plaintext\"\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains("Invalid config"));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = Config {
            api_base: "http://localhost:8080/api/v1".into(),
            output_dir: "~/runs".into(),
            api_key_env: "FWGUARD_TEST_KEY".into(),
        };
        let parsed: Config = toml::from_str(&config.to_toml().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_api_key_from_env_ignores_blank() {
        let config = Config {
            api_key_env: "FWGUARD_TEST_BLANK_KEY".into(),
            ..Config::default()
        };
        // SAFETY: variable is unique to this test
        unsafe { std::env::set_var("FWGUARD_TEST_BLANK_KEY", "   ") };
        assert_eq!(config.api_key_from_env(), None);
        unsafe { std::env::set_var("FWGUARD_TEST_BLANK_KEY", " abc123 ") };
        assert_eq!(config.api_key_from_env().as_deref(), Some("abc123"));
        unsafe { std::env::remove_var("FWGUARD_TEST_BLANK_KEY") };
    }
}
