use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::provider::gemini::{DEFAULT_ENDPOINT, DEFAULT_MODEL};

/// Environment variables checked, in order, before the stored API key.
pub const API_KEY_ENV_VARS: &[&str] = &["GEMINI_API_KEY", "API_KEY"];

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// model = "gemini-2.5-flash"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    pub api_key: Option<String>,

    /// Gemini model id; `gemini-2.5-flash` when unset.
    pub model: Option<String>,

    /// API base URL; the public v1beta endpoint when unset.
    pub endpoint: Option<String>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Load from disk, then apply environment overrides.
    pub fn load_with_env() -> Result<Self> {
        let mut cfg = Self::load()?;
        cfg.apply_env_key(API_KEY_ENV_VARS.iter().find_map(|name| std::env::var(name).ok()));
        Ok(cfg)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Invalid configuration TOML")
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "explorer", "explorer-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// An environment-provided key replaces the stored one; blank values are ignored.
    pub fn apply_env_key(&mut self, env_key: Option<String>) {
        if let Some(key) = env_key.filter(|k| !k.trim().is_empty()) {
            self.api_key = Some(key.trim().to_string());
        }
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    /// Returns the API key, if present and non-blank.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }

    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }

    pub fn is_configured(&self) -> bool {
        self.api_key().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_empty() {
        let cfg = Config::default();

        assert!(!cfg.is_configured());
        assert_eq!(cfg.model(), "gemini-2.5-flash");
        assert_eq!(
            cfg.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta"
        );
    }

    #[test]
    fn parses_toml() {
        let cfg = Config::from_toml("api_key = \"KEY\"\nmodel = \"gemini-2.5-pro\"\n")
            .expect("valid toml");

        assert_eq!(cfg.api_key(), Some("KEY"));
        assert_eq!(cfg.model(), "gemini-2.5-pro");
        assert!(cfg.endpoint.is_none());
    }

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
    }

    #[test]
    fn invalid_toml_is_rejected() {
        let err = Config::from_toml("api_key = ").unwrap_err();
        assert!(err.to_string().contains("Invalid configuration TOML"));
    }

    #[test]
    fn toml_roundtrip_preserves_fields() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".into());
        cfg.endpoint = Some("http://localhost:8080".into());

        let text = toml::to_string_pretty(&cfg).unwrap();
        assert_eq!(Config::from_toml(&text).unwrap(), cfg);
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let mut cfg = Config::default();
        cfg.set_api_key("   ".into());

        assert_eq!(cfg.api_key(), None);
        assert!(!cfg.is_configured());
    }

    #[test]
    fn env_key_overrides_stored_key() {
        let mut cfg = Config::default();
        cfg.set_api_key("STORED".into());

        cfg.apply_env_key(Some(" FROM_ENV ".into()));
        assert_eq!(cfg.api_key(), Some("FROM_ENV"));
    }

    #[test]
    fn blank_env_key_keeps_stored_key() {
        let mut cfg = Config::default();
        cfg.set_api_key("STORED".into());

        cfg.apply_env_key(Some(String::new()));
        cfg.apply_env_key(None);
        assert_eq!(cfg.api_key(), Some("STORED"));
    }
}
