//! Configuration management for the Vortex client.
//!
//! Loads configuration from ${VORTEX_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::theme::ThemeMode;

/// Returns the default config template with comments.
///
/// This is embedded from default_config.toml at compile time.
/// To update, edit default_config.toml directly.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

/// Merges user config values into the default template.
///
/// This ensures new comments/sections from the template are always present,
/// while preserving user's customized values.
fn merge_with_template(user_config: &str) -> Result<String> {
    use toml_edit::DocumentMut;

    // Parse the template as the base
    let mut doc: DocumentMut = default_config_template()
        .parse()
        .context("Failed to parse default config template")?;

    // Parse user's existing config
    let user_doc: DocumentMut = user_config.parse().context("Failed to parse user config")?;

    // Overlay user values onto template
    merge_items(doc.as_table_mut(), user_doc.as_table());

    Ok(doc.to_string())
}

/// Recursively merges items from source table into target table.
fn merge_items(target: &mut toml_edit::Table, source: &toml_edit::Table) {
    use toml_edit::Item;

    for (key, value) in source.iter() {
        match value {
            Item::Value(v) => {
                target[key] = Item::Value(v.clone());
            }
            Item::Table(src_table) => {
                if let Some(Item::Table(target_table)) = target.get_mut(key) {
                    merge_items(target_table, src_table);
                } else {
                    target[key] = Item::Table(src_table.clone());
                }
            }
            Item::ArrayOfTables(src_arr) => {
                target[key] = Item::ArrayOfTables(src_arr.clone());
            }
            Item::None => {}
        }
    }
}

pub mod paths {
    //! Path resolution for Vortex configuration and data directories.
    //!
    //! VORTEX_HOME resolution order:
    //! 1. VORTEX_HOME environment variable (if set)
    //! 2. ~/.config/vortex (default)

    use std::path::PathBuf;

    /// Returns the Vortex home directory.
    ///
    /// Checks VORTEX_HOME env var first, falls back to ~/.config/vortex
    pub fn vortex_home() -> PathBuf {
        if let Ok(home) = std::env::var("VORTEX_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir()
            .map(|h| h.join(".config").join("vortex"))
            .expect("Could not determine home directory")
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        vortex_home().join("config.toml")
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the inventory application API
    pub app_base_url: String,

    /// Base URL of the authorization service API
    pub auth_base_url: String,

    /// Base URL of the sign-in application (login/register pages)
    pub auth_app_url: String,

    /// Request timeout in seconds for API calls
    pub request_timeout_secs: u32,

    /// UI theme preference
    pub theme: ThemeMode,
}

impl Config {
    const DEFAULT_APP_BASE_URL: &str = "http://localhost:8080";
    const DEFAULT_AUTH_BASE_URL: &str = "http://localhost:8081";
    const DEFAULT_AUTH_APP_URL: &str = "http://localhost:3001";
    const DEFAULT_REQUEST_TIMEOUT_SECS: u32 = 30;

    /// Loads configuration from the default config path.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Saves only the theme field to the config file.
    ///
    /// Creates the file if it doesn't exist.
    /// Preserves existing fields and comments using toml_edit.
    pub fn save_theme(theme: ThemeMode) -> Result<()> {
        Self::save_theme_to(&paths::config_path(), theme)
    }

    /// Saves only the theme field to a specific config file path.
    ///
    /// Creates the file with default template if it doesn't exist.
    /// If file exists, merges user values into the latest template.
    pub fn save_theme_to(path: &Path, theme: ThemeMode) -> Result<()> {
        use toml_edit::{DocumentMut, value};

        // Start from template, merge user values if file exists
        let contents = if path.exists() {
            let user_config = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            merge_with_template(&user_config)?
        } else {
            default_config_template().to_string()
        };

        let mut doc: DocumentMut = contents
            .parse()
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        doc["theme"] = value(theme.as_str());

        Self::write_config(path, &doc.to_string())
    }

    /// Returns the request timeout as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.request_timeout_secs))
    }

    /// Creates a default config file at the given path.
    /// Returns an error if the file already exists.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, default_config_template())
    }

    /// Writes config content to a file, creating parent directories as needed.
    /// Uses atomic write (temp file + rename) to prevent corruption.
    fn write_config(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_base_url: Self::DEFAULT_APP_BASE_URL.to_string(),
            auth_base_url: Self::DEFAULT_AUTH_BASE_URL.to_string(),
            auth_app_url: Self::DEFAULT_AUTH_APP_URL.to_string(),
            request_timeout_secs: Self::DEFAULT_REQUEST_TIMEOUT_SECS,
            theme: ThemeMode::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test: missing file yields defaults.
    #[test]
    fn test_load_missing_file_returns_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();

        assert_eq!(config.app_base_url, "http://localhost:8080");
        assert_eq!(config.auth_base_url, "http://localhost:8081");
        assert_eq!(config.auth_app_url, "http://localhost:3001");
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.theme, ThemeMode::Light);
    }

    /// Test: partial config files fall back to defaults per field.
    #[test]
    fn test_load_partial_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "auth_base_url = \"https://auth.example.com\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.auth_base_url, "https://auth.example.com");
        assert_eq!(config.app_base_url, "http://localhost:8080");
    }

    /// Test: the embedded template parses to the Rust defaults.
    #[test]
    fn test_template_matches_defaults() {
        let from_template: Config = toml::from_str(default_config_template()).unwrap();
        let defaults = Config::default();

        assert_eq!(from_template.app_base_url, defaults.app_base_url);
        assert_eq!(from_template.auth_base_url, defaults.auth_base_url);
        assert_eq!(from_template.auth_app_url, defaults.auth_app_url);
        assert_eq!(
            from_template.request_timeout_secs,
            defaults.request_timeout_secs
        );
        assert_eq!(from_template.theme, defaults.theme);
    }

    /// Test: save_theme_to preserves customized fields.
    #[test]
    fn test_save_theme_preserves_other_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "app_base_url = \"https://stock.example.com\"\n").unwrap();

        Config::save_theme_to(&path, ThemeMode::Dark).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.theme, ThemeMode::Dark);
        assert_eq!(config.app_base_url, "https://stock.example.com");
    }

    /// Test: init refuses to overwrite an existing file.
    #[test]
    fn test_init_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        Config::init(&path).unwrap();
        assert!(path.exists());
        assert!(Config::init(&path).is_err());
    }
}
