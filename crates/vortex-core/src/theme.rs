//! Theme preference handling.
//!
//! The controller is an explicit value handed to whatever surface renders
//! themed output. There is no global theme instance: construct one from
//! config at startup and call [`ThemeController::teardown`] to persist.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::config::Config;

/// UI theme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    /// Returns the persisted identifier for this mode.
    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }

    /// Parses a persisted identifier. Unknown values fall back to light.
    pub fn parse(value: &str) -> Self {
        match value {
            "dark" => ThemeMode::Dark,
            _ => ThemeMode::Light,
        }
    }
}

impl std::fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Theme controller with an explicit lifecycle.
#[derive(Debug)]
pub struct ThemeController {
    mode: ThemeMode,
    dirty: bool,
}

impl ThemeController {
    /// Initializes the controller from the loaded config.
    pub fn init(config: &Config) -> Self {
        Self {
            mode: config.theme,
            dirty: false,
        }
    }

    /// Current theme mode.
    pub fn mode(&self) -> ThemeMode {
        self.mode
    }

    pub fn is_dark(&self) -> bool {
        self.mode == ThemeMode::Dark
    }

    /// Switches between light and dark.
    pub fn toggle(&mut self) -> ThemeMode {
        self.set(match self.mode {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        });
        self.mode
    }

    /// Sets an explicit mode.
    pub fn set(&mut self, mode: ThemeMode) {
        if self.mode != mode {
            self.mode = mode;
            self.dirty = true;
        }
    }

    /// Persists the preference if it changed since init.
    ///
    /// # Errors
    /// Returns an error if the config file cannot be written.
    pub fn teardown(&self) -> Result<()> {
        if self.dirty {
            Config::save_theme(self.mode)?;
        }
        Ok(())
    }

    /// Persists to a specific config path (used by callers managing paths).
    ///
    /// # Errors
    /// Returns an error if the config file cannot be written.
    pub fn teardown_to(&self, path: &std::path::Path) -> Result<()> {
        if self.dirty {
            Config::save_theme_to(path, self.mode)?;
        }
        Ok(())
    }
}
