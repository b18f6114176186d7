//! User binding overrides loaded from TOML.

use crate::binding::ActionId;
use crate::error::ConfigError;
use crate::keycode::KeyCode;
use crate::parser::parse_chord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Binding overrides for one scope.
///
/// ```toml
/// details = true
/// unbind = ["C-d"]
///
/// [bindings]
/// "C-h" = "delete-backward"
/// "M-<" = "beginning"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeybindsConfig {
    /// Log every dispatch with its chord and chosen action.
    #[serde(default)]
    pub details: bool,
    /// Chord to action id.
    #[serde(default)]
    pub bindings: BTreeMap<String, ActionId>,
    /// Chords to remove.
    #[serde(default)]
    pub unbind: Vec<String>,
}

impl KeybindsConfig {
    /// Load configuration from file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load from default location, or defaults if there is no file.
    pub fn load_default() -> Result<Self, ConfigError> {
        if let Some(path) = Self::default_path() {
            if path.exists() {
                return Self::load(&path);
            }
        }
        Ok(Self::default())
    }

    /// Get default config path.
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "easel-keybinds")
            .map(|d| d.config_dir().join("keybinds.toml"))
    }

    /// Save configuration to file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Parse every chord, returning the resolved bindings and unbinds.
    pub fn validate(&self) -> Result<(Vec<(KeyCode, ActionId)>, Vec<KeyCode>), ConfigError> {
        let bindings = self
            .bindings
            .iter()
            .map(|(chord, action)| Ok((parse_chord(chord)?, action.clone())))
            .collect::<Result<Vec<_>, ConfigError>>()?;
        let unbind = self
            .unbind
            .iter()
            .map(|chord| parse_chord(chord).map_err(ConfigError::from))
            .collect::<Result<Vec<_>, _>>()?;
        Ok((bindings, unbind))
    }
}
