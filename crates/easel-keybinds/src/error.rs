//! Keybinding error types.

use thiserror::Error;

/// A key notation or pattern that cannot be bound.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    /// Empty notation.
    #[error("empty key notation")]
    Empty,

    /// Neither a single character nor a known key name.
    #[error("unknown key: {0}")]
    UnknownKey(String),

    /// Fallback pattern failed to compile.
    #[error("invalid key pattern: {0}")]
    InvalidPattern(String),
}

impl From<regex::Error> for KeyError {
    fn from(e: regex::Error) -> Self {
        Self::InvalidPattern(e.to_string())
    }
}

/// Error loading or applying binding overrides.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(String),

    #[error("bad key in config: {0}")]
    Key(#[from] KeyError),

    /// No registered binding carries this action id.
    #[error("unknown action: {0}")]
    UnknownAction(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        Self::Toml(e.to_string())
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(e: toml::ser::Error) -> Self {
        Self::Toml(e.to_string())
    }
}
