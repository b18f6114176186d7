//! Human-facing key display for help screens.

use crate::keycode::{key_name, KeyCode};
use serde::{Deserialize, Serialize};

/// Format for displaying key bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyDisplayFormat {
    /// Unicode symbols: ⌘S, ⌃P, ⇧Tab
    Symbolic,
    /// Text labels: Ctrl+S, Meta+P, Shift+Tab
    #[default]
    Text,
    /// Chord notation as written in bindings: C-s, M-p, S-Tab
    Chord,
}

/// Configuration for key display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyDisplayConfig {
    pub format: KeyDisplayFormat,
    /// Separator between modifiers and key in text format
    pub separator: String,
}

impl Default for KeyDisplayConfig {
    fn default() -> Self {
        Self {
            format: KeyDisplayFormat::Text,
            separator: "+".to_string(),
        }
    }
}

impl KeyDisplayConfig {
    pub fn symbolic() -> Self {
        Self {
            format: KeyDisplayFormat::Symbolic,
            separator: String::new(),
        }
    }

    pub fn text() -> Self {
        Self::default()
    }

    pub fn chord() -> Self {
        Self {
            format: KeyDisplayFormat::Chord,
            separator: String::new(),
        }
    }

    /// Format a modifier name.
    pub fn format_modifier(&self, name: &str) -> &'static str {
        match (self.format, name) {
            (KeyDisplayFormat::Symbolic, "ctrl") => "\u{2303}",
            (KeyDisplayFormat::Symbolic, "alt") => "\u{2325}",
            (KeyDisplayFormat::Symbolic, "shift") => "\u{21e7}",
            (KeyDisplayFormat::Symbolic, "meta") => "\u{2318}",
            (KeyDisplayFormat::Symbolic, "release") => "\u{2191}",
            (_, "ctrl") => "Ctrl",
            (_, "alt") => "Alt",
            (_, "shift") => "Shift",
            (_, "meta") => "Meta",
            (_, "release") => "Release",
            _ => "?",
        }
    }

    /// Format a base key name (`"Enter"`, `"a"`).
    pub fn format_key(&self, key: &str) -> String {
        match self.format {
            KeyDisplayFormat::Symbolic => match key {
                "Enter" => "\u{23ce}".to_string(),
                "Escape" => "\u{238b}".to_string(),
                "Tab" => "\u{21e5}".to_string(),
                "Backspace" => "\u{232b}".to_string(),
                "Delete" => "\u{2326}".to_string(),
                "Space" => "\u{2423}".to_string(),
                "ArrowUp" => "\u{2191}".to_string(),
                "ArrowDown" => "\u{2193}".to_string(),
                "ArrowLeft" => "\u{2190}".to_string(),
                "ArrowRight" => "\u{2192}".to_string(),
                "Home" => "\u{21f1}".to_string(),
                "End" => "\u{21f2}".to_string(),
                "PageUp" => "\u{21de}".to_string(),
                "PageDown" => "\u{21df}".to_string(),
                _ => upper_single(key),
            },
            _ => match key {
                "ArrowUp" => "Up".to_string(),
                "ArrowDown" => "Down".to_string(),
                "ArrowLeft" => "Left".to_string(),
                "ArrowRight" => "Right".to_string(),
                _ => upper_single(key),
            },
        }
    }

    /// Format a full key code.
    pub fn format_code(&self, code: KeyCode) -> String {
        if self.format == KeyDisplayFormat::Chord {
            return code.to_string();
        }

        let modifiers = code.modifiers();
        let mut parts: Vec<String> = Vec::new();
        for (held, name) in [
            (modifiers.release, "release"),
            (modifiers.ctrl, "ctrl"),
            (modifiers.alt, "alt"),
            (modifiers.meta, "meta"),
            (modifiers.shift, "shift"),
        ] {
            if held {
                parts.push(self.format_modifier(name).to_string());
            }
        }

        let base = code.base();
        let key = key_name(base).unwrap_or_else(|| match char::from_u32(base) {
            Some(c) => c.to_string(),
            None => format!("#{base}"),
        });
        parts.push(self.format_key(&key));
        parts.join(&self.separator)
    }
}

/// Single characters print uppercase; key names print as they are.
fn upper_single(key: &str) -> String {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => c.to_uppercase().collect(),
        _ => key.to_string(),
    }
}
