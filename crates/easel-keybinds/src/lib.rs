//! # easel-keybinds
//!
//! Keyboard dispatch core for easel widgets.
//!
//! ## Features
//!
//! - Modified keystrokes encoded as single comparable integers
//! - Emacs-style chord notation (`"C-M-x"`, `"S-Enter"`, `"^-a"`)
//! - Per-scope keymaps with regex fallback for plain keys
//! - Focus registry with gain/loss callbacks
//! - TOML binding overrides

mod binder;
mod binding;
mod config;
mod display;
mod error;
mod event;
mod focus;
mod keycode;
mod keymap;
mod parser;

pub use binder::{KeyBinder, ToKeyCode};
pub use binding::{ActionCtx, ActionFn, ActionId, ActionResult, BindArg, Binding};
pub use config::KeybindsConfig;
pub use display::{KeyDisplayConfig, KeyDisplayFormat};
pub use error::{ConfigError, KeyError};
pub use event::RawKeyEvent;
pub use focus::{FocusCallback, FocusRegistry, ScopeId};
pub use keycode::{key_name, named_key_code, KeyCode, Modifiers, ALT, CTRL, KEYUP, META, SHIFT};
pub use keymap::{printable_pattern, KeyPattern, Keymap};
pub use parser::{chord_string, encode_event, parse_chord};

/// Code for a plain character key.
pub fn key(c: char) -> KeyCode {
    with_modifiers(c, Modifiers::NONE)
}

/// Code for Ctrl+key.
pub fn ctrl(c: char) -> KeyCode {
    with_modifiers(c, Modifiers::CTRL)
}

/// Code for Meta+key.
pub fn meta(c: char) -> KeyCode {
    with_modifiers(c, Modifiers::META)
}

/// Code for Alt+key.
pub fn alt(c: char) -> KeyCode {
    with_modifiers(c, Modifiers::ALT)
}

// Same folding as chord notation, so `ctrl('A')` equals `parse_chord("C-A")`.
fn with_modifiers(c: char, modifiers: Modifiers) -> KeyCode {
    let mut chord = String::new();
    for (held, prefix) in [(modifiers.ctrl, "C-"), (modifiers.meta, "M-"), (modifiers.alt, "A-")] {
        if held {
            chord.push_str(prefix);
        }
    }
    chord.push(c);
    parse_chord(&chord).unwrap_or_else(|_| KeyCode::new(c as u32, modifiers))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_helpers() {
        assert_eq!(key('x'), parse_chord("x").unwrap());
        assert_eq!(ctrl('s'), parse_chord("C-s").unwrap());
        assert_eq!(ctrl('S'), parse_chord("C-S-s").unwrap());
        assert_eq!(meta('!'), parse_chord("M-S-1").unwrap());
        assert!(alt('x').modifiers().alt);
    }
}
