//! Raw keyboard events as delivered by the host.

use crate::keycode::Modifiers;
use crossterm::event::{KeyCode as TermKey, KeyEvent, KeyEventKind, KeyModifiers};

/// A keyboard press or release from the host framework.
///
/// `key` is the produced character or key name (`"a"`, `"A"`, `"Enter"`),
/// `code` the physical key identifier (`"KeyA"`, `"Digit1"`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawKeyEvent {
    pub key: String,
    pub code: String,
    pub shift: bool,
    pub ctrl: bool,
    pub meta: bool,
    pub alt: bool,
    pub release: bool,
    default_prevented: bool,
}

impl RawKeyEvent {
    /// A key press with no modifiers; `code` defaults to `key`.
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            code: key.clone(),
            key,
            ..Default::default()
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.shift = modifiers.shift;
        self.ctrl = modifiers.ctrl;
        self.meta = modifiers.meta;
        self.alt = modifiers.alt;
        self.release = modifiers.release;
        self
    }

    /// Turn this into a key release.
    pub fn released(mut self) -> Self {
        self.release = true;
        self
    }

    pub fn modifiers(&self) -> Modifiers {
        Modifiers {
            shift: self.shift,
            ctrl: self.ctrl,
            meta: self.meta,
            alt: self.alt,
            release: self.release,
        }
    }

    /// Ask the host to skip its default handling of this event.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

impl From<KeyEvent> for RawKeyEvent {
    fn from(event: KeyEvent) -> Self {
        let mut shift = event.modifiers.contains(KeyModifiers::SHIFT);
        let key = match event.code {
            TermKey::Char(c) => c.to_string(),
            TermKey::Enter => "Enter".to_string(),
            TermKey::Backspace => "Backspace".to_string(),
            TermKey::Tab => "Tab".to_string(),
            TermKey::BackTab => {
                shift = true;
                "Tab".to_string()
            }
            TermKey::Esc => "Escape".to_string(),
            TermKey::Delete => "Delete".to_string(),
            TermKey::Insert => "Insert".to_string(),
            TermKey::Home => "Home".to_string(),
            TermKey::End => "End".to_string(),
            TermKey::PageUp => "PageUp".to_string(),
            TermKey::PageDown => "PageDown".to_string(),
            TermKey::Left => "ArrowLeft".to_string(),
            TermKey::Right => "ArrowRight".to_string(),
            TermKey::Up => "ArrowUp".to_string(),
            TermKey::Down => "ArrowDown".to_string(),
            TermKey::F(n) => format!("F{n}"),
            other => format!("{other:?}"),
        };

        Self {
            code: key.clone(),
            key,
            shift,
            ctrl: event.modifiers.contains(KeyModifiers::CONTROL),
            meta: event
                .modifiers
                .intersects(KeyModifiers::META | KeyModifiers::SUPER),
            alt: event.modifiers.contains(KeyModifiers::ALT),
            release: event.kind == KeyEventKind::Release,
            default_prevented: false,
        }
    }
}
