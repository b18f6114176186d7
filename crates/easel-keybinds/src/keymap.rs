//! Keymap: exact code bindings plus ordered fallback patterns.

use crate::binding::Binding;
use crate::keycode::KeyCode;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

static PRINTABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\S$").expect("printable key pattern"));

/// Pattern matching any single non-whitespace character, for self-insert.
pub fn printable_pattern() -> Regex {
    PRINTABLE.clone()
}

/// A fallback binding tried when no exact code matches.
#[derive(Debug, Clone)]
pub struct KeyPattern {
    pub regex: Regex,
    pub binding: Binding,
}

/// Bindings of one scope.
#[derive(Debug, Clone, Default)]
pub struct Keymap {
    exact: HashMap<KeyCode, Binding>,
    /// Most recently registered first.
    patterns: Vec<KeyPattern>,
}

impl Keymap {
    /// Create a new empty keymap.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a code, returning the binding it replaced.
    pub fn bind(&mut self, code: KeyCode, binding: Binding) -> Option<Binding> {
        self.exact.insert(code, binding)
    }

    /// Remove the binding for a code.
    pub fn unbind(&mut self, code: KeyCode) -> Option<Binding> {
        self.exact.remove(&code)
    }

    /// Add a fallback pattern ahead of those already registered.
    pub fn bind_pattern(&mut self, regex: Regex, binding: Binding) {
        self.patterns.insert(0, KeyPattern { regex, binding });
    }

    /// Exact binding for a code.
    pub fn get(&self, code: KeyCode) -> Option<&Binding> {
        self.exact.get(&code)
    }

    /// Find the binding for a keystroke.
    ///
    /// An exact code match always wins. Patterns are tested against
    /// `key_text` only for plain presses (no ctrl, meta, alt or release).
    pub fn lookup(&self, code: KeyCode, key_text: &str) -> Option<&Binding> {
        if let Some(binding) = self.exact.get(&code) {
            return Some(binding);
        }
        if !code.is_plain() {
            return None;
        }
        self.patterns
            .iter()
            .find(|p| p.regex.is_match(key_text))
            .map(|p| &p.binding)
    }

    pub fn patterns(&self) -> &[KeyPattern] {
        &self.patterns
    }

    /// Exact bindings ordered by code.
    pub fn bindings(&self) -> Vec<(KeyCode, &Binding)> {
        let mut all: Vec<_> = self.exact.iter().map(|(code, b)| (*code, b)).collect();
        all.sort_by_key(|(code, _)| *code);
        all
    }

    /// First binding (exact, then pattern) that runs the given action.
    pub fn find_action(&self, id: &str) -> Option<&Binding> {
        self.bindings()
            .into_iter()
            .map(|(_, b)| b)
            .chain(self.patterns.iter().map(|p| &p.binding))
            .find(|b| b.id() == id)
    }

    pub fn len(&self) -> usize {
        self.exact.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exact.is_empty() && self.patterns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::ActionId;
    use crate::parser::parse_chord;

    fn tag(id: &str) -> Binding {
        Binding::new(id, |_| Ok(false))
    }

    fn code(chord: &str) -> KeyCode {
        parse_chord(chord).unwrap()
    }

    #[test]
    fn test_last_write_wins() {
        let mut keymap = Keymap::new();
        keymap.bind(code("C-s"), tag("save"));
        let old = keymap.bind(code("C-s"), tag("save-as"));
        assert_eq!(old.map(|b| b.id().clone()), Some(ActionId::from("save")));
        assert_eq!(keymap.get(code("C-s")).unwrap().id(), "save-as");
        assert_eq!(keymap.len(), 1);
    }

    #[test]
    fn test_exact_over_pattern() {
        let mut keymap = Keymap::new();
        keymap.bind_pattern(printable_pattern(), tag("self-insert"));
        keymap.bind(code("q"), tag("quit"));

        assert_eq!(keymap.lookup(code("q"), "q").unwrap().id(), "quit");
        assert_eq!(keymap.lookup(code("w"), "w").unwrap().id(), "self-insert");
    }

    #[test]
    fn test_patterns_only_for_plain_keys() {
        let mut keymap = Keymap::new();
        keymap.bind_pattern(Regex::new(".*").unwrap(), tag("anything"));

        assert!(keymap.lookup(code("C-x"), "x").is_none());
        assert!(keymap.lookup(code("M-x"), "x").is_none());
        assert!(keymap.lookup(code("A-x"), "x").is_none());
        assert!(keymap.lookup(code("^-x"), "x").is_none());
        // Shift alone is still plain.
        assert!(keymap.lookup(code("X"), "X").is_some());
    }

    #[test]
    fn test_newest_pattern_first() {
        let mut keymap = Keymap::new();
        keymap.bind_pattern(printable_pattern(), tag("older"));
        keymap.bind_pattern(Regex::new("^[0-9]$").unwrap(), tag("digits"));

        assert_eq!(keymap.lookup(code("7"), "7").unwrap().id(), "digits");
        assert_eq!(keymap.lookup(code("x"), "x").unwrap().id(), "older");
        assert!(keymap.lookup(code("Enter"), "Enter").is_none());
    }

    #[test]
    fn test_find_action() {
        let mut keymap = Keymap::new();
        keymap.bind(code("C-f"), tag("forward-char"));
        keymap.bind(code("ArrowRight"), tag("forward-char"));
        keymap.bind_pattern(printable_pattern(), tag("self-insert"));

        assert!(keymap.find_action("forward-char").is_some());
        assert!(keymap.find_action("self-insert").is_some());
        assert!(keymap.find_action("missing").is_none());
    }
}
