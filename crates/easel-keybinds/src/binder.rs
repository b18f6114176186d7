//! Key binder: per-scope keymaps, focus, and dispatch.

use crate::binding::{ActionCtx, ActionId, Binding};
use crate::config::KeybindsConfig;
use crate::display::KeyDisplayConfig;
use crate::error::{ConfigError, KeyError};
use crate::event::RawKeyEvent;
use crate::focus::{FocusRegistry, ScopeId};
use crate::keycode::KeyCode;
use crate::keymap::Keymap;
use crate::parser::{encode_event, parse_chord};

use regex::Regex;
use std::any::Any;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, error, warn};

/// Anything that names a key: a [`KeyCode`] or chord notation.
pub trait ToKeyCode {
    fn to_key_code(&self) -> Result<KeyCode, KeyError>;
}

impl ToKeyCode for KeyCode {
    fn to_key_code(&self) -> Result<KeyCode, KeyError> {
        Ok(*self)
    }
}

impl ToKeyCode for str {
    fn to_key_code(&self) -> Result<KeyCode, KeyError> {
        parse_chord(self)
    }
}

impl ToKeyCode for String {
    fn to_key_code(&self) -> Result<KeyCode, KeyError> {
        parse_chord(self)
    }
}

impl<T: ToKeyCode + ?Sized> ToKeyCode for &T {
    fn to_key_code(&self) -> Result<KeyCode, KeyError> {
        (**self).to_key_code()
    }
}

#[derive(Debug, Default)]
struct KeyScope {
    /// Created on first registration.
    keymap: Option<Keymap>,
    last_action: Option<ActionId>,
}

/// Routes keystrokes to the bindings of whichever scope holds focus.
pub struct KeyBinder {
    scopes: HashMap<ScopeId, KeyScope>,
    focus: FocusRegistry,
    /// Log every dispatch, including keys nothing is bound to.
    details: bool,
}

impl KeyBinder {
    pub fn new() -> Self {
        let mut scopes = HashMap::new();
        scopes.insert(ScopeId::GLOBAL, KeyScope::default());
        Self {
            scopes,
            focus: FocusRegistry::new(),
            details: false,
        }
    }

    pub fn set_details(&mut self, details: bool) {
        self.details = details;
    }

    /// Register a new focus scope. It has no keymap until something is bound.
    pub fn new_scope(&mut self) -> ScopeId {
        let scope = self.focus.allocate();
        self.scopes.insert(scope, KeyScope::default());
        scope
    }

    /// Forget a scope, handing focus back to the global scope if it held it.
    pub fn remove_scope(&mut self, scope: ScopeId) {
        if scope.is_global() {
            return;
        }
        if self.focus.has_focus(scope) {
            self.focus.restore_default();
        }
        self.focus.remove_callback(scope);
        self.scopes.remove(&scope);
    }

    /// Bind `key` in `scope`; `None` removes the existing binding.
    ///
    /// Returns the resolved code. A key that cannot be encoded is logged
    /// and rejected without touching the keymap.
    pub fn set_key(
        &mut self,
        scope: ScopeId,
        key: impl ToKeyCode,
        binding: Option<Binding>,
    ) -> Result<KeyCode, KeyError> {
        let code = key.to_key_code().inspect_err(|e| {
            error!(%scope, error = %e, "rejected key binding");
        })?;

        let entry = self.scopes.entry(scope).or_default();
        match binding {
            Some(binding) => {
                entry
                    .keymap
                    .get_or_insert_with(Keymap::new)
                    .bind(code, binding);
            }
            None => {
                if let Some(keymap) = entry.keymap.as_mut() {
                    keymap.unbind(code);
                }
            }
        }
        Ok(code)
    }

    /// Remove the binding of `key` in `scope`.
    pub fn unset_key(&mut self, scope: ScopeId, key: impl ToKeyCode) -> Result<KeyCode, KeyError> {
        self.set_key(scope, key, None)
    }

    /// Add a fallback pattern, tried before earlier patterns.
    pub fn set_pattern(&mut self, scope: ScopeId, pattern: Regex, binding: Binding) {
        self.scopes
            .entry(scope)
            .or_default()
            .keymap
            .get_or_insert_with(Keymap::new)
            .bind_pattern(pattern, binding);
    }

    /// Compile and add a fallback pattern.
    pub fn set_pattern_str(
        &mut self,
        scope: ScopeId,
        pattern: &str,
        binding: Binding,
    ) -> Result<(), KeyError> {
        let regex = Regex::new(pattern).inspect_err(|e| {
            error!(%scope, error = %e, "rejected key pattern");
        })?;
        self.set_pattern(scope, regex, binding);
        Ok(())
    }

    pub fn global_set_key(
        &mut self,
        key: impl ToKeyCode,
        binding: Option<Binding>,
    ) -> Result<KeyCode, KeyError> {
        self.set_key(ScopeId::GLOBAL, key, binding)
    }

    pub fn global_set_pattern(&mut self, pattern: Regex, binding: Binding) {
        self.set_pattern(ScopeId::GLOBAL, pattern, binding);
    }

    /// The keymap of a scope, if it has one.
    pub fn keymap(&self, scope: ScopeId) -> Option<&Keymap> {
        self.scopes.get(&scope)?.keymap.as_ref()
    }

    /// Dispatch a host key event.
    ///
    /// Returns the action's result, or `None` when no binding ran. Unless
    /// the action returned `true`, the event's default is prevented.
    pub fn dispatch_event(&mut self, event: &mut RawKeyEvent) -> Option<bool> {
        let code = match encode_event(event) {
            Ok(code) => code,
            Err(e) => {
                if self.details {
                    debug!(key = %event.key, error = %e, "unencodable key event");
                }
                return None;
            }
        };
        let key = event.key.clone();
        self.dispatch_code(code, &key, Some(event))
    }

    /// Dispatch a synthesized chord (`"C-k"`). No default to prevent.
    pub fn dispatch_chord(&mut self, chord: &str) -> Option<bool> {
        let code = parse_chord(chord).ok()?;
        self.dispatch_code(code, chord, None)
    }

    /// Dispatch an encoded key.
    ///
    /// `key_text` is what fallback patterns test and what the action sees
    /// as its key.
    pub fn dispatch_code(
        &mut self,
        code: KeyCode,
        key_text: &str,
        event: Option<&mut RawKeyEvent>,
    ) -> Option<bool> {
        let active = self.focus.focus();
        let owner = if self.keymap(active).is_some() {
            active
        } else {
            ScopeId::GLOBAL
        };

        let Some(binding) = self
            .keymap(owner)
            .and_then(|keymap| keymap.lookup(code, key_text))
            .cloned()
        else {
            if self.details {
                debug!(chord = %code, scope = %owner, "unbound key");
            }
            return None;
        };
        debug!(chord = %code, key = key_text, scope = %owner, action = %binding.id(), "dispatch");

        let previous = self
            .scopes
            .get(&owner)
            .and_then(|scope| scope.last_action.clone());
        let mut ctx = ActionCtx::new(binding.argument(), key_text, active, previous.as_ref());
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| binding.invoke(&mut ctx)));
        let focus_request = ctx.take_focus_request();

        let result = match outcome {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => {
                warn!(chord = %code, action = %binding.id(), error = %e, "key action failed");
                return None;
            }
            Err(payload) => {
                warn!(
                    chord = %code,
                    action = %binding.id(),
                    panic = panic_message(payload.as_ref()),
                    "key action panicked"
                );
                return None;
            }
        };

        if let Some(scope) = self.scopes.get_mut(&owner) {
            scope.last_action = Some(binding.id().clone());
        }
        if !result {
            if let Some(event) = event {
                event.prevent_default();
            }
        }
        if let Some(target) = focus_request {
            self.set_focus(target);
        }
        Some(result)
    }

    /// Give `scope` the keyboard, returning the scope that had it.
    pub fn set_focus(&mut self, scope: ScopeId) -> ScopeId {
        self.focus.set_focus(scope)
    }

    /// The scope holding the keyboard.
    pub fn focus(&self) -> ScopeId {
        self.focus.focus()
    }

    pub fn has_focus(&self, scope: ScopeId) -> bool {
        self.focus.has_focus(scope)
    }

    /// Register the focus-change callback of a scope.
    pub fn on_focus_change(&mut self, scope: ScopeId, callback: impl FnMut(bool) + 'static) {
        self.focus.on_focus_change(scope, callback);
    }

    /// The action most recently run from this scope's keymap.
    pub fn last_action(&self, scope: ScopeId) -> Option<&ActionId> {
        self.scopes.get(&scope)?.last_action.as_ref()
    }

    /// Key and action pairs of a scope for a help screen.
    ///
    /// Exact bindings come first, ordered by code, then patterns in the
    /// order they are tried.
    pub fn describe_bindings(
        &self,
        scope: ScopeId,
        display: &KeyDisplayConfig,
    ) -> Vec<(String, ActionId)> {
        let Some(keymap) = self.keymap(scope) else {
            return Vec::new();
        };
        keymap
            .bindings()
            .into_iter()
            .map(|(code, binding)| (display.format_code(code), binding.id().clone()))
            .chain(
                keymap
                    .patterns()
                    .iter()
                    .map(|p| (format!("/{}/", p.regex.as_str()), p.binding.id().clone())),
            )
            .collect()
    }

    /// Apply user overrides to a scope.
    ///
    /// Every action named in the config must already be bound somewhere in
    /// the scope or the global scope; nothing changes unless all chords and
    /// actions resolve.
    pub fn apply_config(
        &mut self,
        scope: ScopeId,
        config: &KeybindsConfig,
    ) -> Result<(), ConfigError> {
        let (bindings, unbind) = config.validate()?;

        let resolved = bindings
            .into_iter()
            .map(|(code, id)| {
                self.find_action(scope, &id)
                    .map(|binding| (code, binding))
                    .ok_or_else(|| ConfigError::UnknownAction(id.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        for code in unbind {
            self.set_key(scope, code, None)?;
        }
        for (code, binding) in resolved {
            self.set_key(scope, code, Some(binding))?;
        }
        self.details = config.details;
        Ok(())
    }

    fn find_action(&self, scope: ScopeId, id: &ActionId) -> Option<Binding> {
        [scope, ScopeId::GLOBAL]
            .into_iter()
            .filter_map(|s| self.keymap(s))
            .find_map(|keymap| keymap.find_action(id.as_str()))
            .cloned()
    }
}

impl Default for KeyBinder {
    fn default() -> Self {
        Self::new()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "non-string panic payload"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::printable_pattern;
    use crate::keycode::Modifiers;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    fn counter(id: &str, hits: &Rc<Cell<u32>>, result: bool) -> Binding {
        let hits = Rc::clone(hits);
        Binding::new(id, move |_| {
            hits.set(hits.get() + 1);
            Ok(result)
        })
    }

    #[test]
    fn test_focus_handoff() {
        let mut binder = KeyBinder::new();
        let x = binder.new_scope();
        let hits = Rc::new(Cell::new(0));
        binder.set_key(x, "q", Some(counter("x-q", &hits, false))).unwrap();

        let focus_log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&focus_log);
        binder.on_focus_change(x, move |gained| sink.borrow_mut().push(gained));

        binder.set_focus(x);
        assert_eq!(binder.dispatch_chord("q"), Some(false));
        assert_eq!(hits.get(), 1);

        assert_eq!(binder.set_focus(ScopeId::GLOBAL), x);
        assert_eq!(binder.dispatch_chord("q"), None);
        assert_eq!(hits.get(), 1);
        assert_eq!(*focus_log.borrow(), vec![true, false]);
    }

    #[test]
    fn test_exact_over_pattern() {
        let mut binder = KeyBinder::new();
        let exact = Rc::new(Cell::new(0));
        let pattern = Rc::new(Cell::new(0));
        binder.global_set_pattern(Regex::new("^k$").unwrap(), counter("pattern", &pattern, false));
        binder.global_set_key("k", Some(counter("exact", &exact, false))).unwrap();

        binder.dispatch_chord("k");
        assert_eq!((exact.get(), pattern.get()), (1, 0));
    }

    #[test]
    fn test_pattern_plain_only() {
        let mut binder = KeyBinder::new();
        let hits = Rc::new(Cell::new(0));
        binder.global_set_pattern(Regex::new("k").unwrap(), counter("any-k", &hits, false));

        for chord in ["C-k", "M-k", "A-k", "^-k"] {
            assert_eq!(binder.dispatch_chord(chord), None, "{chord}");
        }
        assert_eq!(hits.get(), 0);

        let mut event = RawKeyEvent::new("k").with_modifiers(Modifiers::CTRL);
        assert_eq!(binder.dispatch_event(&mut event), None);
        assert_eq!(binder.dispatch_event(&mut RawKeyEvent::new("k")), Some(false));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_pattern_sees_raw_key() {
        let mut binder = KeyBinder::new();
        let typed = Rc::new(RefCell::new(String::new()));
        let sink = Rc::clone(&typed);
        binder.global_set_pattern(
            printable_pattern(),
            Binding::new("self-insert", move |ctx| {
                sink.borrow_mut().push_str(ctx.text());
                Ok(false)
            }),
        );

        let mut event = RawKeyEvent::new("A").with_modifiers(Modifiers::SHIFT);
        binder.dispatch_event(&mut event);
        binder.dispatch_event(&mut RawKeyEvent::new("b"));
        assert_eq!(binder.dispatch_event(&mut RawKeyEvent::new("Enter")), None);
        assert_eq!(*typed.borrow(), "Ab");
    }

    #[test]
    fn test_prevent_default() {
        let mut binder = KeyBinder::new();
        let hits = Rc::new(Cell::new(0));
        binder.global_set_key("C-s", Some(counter("save", &hits, false))).unwrap();
        binder.global_set_key("C-p", Some(counter("pass", &hits, true))).unwrap();

        let mut consumed = RawKeyEvent::new("s").with_modifiers(Modifiers::CTRL);
        assert_eq!(binder.dispatch_event(&mut consumed), Some(false));
        assert!(consumed.default_prevented());

        let mut passed = RawKeyEvent::new("p").with_modifiers(Modifiers::CTRL);
        assert_eq!(binder.dispatch_event(&mut passed), Some(true));
        assert!(!passed.default_prevented());

        let mut unbound = RawKeyEvent::new("z").with_modifiers(Modifiers::CTRL);
        assert_eq!(binder.dispatch_event(&mut unbound), None);
        assert!(!unbound.default_prevented());
    }

    #[test]
    fn test_last_action_and_repeats() {
        let mut binder = KeyBinder::new();
        let scope = binder.new_scope();
        let seen = Rc::new(RefCell::new(Vec::new()));
        for (chord, id) in [("C-n", "line-down"), ("C-p", "line-up")] {
            let sink = Rc::clone(&seen);
            let binding = Binding::new(id, move |ctx| {
                sink.borrow_mut().push(ctx.repeats("line-down"));
                Ok(false)
            });
            binder.set_key(scope, chord, Some(binding)).unwrap();
        }
        binder.set_focus(scope);

        assert_eq!(binder.last_action(scope), None);
        binder.dispatch_chord("C-n");
        binder.dispatch_chord("C-n");
        binder.dispatch_chord("C-p");
        binder.dispatch_chord("C-n");
        assert_eq!(*seen.borrow(), vec![false, true, true, false]);
        assert_eq!(binder.last_action(scope).unwrap(), "line-down");
    }

    #[test]
    fn test_action_faults_are_contained() {
        let mut binder = KeyBinder::new();
        let hits = Rc::new(Cell::new(0));
        binder.global_set_key("a", Some(counter("ok", &hits, false))).unwrap();
        binder
            .global_set_key("e", Some(Binding::new("errs", |_| anyhow::bail!("disk full"))))
            .unwrap();
        binder
            .global_set_key("p", Some(Binding::new("panics", |_| panic!("boom"))))
            .unwrap();

        binder.dispatch_chord("a");
        let mut event = RawKeyEvent::new("e");
        assert_eq!(binder.dispatch_event(&mut event), None);
        assert!(!event.default_prevented());
        let mut event = RawKeyEvent::new("p");
        assert_eq!(binder.dispatch_event(&mut event), None);
        assert!(!event.default_prevented());

        // The failing actions never became the last action.
        assert_eq!(binder.last_action(ScopeId::GLOBAL).unwrap(), "ok");
        assert_eq!(binder.dispatch_chord("a"), Some(false));
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn test_unbind_with_none() {
        let mut binder = KeyBinder::new();
        let hits = Rc::new(Cell::new(0));
        binder.global_set_key("C-d", Some(counter("delete", &hits, false))).unwrap();
        binder.global_set_key("C-d", None).unwrap();
        assert_eq!(binder.dispatch_chord("C-d"), None);
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn test_global_fallback_until_scope_has_keymap() {
        let mut binder = KeyBinder::new();
        let global = Rc::new(Cell::new(0));
        let local = Rc::new(Cell::new(0));
        binder.global_set_key("C-g", Some(counter("quit", &global, false))).unwrap();

        let scope = binder.new_scope();
        binder.set_focus(scope);
        binder.dispatch_chord("C-g");
        assert_eq!(global.get(), 1);

        binder.set_key(scope, "x", Some(counter("local", &local, false))).unwrap();
        // Once the scope owns a keymap, the global one is no longer consulted.
        assert_eq!(binder.dispatch_chord("C-g"), None);
        binder.dispatch_chord("x");
        assert_eq!((global.get(), local.get()), (1, 1));
    }

    #[test]
    fn test_rejects_unknown_key() {
        let mut binder = KeyBinder::new();
        let hits = Rc::new(Cell::new(0));
        let err = binder
            .global_set_key("C-Hyper", Some(counter("nope", &hits, false)))
            .unwrap_err();
        assert_eq!(err, KeyError::UnknownKey("Hyper".to_string()));
        assert!(binder.keymap(ScopeId::GLOBAL).is_none());

        assert!(binder
            .set_pattern_str(ScopeId::GLOBAL, "(", counter("bad", &hits, false))
            .is_err());
    }

    #[test]
    fn test_deferred_focus_request() {
        let mut binder = KeyBinder::new();
        let target = binder.new_scope();
        binder
            .global_set_key(
                "Tab",
                Some(Binding::new("focus-next", move |ctx| {
                    ctx.set_focus(target);
                    Ok(false)
                })),
            )
            .unwrap();

        binder.dispatch_chord("Tab");
        assert_eq!(binder.focus(), target);
    }

    #[test]
    fn test_remove_scope_restores_default() {
        let mut binder = KeyBinder::new();
        let scope = binder.new_scope();
        binder.set_focus(scope);
        binder.remove_scope(scope);
        assert_eq!(binder.focus(), ScopeId::GLOBAL);
    }

    #[test]
    fn test_apply_config() {
        let mut binder = KeyBinder::new();
        let scope = binder.new_scope();
        let deletes = Rc::new(Cell::new(0));
        binder
            .set_key(scope, "Backspace", Some(counter("delete-backward", &deletes, false)))
            .unwrap();
        binder
            .set_key(scope, "C-d", Some(counter("delete-forward", &deletes, false)))
            .unwrap();
        binder.set_focus(scope);

        let config = KeybindsConfig::from_toml_str(
            r#"
unbind = ["C-d"]
[bindings]
"C-h" = "delete-backward"
"#,
        )
        .unwrap();
        binder.apply_config(scope, &config).unwrap();

        assert_eq!(binder.dispatch_chord("C-d"), None);
        assert_eq!(binder.dispatch_chord("C-h"), Some(false));
        assert_eq!(deletes.get(), 1);

        let unknown = KeybindsConfig::from_toml_str("[bindings]\n\"C-z\" = \"undo\"\n").unwrap();
        assert!(matches!(
            binder.apply_config(scope, &unknown),
            Err(ConfigError::UnknownAction(id)) if id == "undo"
        ));
        assert!(binder.keymap(scope).unwrap().get(parse_chord("C-z").unwrap()).is_none());
    }

    #[test]
    fn test_describe_bindings() {
        let mut binder = KeyBinder::new();
        let hits = Rc::new(Cell::new(0));
        for (chord, id) in [
            ("C-a", "beginning"),
            ("M-<", "beginning"),
            ("C-e", "end"),
            ("Backspace", "delete-backward"),
        ] {
            binder.global_set_key(chord, Some(counter(id, &hits, false))).unwrap();
        }
        binder.global_set_pattern(printable_pattern(), counter("self-insert", &hits, false));

        let listing = binder
            .describe_bindings(ScopeId::GLOBAL, &KeyDisplayConfig::text())
            .into_iter()
            .map(|(key, action)| format!("{key} = {action}"))
            .collect::<Vec<_>>()
            .join("\n");
        insta::assert_snapshot!(listing, @r"
        Backspace = delete-backward
        Ctrl+A = beginning
        Ctrl+E = end
        Meta+Shift+, = beginning
        /^\S$/ = self-insert
        ");
    }
}
