//! Keyboard focus registry.

use std::collections::HashMap;
use std::fmt;
use tracing::debug;

/// Opaque identity of something that can own the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(u64);

impl ScopeId {
    /// The process-wide default scope. It holds focus until some widget
    /// claims it, and again whenever focus is restored.
    pub const GLOBAL: ScopeId = ScopeId(0);

    pub fn is_global(self) -> bool {
        self == Self::GLOBAL
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_global() {
            write!(f, "global")
        } else {
            write!(f, "scope#{}", self.0)
        }
    }
}

/// Called with `true` when a scope gains focus and `false` when it loses it.
pub type FocusCallback = Box<dyn FnMut(bool)>;

/// Tracks which scope holds the keyboard.
///
/// Exactly one scope is active at a time. `set_focus` is the only way to
/// change it, and the last call wins.
pub struct FocusRegistry {
    active: ScopeId,
    next_id: u64,
    callbacks: HashMap<ScopeId, FocusCallback>,
}

impl FocusRegistry {
    pub fn new() -> Self {
        Self {
            active: ScopeId::GLOBAL,
            next_id: 1,
            callbacks: HashMap::new(),
        }
    }

    /// Mint a fresh scope identity.
    pub fn allocate(&mut self) -> ScopeId {
        let id = ScopeId(self.next_id);
        self.next_id += 1;
        id
    }

    /// The scope holding focus.
    pub fn focus(&self) -> ScopeId {
        self.active
    }

    pub fn has_focus(&self, scope: ScopeId) -> bool {
        self.active == scope
    }

    /// Give focus to `scope`, returning the scope that held it before.
    ///
    /// The old holder is told it lost focus before the new one is told it
    /// gained it. Focusing the active scope again notifies nobody.
    pub fn set_focus(&mut self, scope: ScopeId) -> ScopeId {
        let previous = self.active;
        if previous == scope {
            return previous;
        }

        if let Some(callback) = self.callbacks.get_mut(&previous) {
            callback(false);
        }
        self.active = scope;
        if let Some(callback) = self.callbacks.get_mut(&scope) {
            callback(true);
        }

        debug!(from = %previous, to = %scope, "focus changed");
        previous
    }

    /// Hand focus back to the global scope.
    pub fn restore_default(&mut self) -> ScopeId {
        self.set_focus(ScopeId::GLOBAL)
    }

    /// Register the focus-change callback of a scope, replacing any earlier one.
    pub fn on_focus_change(&mut self, scope: ScopeId, callback: impl FnMut(bool) + 'static) {
        self.callbacks.insert(scope, Box::new(callback));
    }

    pub fn remove_callback(&mut self, scope: ScopeId) {
        self.callbacks.remove(&scope);
    }
}

impl Default for FocusRegistry {
    fn default() -> Self {
        Self::new()
    }
}
