//! Bindings: an action, its identity, and an optional bound argument.

use crate::focus::ScopeId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

/// Stable name of an action (`"kill-line"`, `"self-insert"`).
///
/// The dispatcher records the id of the last action it ran per scope, so
/// commands can tell whether they are being repeated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActionId(pub String);

impl ActionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ActionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ActionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl PartialEq<str> for ActionId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ActionId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Argument stored with a binding and handed to its action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindArg {
    Text(String),
    Number(i64),
    Flag(bool),
}

impl BindArg {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<i64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<&str> for BindArg {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for BindArg {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<char> for BindArg {
    fn from(c: char) -> Self {
        Self::Text(c.to_string())
    }
}

impl From<i64> for BindArg {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

impl From<bool> for BindArg {
    fn from(b: bool) -> Self {
        Self::Flag(b)
    }
}

/// What an action returns: `Ok(true)` lets the host's default handling
/// run, `Ok(false)` consumes the event.
pub type ActionResult = anyhow::Result<bool>;

/// The callable part of a binding.
pub type ActionFn = dyn Fn(&mut ActionCtx<'_>) -> ActionResult;

/// Everything an action sees while it runs.
pub struct ActionCtx<'a> {
    argument: Option<&'a BindArg>,
    key: &'a str,
    scope: ScopeId,
    previous: Option<&'a ActionId>,
    focus_request: Option<ScopeId>,
}

impl<'a> ActionCtx<'a> {
    pub(crate) fn new(
        argument: Option<&'a BindArg>,
        key: &'a str,
        scope: ScopeId,
        previous: Option<&'a ActionId>,
    ) -> Self {
        Self {
            argument,
            key,
            scope,
            previous,
            focus_request: None,
        }
    }

    /// The binding's stored argument.
    pub fn argument(&self) -> Option<&BindArg> {
        self.argument
    }

    /// The stored text argument, falling back to the key text.
    pub fn text(&self) -> &str {
        self.argument
            .and_then(BindArg::as_text)
            .unwrap_or(self.key)
    }

    /// Key text of the event (`"a"`, `"Enter"`) or the synthesized chord.
    pub fn key(&self) -> &str {
        self.key
    }

    /// Scope that held focus when the key arrived.
    pub fn scope(&self) -> ScopeId {
        self.scope
    }

    /// The action this scope ran on the previous dispatch.
    pub fn previous_action(&self) -> Option<&ActionId> {
        self.previous
    }

    /// True if the previous action of this scope was `id`.
    pub fn repeats(&self, id: &str) -> bool {
        self.previous.is_some_and(|prev| prev == id)
    }

    /// Move keyboard focus once this action returns.
    pub fn set_focus(&mut self, scope: ScopeId) {
        self.focus_request = Some(scope);
    }

    pub(crate) fn take_focus_request(&mut self) -> Option<ScopeId> {
        self.focus_request.take()
    }
}

/// A bound action.
#[derive(Clone)]
pub struct Binding {
    id: ActionId,
    action: Rc<ActionFn>,
    argument: Option<BindArg>,
}

impl Binding {
    /// Create a binding for an action.
    pub fn new(
        id: impl Into<ActionId>,
        action: impl Fn(&mut ActionCtx<'_>) -> ActionResult + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            action: Rc::new(action),
            argument: None,
        }
    }

    /// Attach an argument handed to the action on every dispatch.
    pub fn with_arg(mut self, argument: impl Into<BindArg>) -> Self {
        self.argument = Some(argument.into());
        self
    }

    pub fn id(&self) -> &ActionId {
        &self.id
    }

    pub fn argument(&self) -> Option<&BindArg> {
        self.argument.as_ref()
    }

    /// True if both bindings run the same closure.
    pub fn same_action(&self, other: &Binding) -> bool {
        Rc::ptr_eq(&self.action, &other.action)
    }

    pub(crate) fn invoke(&self, ctx: &mut ActionCtx<'_>) -> ActionResult {
        (self.action)(ctx)
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("id", &self.id)
            .field("argument", &self.argument)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_id() {
        let id = ActionId::from("kill-line");
        assert_eq!(id, "kill-line");
        assert_eq!(id.to_string(), "kill-line");
    }

    #[test]
    fn test_ctx_text_prefers_argument() {
        let arg = BindArg::from(' ');
        let ctx = ActionCtx::new(Some(&arg), "Space", ScopeId::GLOBAL, None);
        assert_eq!(ctx.text(), " ");

        let ctx = ActionCtx::new(None, "q", ScopeId::GLOBAL, None);
        assert_eq!(ctx.text(), "q");
    }

    #[test]
    fn test_ctx_repeats() {
        let prev = ActionId::from("line-up");
        let ctx = ActionCtx::new(None, "ArrowUp", ScopeId::GLOBAL, Some(&prev));
        assert!(ctx.repeats("line-up"));
        assert!(!ctx.repeats("line-down"));
    }

    #[test]
    fn test_binding_invoke() {
        let binding = Binding::new("echo", |ctx| Ok(ctx.key() == "x")).with_arg(3);
        assert_eq!(binding.argument(), Some(&BindArg::Number(3)));
        let mut ctx = ActionCtx::new(binding.argument(), "x", ScopeId::GLOBAL, None);
        assert!(binding.invoke(&mut ctx).unwrap());
        assert!(binding.same_action(&binding.clone()));
    }
}
