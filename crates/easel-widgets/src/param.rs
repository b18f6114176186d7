//! Parameter panel model: one chooser per field of a shared target.

use crate::chooser::{ChoiceItem, Chooser, ParamValue};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use thiserror::Error;
use tracing::{debug, warn};

/// An object whose fields can be assigned by name.
pub trait Settable {
    /// Assign `value` to `field`; false when the field is unknown or the
    /// value has the wrong kind.
    fn set(&mut self, field: &str, value: &ParamValue) -> bool;

    fn get(&self, field: &str) -> Option<ParamValue>;
}

pub type ParamTarget = Rc<RefCell<dyn Settable>>;

/// Replaces the default "assign into the target" behavior of a line.
pub type OnChange = Rc<dyn Fn(&ChoiceItem)>;

#[derive(Debug, Error, PartialEq)]
pub enum ParamError {
    #[error("no parameter line for field `{0}`")]
    UnknownField(String),

    #[error("`{value}` is not a choice for field `{field}`")]
    NoSuchChoice { field: String, value: ParamValue },
}

/// Options for [`ParamGui::make_param_spec`].
#[derive(Default, Clone)]
pub struct ParamOpts {
    /// Label; defaults to the field name.
    pub name: Option<String>,
    /// Edit this object instead of the panel's target.
    pub target: Option<ParamTarget>,
    pub on_change: Option<OnChange>,
}

impl ParamOpts {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_target(mut self, target: ParamTarget) -> Self {
        self.target = Some(target);
        self
    }

    pub fn on_change(mut self, f: impl Fn(&ChoiceItem) + 'static) -> Self {
        self.on_change = Some(Rc::new(f));
        self
    }
}

#[derive(Clone)]
pub struct ParamSpec {
    pub field_name: String,
    pub name: String,
    pub choices: Vec<ChoiceItem>,
    pub target: Option<ParamTarget>,
    pub on_change: Option<OnChange>,
}

impl fmt::Debug for ParamSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParamSpec")
            .field("field_name", &self.field_name)
            .field("name", &self.name)
            .field("choices", &self.choices)
            .field("on_change", &self.on_change.is_some())
            .finish_non_exhaustive()
    }
}

/// A labelled chooser for one field.
#[derive(Debug)]
pub struct ParamLine {
    pub spec: ParamSpec,
    pub chooser: Chooser,
}

pub struct ParamGui {
    target: ParamTarget,
    specs: Vec<ParamSpec>,
    lines: Vec<ParamLine>,
}

impl ParamGui {
    pub fn new(target: ParamTarget) -> Self {
        Self {
            target,
            specs: Vec::new(),
            lines: Vec::new(),
        }
    }

    pub fn target(&self) -> &ParamTarget {
        &self.target
    }

    /// Record a spec for `field_name`. Each item is stamped with the field.
    pub fn make_param_spec(
        &mut self,
        field_name: &str,
        choices: impl IntoIterator<Item = ChoiceItem>,
        opts: ParamOpts,
    ) -> &ParamSpec {
        let choices = choices
            .into_iter()
            .map(|item| item.for_field(field_name))
            .collect();
        let spec = ParamSpec {
            field_name: field_name.to_string(),
            name: opts.name.unwrap_or_else(|| field_name.to_string()),
            choices,
            target: opts.target,
            on_change: opts.on_change,
        };
        self.specs.push(spec);
        &self.specs[self.specs.len() - 1]
    }

    pub fn spec(&self, field_name: &str) -> Option<&ParamSpec> {
        self.specs.iter().find(|s| s.field_name == field_name)
    }

    pub fn specs(&self) -> &[ParamSpec] {
        &self.specs
    }

    /// Build a line for every recorded spec that has none yet.
    pub fn make_lines(&mut self) {
        let pending: Vec<ParamSpec> = self
            .specs
            .iter()
            .filter(|s| self.find_line(&s.field_name).is_none())
            .cloned()
            .collect();
        for spec in pending {
            self.add_line(spec);
        }
    }

    /// Add a chooser line for `spec` and select the target's current value.
    pub fn add_line(&mut self, spec: ParamSpec) -> &ParamLine {
        let target = spec.target.clone().unwrap_or_else(|| Rc::clone(&self.target));
        let current = target.try_borrow().ok().and_then(|t| t.get(&spec.field_name));

        let mut chooser = Chooser::new(spec.choices.clone());
        match spec.on_change.clone() {
            Some(on_change) => chooser.on_item_changed(move |item| on_change(item)),
            None => chooser.on_item_changed(move |item| assign(&target, item)),
        }
        if let Some(value) = current {
            if chooser.select_value(&value).is_none() {
                debug!(field = %spec.field_name, %value, "current value is not among the choices");
            }
        }

        self.lines.push(ParamLine { spec, chooser });
        &self.lines[self.lines.len() - 1]
    }

    pub fn lines(&self) -> &[ParamLine] {
        &self.lines
    }

    pub fn find_line(&self, field_name: &str) -> Option<&ParamLine> {
        self.lines.iter().find(|l| l.spec.field_name == field_name)
    }

    /// Select the choice holding `value`, which assigns it (or runs the
    /// line's `on_change`). An invalid value keeps the current selection.
    pub fn select_value(
        &mut self,
        field_name: &str,
        value: &ParamValue,
    ) -> Result<&ChoiceItem, ParamError> {
        let line = self
            .lines
            .iter_mut()
            .find(|l| l.spec.field_name == field_name)
            .ok_or_else(|| ParamError::UnknownField(field_name.to_string()))?;
        line.chooser
            .select_value(value)
            .ok_or_else(|| ParamError::NoSuchChoice {
                field: field_name.to_string(),
                value: value.clone(),
            })
    }

    /// Current value of the field in the line's target.
    pub fn value(&self, field_name: &str) -> Option<ParamValue> {
        let target = self
            .spec(field_name)
            .and_then(|s| s.target.as_ref())
            .unwrap_or(&self.target);
        let target = target.try_borrow().ok()?;
        target.get(field_name)
    }
}

impl fmt::Debug for ParamGui {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParamGui")
            .field("specs", &self.specs)
            .field("lines", &self.lines)
            .finish_non_exhaustive()
    }
}

fn assign(target: &ParamTarget, item: &ChoiceItem) {
    let Some(field) = item.field_name.as_deref() else {
        return;
    };
    match target.try_borrow_mut() {
        Ok(mut target) => {
            if !target.set(field, &item.value) {
                warn!(field, value = %item.value, "target rejected parameter value");
            }
        }
        Err(_) => warn!(field, "parameter target is busy; value not assigned"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Debug, Default)]
    struct Settings {
        speed: i64,
        sound: bool,
        voice: String,
    }

    impl Settable for Settings {
        fn set(&mut self, field: &str, value: &ParamValue) -> bool {
            match (field, value) {
                ("speed", ParamValue::Int(n)) => self.speed = *n,
                ("sound", ParamValue::Bool(b)) => self.sound = *b,
                ("voice", ParamValue::Text(s)) => self.voice = s.clone(),
                _ => return false,
            }
            true
        }

        fn get(&self, field: &str) -> Option<ParamValue> {
            match field {
                "speed" => Some(self.speed.into()),
                "sound" => Some(self.sound.into()),
                "voice" => Some(self.voice.clone().into()),
                _ => None,
            }
        }
    }

    fn panel() -> (Rc<RefCell<Settings>>, ParamGui) {
        let settings = Rc::new(RefCell::new(Settings {
            speed: 2,
            ..Settings::default()
        }));
        let mut gui = ParamGui::new(settings.clone());
        gui.make_param_spec(
            "speed",
            [1_i64, 2, 4].map(ChoiceItem::value),
            ParamOpts::named("Speed"),
        );
        gui.make_param_spec(
            "sound",
            [ChoiceItem::new("on", true), ChoiceItem::new("off", false)],
            ParamOpts::default(),
        );
        gui.make_lines();
        (settings, gui)
    }

    #[test]
    fn test_spec_fields() {
        let (_, gui) = panel();
        let spec = gui.spec("speed").unwrap();
        assert_eq!(spec.name, "Speed");
        assert_eq!(gui.spec("sound").unwrap().name, "sound");
        assert!(spec
            .choices
            .iter()
            .all(|c| c.field_name.as_deref() == Some("speed")));
        assert!(gui.spec("volume").is_none());
    }

    #[test]
    fn test_lines_select_current_value() {
        let (_, gui) = panel();
        let speed = gui.find_line("speed").unwrap();
        assert_eq!(speed.chooser.selected().map(|c| c.text.as_str()), Some("2"));
        let sound = gui.find_line("sound").unwrap();
        assert_eq!(sound.chooser.selected().map(|c| c.text.as_str()), Some("off"));
    }

    #[test]
    fn test_select_value_assigns() {
        let (settings, mut gui) = panel();
        let item = gui.select_value("speed", &ParamValue::Int(4)).unwrap();
        assert_eq!(item.text, "4");
        assert_eq!(settings.borrow().speed, 4);
        assert_eq!(gui.value("speed"), Some(ParamValue::Int(4)));

        gui.select_value("sound", &true.into()).unwrap();
        assert!(settings.borrow().sound);
    }

    #[test]
    fn test_invalid_value_keeps_selection() {
        let (settings, mut gui) = panel();
        assert_eq!(
            gui.select_value("speed", &ParamValue::Int(3)),
            Err(ParamError::NoSuchChoice {
                field: "speed".into(),
                value: ParamValue::Int(3),
            })
        );
        assert_eq!(settings.borrow().speed, 2);
        let line = gui.find_line("speed").unwrap();
        assert_eq!(line.chooser.selected_index(), Some(1));

        assert_eq!(
            gui.select_value("volume", &ParamValue::Int(1)),
            Err(ParamError::UnknownField("volume".into()))
        );
    }

    #[test]
    fn test_on_change_replaces_assignment() {
        let settings = Rc::new(RefCell::new(Settings::default()));
        let calls = Rc::new(Cell::new(0));
        let mut gui = ParamGui::new(settings.clone());
        let seen = Rc::clone(&calls);
        gui.make_param_spec(
            "voice",
            [ChoiceItem::value("alto"), ChoiceItem::value("bass")],
            ParamOpts::default().on_change(move |_| seen.set(seen.get() + 1)),
        );
        gui.make_lines();
        // "" is not a choice, so building the line selects nothing.
        assert_eq!(calls.get(), 0);

        gui.select_value("voice", &"bass".into()).unwrap();
        assert_eq!(calls.get(), 1);
        assert_eq!(settings.borrow().voice, "");
    }

    #[test]
    fn test_spec_target_override() {
        let (settings, mut gui) = panel();
        let other = Rc::new(RefCell::new(Settings::default()));
        gui.make_param_spec(
            "voice",
            [ChoiceItem::value("alto")],
            ParamOpts::default().with_target(other.clone()),
        );
        gui.make_lines();
        assert_eq!(gui.lines().len(), 3);

        gui.select_value("voice", &"alto".into()).unwrap();
        assert_eq!(other.borrow().voice, "alto");
        assert_eq!(settings.borrow().voice, "");
        assert_eq!(gui.value("voice"), Some("alto".into()));
    }
}
