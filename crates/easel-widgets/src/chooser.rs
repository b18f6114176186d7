//! Selection model behind dropdown choosers.

use std::fmt;

/// A value a chooser can assign.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl ParamValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(x) => Some(*x),
            Self::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for ParamValue {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<f64> for ParamValue {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// One entry of a chooser.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceItem {
    pub text: String,
    pub value: ParamValue,
    /// Field the value is assigned to, when the chooser edits a target.
    pub field_name: Option<String>,
}

impl ChoiceItem {
    pub fn new(text: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        Self {
            text: text.into(),
            value: value.into(),
            field_name: None,
        }
    }

    /// An item labelled with its own value.
    pub fn value(value: impl Into<ParamValue>) -> Self {
        let value = value.into();
        Self {
            text: value.to_string(),
            value,
            field_name: None,
        }
    }

    pub fn for_field(mut self, field_name: impl Into<String>) -> Self {
        self.field_name = Some(field_name.into());
        self
    }
}

/// Called with the newly selected item.
pub type ItemChanged = Box<dyn FnMut(&ChoiceItem)>;

/// A list of items with at most one selected.
pub struct Chooser {
    items: Vec<ChoiceItem>,
    selected: Option<usize>,
    on_changed: Option<ItemChanged>,
}

impl Chooser {
    pub fn new(items: Vec<ChoiceItem>) -> Self {
        Self {
            items,
            selected: None,
            on_changed: None,
        }
    }

    pub fn items(&self) -> &[ChoiceItem] {
        &self.items
    }

    /// Set the callback run whenever an item is selected.
    pub fn on_item_changed(&mut self, callback: impl FnMut(&ChoiceItem) + 'static) {
        self.on_changed = Some(Box::new(callback));
    }

    /// Select an item by index and notify. Out of range changes nothing.
    pub fn select(&mut self, index: usize) -> Option<&ChoiceItem> {
        let item = self.items.get(index)?;
        self.selected = Some(index);
        if let Some(callback) = self.on_changed.as_mut() {
            callback(item);
        }
        Some(item)
    }

    /// Select the first item holding `value`.
    pub fn select_value(&mut self, value: &ParamValue) -> Option<&ChoiceItem> {
        let index = self.items.iter().position(|item| &item.value == value)?;
        self.select(index)
    }

    pub fn selected(&self) -> Option<&ChoiceItem> {
        self.items.get(self.selected?)
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }
}

impl fmt::Debug for Chooser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chooser")
            .field("items", &self.items)
            .field("selected", &self.selected)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn sizes() -> Chooser {
        Chooser::new(vec![
            ChoiceItem::new("small", 1_i64),
            ChoiceItem::new("medium", 2_i64),
            ChoiceItem::value(3_i64),
        ])
    }

    #[test]
    fn test_item_text() {
        assert_eq!(ChoiceItem::value(true).text, "true");
        assert_eq!(ChoiceItem::value("red").value, ParamValue::Text("red".into()));
        assert_eq!(ChoiceItem::value(2.5).value.as_float(), Some(2.5));
    }

    #[test]
    fn test_select_notifies() {
        let mut chooser = sizes();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        chooser.on_item_changed(move |item| sink.borrow_mut().push(item.text.clone()));

        assert_eq!(chooser.select(1).map(|i| i.text.as_str()), Some("medium"));
        assert_eq!(chooser.select_value(&ParamValue::Int(3)).unwrap().text, "3");
        assert!(chooser.select(7).is_none());
        assert!(chooser.select_value(&ParamValue::Int(9)).is_none());

        assert_eq!(*seen.borrow(), vec!["medium", "3"]);
        assert_eq!(chooser.selected_index(), Some(2));
    }

    #[test]
    fn test_nothing_selected_initially() {
        assert!(sizes().selected().is_none());
    }
}
