//! User-adjustable pad settings, edited through a parameter panel.

use easel_widgets::{ChoiceItem, ParamGui, ParamOpts, ParamValue, Settable, TextStyle};
use std::cell::RefCell;
use std::rc::Rc;

pub const THEME: &str = "theme";
pub const SHOW_HELP: &str = "show_help";

#[derive(Debug, Clone)]
pub struct PadSettings {
    pub theme: String,
    pub show_help: bool,
}

impl Default for PadSettings {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            show_help: false,
        }
    }
}

impl PadSettings {
    /// Widget style for the current theme, one terminal row per line.
    pub fn text_style(&self) -> TextStyle {
        let (bg, fg) = match self.theme.as_str() {
            "light" => ("white", "black"),
            "solarized" => ("#002b36", "#93a1a1"),
            _ => ("black", "gray"),
        };
        TextStyle {
            bg_color: bg.to_string(),
            text_color: fg.to_string(),
            font_size: 1.0,
            font_name: "monospace".to_string(),
        }
    }
}

impl Settable for PadSettings {
    fn set(&mut self, field: &str, value: &ParamValue) -> bool {
        match (field, value) {
            (THEME, ParamValue::Text(theme)) => self.theme = theme.clone(),
            (SHOW_HELP, ParamValue::Bool(show)) => self.show_help = *show,
            _ => return false,
        }
        true
    }

    fn get(&self, field: &str) -> Option<ParamValue> {
        match field {
            THEME => Some(self.theme.clone().into()),
            SHOW_HELP => Some(self.show_help.into()),
            _ => None,
        }
    }
}

/// The settings panel: one chooser per setting.
pub fn param_gui(settings: Rc<RefCell<PadSettings>>) -> ParamGui {
    let mut gui = ParamGui::new(settings);
    gui.make_param_spec(
        THEME,
        ["dark", "light", "solarized"].map(ChoiceItem::value),
        ParamOpts::named("Theme"),
    );
    gui.make_param_spec(
        SHOW_HELP,
        [ChoiceItem::new("hidden", false), ChoiceItem::new("shown", true)],
        ParamOpts::named("Key help"),
    );
    gui.make_lines();
    gui
}

/// Select the choice after the current one, wrapping around.
pub fn cycle(gui: &mut ParamGui, field: &str) -> anyhow::Result<ParamValue> {
    let line = gui
        .find_line(field)
        .ok_or_else(|| anyhow::anyhow!("no setting named {field}"))?;
    let items = line.chooser.items();
    let next = line
        .chooser
        .selected_index()
        .map_or(0, |i| (i + 1) % items.len());
    let value = items[next].value.clone();
    gui.select_value(field, &value)?;
    Ok(value)
}
