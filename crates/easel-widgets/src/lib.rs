//! # easel-widgets
//!
//! Editable text widgets and choosers driven by [`easel_keybinds`].
//!
//! ## Widgets
//!
//! - [`EditBox`] - single text area with Emacs-style editing
//! - [`EditLines`] - multi-line editor with a scrolling window
//! - [`Chooser`] / [`ParamGui`] - pick a value and assign it to a field
//! - [`ScaleModel`] - stepped zoom about a fixed point
//!
//! Widgets render through ratatui's `Widget` trait and talk to their
//! surroundings through [`Host`].

mod buffer;
mod chooser;
mod edit_box;
mod edit_lines;
mod host;
mod kill_ring;
mod paint;
mod param;
mod scale;

pub use buffer::{Motion, TextBuffer};
pub use chooser::{ChoiceItem, Chooser, ItemChanged, ParamValue};
pub use edit_box::{paste_clipboard, EditBox, EditTarget};
pub use edit_lines::{EditLines, KILL_LINE, LINE_DOWN, LINE_UP};
pub use host::{ClickOutcome, ClipboardCallback, Host, NullHost, Rect, TextStyle};
pub use kill_ring::KillRing;
pub use paint::CursorMark;
pub use param::{OnChange, ParamError, ParamGui, ParamLine, ParamOpts, ParamSpec, ParamTarget, Settable};
pub use scale::{Point, ScaleChanged, ScaleError, ScaleModel, ScaleParams, WheelZoom};
