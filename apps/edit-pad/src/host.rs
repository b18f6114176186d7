//! Terminal side of the widget host contract.

use easel_widgets::{ClipboardCallback, Host};
use std::cell::{Cell, RefCell};

/// Tracks redraw requests and serves the last bracketed paste as the
/// clipboard.
///
/// Clipboard reads finish on the next turn of the event loop, like a
/// browser clipboard promise would.
#[derive(Default)]
pub struct TerminalHost {
    dirty: Cell<bool>,
    clipboard: RefCell<String>,
    pending: RefCell<Vec<ClipboardCallback>>,
}

impl TerminalHost {
    pub fn new() -> Self {
        Self {
            dirty: Cell::new(true),
            ..Self::default()
        }
    }

    /// Whether a redraw was requested since the last call.
    pub fn take_dirty(&self) -> bool {
        self.dirty.replace(false)
    }

    pub fn set_clipboard(&self, text: String) {
        *self.clipboard.borrow_mut() = text;
    }

    /// Complete clipboard reads started on earlier turns.
    pub fn pump(&self) {
        let pending = std::mem::take(&mut *self.pending.borrow_mut());
        for done in pending {
            let text = self.clipboard.borrow().clone();
            done(text);
        }
    }
}

impl Host for TerminalHost {
    fn request_repaint(&self) {
        self.dirty.set(true);
    }

    fn read_clipboard(&self, done: ClipboardCallback) {
        self.pending.borrow_mut().push(done);
    }
}
