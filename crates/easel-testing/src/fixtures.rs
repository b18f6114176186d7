//! Deterministic fixtures for widget tests.

use easel_widgets::{ClipboardCallback, Host, Rect, TextStyle};
use std::cell::{Cell, RefCell};
use std::fmt;

/// A [`Host`] that counts repaints and serves a scripted clipboard.
///
/// Clipboard reads complete immediately unless the host is
/// [`deferred`](RecordingHost::deferred); deferred reads wait for
/// [`complete_pending`](RecordingHost::complete_pending), which models a
/// completion arriving on a later turn of the event loop.
#[derive(Default)]
pub struct RecordingHost {
    repaints: Cell<usize>,
    clipboard: RefCell<String>,
    deferred: bool,
    pending: RefCell<Vec<ClipboardCallback>>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_clipboard(text: &str) -> Self {
        let host = Self::new();
        host.set_clipboard(text);
        host
    }

    /// Hold clipboard reads until `complete_pending`.
    pub fn deferred(mut self) -> Self {
        self.deferred = true;
        self
    }

    pub fn set_clipboard(&self, text: &str) {
        *self.clipboard.borrow_mut() = text.to_string();
    }

    pub fn repaints(&self) -> usize {
        self.repaints.get()
    }

    pub fn reset_repaints(&self) {
        self.repaints.set(0);
    }

    pub fn pending_reads(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Deliver the current clipboard to every waiting read. Returns how
    /// many completed.
    pub fn complete_pending(&self) -> usize {
        let pending = std::mem::take(&mut *self.pending.borrow_mut());
        let count = pending.len();
        for done in pending {
            let text = self.clipboard.borrow().clone();
            done(text);
        }
        count
    }
}

impl Host for RecordingHost {
    fn request_repaint(&self) {
        self.repaints.set(self.repaints.get() + 1);
    }

    fn read_clipboard(&self, done: ClipboardCallback) {
        if self.deferred {
            self.pending.borrow_mut().push(done);
        } else {
            let text = self.clipboard.borrow().clone();
            done(text);
        }
    }
}

impl fmt::Debug for RecordingHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordingHost")
            .field("repaints", &self.repaints.get())
            .field("clipboard", &self.clipboard.borrow())
            .field("deferred", &self.deferred)
            .field("pending", &self.pending_reads())
            .finish()
    }
}

/// Collection of deterministic test fixtures.
pub struct Fixtures;

impl Fixtures {
    /// Style with a 10-unit line height, so heights map to line counts.
    pub fn style() -> TextStyle {
        TextStyle {
            font_size: 10.0,
            ..TextStyle::default()
        }
    }

    /// Bounds that fit `lines` lines of [`Fixtures::style`].
    pub fn rect_for_lines(lines: usize) -> Rect {
        Rect::new(0.0, 0.0, 200.0, lines as f32 * 10.0 + 5.0)
    }

    /// Six short numbered lines.
    pub fn sample_lines() -> String {
        ["one", "two", "three", "four", "five", "six"].join("\n")
    }

    /// Lines of differing lengths for goal-column tests.
    pub fn ragged_lines() -> String {
        ["abcdef", "ab", "", "abcdefgh"].join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn test_immediate_clipboard() {
        let host = RecordingHost::with_clipboard("hello");
        let got = Rc::new(RefCell::new(String::new()));
        let sink = Rc::clone(&got);
        host.read_clipboard(Box::new(move |text| *sink.borrow_mut() = text));
        assert_eq!(*got.borrow(), "hello");
        assert_eq!(host.pending_reads(), 0);
    }

    #[test]
    fn test_deferred_clipboard() {
        let host = RecordingHost::with_clipboard("a").deferred();
        let got = Rc::new(RefCell::new(Vec::new()));
        for _ in 0..2 {
            let sink = Rc::clone(&got);
            host.read_clipboard(Box::new(move |text| sink.borrow_mut().push(text)));
        }
        assert!(got.borrow().is_empty());
        host.set_clipboard("b");
        assert_eq!(host.complete_pending(), 2);
        assert_eq!(*got.borrow(), vec!["b", "b"]);
        assert_eq!(host.complete_pending(), 0);
    }

    #[test]
    fn test_repaint_counter() {
        let host = RecordingHost::new();
        host.request_repaint();
        host.request_repaint();
        assert_eq!(host.repaints(), 2);
        host.reset_repaints();
        assert_eq!(host.repaints(), 0);
    }

    #[test]
    fn test_rect_for_lines() {
        assert_eq!(Fixtures::rect_for_lines(3).h, 35.0);
        assert_eq!(Fixtures::sample_lines().lines().count(), 6);
    }
}
