//! What widgets need from the host framework.

/// Completion for an asynchronous clipboard read.
pub type ClipboardCallback = Box<dyn FnOnce(String)>;

/// Services provided by the scene graph hosting the widgets.
pub trait Host {
    /// Ask for the stage to be redrawn.
    fn request_repaint(&self);

    /// Start reading the system clipboard.
    ///
    /// `done` may run immediately or on a later turn of the event loop.
    fn read_clipboard(&self, done: ClipboardCallback);
}

/// A host that ignores repaints and has an empty clipboard.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullHost;

impl Host for NullHost {
    fn request_repaint(&self) {}

    fn read_clipboard(&self, _done: ClipboardCallback) {}
}

/// Bounding rectangle in stage units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.x + self.w && y >= self.y && y < self.y + self.h
    }
}

impl Default for Rect {
    fn default() -> Self {
        Self::new(0.0, 0.0, 100.0, 40.0)
    }
}

/// Colours and font of an edit box.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub bg_color: String,
    pub text_color: String,
    /// Line height in stage units.
    pub font_size: f32,
    pub font_name: String,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            bg_color: "white".to_string(),
            text_color: "black".to_string(),
            font_size: 32.0,
            font_name: "sans-serif".to_string(),
        }
    }
}

/// Whether a widget handled a mouse click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Handled; stop propagation so nothing else (a dragger) sees it.
    Consumed,
    /// Not for this widget.
    Ignored,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains() {
        let rect = Rect::new(10.0, 10.0, 20.0, 5.0);
        assert!(rect.contains(10.0, 10.0));
        assert!(rect.contains(29.9, 14.9));
        assert!(!rect.contains(30.0, 12.0));
        assert!(!rect.contains(9.0, 12.0));
    }
}
