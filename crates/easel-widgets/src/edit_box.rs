//! Single-box text editor with Emacs-style keys.

use crate::buffer::{Motion, TextBuffer};
use crate::host::{ClickOutcome, Host, Rect, TextStyle};
use crate::kill_ring::KillRing;
use crate::paint::{paint_lines, CursorMark};

use anyhow::anyhow;
use easel_keybinds::{printable_pattern, ActionCtx, Binding, KeyBinder, KeyError, ScopeId};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect as Area;
use ratatui::widgets::Widget;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tracing::warn;

/// Something key commands can edit: an [`EditBox`] or a widget built on one.
pub trait EditTarget: 'static {
    fn edit_box(&self) -> &EditBox;

    fn edit_box_mut(&mut self) -> &mut EditBox;

    /// Refresh derived display state and ask the host to redraw.
    fn repaint(&mut self);
}

/// A bound command that runs against a shared edit target.
///
/// The binding holds only a weak reference, so dropping the widget leaves
/// a binding that fails harmlessly.
pub(crate) fn command<T: EditTarget>(
    target: &Rc<RefCell<T>>,
    id: &str,
    edit: impl Fn(&mut T, &ActionCtx<'_>) + 'static,
) -> Binding {
    let weak = Rc::downgrade(target);
    Binding::new(id, move |ctx| {
        let target = weak.upgrade().ok_or_else(|| anyhow!("edit target dropped"))?;
        let mut target = target.try_borrow_mut()?;
        edit(&mut *target, ctx);
        target.repaint();
        Ok(false)
    })
}

fn motion<T: EditTarget>(target: &Rc<RefCell<T>>, id: &str, to: Motion) -> Binding {
    command(target, id, move |t, _| t.edit_box_mut().buffer.move_to(to))
}

/// Read the host clipboard and splice it in where point is now.
///
/// Keys typed before the read completes may move point; the text still
/// lands at the position captured here, clamped to the buffer.
pub fn paste_clipboard<T: EditTarget>(target: &Rc<RefCell<T>>) {
    let (host, at) = {
        let t = target.borrow();
        (Rc::clone(&t.edit_box().host), t.edit_box().buffer.point())
    };
    let weak = Rc::downgrade(target);
    host.read_clipboard(Box::new(move |text| {
        let Some(target) = weak.upgrade() else {
            return;
        };
        match target.try_borrow_mut() {
            Ok(mut t) => {
                t.edit_box_mut().buffer.splice(at, 0, &text);
                t.repaint();
            }
            Err(e) => warn!(error = %e, "dropped clipboard paste"),
        };
    }));
}

/// A box that displays and edits text.
pub struct EditBox {
    pub(crate) buffer: TextBuffer,
    style: TextStyle,
    rect: Rect,
    scope: ScopeId,
    kill_ring: KillRing,
    host: Rc<dyn Host>,
    cursor_visible: Rc<Cell<bool>>,
    pub(crate) cursor: CursorMark,
}

impl EditBox {
    /// Create an edit box with its own focus scope and key bindings.
    pub fn new(
        binder: &mut KeyBinder,
        rect: Rect,
        style: TextStyle,
        host: Rc<dyn Host>,
    ) -> Result<Rc<RefCell<Self>>, KeyError> {
        let edit = Rc::new(RefCell::new(Self::unbound(binder.new_scope(), rect, style, host)));
        Self::install(binder, &edit)?;
        Ok(edit)
    }

    /// An edit box with no bindings yet.
    pub(crate) fn unbound(scope: ScopeId, rect: Rect, style: TextStyle, host: Rc<dyn Host>) -> Self {
        Self {
            buffer: TextBuffer::new(),
            style,
            rect,
            scope,
            kill_ring: KillRing::shared(),
            host,
            cursor_visible: Rc::new(Cell::new(false)),
            cursor: CursorMark::default(),
        }
    }

    /// Bind the editing keys in the target's scope and hook its focus callback.
    pub fn install<T: EditTarget>(
        binder: &mut KeyBinder,
        target: &Rc<RefCell<T>>,
    ) -> Result<(), KeyError> {
        let (scope, visible, host) = {
            let t = target.borrow();
            let edit = t.edit_box();
            (edit.scope, Rc::clone(&edit.cursor_visible), Rc::clone(&edit.host))
        };

        binder.set_pattern(
            scope,
            printable_pattern(),
            command(target, "self-insert", |t, ctx| {
                t.edit_box_mut().buffer.insert_before(ctx.text())
            }),
        );
        binder.set_key(
            scope,
            "Space",
            Some(
                command(target, "self-insert", |t, ctx| {
                    t.edit_box_mut().buffer.insert_before(ctx.text())
                })
                .with_arg(' '),
            ),
        )?;
        binder.set_key(
            scope,
            "Enter",
            Some(command(target, "newline", |t, _| {
                t.edit_box_mut().buffer.insert_before("\n")
            })),
        )?;

        let delete_backward = command(target, "delete-backward", |t, _| {
            t.edit_box_mut().buffer.delete_backward();
        });
        let delete_forward = command(target, "delete-forward", |t, _| {
            t.edit_box_mut().buffer.delete_forward();
        });
        binder.set_key(scope, "Backspace", Some(delete_backward))?;
        binder.set_key(scope, "C-d", Some(delete_forward.clone()))?;
        binder.set_key(scope, "Delete", Some(delete_forward))?;

        for (key, id, to) in [
            ("ArrowLeft", "backward-char", Motion::PrevChar),
            ("C-b", "backward-char", Motion::PrevChar),
            ("ArrowRight", "forward-char", Motion::NextChar),
            ("C-f", "forward-char", Motion::NextChar),
            ("C-a", "beginning", Motion::Start),
            ("M-<", "beginning", Motion::Start),
            ("Home", "beginning", Motion::Start),
            ("C-e", "end", Motion::End),
            ("M->", "end", Motion::End),
            ("End", "end", Motion::End),
        ] {
            binder.set_key(scope, key, Some(motion(target, id, to)))?;
        }

        binder.set_key(
            scope,
            "C-k",
            Some(command(target, "kill-to-end", |t, _| {
                let edit = t.edit_box_mut();
                edit.buffer.kill_to_end(&edit.kill_ring, false);
            })),
        )?;
        binder.set_key(
            scope,
            "C-y",
            Some(command(target, "yank", |t, _| {
                let edit = t.edit_box_mut();
                edit.buffer.yank(&edit.kill_ring);
            })),
        )?;
        binder.set_key(scope, "C-l", Some(command(target, "repaint", |_, _| {})))?;

        let weak = Rc::downgrade(target);
        binder.set_key(
            scope,
            "M-v",
            Some(Binding::new("paste", move |_| {
                let target = weak.upgrade().ok_or_else(|| anyhow!("edit target dropped"))?;
                paste_clipboard(&target);
                Ok(false)
            })),
        )?;

        binder.on_focus_change(scope, move |gained| {
            visible.set(gained);
            host.request_repaint();
        });
        Ok(())
    }

    /// Claim keyboard focus for this box.
    ///
    /// The click is consumed so the host does not also start a drag.
    pub fn on_click(&self, binder: &mut KeyBinder) -> ClickOutcome {
        binder.set_focus(self.scope);
        ClickOutcome::Consumed
    }

    /// Give up focus if this box holds it.
    pub fn blur(&self, binder: &mut KeyBinder) {
        if binder.has_focus(self.scope) {
            binder.set_focus(ScopeId::GLOBAL);
        }
    }

    /// Use a different kill ring, typically an isolated one in tests.
    pub fn set_kill_ring(&mut self, ring: KillRing) {
        self.kill_ring = ring;
    }

    pub fn kill_ring(&self) -> &KillRing {
        &self.kill_ring
    }

    pub fn text(&self) -> String {
        self.buffer.text()
    }

    /// Replace the contents, leaving point at the end.
    pub fn set_text(&mut self, text: &str) {
        self.buffer.replace_all(text);
        self.refresh_cursor();
        self.host.request_repaint();
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut TextBuffer {
        &mut self.buffer
    }

    pub fn point(&self) -> usize {
        self.buffer.point()
    }

    pub fn scope(&self) -> ScopeId {
        self.scope
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.rect = rect;
    }

    pub fn style(&self) -> &TextStyle {
        &self.style
    }

    pub fn set_style(&mut self, style: TextStyle) {
        self.style = style;
    }

    pub fn host(&self) -> &Rc<dyn Host> {
        &self.host
    }

    /// Cursor mark position as of the last repaint.
    pub fn cursor(&self) -> CursorMark {
        self.cursor
    }

    /// True while the box holds focus.
    pub fn cursor_visible(&self) -> bool {
        self.cursor_visible.get()
    }

    /// Locate the line and column holding point.
    fn refresh_cursor(&mut self) {
        let point = self.buffer.point();
        let text = self.buffer.text();
        let mut bol = 0;
        for (n, line) in text.split('\n').enumerate() {
            let eol = bol + line.chars().count();
            if point <= eol {
                self.cursor = CursorMark::on_line(n, line, point - bol);
                return;
            }
            bol = eol + 1;
        }
    }

    pub(crate) fn request_repaint(&self) {
        self.host.request_repaint();
    }
}

impl EditTarget for EditBox {
    fn edit_box(&self) -> &EditBox {
        self
    }

    fn edit_box_mut(&mut self) -> &mut EditBox {
        self
    }

    fn repaint(&mut self) {
        self.refresh_cursor();
        self.request_repaint();
    }
}

impl Widget for &EditBox {
    fn render(self, area: Area, buf: &mut Buffer) {
        let text = self.buffer.text();
        let lines: Vec<String> = text.split('\n').map(str::to_string).collect();
        let cursor = self.cursor_visible().then_some(self.cursor);
        paint_lines(area, buf, &lines, cursor, &self.style);
    }
}
