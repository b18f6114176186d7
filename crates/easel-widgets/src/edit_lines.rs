//! Multi-line edit box that scrolls to keep point in view.

use crate::buffer::Motion;
use crate::edit_box::{command, EditBox, EditTarget};
use crate::host::{ClickOutcome, Host, Rect, TextStyle};
use crate::paint::{paint_lines, CursorMark};

use easel_keybinds::{ActionCtx, KeyBinder, KeyError};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect as Area;
use ratatui::widgets::Widget;
use std::cell::RefCell;
use std::rc::Rc;

pub const LINE_UP: &str = "line-up";
pub const LINE_DOWN: &str = "line-down";
pub const KILL_LINE: &str = "kill-line";

/// An [`EditBox`] showing a window of whole lines.
///
/// After every change the window is moved by whole lines so the line
/// holding point is displayed.
pub struct EditLines {
    base: EditBox,
    lines_visible: usize,
    /// First character displayed; always the start of a line.
    window_start: usize,
    display: Vec<String>,
    /// Column kept across consecutive up/down moves.
    goal_col: usize,
}

impl EditLines {
    pub fn new(
        binder: &mut KeyBinder,
        rect: Rect,
        style: TextStyle,
        host: Rc<dyn Host>,
    ) -> Result<Rc<RefCell<Self>>, KeyError> {
        let lines_visible = lines_for(rect.h, style.font_size);
        let base = EditBox::unbound(binder.new_scope(), rect, style, host);
        let lines = Rc::new(RefCell::new(Self {
            base,
            lines_visible,
            window_start: 0,
            display: Vec::new(),
            goal_col: 0,
        }));
        EditBox::install(binder, &lines)?;
        Self::install(binder, &lines)?;
        lines.borrow_mut().reflow();
        Ok(lines)
    }

    /// Bind the line-oriented keys over the single-box ones.
    fn install(binder: &mut KeyBinder, target: &Rc<RefCell<Self>>) -> Result<(), KeyError> {
        let scope = target.borrow().base.scope();

        binder.set_key(
            scope,
            "Enter",
            Some(command(target, "newline", |t: &mut Self, _| {
                t.base.buffer.insert_before("\n")
            })),
        )?;
        binder.set_key(
            scope,
            "C-a",
            Some(command(target, "line-start", |t: &mut Self, _| {
                t.base.buffer.move_to(Motion::LineStart)
            })),
        )?;
        binder.set_key(
            scope,
            "C-e",
            Some(command(target, "line-end", |t: &mut Self, _| {
                t.base.buffer.move_to(Motion::LineEnd)
            })),
        )?;
        binder.set_key(
            scope,
            "C-o",
            Some(command(target, "open-line", |t: &mut Self, _| t.open_line())),
        )?;
        binder.set_key(
            scope,
            "C-k",
            Some(command(target, KILL_LINE, |t: &mut Self, ctx| {
                t.kill_lines(0, ctx.repeats(KILL_LINE));
            })),
        )?;

        for key in ["ArrowUp", "C-p"] {
            binder.set_key(
                scope,
                key,
                Some(command(target, LINE_UP, |t: &mut Self, ctx| {
                    let col = t.key_col(ctx);
                    t.up_line(col);
                })),
            )?;
        }
        for key in ["ArrowDown", "C-n"] {
            binder.set_key(
                scope,
                key,
                Some(command(target, LINE_DOWN, |t: &mut Self, ctx| {
                    let col = t.key_col(ctx);
                    t.down_line(col);
                })),
            )?;
        }
        Ok(())
    }

    /// Remembered column when repeating an up/down move, else the actual one.
    fn key_col(&self, ctx: &ActionCtx<'_>) -> usize {
        if ctx.repeats(LINE_UP) || ctx.repeats(LINE_DOWN) {
            self.goal_col
        } else {
            self.base.buffer.column()
        }
    }

    fn up_line(&mut self, col: usize) {
        self.goal_col = col;
        let buffer = &mut self.base.buffer;
        let bol0 = buffer.bol(0);
        if bol0 == 0 {
            return;
        }
        let bol1 = buffer.bol(1);
        let target = (bol1 + col).min(bol0 - 1);
        buffer.move_to(Motion::Absolute(target));
    }

    fn down_line(&mut self, col: usize) {
        self.goal_col = col;
        let buffer = &mut self.base.buffer;
        let next_bol = buffer.eol(0) + 1;
        let eol1 = buffer.eol(1);
        buffer.move_to(Motion::Absolute((next_bol + col).min(eol1)));
    }

    /// Move up `n` lines, keeping the current column where lines allow.
    pub fn up_lines(&mut self, n: usize) -> &mut Self {
        let col = self.base.buffer.column();
        for _ in 0..n {
            self.up_line(col);
        }
        self.repaint();
        self
    }

    /// Move down `n` lines, keeping the current column where lines allow.
    pub fn down_lines(&mut self, n: usize) -> &mut Self {
        let col = self.base.buffer.column();
        for _ in 0..n {
            self.down_line(col);
        }
        self.repaint();
        self
    }

    /// Kill from point to the end of the `n`-th following line.
    ///
    /// At least one character goes, so at a line end the newline is killed.
    pub fn kill_lines(&mut self, n: usize, continuation: bool) -> &mut Self {
        let ring = self.base.kill_ring().clone();
        let buffer = &mut self.base.buffer;
        let point = buffer.point();
        let len = buffer.eol(n).saturating_sub(point).max(1);
        buffer.kill_range(point, len, &ring, continuation);
        self.repaint();
        self
    }

    /// Insert a newline after point.
    pub fn open_line(&mut self) {
        let buffer = &mut self.base.buffer;
        let point = buffer.point();
        buffer.insert_before("\n");
        buffer.move_to(Motion::Absolute(point));
    }

    /// Scroll the window so point is displayed, then refill it.
    fn reflow(&mut self) {
        let buffer = &self.base.buffer;
        let point = buffer.point();
        let mut start = buffer.line_start(self.window_start);

        let delta = buffer.count_lines(start, point);
        if delta < 0 {
            start = buffer.bol(0);
        } else if delta as usize >= self.lines_visible {
            let newlines = buffer.newlines_between(start, point);
            start = newlines[newlines.len() - self.lines_visible] + 1;
        }
        self.window_start = start;

        let shown: String = buffer.chars()[start..].iter().collect();
        self.display = shown
            .split('\n')
            .take(self.lines_visible)
            .map(str::to_string)
            .collect();

        let mut bol = start;
        for (n, line) in self.display.iter().enumerate() {
            let eol = bol + line.chars().count();
            if point >= bol && point <= eol {
                self.base.cursor = CursorMark::on_line(n, line, point - bol);
                break;
            }
            bol = eol + 1;
        }
    }

    pub fn on_click(&self, binder: &mut KeyBinder) -> ClickOutcome {
        self.base.on_click(binder)
    }

    pub fn set_text(&mut self, text: &str) {
        self.base.buffer.replace_all(text);
        self.repaint();
    }

    pub fn text(&self) -> String {
        self.base.text()
    }

    /// Move or resize the box; the window is refilled to the new height.
    pub fn set_rect(&mut self, rect: Rect) {
        self.lines_visible = lines_for(rect.h, self.base.style().font_size);
        self.base.set_rect(rect);
        self.reflow();
    }

    pub fn lines_visible(&self) -> usize {
        self.lines_visible
    }

    pub fn window_start(&self) -> usize {
        self.window_start
    }

    /// Lines currently displayed, top first.
    pub fn display_lines(&self) -> &[String] {
        &self.display
    }

    /// Cursor position within the displayed lines.
    pub fn cursor(&self) -> CursorMark {
        self.base.cursor
    }
}

fn lines_for(height: f32, font_size: f32) -> usize {
    if font_size <= 0.0 {
        return 1;
    }
    ((height / font_size).floor() as usize).max(1)
}

impl EditTarget for EditLines {
    fn edit_box(&self) -> &EditBox {
        &self.base
    }

    fn edit_box_mut(&mut self) -> &mut EditBox {
        &mut self.base
    }

    fn repaint(&mut self) {
        self.reflow();
        self.base.request_repaint();
    }
}

impl Widget for &EditLines {
    fn render(self, area: Area, buf: &mut Buffer) {
        let cursor = self.base.cursor_visible().then_some(self.base.cursor);
        paint_lines(area, buf, &self.display, cursor, self.base.style());
    }
}
