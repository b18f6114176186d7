//! Terminal painting of edit widgets.

use crate::host::TextStyle;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect as Area;
use ratatui::style::{Color, Modifier, Style};
use std::str::FromStr;
use unicode_width::UnicodeWidthStr;

/// Where the cursor mark is drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CursorMark {
    /// Displayed line holding point.
    pub line: usize,
    /// Characters between the start of that line and point.
    pub col: usize,
    /// Display width of those characters.
    pub x: usize,
}

impl CursorMark {
    pub(crate) fn on_line(line: usize, text: &str, col: usize) -> Self {
        let prefix: String = text.chars().take(col).collect();
        Self {
            line,
            col,
            x: prefix.width(),
        }
    }
}

fn color(name: &str) -> Color {
    Color::from_str(name).unwrap_or(Color::Reset)
}

pub(crate) fn paint_lines(
    area: Area,
    buf: &mut Buffer,
    lines: &[String],
    cursor: Option<CursorMark>,
    style: &TextStyle,
) {
    let base = Style::default()
        .fg(color(&style.text_color))
        .bg(color(&style.bg_color));
    buf.set_style(area, base);

    for (row, line) in lines.iter().enumerate().take(area.height as usize) {
        buf.set_stringn(area.x, area.y + row as u16, line, area.width as usize, base);
    }

    let Some(cursor) = cursor else {
        return;
    };
    let (Ok(dx), Ok(dy)) = (u16::try_from(cursor.x), u16::try_from(cursor.line)) else {
        return;
    };
    let (x, y) = (area.x.saturating_add(dx), area.y.saturating_add(dy));
    if x < area.right() && y < area.bottom() {
        if let Some(cell) = buf.cell_mut((x, y)) {
            cell.set_style(base.add_modifier(Modifier::REVERSED));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_width() {
        let mark = CursorMark::on_line(2, "a漢b", 2);
        assert_eq!((mark.line, mark.col, mark.x), (2, 2, 3));
    }

    #[test]
    fn test_paint_clips_and_marks() {
        let area = Area::new(0, 0, 4, 2);
        let mut buf = Buffer::empty(area);
        let lines = vec!["abcdef".to_string(), "xy".to_string(), "zz".to_string()];
        let cursor = CursorMark::on_line(1, "xy", 2);
        paint_lines(area, &mut buf, &lines, Some(cursor), &TextStyle::default());

        assert_eq!(buf[(3, 0)].symbol(), "d");
        assert_eq!(buf[(0, 1)].symbol(), "x");
        assert!(buf[(2, 1)].modifier.contains(Modifier::REVERSED));
        assert!(!buf[(1, 1)].modifier.contains(Modifier::REVERSED));
    }
}
