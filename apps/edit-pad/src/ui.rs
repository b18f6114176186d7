//! UI rendering for edit pad.

use crate::app::App;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

pub fn draw(f: &mut Frame, app: &mut App) {
    let columns = if app.show_help() {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(f.area())
    } else {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(100)])
            .split(f.area())
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(columns[0]);

    let title_block = box_block(" Title ", app.focus_name() == "title");
    let body_block = box_block(" Text ", app.focus_name() == "body");
    let title_area = title_block.inner(rows[0]);
    let body_area = body_block.inner(rows[1]);
    app.layout(title_area, body_area);

    f.render_widget(title_block, rows[0]);
    f.render_widget(&*app.title.borrow(), title_area);
    f.render_widget(body_block, rows[1]);
    f.render_widget(&*app.body.borrow(), body_area);

    draw_status_bar(f, app, rows[2]);

    if let Some(&help_area) = columns.get(1) {
        draw_help(f, app, help_area);
    }
}

fn box_block(title: &str, focused: bool) -> Block<'_> {
    let border = if focused { Color::Yellow } else { Color::DarkGray };
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(title)
}

fn draw_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let action = app
        .last_action()
        .map(|id| id.to_string())
        .unwrap_or_default();
    let mut spans = vec![
        Span::styled(
            format!(" {} ", app.focus_name()),
            Style::default().fg(Color::Black).bg(Color::Cyan),
        ),
        Span::raw(" "),
        Span::styled(action, Style::default().fg(Color::Gray)),
    ];
    if let Some(message) = &app.message {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            message.clone(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ));
    }
    spans.push(Span::styled(
        format!("  zoom {:.2}x", app.zoom.scale()),
        Style::default().fg(Color::Gray),
    ));
    spans.push(Span::styled(
        "  F1 keys  F2 theme  C-s save  C-q quit",
        Style::default().fg(Color::DarkGray),
    ));
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_help(f: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .key_help()
        .into_iter()
        .map(|(key, action)| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{key:<14}"), Style::default().fg(Color::Cyan)),
                Span::raw(action.to_string()),
            ]))
        })
        .collect();
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Keys "),
    );
    f.render_widget(list, area);
}
