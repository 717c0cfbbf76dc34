//! Render functions for the TUI.

use crate::api::SortBy;
use crate::app::{App, SubscribeDialog};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::{channels, help, posts, search, status};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 60;
pub(super) const MIN_HEIGHT: u16 = 12;

pub(super) fn render(f: &mut Frame, app: &App) {
    let area = f.area();

    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(rows[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(columns[1]);

    channels::render(f, app, columns[0]);
    posts::render(f, app, right[0]);
    search::render(f, app, right[1]);
    status::render(f, app, rows[1]);

    if let Some(ref dialog) = app.subscribe {
        render_subscribe_overlay(f, dialog);
    }

    if app.show_help {
        help::render(f);
    }
}

/// Border style shared by all panels.
pub(super) fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}

pub(super) fn highlight_style() -> Style {
    Style::default().bg(Color::DarkGray).fg(Color::White)
}

pub(super) fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(4));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

fn render_subscribe_overlay(f: &mut Frame, dialog: &SubscribeDialog) {
    let overlay = centered_rect(56, 9, f.area());
    if overlay.width < 20 || overlay.height < 6 {
        return;
    }

    f.render_widget(Clear, overlay);

    let selected = Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let sort_span = |label: &'static str, active: bool| {
        if active {
            Span::styled(format!(" {label} "), selected)
        } else {
            Span::raw(format!(" {label} "))
        }
    };

    let text = vec![
        Line::from("Subreddit name:"),
        Line::from(format!("> r/{}_", dialog.input)),
        Line::from(""),
        Line::from(vec![
            Span::raw("Ingest top posts of the "),
            sort_span("day", dialog.sort_by == SortBy::Day),
            sort_span("month", dialog.sort_by == SortBy::Month),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "(Enter) Subscribe  (Tab) Toggle window  (Esc) Cancel",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let paragraph = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style(true))
            .title(" Subscribe "),
    );

    f.render_widget(paragraph, overlay);
}
