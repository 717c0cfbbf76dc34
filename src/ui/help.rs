//! Help overlay: keybinding table.

use ratatui::{
    layout::Constraint,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Row, Table},
    Frame,
};

use super::render::{border_style, centered_rect};

const SECTIONS: [(&str, &[(&str, &str)]); 4] = [
    (
        "General",
        &[
            ("Tab", "Switch panel"),
            ("j / Down", "Move down"),
            ("k / Up", "Move up"),
            ("PgDn / PgUp", "Move 10 rows"),
            ("r", "Refresh subscriptions"),
            ("?", "Toggle help"),
            ("q / Ctrl+c", "Quit"),
        ],
    ),
    (
        "Subscriptions",
        &[
            ("a", "Subscribe to a subreddit"),
            ("d", "Ingest highlighted (day)"),
            ("m", "Ingest highlighted (month)"),
            ("D", "Ingest all (day)"),
            ("M", "Ingest all (month)"),
            ("Enter", "Focus posts"),
        ],
    ),
    (
        "Posts & Results",
        &[("o / Enter", "Open discussion in browser"), ("Esc", "Back to subscriptions")],
    ),
    (
        "Search",
        &[("/", "Edit query"), ("Enter", "Run search"), ("Esc", "Stop editing")],
    ),
];

/// Render the help overlay on top of the current view.
pub fn render(f: &mut Frame) {
    let overlay = centered_rect(60, 30, f.area());
    if overlay.width < 20 || overlay.height < 6 {
        return;
    }

    f.render_widget(Clear, overlay);

    let mut rows: Vec<Row> = Vec::new();
    for (label, bindings) in SECTIONS {
        if !rows.is_empty() {
            rows.push(Row::new(vec![String::new(), String::new()]));
        }
        rows.push(Row::new(vec![
            Line::from(Span::styled(
                format!("-- {label} --"),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ]));
        for (key, description) in bindings {
            rows.push(Row::new(vec![format!("  {key}"), description.to_string()]));
        }
    }

    let table = Table::new(rows, [Constraint::Length(16), Constraint::Min(10)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style(true))
            .title(" Help (Esc to close) "),
    );

    f.render_widget(table, overlay);
}
