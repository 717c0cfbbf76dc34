use crate::app::{App, Focus};
use crate::subscriptions::SyncState;
use crate::util::{single_line, truncate_to_width};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

use super::render::{border_style, highlight_style};

/// Render the subscribed channel list panel
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let subscriptions = app.dashboard.subscriptions();
    let channels = app.channels();
    let name_width = area.width.saturating_sub(14) as usize;

    let items: Vec<ListItem> = if channels.is_empty() {
        let placeholder = match subscriptions.state() {
            SyncState::Uninitialized => "Loading subscriptions...",
            _ => "No subscriptions yet. Press [a] to add one.",
        };
        vec![ListItem::new(placeholder)]
    } else {
        channels
            .iter()
            .map(|channel| {
                let name = single_line(&channel.name);
                let name = truncate_to_width(&name, name_width).into_owned();
                ListItem::new(Line::from(vec![
                    Span::raw(format!("r/{name}")),
                    Span::styled(
                        format!("  {}", format_count(channel.subscriber_count)),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]))
            })
            .collect()
    };

    let title = if subscriptions.state() == SyncState::Refreshing {
        format!("Subscriptions ({}) ⟳", channels.len())
    } else {
        format!("Subscriptions ({})", channels.len())
    };

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style(app.focus == Focus::Channels))
                .title(title),
        )
        .highlight_style(highlight_style());

    let mut state = ListState::default().with_selected(subscriptions.selected_index());
    f.render_stateful_widget(list, area, &mut state);
}

/// Compact subscriber count: 950, 12.3k, 4.1M.
fn format_count(count: u64) -> String {
    match count {
        0..=999 => count.to_string(),
        1_000..=999_999 => format!("{:.1}k", count as f64 / 1_000.0),
        _ => format!("{:.1}M", count as f64 / 1_000_000.0),
    }
}
