use crate::app::{App, Focus};
use crate::notify::NoticeLevel;
use crate::util::{single_line, truncate_to_width};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};
use std::borrow::Cow;

/// Render the status bar
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let (text, style): (Cow<'_, str>, Style) = if let Some(notice) = app.status() {
        let style = match notice.level {
            NoticeLevel::Success => Style::default().bg(Color::Green).fg(Color::Black),
            NoticeLevel::Error => Style::default().bg(Color::Red).fg(Color::White),
        };
        (Cow::Owned(single_line(&notice.message)), style)
    } else {
        let hints = if app.subscribe.is_some() {
            "Type a subreddit | TAB day/month | ENTER subscribe | ESC cancel"
        } else if app.search_editing {
            "Type to search | ENTER search | ESC cancel"
        } else {
            match app.focus {
                Focus::Channels => {
                    "[a]dd [d]ay/[m]onth ingest [D]/[M] ingest all [r]efresh [/]search [?]help [q]uit"
                }
                Focus::Posts | Focus::Search => {
                    "[o]pen [j/k]move [Tab]switch [/]search [?]help [q]uit"
                }
            }
        };
        (
            Cow::Borrowed(hints),
            Style::default().bg(Color::DarkGray).fg(Color::White),
        )
    };

    let text = truncate_to_width(&text, area.width as usize).into_owned();
    f.render_widget(Paragraph::new(text).style(style), area);
}
