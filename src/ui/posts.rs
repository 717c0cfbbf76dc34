use crate::api::Post;
use crate::app::{App, Focus};
use crate::util::{single_line, truncate_to_width};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

use super::render::{border_style, highlight_style};

/// Render the posts panel for the selected channel
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let view = app.dashboard.posts();
    let width = area.width.saturating_sub(4) as usize;

    let items: Vec<ListItem> = match view.channel() {
        None => vec![ListItem::new("Select a channel to see its posts")],
        Some(_) if view.is_loading() && view.posts().is_empty() => {
            vec![ListItem::new("Loading posts...")]
        }
        Some(_) if view.posts().is_empty() => {
            vec![ListItem::new("No posts ingested yet. Press [d] or [m] to ingest.")]
        }
        Some(_) => view
            .posts()
            .iter()
            .map(|post| post_item(post, width, false))
            .collect(),
    };

    let title = match view.channel() {
        Some(channel) => {
            let channel = single_line(channel);
            let suffix = if view.is_loading() { " ⟳" } else { "" };
            format!("Posts - r/{}{}", truncate_to_width(&channel, width / 2), suffix)
        }
        None => "Posts".to_string(),
    };

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style(app.focus == Focus::Posts))
                .title(title),
        )
        .highlight_style(highlight_style());

    let selected = (!view.posts().is_empty()).then_some(app.selected_post);
    let mut state = ListState::default().with_selected(selected);
    f.render_stateful_widget(list, area, &mut state);
}

/// Two-line list entry: title, then score line. `with_channel` adds the
/// `r/<channel>` prefix used by search results.
pub(super) fn post_item(post: &Post, width: usize, with_channel: bool) -> ListItem<'static> {
    let title = single_line(&post.title);
    let title = truncate_to_width(&title, width).into_owned();

    let mut meta = String::new();
    if with_channel {
        if let Some(channel) = post.channel.as_deref() {
            meta.push_str(&format!("r/{} • ", single_line(channel)));
        }
    }
    meta.push_str(&format!(
        "{} upvotes • {} comments",
        post.upvotes, post.comment_count
    ));
    let meta = truncate_to_width(&meta, width).into_owned();

    ListItem::new(vec![
        Line::from(Span::styled(
            title,
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(meta, Style::default().fg(Color::DarkGray))),
    ])
}
