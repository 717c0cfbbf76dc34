use crate::app::{App, Focus};
use crate::util::truncate_to_width;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use super::posts::post_item;
use super::render::{border_style, highlight_style};

/// Render the search box and its results
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let focused = app.focus == Focus::Search;
    let input_width = chunks[0].width.saturating_sub(4) as usize;
    let input_text = if app.search_editing {
        format!("{}_", app.search_input)
    } else if app.search_input.is_empty() {
        "Press [/] to search all posts".to_string()
    } else {
        app.search_input.clone()
    };
    // Keep the cursor end visible while typing long queries
    let input_text = tail_to_width(&input_text, input_width);

    let input_style = if app.search_editing {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Gray)
    };
    let input = Paragraph::new(input_text).style(input_style).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style(focused && app.search_editing))
            .title("Search"),
    );
    f.render_widget(input, chunks[0]);

    let view = app.dashboard.search_view();
    let width = chunks[1].width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = if view.is_loading() && view.results().is_empty() {
        vec![ListItem::new("Searching...")]
    } else if view.results().is_empty() {
        match view.query() {
            Some(_) => vec![ListItem::new("No matching posts")],
            None => Vec::new(),
        }
    } else {
        view.results()
            .iter()
            .map(|post| post_item(post, width, true))
            .collect()
    };

    let title = match view.query() {
        Some(query) => format!(
            "Results for \"{}\" ({})",
            truncate_to_width(query, width / 2),
            view.results().len()
        ),
        None => "Results".to_string(),
    };

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style(focused && !app.search_editing))
                .title(title),
        )
        .highlight_style(highlight_style());

    let selected = (!view.results().is_empty()).then_some(app.selected_result);
    let mut state = ListState::default().with_selected(selected);
    f.render_stateful_widget(list, chunks[1], &mut state);
}

/// Keep the rightmost characters of `s` that fit in `max_width` columns.
fn tail_to_width(s: &str, max_width: usize) -> String {
    let mut width = 0;
    let mut start = s.len();
    for (i, c) in s.char_indices().rev() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if width + w > max_width {
            break;
        }
        width += w;
        start = i;
    }
    s[start..].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tail_to_width() {
        assert_eq!(tail_to_width("hello world_", 6), "world_");
        assert_eq!(tail_to_width("short", 10), "short");
        assert_eq!(tail_to_width("你好世界", 4), "世界");
        assert_eq!(tail_to_width("abc", 0), "");
    }
}
