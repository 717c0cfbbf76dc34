//! Keyboard input handling.
//!
//! Overlays take input first (help, then the subscribe dialog, then the search
//! box); otherwise keys act on the focused panel.

use crate::api::SortBy;
use crate::app::{App, Focus};
use crate::util::{validate_url_for_open, MAX_CHANNEL_NAME_LENGTH, MAX_SEARCH_QUERY_LENGTH};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyModifiers};

use super::Action;

pub(super) fn handle_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Result<Action> {
    if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
        return Ok(Action::Quit);
    }

    if app.show_help {
        if matches!(code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.show_help = false;
        }
        return Ok(Action::Continue);
    }

    if app.subscribe.is_some() {
        handle_subscribe_input(app, code);
        return Ok(Action::Continue);
    }

    if app.search_editing {
        handle_search_input(app, code);
        return Ok(Action::Continue);
    }

    handle_browse_input(app, code)
}

fn handle_subscribe_input(app: &mut App, code: KeyCode) {
    let Some(dialog) = app.subscribe.as_mut() else {
        return;
    };
    match code {
        KeyCode::Esc => app.subscribe = None,
        KeyCode::Enter => app.submit_subscribe(),
        KeyCode::Tab | KeyCode::BackTab => dialog.sort_by = dialog.sort_by.toggle(),
        KeyCode::Backspace => {
            dialog.input.pop();
        }
        KeyCode::Char(c) if !c.is_control() => {
            if dialog.input.chars().count() < MAX_CHANNEL_NAME_LENGTH {
                dialog.input.push(c);
            }
        }
        _ => {}
    }
}

fn handle_search_input(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Esc => app.search_editing = false,
        KeyCode::Enter => app.submit_search(),
        KeyCode::Backspace => {
            app.search_input.pop();
        }
        KeyCode::Char(c) if !c.is_control() => {
            if app.search_input.chars().count() >= MAX_SEARCH_QUERY_LENGTH {
                app.set_error(format!(
                    "Search query too long (max {MAX_SEARCH_QUERY_LENGTH} characters)"
                ));
            } else {
                app.search_input.push(c);
            }
        }
        _ => {}
    }
}

fn handle_browse_input(app: &mut App, code: KeyCode) -> Result<Action> {
    match code {
        KeyCode::Char('q') => return Ok(Action::Quit),
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Tab => app.focus = app.focus.next(),
        KeyCode::Down | KeyCode::Char('j') => app.move_cursor(1),
        KeyCode::Up | KeyCode::Char('k') => app.move_cursor(-1),
        KeyCode::PageDown => app.move_cursor(10),
        KeyCode::PageUp => app.move_cursor(-10),
        KeyCode::Char('a') => app.open_subscribe_dialog(),
        KeyCode::Char('/') => {
            app.search_editing = true;
            app.focus = Focus::Search;
        }
        KeyCode::Char('r') => app.refresh(),
        KeyCode::Char('d') => ingest_highlighted(app, SortBy::Day),
        KeyCode::Char('m') => ingest_highlighted(app, SortBy::Month),
        KeyCode::Char('D') => app.dashboard.trigger_ingest_all(SortBy::Day),
        KeyCode::Char('M') => app.dashboard.trigger_ingest_all(SortBy::Month),
        KeyCode::Enter if app.focus == Focus::Channels => {
            if app.selected_channel().is_some() {
                app.focus = Focus::Posts;
            }
        }
        KeyCode::Enter | KeyCode::Char('o') => open_focused(app),
        KeyCode::Esc if app.focus != Focus::Channels => app.focus = Focus::Channels,
        _ => {}
    }
    Ok(Action::Continue)
}

fn ingest_highlighted(app: &mut App, sort_by: SortBy) {
    match app.selected_channel().map(|c| c.name.clone()) {
        Some(name) => app.dashboard.trigger_ingest(&name, sort_by),
        None => app.set_error("No channel selected"),
    }
}

fn open_focused(app: &mut App) {
    let Some(url) = app.focused_post().map(|p| p.discussion_url.clone()) else {
        return;
    };
    match validate_url_for_open(&url) {
        Err(e) => app.set_error(e.to_string()),
        Ok(url) => {
            if let Err(e) = open::that(url.as_str()) {
                tracing::warn!(url = %url, error = %e, "Failed to open browser");
                app.set_error(format!("Failed to open browser: {e}"));
            }
        }
    }
}
