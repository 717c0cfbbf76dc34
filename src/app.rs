//! Terminal front-end state layered over the [`Dashboard`].
//!
//! `App` owns what only the terminal cares about: which panel has focus,
//! cursor positions inside the posts and search tables, the text being typed
//! and the subscribe dialog. Everything fetched from the backend lives in the
//! dashboard.

use crate::api::{Channel, Post, SortBy};
use crate::config::Config;
use crate::dashboard::{DashEvent, Dashboard};
use crate::notify::{Notice, Notifier, StatusLine};
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Channels,
    Posts,
    Search,
}

impl Focus {
    /// Tab order: channels → posts → search → channels.
    pub fn next(self) -> Self {
        match self {
            Focus::Channels => Focus::Posts,
            Focus::Posts => Focus::Search,
            Focus::Search => Focus::Channels,
        }
    }
}

/// Subscribe dialog input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscribeDialog {
    pub input: String,
    pub sort_by: SortBy,
}

pub struct App {
    pub dashboard: Dashboard<StatusLine>,
    pub focus: Focus,
    pub selected_post: usize,
    pub selected_result: usize,
    pub search_input: String,
    /// True while keystrokes go to the search box.
    pub search_editing: bool,
    pub subscribe: Option<SubscribeDialog>,
    pub default_sort: SortBy,
    pub show_help: bool,
    /// Set whenever state changes; the event loop draws only when true.
    pub needs_redraw: bool,
    refresh_interval: Option<Duration>,
    last_refresh: Instant,
}

impl App {
    pub fn new(dashboard: Dashboard<StatusLine>, config: &Config) -> Self {
        Self {
            dashboard,
            focus: Focus::Channels,
            selected_post: 0,
            selected_result: 0,
            search_input: String::new(),
            search_editing: false,
            subscribe: None,
            default_sort: config.default_sort,
            show_help: false,
            needs_redraw: true,
            refresh_interval: config.refresh_interval(),
            last_refresh: Instant::now(),
        }
    }

    /// Fetch the channel list for the first time.
    pub fn start(&mut self) {
        self.dashboard.activate();
        self.last_refresh = Instant::now();
    }

    /// Force a list re-validation (the `r` key).
    pub fn refresh(&mut self) {
        self.dashboard.refresh_channels();
        self.last_refresh = Instant::now();
    }

    /// Periodic re-validation, if enabled and due.
    pub fn refresh_if_due(&mut self) -> bool {
        let Some(interval) = self.refresh_interval else {
            return false;
        };
        if self.last_refresh.elapsed() < interval {
            return false;
        }
        tracing::debug!(interval_secs = interval.as_secs(), "Periodic channel refresh");
        self.refresh();
        true
    }

    /// Apply a background task result and keep cursors inside their tables.
    pub fn handle_dash_event(&mut self, event: DashEvent) {
        let posts_reloaded = matches!(event, DashEvent::PostsLoaded { .. });
        let search_reloaded = matches!(event, DashEvent::SearchCompleted { .. });

        if self.dashboard.handle_event(event) {
            self.needs_redraw = true;
        }
        if posts_reloaded {
            self.selected_post = clamp_cursor(self.selected_post, self.posts().len());
        }
        if search_reloaded {
            self.selected_result = clamp_cursor(self.selected_result, self.results().len());
        }
    }

    pub fn channels(&self) -> &[Channel] {
        self.dashboard.subscriptions().channels()
    }

    pub fn selected_channel(&self) -> Option<&Channel> {
        self.dashboard.subscriptions().selected_channel()
    }

    pub fn posts(&self) -> &[Post] {
        self.dashboard.posts().posts()
    }

    pub fn results(&self) -> &[Post] {
        self.dashboard.search_view().results()
    }

    pub fn selected_post(&self) -> Option<&Post> {
        self.posts().get(self.selected_post)
    }

    pub fn selected_result(&self) -> Option<&Post> {
        self.results().get(self.selected_result)
    }

    /// Move the cursor of the focused panel by `delta` rows.
    pub fn move_cursor(&mut self, delta: isize) {
        match self.focus {
            Focus::Channels => {
                if self.dashboard.select_offset(delta) {
                    self.selected_post = 0;
                }
            }
            Focus::Posts => {
                let len = self.posts().len();
                self.selected_post = offset_cursor(self.selected_post, delta, len);
            }
            Focus::Search => {
                let len = self.results().len();
                self.selected_result = offset_cursor(self.selected_result, delta, len);
            }
        }
    }

    pub fn open_subscribe_dialog(&mut self) {
        self.subscribe = Some(SubscribeDialog {
            input: String::new(),
            sort_by: self.default_sort,
        });
    }

    /// Submit the dialog. The dialog closes immediately whether or not a
    /// request was issued; the outcome arrives later as a notice.
    pub fn submit_subscribe(&mut self) {
        if let Some(dialog) = self.subscribe.take() {
            self.dashboard.subscribe(&dialog.input, dialog.sort_by);
        }
    }

    pub fn submit_search(&mut self) {
        self.search_editing = false;
        if self.dashboard.search(&self.search_input) {
            self.selected_result = 0;
            self.focus = Focus::Search;
        }
    }

    /// Post under the cursor in the focused panel.
    pub fn focused_post(&self) -> Option<&Post> {
        match self.focus {
            Focus::Posts => self.selected_post(),
            Focus::Search => self.selected_result(),
            Focus::Channels => None,
        }
    }

    /// Report a local UI error through the status line.
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.dashboard.notifier_mut().notify(Notice::error(message));
        self.needs_redraw = true;
    }

    pub fn status(&self) -> Option<&Notice> {
        self.dashboard.notifier().current()
    }

    /// Returns true if a notice was cleared and the screen needs redrawing.
    pub fn clear_expired_status(&mut self) -> bool {
        self.dashboard.notifier_mut().clear_expired()
    }

    pub fn is_loading(&self) -> bool {
        self.dashboard.subscriptions().is_loading()
            || self.dashboard.posts().is_loading()
            || self.dashboard.search_view().is_loading()
    }
}

fn offset_cursor(current: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    current.saturating_add_signed(delta).min(len - 1)
}

fn clamp_cursor(current: usize, len: usize) -> usize {
    current.min(len.saturating_sub(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Gateway;
    use crate::subscriptions::ListComparison;
    use tokio::sync::mpsc;

    fn app() -> (App, mpsc::Receiver<DashEvent>) {
        let gateway = Gateway::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        let (tx, rx) = mpsc::channel(8);
        let dashboard = Dashboard::new(gateway, tx, ListComparison::Names, StatusLine::new());
        (App::new(dashboard, &Config::default()), rx)
    }

    #[test]
    fn test_offset_cursor_clamps() {
        assert_eq!(offset_cursor(0, -1, 5), 0);
        assert_eq!(offset_cursor(3, 10, 5), 4);
        assert_eq!(offset_cursor(2, 1, 0), 0);
    }

    #[test]
    fn test_focus_cycles() {
        assert_eq!(Focus::Channels.next().next().next(), Focus::Channels);
    }

    #[tokio::test]
    async fn test_subscribe_dialog_uses_default_sort_and_closes_on_blank_submit() {
        let (mut app, _rx) = app();
        app.default_sort = SortBy::Month;
        app.open_subscribe_dialog();
        assert_eq!(app.subscribe.as_ref().map(|d| d.sort_by), Some(SortBy::Month));

        app.submit_subscribe();
        assert!(app.subscribe.is_none());
    }

    #[tokio::test]
    async fn test_blank_search_keeps_focus() {
        let (mut app, _rx) = app();
        app.search_input = "   ".to_string();
        app.search_editing = true;
        app.submit_search();
        assert!(!app.search_editing);
        assert_eq!(app.focus, Focus::Channels);
        assert!(!app.dashboard.search_view().is_loading());
    }

    #[tokio::test]
    async fn test_refresh_disabled_by_default() {
        let (mut app, _rx) = app();
        assert!(!app.refresh_if_due());
    }
}
