//! Fire-and-forget notice sink.
//!
//! Components report the outcome of user actions through [`Notifier`] and never
//! look at what happens to the notice afterwards. The terminal front end uses
//! [`StatusLine`], which shows the latest notice for a few seconds; tests use
//! the `Vec<Notice>` implementation to record everything.

use std::time::Duration;
use tokio::time::Instant;

/// How long a notice stays in the status bar.
pub const NOTICE_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

/// Sink for transient success/error messages.
pub trait Notifier {
    fn notify(&mut self, notice: Notice);
}

impl Notifier for Vec<Notice> {
    fn notify(&mut self, notice: Notice) {
        self.push(notice);
    }
}

/// Single-slot notice display with expiry.
#[derive(Debug, Default)]
pub struct StatusLine {
    current: Option<(Notice, Instant)>,
}

impl StatusLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&Notice> {
        self.current.as_ref().map(|(notice, _)| notice)
    }

    /// Clear the notice if it is older than [`NOTICE_TTL`].
    /// Returns true if a notice was actually cleared.
    pub fn clear_expired(&mut self) -> bool {
        if let Some((_, shown_at)) = &self.current {
            if shown_at.elapsed() >= NOTICE_TTL {
                self.current = None;
                return true;
            }
        }
        false
    }
}

impl Notifier for StatusLine {
    fn notify(&mut self, notice: Notice) {
        match notice.level {
            NoticeLevel::Success => tracing::info!(message = %notice.message, "Notice"),
            NoticeLevel::Error => tracing::warn!(message = %notice.message, "Error notice"),
        }
        self.current = Some((notice, Instant::now()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time;

    #[tokio::test]
    async fn test_notice_expires_after_ttl() {
        time::pause();
        let mut status = StatusLine::new();
        status.notify(Notice::success("Subscribed to r/rust"));

        time::advance(Duration::from_millis(2900)).await;
        assert!(!status.clear_expired());
        assert!(status.current().is_some());

        time::advance(Duration::from_millis(200)).await;
        assert!(status.clear_expired());
        assert!(status.current().is_none());
    }

    #[tokio::test]
    async fn test_latest_notice_wins() {
        let mut status = StatusLine::new();
        status.notify(Notice::success("first"));
        status.notify(Notice::error("second"));
        let current = status.current().unwrap();
        assert!(current.is_error());
        assert_eq!(current.message, "second");
    }

    #[test]
    fn test_vec_records_all() {
        let mut sink: Vec<Notice> = Vec::new();
        sink.notify(Notice::success("a"));
        sink.notify(Notice::error("b"));
        assert_eq!(sink.len(), 2);
    }
}
