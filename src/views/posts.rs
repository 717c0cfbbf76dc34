use crate::api::{GatewayError, Post};
use crate::notify::{Notice, Notifier};
use std::sync::Arc;

/// Posts of the selected channel.
///
/// Loads are tagged with a generation. Only the newest load may change what is
/// displayed; a slow response for a channel the user already moved away from
/// is dropped on arrival.
#[derive(Debug, Default)]
pub struct PostsView {
    channel: Option<String>,
    posts: Arc<Vec<Post>>,
    loading: bool,
    generation: u64,
}

impl PostsView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Channel of the most recently issued load.
    pub fn channel(&self) -> Option<&str> {
        self.channel.as_deref()
    }

    pub fn posts(&self) -> &Arc<Vec<Post>> {
        &self.posts
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Issue a load for `channel`. Returns the generation its result must carry.
    ///
    /// Re-loading the same channel keeps its posts on screen until the result
    /// arrives. Switching channels drops them, since they belong to another
    /// channel.
    pub fn begin_load(&mut self, channel: &str) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.loading = true;
        if self.channel.as_deref() != Some(channel) {
            self.channel = Some(channel.to_string());
            self.posts = Arc::new(Vec::new());
        }
        self.generation
    }

    /// Apply a completed load. Returns false if the result was superseded.
    ///
    /// Success replaces the displayed posts; failure clears them and emits one
    /// error notice.
    pub fn apply(
        &mut self,
        generation: u64,
        channel: &str,
        result: Result<Vec<Post>, GatewayError>,
        notifier: &mut dyn Notifier,
    ) -> bool {
        if generation != self.generation {
            tracing::debug!(
                expected = self.generation,
                got = generation,
                channel = %channel,
                "Ignoring stale posts (generation mismatch)"
            );
            return false;
        }

        self.loading = false;
        match result {
            Ok(posts) => {
                tracing::debug!(channel = %channel, count = posts.len(), "Posts loaded");
                self.posts = Arc::new(posts);
            }
            Err(e) => {
                tracing::warn!(channel = %channel, error = %e, "Failed to fetch posts");
                self.posts = Arc::new(Vec::new());
                notifier.notify(Notice::error(format!(
                    "Failed to fetch posts from r/{}: {}",
                    channel,
                    e.reason()
                )));
            }
        }
        true
    }

    /// Stop waiting for load `generation` if it is still the newest.
    pub fn abandon(&mut self, generation: u64) -> bool {
        if generation != self.generation {
            return false;
        }
        self.loading = false;
        true
    }

    /// Drop displayed posts and invalidate any load in flight.
    pub fn clear(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.loading = false;
        self.channel = None;
        self.posts = Arc::new(Vec::new());
    }
}
