use crate::api::{GatewayError, Post};
use crate::notify::{Notice, Notifier};
use crate::util::MAX_SEARCH_QUERY_LENGTH;
use std::sync::Arc;

/// Cross-channel search results.
///
/// Independent of channel selection. Uses the same last-request-wins rule as
/// [`super::PostsView`].
#[derive(Debug, Default)]
pub struct SearchView {
    query: Option<String>,
    results: Arc<Vec<Post>>,
    loading: bool,
    generation: u64,
}

impl SearchView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Query of the most recently issued search.
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn results(&self) -> &Arc<Vec<Post>> {
        &self.results
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Issue a search. Returns the generation and the trimmed query to send.
    ///
    /// Returns `None` without issuing anything when the query is blank, or when
    /// it is longer than [`MAX_SEARCH_QUERY_LENGTH`] (reported as an error).
    /// Prior results stay as they are in both cases.
    pub fn begin(&mut self, raw: &str, notifier: &mut dyn Notifier) -> Option<(u64, String)> {
        let query = raw.trim();
        if query.is_empty() {
            tracing::debug!("Ignoring blank search query");
            return None;
        }
        let length = query.chars().count();
        if length > MAX_SEARCH_QUERY_LENGTH {
            tracing::warn!(length, "Rejecting over-long search query");
            notifier.notify(Notice::error(format!(
                "Search query too long (max {MAX_SEARCH_QUERY_LENGTH} characters)"
            )));
            return None;
        }
        let query = query.to_string();

        self.generation = self.generation.wrapping_add(1);
        self.loading = true;
        self.query = Some(query.clone());
        Some((self.generation, query))
    }

    /// Apply a completed search. Returns false if the result was superseded.
    pub fn apply(
        &mut self,
        generation: u64,
        query: &str,
        result: Result<Vec<Post>, GatewayError>,
        notifier: &mut dyn Notifier,
    ) -> bool {
        if generation != self.generation {
            tracing::debug!(
                expected = self.generation,
                got = generation,
                query = %query,
                "Ignoring stale search result (generation mismatch)"
            );
            return false;
        }

        self.loading = false;
        match result {
            Ok(posts) => {
                tracing::debug!(query = %query, count = posts.len(), "Search completed");
                self.results = Arc::new(posts);
            }
            Err(e) => {
                tracing::warn!(query = %query, error = %e, "Search failed");
                self.results = Arc::new(Vec::new());
                notifier.notify(Notice::error(format!(
                    "Failed to search posts: {}",
                    e.reason()
                )));
            }
        }
        true
    }

    /// Stop waiting for search `generation` if it is still the newest.
    pub fn abandon(&mut self, generation: u64) -> bool {
        if generation != self.generation {
            return false;
        }
        self.loading = false;
        true
    }
}
