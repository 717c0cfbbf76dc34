//! Subscribed channel list and selection state machine.
//!
//! [`Subscriptions`] owns the client's copy of the subscribed channel list and
//! the currently selected channel. It performs no I/O itself: the dashboard
//! issues requests and feeds completed results back through the `apply_*`
//! methods, which is where every state transition happens.
//!
//! # Re-validation
//!
//! The list is re-fetched after every local mutation. Each re-fetch carries a
//! generation number; any mutation or newer re-fetch invalidates responses that
//! were already in flight, so a list fetched before a subscribe landed can never
//! drop the freshly appended channel.
//!
//! A re-fetched list only replaces the held list when it differs under the
//! configured [`ListComparison`]. An unchanged result is a no-op: no redraw and
//! no selection change.

use crate::api::{Channel, GatewayError, SortBy};
use crate::notify::{Notice, Notifier};
use serde::Deserialize;
use std::collections::HashSet;
use std::sync::Arc;

/// How a re-fetched list is compared against the held list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListComparison {
    /// Same set of channel names means unchanged.
    #[default]
    Names,
    /// Same length means unchanged. Misses same-size membership changes;
    /// kept for parity with the web dashboard this client replaces.
    Length,
}

impl ListComparison {
    pub fn unchanged(self, held: &[Channel], fetched: &[Channel]) -> bool {
        match self {
            ListComparison::Length => held.len() == fetched.len(),
            ListComparison::Names => {
                if held.len() != fetched.len() {
                    return false;
                }
                let held_names: HashSet<&str> = held.iter().map(|c| c.name.as_str()).collect();
                fetched.iter().all(|c| held_names.contains(c.name.as_str()))
            }
        }
    }
}

/// Lifecycle of the held list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// No list has been received yet.
    Uninitialized,
    /// A list is held and no re-fetch is outstanding.
    Loaded,
    /// A list is held and a re-fetch is outstanding.
    Refreshing,
}

/// Result of applying a list response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListOutcome {
    /// First list received.
    Initialized,
    /// Held list replaced by a changed server list.
    Replaced,
    /// Server list matched the held list; nothing changed.
    Unchanged,
    /// Response belonged to a superseded request and was discarded.
    Stale,
    /// Request failed; held list kept.
    Failed,
}

/// Result of applying a subscribe response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscribeOutcome {
    /// New channel appended to the list.
    Appended,
    /// Channel was already held; its subscriber count was refreshed.
    AlreadySubscribed,
    /// Request failed; list unchanged.
    Failed,
}

impl SubscribeOutcome {
    /// Whether the list must be re-validated against the server.
    pub fn needs_revalidation(self) -> bool {
        !matches!(self, SubscribeOutcome::Failed)
    }
}

#[derive(Debug)]
pub struct Subscriptions {
    /// Held list; also the previous-value cache re-fetches are compared against.
    channels: Arc<Vec<Channel>>,
    selected: Option<String>,
    state: SyncState,
    comparison: ListComparison,
    /// Generation of the newest list request whose response may be applied.
    list_generation: u64,
    list_in_flight: bool,
}

impl Default for Subscriptions {
    fn default() -> Self {
        Self::new(ListComparison::default())
    }
}

impl Subscriptions {
    pub fn new(comparison: ListComparison) -> Self {
        Self {
            channels: Arc::new(Vec::new()),
            selected: None,
            state: SyncState::Uninitialized,
            comparison,
            list_generation: 0,
            list_in_flight: false,
        }
    }

    pub fn channels(&self) -> &Arc<Vec<Channel>> {
        &self.channels
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn selected_channel(&self) -> Option<&Channel> {
        let name = self.selected.as_deref()?;
        self.channels.iter().find(|c| c.name == name)
    }

    pub fn selected_index(&self) -> Option<usize> {
        let name = self.selected.as_deref()?;
        self.channels.iter().position(|c| c.name == name)
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    pub fn comparison(&self) -> ListComparison {
        self.comparison
    }

    pub fn is_loading(&self) -> bool {
        self.list_in_flight
    }

    pub fn contains(&self, name: &str) -> bool {
        self.channels.iter().any(|c| c.name == name)
    }

    /// Start a list re-fetch. Returns the generation the response must carry.
    pub fn begin_refresh(&mut self) -> u64 {
        self.list_generation = self.list_generation.wrapping_add(1);
        self.list_in_flight = true;
        if self.state == SyncState::Loaded {
            self.state = SyncState::Refreshing;
        }
        self.list_generation
    }

    /// Give up on list request `generation` when it will never report back.
    /// Requests that were already superseded are left alone.
    pub fn abandon_refresh(&mut self, generation: u64) -> bool {
        if generation != self.list_generation || !self.list_in_flight {
            return false;
        }
        self.invalidate_pending_refresh();
        true
    }

    /// Discard whatever list response is currently in flight.
    fn invalidate_pending_refresh(&mut self) {
        if self.list_in_flight {
            self.list_generation = self.list_generation.wrapping_add(1);
            self.list_in_flight = false;
            if self.state == SyncState::Refreshing {
                self.state = SyncState::Loaded;
            }
        }
    }

    /// Apply a completed list request.
    pub fn apply_list(
        &mut self,
        generation: u64,
        result: Result<Vec<Channel>, GatewayError>,
        notifier: &mut dyn Notifier,
    ) -> ListOutcome {
        if generation != self.list_generation {
            tracing::debug!(
                expected = self.list_generation,
                got = generation,
                "Ignoring stale channel list (generation mismatch)"
            );
            return ListOutcome::Stale;
        }

        self.list_in_flight = false;

        let fetched = match result {
            Ok(channels) => dedup_by_name(channels),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load subscriptions");
                if self.state == SyncState::Refreshing {
                    self.state = SyncState::Loaded;
                }
                notifier.notify(Notice::error(format!(
                    "Failed to load subscriptions: {}",
                    e.reason()
                )));
                return ListOutcome::Failed;
            }
        };

        if self.state == SyncState::Uninitialized {
            tracing::info!(count = fetched.len(), "Subscriptions loaded");
            self.channels = Arc::new(fetched);
            self.state = SyncState::Loaded;
            self.ensure_valid_selection();
            return ListOutcome::Initialized;
        }

        self.state = SyncState::Loaded;

        if self.comparison.unchanged(&self.channels, &fetched) {
            tracing::debug!(count = fetched.len(), "Subscriptions unchanged");
            return ListOutcome::Unchanged;
        }

        tracing::info!(
            held = self.channels.len(),
            fetched = fetched.len(),
            "Subscriptions changed on server, replacing"
        );
        self.channels = Arc::new(fetched);
        self.ensure_valid_selection();
        ListOutcome::Replaced
    }

    /// Apply a completed subscribe request.
    ///
    /// On success the server's canonical record is appended (or, if a channel
    /// with that name is already held, its subscriber count is updated in place
    /// so the list never contains duplicates). Any list response still in
    /// flight is invalidated; the caller re-validates when
    /// [`SubscribeOutcome::needs_revalidation`] says so.
    pub fn apply_subscribed(
        &mut self,
        requested: &str,
        result: Result<Channel, GatewayError>,
        notifier: &mut dyn Notifier,
    ) -> SubscribeOutcome {
        let channel = match result {
            Ok(channel) => channel,
            Err(e) => {
                tracing::warn!(channel = %requested, error = %e, "Subscribe failed");
                notifier.notify(Notice::error(format!(
                    "Failed to subscribe to r/{}: {}",
                    requested,
                    e.reason()
                )));
                return SubscribeOutcome::Failed;
            }
        };

        self.invalidate_pending_refresh();
        let was_empty = self.channels.is_empty();
        let channels = Arc::make_mut(&mut self.channels);

        let outcome = if let Some(existing) = channels.iter_mut().find(|c| c.name == channel.name) {
            existing.subscriber_count = channel.subscriber_count;
            SubscribeOutcome::AlreadySubscribed
        } else {
            channels.push(channel.clone());
            SubscribeOutcome::Appended
        };

        if self.state == SyncState::Uninitialized {
            self.state = SyncState::Loaded;
        }
        if was_empty {
            self.selected = Some(channel.name.clone());
        }

        tracing::info!(channel = %channel.name, ?outcome, "Subscribed");
        notifier.notify(Notice::success(format!("Subscribed to r/{}", channel.name)));
        outcome
    }

    /// Report the outcome of a single-channel ingestion. Never touches the list.
    pub fn apply_ingest(
        &self,
        requested: &str,
        sort_by: SortBy,
        result: Result<Channel, GatewayError>,
        notifier: &mut dyn Notifier,
    ) {
        match result {
            Ok(channel) => {
                tracing::info!(channel = %channel.name, %sort_by, "Ingestion accepted");
                notifier.notify(Notice::success(format!(
                    "Ingesting data from r/{} ({})",
                    channel.name, sort_by
                )));
            }
            Err(e) => {
                tracing::warn!(channel = %requested, error = %e, "Ingestion failed");
                notifier.notify(Notice::error(format!(
                    "Failed to ingest r/{}: {}",
                    requested,
                    e.reason()
                )));
            }
        }
    }

    /// Report the outcome of a bulk ingestion. Never touches the list.
    pub fn apply_ingest_all(
        &self,
        sort_by: SortBy,
        result: Result<(), GatewayError>,
        notifier: &mut dyn Notifier,
    ) {
        match result {
            Ok(()) => {
                tracing::info!(%sort_by, "Bulk ingestion accepted");
                notifier.notify(Notice::success(format!(
                    "Ingesting all subscriptions ({sort_by})"
                )));
            }
            Err(e) => {
                tracing::warn!(error = %e, "Bulk ingestion failed");
                notifier.notify(Notice::error(format!(
                    "Failed to ingest all subscriptions: {}",
                    e.reason()
                )));
            }
        }
    }

    /// Select a held channel. Unknown names are ignored.
    ///
    /// Returns true when the selection actually changed.
    pub fn select(&mut self, name: &str) -> bool {
        if !self.contains(name) {
            tracing::debug!(channel = %name, "Ignoring selection of unknown channel");
            return false;
        }
        if self.selected.as_deref() == Some(name) {
            return false;
        }
        self.selected = Some(name.to_string());
        true
    }

    /// Move the selection by `delta` rows, clamped to the list.
    pub fn select_offset(&mut self, delta: isize) -> bool {
        if self.channels.is_empty() {
            return false;
        }
        let current = self.selected_index().unwrap_or(0);
        let last = self.channels.len() - 1;
        let target = current.saturating_add_signed(delta).min(last);
        let name = self.channels[target].name.clone();
        self.select(&name)
    }

    /// Point the selection at a held channel: keep it if still present,
    /// otherwise fall back to the first entry in server order.
    fn ensure_valid_selection(&mut self) {
        let keep = self
            .selected
            .as_deref()
            .is_some_and(|name| self.channels.iter().any(|c| c.name == name));
        if !keep {
            self.selected = self.channels.first().map(|c| c.name.clone());
        }
    }
}

/// Drop repeated names, keeping the first occurrence and server order.
fn dedup_by_name(channels: Vec<Channel>) -> Vec<Channel> {
    let mut seen = HashSet::with_capacity(channels.len());
    let before = channels.len();
    let unique: Vec<Channel> = channels
        .into_iter()
        .filter(|c| seen.insert(c.name.clone()))
        .collect();
    if unique.len() != before {
        tracing::warn!(
            duplicates = before - unique.len(),
            "Backend returned duplicate channel names"
        );
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::Notice;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use std::time::Duration;

    fn ch(name: &str, count: u64) -> Channel {
        Channel {
            name: name.to_string(),
            subscriber_count: count,
        }
    }

    fn loaded(channels: Vec<Channel>) -> Subscriptions {
        let mut subs = Subscriptions::default();
        let generation = subs.begin_refresh();
        let mut sink: Vec<Notice> = Vec::new();
        subs.apply_list(generation, Ok(channels), &mut sink);
        subs
    }

    fn backend_500() -> GatewayError {
        GatewayError::Backend {
            status: 500,
            message: None,
        }
    }

    #[test]
    fn test_initial_state() {
        let subs = Subscriptions::default();
        assert_eq!(subs.state(), SyncState::Uninitialized);
        assert!(subs.selected().is_none());
        assert!(subs.channels().is_empty());
    }

    #[test]
    fn test_first_list_selects_first_entry() {
        let subs = loaded(vec![ch("travel", 10), ch("rust", 5)]);
        assert_eq!(subs.state(), SyncState::Loaded);
        assert_eq!(subs.selected(), Some("travel"));
    }

    #[test]
    fn test_first_list_empty_leaves_selection_unset() {
        let subs = loaded(Vec::new());
        assert_eq!(subs.state(), SyncState::Loaded);
        assert!(subs.selected().is_none());
    }

    #[test]
    fn test_refresh_marks_refreshing() {
        let mut subs = loaded(vec![ch("travel", 10)]);
        subs.begin_refresh();
        assert_eq!(subs.state(), SyncState::Refreshing);
        assert!(subs.is_loading());
    }

    #[test]
    fn test_abandoned_refresh_returns_to_loaded() {
        let mut subs = loaded(vec![ch("travel", 10)]);
        let stale = subs.begin_refresh();
        let current = subs.begin_refresh();

        assert!(!subs.abandon_refresh(stale));
        assert!(subs.is_loading());

        assert!(subs.abandon_refresh(current));
        assert!(!subs.is_loading());
        assert_eq!(subs.state(), SyncState::Loaded);
        assert_eq!(subs.channels().len(), 1);
    }

    #[test]
    fn test_unchanged_refresh_is_noop() {
        let mut subs = loaded(vec![ch("travel", 10), ch("rust", 5)]);
        let before = Arc::clone(subs.channels());
        let generation = subs.begin_refresh();
        let mut sink: Vec<Notice> = Vec::new();
        let outcome = subs.apply_list(
            generation,
            Ok(vec![ch("rust", 7), ch("travel", 11)]),
            &mut sink,
        );
        assert_eq!(outcome, ListOutcome::Unchanged);
        assert!(Arc::ptr_eq(&before, subs.channels()));
        assert_eq!(subs.state(), SyncState::Loaded);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_names_comparison_detects_same_length_change() {
        let mut subs = loaded(vec![ch("travel", 10), ch("rust", 5)]);
        let generation = subs.begin_refresh();
        let outcome = subs.apply_list(
            generation,
            Ok(vec![ch("travel", 10), ch("golang", 1)]),
            &mut Vec::<Notice>::new(),
        );
        assert_eq!(outcome, ListOutcome::Replaced);
        assert!(subs.contains("golang"));
        assert!(!subs.contains("rust"));
    }

    #[test]
    fn test_length_comparison_misses_same_length_change() {
        let mut subs = Subscriptions::new(ListComparison::Length);
        let generation = subs.begin_refresh();
        subs.apply_list(generation, Ok(vec![ch("travel", 10), ch("rust", 5)]), &mut Vec::<Notice>::new());

        let generation = subs.begin_refresh();
        let outcome = subs.apply_list(
            generation,
            Ok(vec![ch("travel", 10), ch("golang", 1)]),
            &mut Vec::<Notice>::new(),
        );
        assert_eq!(outcome, ListOutcome::Unchanged);
        assert!(subs.contains("rust"));
    }

    #[test]
    fn test_replaced_list_keeps_selection_when_present() {
        let mut subs = loaded(vec![ch("travel", 10), ch("rust", 5)]);
        subs.select("rust");
        let generation = subs.begin_refresh();
        subs.apply_list(
            generation,
            Ok(vec![ch("golang", 1), ch("rust", 5), ch("travel", 10)]),
            &mut Vec::<Notice>::new(),
        );
        assert_eq!(subs.selected(), Some("rust"));
    }

    #[test]
    fn test_replaced_list_without_selection_falls_back_to_first() {
        let mut subs = loaded(vec![ch("travel", 10), ch("rust", 5)]);
        subs.select("rust");
        let generation = subs.begin_refresh();
        subs.apply_list(
            generation,
            Ok(vec![ch("golang", 1), ch("travel", 10)]),
            &mut Vec::<Notice>::new(),
        );
        assert_eq!(subs.selected(), Some("golang"));
    }

    #[test]
    fn test_stale_list_ignored() {
        let mut subs = loaded(vec![ch("travel", 10)]);
        let older = subs.begin_refresh();
        let newer = subs.begin_refresh();

        let outcome = subs.apply_list(newer, Ok(vec![ch("travel", 10), ch("rust", 1)]), &mut Vec::<Notice>::new());
        assert_eq!(outcome, ListOutcome::Replaced);

        let outcome = subs.apply_list(older, Ok(vec![ch("travel", 10)]), &mut Vec::<Notice>::new());
        assert_eq!(outcome, ListOutcome::Stale);
        assert_eq!(subs.channels().len(), 2);
    }

    #[test]
    fn test_failed_list_keeps_last_known_good() {
        let mut subs = loaded(vec![ch("travel", 10)]);
        let generation = subs.begin_refresh();
        let mut sink: Vec<Notice> = Vec::new();
        let outcome = subs.apply_list(generation, Err(backend_500()), &mut sink);
        assert_eq!(outcome, ListOutcome::Failed);
        assert_eq!(subs.channels().len(), 1);
        assert_eq!(subs.selected(), Some("travel"));
        assert_eq!(subs.state(), SyncState::Loaded);
        assert_eq!(sink.len(), 1);
        assert!(sink[0].is_error());
    }

    #[test]
    fn test_duplicate_names_from_server_collapsed() {
        let subs = loaded(vec![ch("travel", 10), ch("travel", 11), ch("rust", 1)]);
        assert_eq!(subs.channels().len(), 2);
        assert_eq!(subs.channels()[0].subscriber_count, 10);
    }

    #[test]
    fn test_subscribe_appends_and_notifies() {
        let mut subs = loaded(vec![ch("travel", 10)]);
        let mut sink: Vec<Notice> = Vec::new();
        let outcome = subs.apply_subscribed("golang", Ok(ch("golang", 5000)), &mut sink);

        assert_eq!(outcome, SubscribeOutcome::Appended);
        assert!(outcome.needs_revalidation());
        assert_eq!(
            subs.channels().as_slice(),
            &[ch("travel", 10), ch("golang", 5000)]
        );
        assert_eq!(subs.selected(), Some("travel"));
        assert_eq!(sink, vec![Notice::success("Subscribed to r/golang")]);
    }

    #[test]
    fn test_subscribe_into_empty_list_selects_new_channel() {
        let mut subs = loaded(Vec::new());
        subs.apply_subscribed("golang", Ok(ch("golang", 5000)), &mut Vec::<Notice>::new());
        assert_eq!(subs.selected(), Some("golang"));
    }

    #[test]
    fn test_subscribe_before_first_list_initializes() {
        let mut subs = Subscriptions::default();
        subs.apply_subscribed("golang", Ok(ch("golang", 5000)), &mut Vec::<Notice>::new());
        assert_eq!(subs.state(), SyncState::Loaded);
        assert_eq!(subs.selected(), Some("golang"));
    }

    #[test]
    fn test_subscribe_uses_canonical_server_name() {
        let mut subs = loaded(Vec::new());
        subs.apply_subscribed("GoLang", Ok(ch("golang", 5000)), &mut Vec::<Notice>::new());
        assert!(subs.contains("golang"));
        assert!(!subs.contains("GoLang"));
    }

    #[test]
    fn test_subscribe_existing_channel_does_not_duplicate() {
        let mut subs = loaded(vec![ch("golang", 4000)]);
        let outcome = subs.apply_subscribed("golang", Ok(ch("golang", 5000)), &mut Vec::<Notice>::new());
        assert_eq!(outcome, SubscribeOutcome::AlreadySubscribed);
        assert_eq!(subs.channels().as_slice(), &[ch("golang", 5000)]);
    }

    #[test]
    fn test_subscribe_failure_leaves_list_and_emits_one_error() {
        let mut subs = loaded(vec![ch("travel", 10)]);
        let mut sink: Vec<Notice> = Vec::new();
        let outcome = subs.apply_subscribed("golang", Err(backend_500()), &mut sink);

        assert_eq!(outcome, SubscribeOutcome::Failed);
        assert!(!outcome.needs_revalidation());
        assert_eq!(subs.channels().as_slice(), &[ch("travel", 10)]);
        assert_eq!(sink.len(), 1);
        assert!(sink[0].is_error());
        assert!(sink[0].message.contains("r/golang"));
    }

    #[test]
    fn test_subscribe_invalidates_inflight_list() {
        let mut subs = loaded(vec![ch("travel", 10)]);
        let generation = subs.begin_refresh();
        subs.apply_subscribed("golang", Ok(ch("golang", 5000)), &mut Vec::<Notice>::new());

        // The list fetched before the subscribe landed lacks golang
        let outcome = subs.apply_list(generation, Ok(vec![ch("travel", 10)]), &mut Vec::<Notice>::new());
        assert_eq!(outcome, ListOutcome::Stale);
        assert!(subs.contains("golang"));
        assert!(!subs.is_loading());
    }

    #[test]
    fn test_revalidation_after_subscribe_is_noop() {
        let mut subs = loaded(vec![ch("travel", 10)]);
        subs.apply_subscribed("golang", Ok(ch("golang", 5000)), &mut Vec::<Notice>::new());
        let generation = subs.begin_refresh();
        let outcome = subs.apply_list(
            generation,
            Ok(vec![ch("travel", 10), ch("golang", 5000)]),
            &mut Vec::<Notice>::new(),
        );
        assert_eq!(outcome, ListOutcome::Unchanged);
    }

    #[test]
    fn test_ingest_reports_without_mutating() {
        let subs = loaded(vec![ch("travel", 10)]);
        let mut sink: Vec<Notice> = Vec::new();
        subs.apply_ingest("travel", SortBy::Month, Ok(ch("travel", 12)), &mut sink);
        subs.apply_ingest("travel", SortBy::Day, Err(backend_500()), &mut sink);
        subs.apply_ingest_all(SortBy::Day, Ok(()), &mut sink);
        subs.apply_ingest_all(
            SortBy::Day,
            Err(GatewayError::Timeout(Duration::from_secs(20))),
            &mut sink,
        );

        assert_eq!(subs.channels().as_slice(), &[ch("travel", 10)]);
        let levels: Vec<bool> = sink.iter().map(Notice::is_error).collect();
        assert_eq!(levels, vec![false, true, false, true]);
        assert_eq!(sink[0].message, "Ingesting data from r/travel (month)");
    }

    #[test]
    fn test_select_unknown_is_noop() {
        let mut subs = loaded(vec![ch("travel", 10)]);
        assert!(!subs.select("nope"));
        assert_eq!(subs.selected(), Some("travel"));
    }

    #[test]
    fn test_select_offset_clamps() {
        let mut subs = loaded(vec![ch("a", 1), ch("b", 1), ch("c", 1)]);
        assert!(subs.select_offset(1));
        assert_eq!(subs.selected(), Some("b"));
        assert!(subs.select_offset(10));
        assert_eq!(subs.selected(), Some("c"));
        assert!(!subs.select_offset(1));
        assert!(subs.select_offset(-5));
        assert_eq!(subs.selected(), Some("a"));
    }

    #[derive(Debug, Clone)]
    enum Op {
        Subscribe(u8),
        SubscribeFail(u8),
        Select(u8),
        Refresh(Vec<u8>),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0u8..12).prop_map(Op::Subscribe),
            (0u8..12).prop_map(Op::SubscribeFail),
            (0u8..12).prop_map(Op::Select),
            proptest::collection::vec(0u8..12, 0..6).prop_map(Op::Refresh),
        ]
    }

    proptest! {
        #[test]
        fn prop_selection_always_member_and_no_duplicates(
            initial in proptest::collection::vec(0u8..12, 0..6),
            ops in proptest::collection::vec(op_strategy(), 0..40),
        ) {
            let initial: Vec<Channel> = initial.iter().map(|n| ch(&format!("c{n}"), 1)).collect();
            let mut subs = loaded(initial);

            for op in ops {
                let was_empty = subs.channels().is_empty();
                let len_before = subs.channels().len();
                let mut sink: Vec<Notice> = Vec::new();
                match op {
                    Op::Subscribe(n) => {
                        let name = format!("c{n}");
                        let already = subs.contains(&name);
                        subs.apply_subscribed(&name, Ok(ch(&name, 2)), &mut sink);
                        let expected = if already { len_before } else { len_before + 1 };
                        prop_assert_eq!(subs.channels().len(), expected);
                        if was_empty {
                            prop_assert_eq!(subs.selected(), Some(name.as_str()));
                        }
                    }
                    Op::SubscribeFail(n) => {
                        let before = subs.channels().clone();
                        let timeout = GatewayError::Timeout(Duration::from_secs(1));
                        subs.apply_subscribed(&format!("c{n}"), Err(timeout), &mut sink);
                        prop_assert_eq!(subs.channels(), &before);
                        prop_assert_eq!(sink.len(), 1);
                    }
                    Op::Select(n) => {
                        subs.select(&format!("c{n}"));
                    }
                    Op::Refresh(names) => {
                        let fetched: Vec<Channel> = names.iter().map(|n| ch(&format!("c{n}"), 1)).collect();
                        let generation = subs.begin_refresh();
                        subs.apply_list(generation, Ok(fetched), &mut sink);
                        if was_empty && !subs.channels().is_empty() {
                            prop_assert_eq!(subs.selected(), Some(subs.channels()[0].name.as_str()));
                        }
                    }
                }

                let names: HashSet<&str> = subs.channels().iter().map(|c| c.name.as_str()).collect();
                prop_assert_eq!(names.len(), subs.channels().len());
                match subs.selected() {
                    Some(sel) => prop_assert!(names.contains(sel)),
                    None => prop_assert!(subs.channels().is_empty()),
                }
            }
        }
    }
}
