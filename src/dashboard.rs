//! Dashboard controller: issues gateway calls and applies their results.
//!
//! Every network call runs in a spawned task that reports back with a
//! [`DashEvent`] over an `mpsc` channel. The owner of the receiving end (the
//! terminal event loop, or a test) passes each event to
//! [`Dashboard::handle_event`]; that is the only place state changes, so all
//! mutation happens on one logical writer regardless of completion order.

use crate::api::{Channel, Gateway, GatewayError, Post, SortBy};
use crate::notify::{Notice, Notifier, StatusLine};
use crate::subscriptions::{ListComparison, ListOutcome, Subscriptions};
use crate::util::catch_task_panic;
use crate::views::{PostsView, SearchView};
use std::fmt;
use std::future::Future;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Completion events from background gateway tasks.
#[derive(Debug)]
pub enum DashEvent {
    ChannelsLoaded {
        generation: u64,
        result: Result<Vec<Channel>, GatewayError>,
    },
    Subscribed {
        requested: String,
        result: Result<Channel, GatewayError>,
    },
    IngestAccepted {
        channel: String,
        sort_by: SortBy,
        result: Result<Channel, GatewayError>,
    },
    IngestAllAccepted {
        sort_by: SortBy,
        result: Result<(), GatewayError>,
    },
    PostsLoaded {
        generation: u64,
        channel: String,
        result: Result<Vec<Post>, GatewayError>,
    },
    SearchCompleted {
        generation: u64,
        query: String,
        result: Result<Vec<Post>, GatewayError>,
    },
    /// A background task panicked; carries the panic message.
    TaskPanicked { task: TaskKind, error: String },
}

/// Identifies a background task. Loads that are generation-checked carry the
/// generation they were issued with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    ChannelList { generation: u64 },
    Subscribe,
    Ingest,
    IngestAll,
    Posts { generation: u64 },
    Search { generation: u64 },
}

impl TaskKind {
    pub fn name(self) -> &'static str {
        match self {
            TaskKind::ChannelList { .. } => "list_channels",
            TaskKind::Subscribe => "subscribe",
            TaskKind::Ingest => "ingest",
            TaskKind::IngestAll => "ingest_all",
            TaskKind::Posts { .. } => "fetch_posts",
            TaskKind::Search { .. } => "search",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub struct Dashboard<N: Notifier = StatusLine> {
    gateway: Gateway,
    events: mpsc::Sender<DashEvent>,
    subscriptions: Subscriptions,
    posts: PostsView,
    search: SearchView,
    notifier: N,
    list_handle: Option<JoinHandle<()>>,
    posts_handle: Option<JoinHandle<()>>,
    search_handle: Option<JoinHandle<()>>,
}

impl<N: Notifier> Dashboard<N> {
    pub fn new(
        gateway: Gateway,
        events: mpsc::Sender<DashEvent>,
        comparison: ListComparison,
        notifier: N,
    ) -> Self {
        Self {
            gateway,
            events,
            subscriptions: Subscriptions::new(comparison),
            posts: PostsView::new(),
            search: SearchView::new(),
            notifier,
            list_handle: None,
            posts_handle: None,
            search_handle: None,
        }
    }

    pub fn subscriptions(&self) -> &Subscriptions {
        &self.subscriptions
    }

    pub fn posts(&self) -> &PostsView {
        &self.posts
    }

    pub fn search_view(&self) -> &SearchView {
        &self.search
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    /// Initial list fetch.
    pub fn activate(&mut self) {
        tracing::info!(base_url = %self.gateway.base_url(), "Activating dashboard");
        self.refresh_channels();
    }

    /// Re-validate the held list against the server.
    pub fn refresh_channels(&mut self) {
        if let Some(handle) = self.list_handle.take() {
            handle.abort();
            tracing::debug!("Aborted previous channel list task");
        }
        let generation = self.subscriptions.begin_refresh();
        let gateway = self.gateway.clone();
        tracing::debug!(generation, "Spawning channel list task");
        self.list_handle = Some(self.spawn(TaskKind::ChannelList { generation }, async move {
            DashEvent::ChannelsLoaded {
                generation,
                result: gateway.list_channels().await,
            }
        }));
    }

    /// Subscribe to `name` and start its ingestion. Blank names are ignored.
    ///
    /// Returns true if a request was issued.
    pub fn subscribe(&mut self, name: &str, sort_by: SortBy) -> bool {
        let name = name.trim();
        if name.is_empty() {
            tracing::debug!("Ignoring subscribe with blank name");
            return false;
        }
        let requested = name.to_string();
        let gateway = self.gateway.clone();
        tracing::info!(channel = %requested, %sort_by, "Subscribing");
        self.spawn(TaskKind::Subscribe, async move {
            let result = gateway.subscribe_and_ingest(&requested, sort_by).await;
            DashEvent::Subscribed { requested, result }
        });
        true
    }

    /// Re-run ingestion for a held channel. Never mutates the list.
    pub fn trigger_ingest(&mut self, name: &str, sort_by: SortBy) {
        let channel = name.to_string();
        let gateway = self.gateway.clone();
        tracing::info!(channel = %channel, %sort_by, "Triggering ingestion");
        self.spawn(TaskKind::Ingest, async move {
            let result = gateway.subscribe_and_ingest(&channel, sort_by).await;
            DashEvent::IngestAccepted {
                channel,
                sort_by,
                result,
            }
        });
    }

    /// Ask the backend to ingest every subscription. Fire-and-forget.
    pub fn trigger_ingest_all(&mut self, sort_by: SortBy) {
        let gateway = self.gateway.clone();
        tracing::info!(%sort_by, "Triggering bulk ingestion");
        self.spawn(TaskKind::IngestAll, async move {
            DashEvent::IngestAllAccepted {
                sort_by,
                result: gateway.ingest_all(sort_by).await,
            }
        });
    }

    /// Select a held channel and load its posts if the selection changed.
    pub fn select_channel(&mut self, name: &str) -> bool {
        let changed = self.subscriptions.select(name);
        if changed {
            self.load_posts(name);
        }
        changed
    }

    /// Move the selection by `delta` rows and load posts if it changed.
    pub fn select_offset(&mut self, delta: isize) -> bool {
        let changed = self.subscriptions.select_offset(delta);
        if changed {
            self.sync_posts_with_selection();
        }
        changed
    }

    /// Load (or reload) posts for `channel`. Supersedes any load in flight.
    pub fn load_posts(&mut self, channel: &str) {
        if let Some(handle) = self.posts_handle.take() {
            handle.abort();
        }
        let generation = self.posts.begin_load(channel);
        let channel = channel.to_string();
        let gateway = self.gateway.clone();
        tracing::debug!(channel = %channel, generation, "Spawning posts task");
        self.posts_handle = Some(self.spawn(TaskKind::Posts { generation }, async move {
            let result = gateway.fetch_posts(&channel).await;
            DashEvent::PostsLoaded {
                generation,
                channel,
                result,
            }
        }));
    }

    /// Search all posts. Blank or over-long queries issue nothing and return false.
    pub fn search(&mut self, raw: &str) -> bool {
        let Some((generation, query)) = self.search.begin(raw, &mut self.notifier) else {
            return false;
        };
        if let Some(handle) = self.search_handle.take() {
            handle.abort();
            tracing::debug!("Aborted previous search task");
        }
        let gateway = self.gateway.clone();
        tracing::debug!(query = %query, generation, "Spawning search task");
        self.search_handle = Some(self.spawn(TaskKind::Search { generation }, async move {
            let result = gateway.search(&query).await;
            DashEvent::SearchCompleted {
                generation,
                query,
                result,
            }
        }));
        true
    }

    /// Apply a completed background task. Returns true if anything visible changed.
    pub fn handle_event(&mut self, event: DashEvent) -> bool {
        match event {
            DashEvent::ChannelsLoaded { generation, result } => {
                let before = self.subscriptions.selected().map(str::to_string);
                let outcome = self
                    .subscriptions
                    .apply_list(generation, result, &mut self.notifier);
                match outcome {
                    ListOutcome::Stale => false,
                    ListOutcome::Unchanged => false,
                    ListOutcome::Failed => true,
                    ListOutcome::Initialized | ListOutcome::Replaced => {
                        if before.as_deref() != self.subscriptions.selected() {
                            self.sync_posts_with_selection();
                        }
                        true
                    }
                }
            }
            DashEvent::Subscribed { requested, result } => {
                let before = self.subscriptions.selected().map(str::to_string);
                let outcome =
                    self.subscriptions
                        .apply_subscribed(&requested, result, &mut self.notifier);
                if outcome.needs_revalidation() {
                    if before.as_deref() != self.subscriptions.selected() {
                        self.sync_posts_with_selection();
                    }
                    self.refresh_channels();
                }
                true
            }
            DashEvent::IngestAccepted {
                channel,
                sort_by,
                result,
            } => {
                self.subscriptions
                    .apply_ingest(&channel, sort_by, result, &mut self.notifier);
                true
            }
            DashEvent::IngestAllAccepted { sort_by, result } => {
                self.subscriptions
                    .apply_ingest_all(sort_by, result, &mut self.notifier);
                true
            }
            DashEvent::PostsLoaded {
                generation,
                channel,
                result,
            } => self
                .posts
                .apply(generation, &channel, result, &mut self.notifier),
            DashEvent::SearchCompleted {
                generation,
                query,
                result,
            } => self
                .search
                .apply(generation, &query, result, &mut self.notifier),
            DashEvent::TaskPanicked { task, error } => {
                tracing::error!(task = task.name(), error = %error, "Background task panicked");
                match task {
                    TaskKind::ChannelList { generation } => {
                        self.subscriptions.abandon_refresh(generation);
                    }
                    TaskKind::Posts { generation } => {
                        self.posts.abandon(generation);
                    }
                    TaskKind::Search { generation } => {
                        self.search.abandon(generation);
                    }
                    TaskKind::Subscribe | TaskKind::Ingest | TaskKind::IngestAll => {}
                }
                self.notifier
                    .notify(Notice::error(format!("Internal error in {task}: {error}")));
                true
            }
        }
    }

    /// Point the posts view at the current selection, or clear it when there is none.
    fn sync_posts_with_selection(&mut self) {
        match self.subscriptions.selected().map(str::to_string) {
            Some(name) => self.load_posts(&name),
            None => {
                if let Some(handle) = self.posts_handle.take() {
                    handle.abort();
                }
                self.posts.clear();
            }
        }
    }

    /// Run `future` on the runtime and deliver its event, converting a panic
    /// into [`DashEvent::TaskPanicked`].
    fn spawn<F>(&self, task: TaskKind, future: F) -> JoinHandle<()>
    where
        F: Future<Output = DashEvent> + Send + 'static,
    {
        let tx = self.events.clone();
        tokio::spawn(async move {
            let event = match catch_task_panic(future).await {
                Ok(event) => event,
                Err(error) => DashEvent::TaskPanicked { task, error },
            };
            if let Err(e) = tx.send(event).await {
                tracing::warn!(
                    task = task.name(),
                    error = %e,
                    "Failed to deliver task result (receiver dropped)"
                );
            }
        })
    }
}

impl<N: Notifier> Drop for Dashboard<N> {
    fn drop(&mut self) {
        for handle in [
            self.list_handle.take(),
            self.posts_handle.take(),
            self.search_handle.take(),
        ]
        .into_iter()
        .flatten()
        {
            handle.abort();
        }
    }
}
