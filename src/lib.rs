//! Terminal dashboard for a subreddit ingestion and search backend.
//!
//! The crate is split into a small set of layers:
//!
//! - [`api`] - typed HTTP gateway to the backend
//! - [`notify`] - fire-and-forget notice sink
//! - [`subscriptions`] - subscribed channel list and selection state machine
//! - [`views`] - per-channel posts and cross-channel search views
//! - [`dashboard`] - composes the above and owns background task plumbing
//! - [`app`] and [`ui`] - terminal front end
//! - [`config`] - TOML configuration with env/CLI overrides

pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod notify;
pub mod subscriptions;
pub mod ui;
pub mod util;
pub mod views;
