//! HTTP gateway to the ingestion/search backend.
//!
//! - [`gateway`] - the [`Gateway`] client and its [`GatewayError`] taxonomy
//! - [`types`] - domain types ([`Channel`], [`Post`], [`SortBy`]) and the
//!   wire shapes they are normalized from

mod gateway;
mod types;

pub use gateway::{Gateway, GatewayError, DEFAULT_TIMEOUT};
pub use types::{Channel, Post, SortBy};
