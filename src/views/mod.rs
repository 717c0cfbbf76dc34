//! Views that fetch and hold remote data on their own schedule.
//!
//! Each view owns its results, its loading flag and a generation counter.
//! Network calls are issued elsewhere; results come back through `apply`,
//! which discards anything older than the newest request.

mod posts;
mod search;

pub use posts::PostsView;
pub use search::SearchView;
