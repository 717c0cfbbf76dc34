//! Utility functions for common operations.
//!
//! - **URL validation**: backend base URL and browser-open checks
//! - **Text processing**: sanitizing and fitting remote strings to the terminal
//! - **Tasks**: panic capture for spawned background work

mod task;
mod text;
mod url_validator;

pub use task::catch_task_panic;
pub use text::{display_width, single_line, strip_control_chars, truncate_to_width};
pub use url_validator::{validate_base_url, validate_url_for_open, UrlValidationError};

/// Maximum search query length, enforced by the search input and the search view.
pub const MAX_SEARCH_QUERY_LENGTH: usize = 256;

/// Maximum subreddit name length accepted by the subscribe dialog.
pub const MAX_CHANNEL_NAME_LENGTH: usize = 64;
