//! Terminal User Interface module.
//!
//! # Module Structure
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input handling
//! - `render` - Layout and overlay rendering
//! - `channels` - Subscribed channel list widget
//! - `posts` - Channel posts table widget
//! - `search` - Search box and results widget
//! - `status` - Status bar widget
//! - `help` - Keybinding overlay

mod channels;
mod help;
mod input;
mod loop_runner;
mod posts;
mod render;
mod search;
mod status;

pub use loop_runner::{run, Action};
