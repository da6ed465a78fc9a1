//! Tab domain module.
//!
//! # Module Structure
//!
//! - `buffer`: The buffer-view handle each tab owns (`BufferView`, `TextBuffer`)
//! - `model`: A single open document (`Tab`, `TabId`)
//! - `manager`: The bounded, ordered tab set (`TabManager`)

mod buffer;
mod manager;
mod model;


pub use buffer::{BufferView, TextBuffer};
pub use manager::{MAX_TABS, TabManager};
pub use model::{DEFAULT_SNIPPET, Tab, TabId, UNTITLED_LABEL, display_name};
