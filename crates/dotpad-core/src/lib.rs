//! Core domain for dotpad, a desktop editor for Graphviz DOT diagrams.
//!
//! This crate holds the coordination logic between the editor, the live
//! preview and draft persistence. Everything outside it (text widget, layout
//! engine, dialogs, storage backend) is reached through the traits in
//! [`renderer`], [`dialog`], [`tabs`] and [`draft`].

pub mod config;
pub mod diagnostic;
pub mod dialog;
pub mod draft;
pub mod engine;
pub mod error;
pub mod lint;
pub mod preview;
pub mod renderer;
pub mod tabs;

// Re-export common types
pub use config::EditorConfig;
pub use engine::LayoutEngine;
pub use error::{DotpadError, Result};
