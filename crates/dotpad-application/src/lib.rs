//! Application layer for dotpad.
//!
//! This crate provides the use case that coordinates the domain types from
//! `dotpad-core` the way the editor window drives them.

pub mod editor_usecase;
pub mod status;

pub use editor_usecase::EditorUseCase;
pub use status::{Status, StatusBoard, StatusLevel};
