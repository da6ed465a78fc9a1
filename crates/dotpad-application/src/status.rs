//! Status line model.

use dotpad_core::preview::RenderStatusListener;
use std::sync::{Mutex, PoisonError};

/// Message shown when nothing else is going on.
pub const DEFAULT_STATUS_MESSAGE: &str = "Ready.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Idle,
    Loading,
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub message: String,
    pub level: StatusLevel,
}

/// The single-line status shown under the editor.
///
/// Render progress reaches it through [`RenderStatusListener`]; the use case
/// posts its own notices (tab limit, autosave) directly.
#[derive(Debug)]
pub struct StatusBoard {
    current: Mutex<Status>,
}

impl Default for StatusBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusBoard {
    pub fn new() -> Self {
        Self {
            current: Mutex::new(Status {
                message: DEFAULT_STATUS_MESSAGE.to_string(),
                level: StatusLevel::Idle,
            }),
        }
    }

    pub fn current(&self) -> Status {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn idle(&self, message: Option<&str>) {
        self.set(message.unwrap_or(DEFAULT_STATUS_MESSAGE), StatusLevel::Idle);
    }

    pub fn rendering(&self) {
        self.set("Rendering preview...", StatusLevel::Loading);
    }

    pub fn success(&self, message: &str) {
        self.set(message, StatusLevel::Success);
    }

    pub fn info(&self, message: &str) {
        self.set(message, StatusLevel::Info);
    }

    /// Shows the first line of `details` as a render failure.
    pub fn error(&self, details: &str) {
        let summary = details
            .lines()
            .next()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .unwrap_or("Unknown error");
        self.set(&format!("Render failed: {}", summary), StatusLevel::Error);
    }

    fn set(&self, message: &str, level: StatusLevel) {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = Status {
            message: message.to_string(),
            level,
        };
    }
}

impl RenderStatusListener for StatusBoard {
    fn on_render_start(&self) {
        self.rendering();
    }

    fn on_render_success(&self) {
        self.success("Preview updated successfully");
    }

    fn on_render_empty(&self, _reason: &str) {
        self.info("Waiting for DOT markup...");
    }

    fn on_render_error(&self, details: &str) {
        self.error(details);
    }
}
