use crate::engine::LayoutEngine;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default debounce window for preview renders, in milliseconds.
pub const DEFAULT_RENDER_DELAY_MS: u64 = 300;

/// Default debounce window for lint passes, in milliseconds.
pub const DEFAULT_LINT_DELAY_MS: u64 = 500;

/// Default autosave interval, in seconds.
pub const DEFAULT_AUTOSAVE_INTERVAL_SECS: u64 = 30;

/// Root configuration stored in `config.toml`.
///
/// Every field has a default, so a partial (or empty) file is valid.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct EditorConfig {
    /// Quiet period before a scheduled preview render starts.
    pub render_delay_ms: u64,
    /// Quiet period before a scheduled lint pass starts.
    pub lint_delay_ms: u64,
    /// Period between autosave ticks.
    pub autosave_interval_secs: u64,
    /// Layout engine selected at startup.
    pub default_engine: LayoutEngine,
    /// Explicit path to the Graphviz `dot` executable. Looked up on `PATH` when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graphviz_binary: Option<PathBuf>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            render_delay_ms: DEFAULT_RENDER_DELAY_MS,
            lint_delay_ms: DEFAULT_LINT_DELAY_MS,
            autosave_interval_secs: DEFAULT_AUTOSAVE_INTERVAL_SECS,
            default_engine: LayoutEngine::default(),
            graphviz_binary: None,
        }
    }
}

impl EditorConfig {
    pub fn render_delay(&self) -> Duration {
        Duration::from_millis(self.render_delay_ms)
    }

    pub fn lint_delay(&self) -> Duration {
        Duration::from_millis(self.lint_delay_ms)
    }

    pub fn autosave_interval(&self) -> Duration {
        Duration::from_secs(self.autosave_interval_secs)
    }
}
