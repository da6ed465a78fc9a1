use super::buffer::BufferView;
use crate::draft::TabDraft;
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Label shown for documents without a backing file.
pub const UNTITLED_LABEL: &str = "Untitled";

/// Content of a freshly created document.
pub const DEFAULT_SNIPPET: &str = r#"digraph G {
    Start -> Decision [label="check"];
    Decision -> Great [label="Yes"];
    Decision -> Iterate [label="Not yet"];

    Start [shape=ellipse];
    Decision [shape=diamond, label="Is it working?"];
    Great [shape=box, label="Great!"];
    Iterate [shape=box, label="Keep iterating"];
}"#;

/// Stable tab identifier.
///
/// Ids are handed out in increasing order by a [`super::TabManager`] and never
/// reused by that manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TabId(u64);

impl TabId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tab-{}", self.0)
    }
}

/// One open document.
#[derive(Debug)]
pub struct Tab<B> {
    id: TabId,
    file_path: Option<PathBuf>,
    last_committed: String,
    last_saved_at: Option<DateTime<Utc>>,
    buffer: B,
}

impl<B: BufferView> Tab<B> {
    pub(super) fn new(id: TabId, file_path: Option<PathBuf>, content: &str) -> Self {
        Self {
            id,
            file_path,
            last_committed: content.to_string(),
            last_saved_at: None,
            buffer: B::with_content(content),
        }
    }

    pub fn id(&self) -> TabId {
        self.id
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    /// Associates the tab with another file, or detaches it.
    ///
    /// The save timestamp refers to the previous file, so it is dropped whenever
    /// the path is cleared or changes.
    pub fn set_file_path(&mut self, path: Option<PathBuf>) {
        if path.is_none() || path != self.file_path {
            self.last_saved_at = None;
        }
        self.file_path = path;
    }

    pub fn last_committed(&self) -> &str {
        &self.last_committed
    }

    pub fn last_saved_at(&self) -> Option<DateTime<Utc>> {
        self.last_saved_at
    }

    /// Whether the buffer differs from the last committed content.
    pub fn is_dirty(&self) -> bool {
        self.buffer.text() != self.last_committed
    }

    pub fn content(&self) -> String {
        self.buffer.text()
    }

    pub fn buffer(&self) -> &B {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut B {
        &mut self.buffer
    }

    /// Marks the current content as committed.
    ///
    /// `saved` records a successful save at `now`. A plain commit (e.g. after
    /// opening or resetting a document) forgets the save time of untitled tabs.
    pub fn commit(&mut self, saved: bool, now: DateTime<Utc>) {
        let text = self.buffer.text();
        self.commit_content(&text, saved, now);
    }

    /// Like [`Self::commit`], but records `content` rather than the live buffer.
    ///
    /// Used after an asynchronous write: edits made while the write was in
    /// flight are not on disk and keep the tab dirty.
    pub fn commit_content(&mut self, content: &str, saved: bool, now: DateTime<Utc>) {
        self.last_committed = content.to_string();
        if saved {
            self.last_saved_at = Some(now);
        } else if self.file_path.is_none() {
            self.last_saved_at = None;
        }
    }

    /// Name shown in the tab bar.
    pub fn display_name(&self) -> String {
        display_name(self.file_path())
    }

    /// Status-bar summary, e.g. `flow.dot - Unsaved changes`.
    pub fn file_status(&self) -> String {
        let details = if self.is_dirty() {
            "Unsaved changes".to_string()
        } else if let Some(saved_at) = self.last_saved_at {
            format!("Saved {}", saved_at.with_timezone(&Local).format("%H:%M"))
        } else if self.file_path.is_some() {
            "Opened from disk".to_string()
        } else {
            "Not saved yet".to_string()
        };

        format!("{} - {}", self.display_name(), details)
    }

    /// Snapshot used by autosave.
    pub fn to_draft(&self) -> TabDraft {
        TabDraft {
            content: self.buffer.text(),
            file_path: self.file_path.clone(),
        }
    }
}

/// Last path component of `path` (either separator), or [`UNTITLED_LABEL`].
pub fn display_name(path: Option<&Path>) -> String {
    let Some(path) = path else {
        return UNTITLED_LABEL.to_string();
    };

    let normalized = path.to_string_lossy().replace('\\', "/");
    match normalized.rsplit('/').next() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => UNTITLED_LABEL.to_string(),
    }
}
