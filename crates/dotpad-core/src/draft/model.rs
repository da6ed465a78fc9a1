use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Legacy single-document draft: the document text.
pub const DRAFT_CONTENT_KEY: &str = "draftContent";
/// Legacy single-document draft: RFC 3339 save time.
pub const DRAFT_TIMESTAMP_KEY: &str = "draftTimestamp";
/// Legacy single-document draft: backing file path, or null.
pub const DRAFT_FILE_PATH_KEY: &str = "draftFilePath";
/// Multi-document draft record.
pub const TAB_DRAFTS_KEY: &str = "tabDrafts";

/// Every key a draft may occupy, in deletion order.
pub const ALL_DRAFT_KEYS: [&str; 4] = [
    DRAFT_CONTENT_KEY,
    DRAFT_TIMESTAMP_KEY,
    DRAFT_FILE_PATH_KEY,
    TAB_DRAFTS_KEY,
];

/// Drafts older than this are deleted instead of offered for recovery.
pub const MAX_DRAFT_AGE_DAYS: i64 = 7;

pub fn max_draft_age() -> Duration {
    Duration::days(MAX_DRAFT_AGE_DAYS)
}

/// Content of one tab as persisted by autosave.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabDraft {
    pub content: String,
    #[serde(rename = "filePath", default)]
    pub file_path: Option<PathBuf>,
}

/// Value stored under [`TAB_DRAFTS_KEY`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabDraftsRecord {
    #[serde(default)]
    pub tabs: Vec<TabDraft>,
    #[serde(default)]
    pub timestamp: String,
}

impl TabDraftsRecord {
    /// Stamps `tabs` with the current time.
    pub fn now(tabs: Vec<TabDraft>) -> Self {
        Self {
            tabs,
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

/// Values stored under the three legacy keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyDraft {
    pub content: String,
    pub timestamp: String,
    pub file_path: Option<PathBuf>,
}

/// A persisted draft in either storage shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftRecord {
    Legacy(LegacyDraft),
    Tabs(TabDraftsRecord),
}

impl DraftRecord {
    pub fn origin(&self) -> DraftOrigin {
        match self {
            Self::Legacy(_) => DraftOrigin::Legacy,
            Self::Tabs(_) => DraftOrigin::Tabs,
        }
    }

    /// Raw timestamp string as stored.
    pub fn raw_timestamp(&self) -> &str {
        match self {
            Self::Legacy(draft) => &draft.timestamp,
            Self::Tabs(record) => &record.timestamp,
        }
    }

    /// Parsed save time. `None` when the stored value is not RFC 3339.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(self.raw_timestamp())
            .ok()
            .map(|ts| ts.with_timezone(&Utc))
    }

    /// Whether the record is older than `max_age` at `now`.
    ///
    /// Records with an unreadable timestamp count as stale.
    pub fn is_stale_at(&self, now: DateTime<Utc>, max_age: Duration) -> bool {
        match self.timestamp() {
            Some(saved_at) => now.signed_duration_since(saved_at) > max_age,
            None => true,
        }
    }

    /// Normalizes the record into the shape offered for recovery.
    pub fn into_candidate(self) -> Option<RecoveryCandidate> {
        let timestamp = self.timestamp()?;
        let origin = self.origin();
        let tabs = match self {
            Self::Legacy(draft) => vec![TabDraft {
                content: draft.content,
                file_path: draft.file_path,
            }],
            Self::Tabs(record) => record.tabs,
        };

        Some(RecoveryCandidate {
            tabs,
            timestamp,
            origin,
        })
    }
}

/// Which storage shape a candidate was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftOrigin {
    Legacy,
    Tabs,
}

/// A fresh draft offered to the user on startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveryCandidate {
    pub tabs: Vec<TabDraft>,
    pub timestamp: DateTime<Utc>,
    pub origin: DraftOrigin,
}

impl RecoveryCandidate {
    pub fn tab_count(&self) -> usize {
        self.tabs.len()
    }
}
