//! Startup draft recovery.

use super::model::{DraftOrigin, RecoveryCandidate, max_draft_age};
use super::persist::{clear_drafts, load_draft};
use super::store::DraftStore;
use crate::dialog::{DialogService, RECOVERY_DIALOG_TITLE};
use chrono::{DateTime, Duration, Local, Utc};
use std::sync::Arc;

/// Finds a recoverable draft, asks the user about it and cleans up.
///
/// Every storage failure is logged and treated as "nothing to recover"; this
/// type never returns an error.
pub struct RecoveryNegotiator {
    store: Arc<dyn DraftStore>,
    max_age: Duration,
}

impl RecoveryNegotiator {
    pub fn new(store: Arc<dyn DraftStore>) -> Self {
        Self {
            store,
            max_age: max_draft_age(),
        }
    }

    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    /// Looks for a fresh draft.
    pub async fn check(&self) -> Option<RecoveryCandidate> {
        self.check_at(Utc::now()).await
    }

    /// Looks for a draft that is fresh at `now`.
    ///
    /// The multi-document record wins over the legacy keys. A stale record
    /// (or one with an unreadable timestamp) is deleted, both shapes at once,
    /// and `None` is returned.
    pub async fn check_at(&self, now: DateTime<Utc>) -> Option<RecoveryCandidate> {
        let record = match load_draft(self.store.as_ref()).await {
            Ok(Some(record)) => record,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("[Recovery] Failed to check for drafts: {}", e);
                return None;
            }
        };

        if record.is_stale_at(now, self.max_age) {
            tracing::info!(
                "[Recovery] Discarding stale draft from {:?}",
                record.raw_timestamp()
            );
            self.discard().await;
            return None;
        }

        let candidate = record.into_candidate()?;
        tracing::info!(
            "[Recovery] Found draft with {} tab(s) from {}",
            candidate.tab_count(),
            candidate.timestamp
        );
        Some(candidate)
    }

    /// Asks the user whether to restore `candidate`.
    pub async fn confirm(&self, candidate: &RecoveryCandidate, dialog: &dyn DialogService) -> bool {
        dialog
            .confirm(RECOVERY_DIALOG_TITLE, &Self::prompt_message(candidate))
            .await
    }

    /// Deletes every stored draft. Failures are logged.
    pub async fn discard(&self) {
        if let Err(e) = clear_drafts(self.store.as_ref()).await {
            tracing::warn!("[Recovery] Failed to discard drafts: {}", e);
        }
    }

    /// Prompt text for a multi-document candidate.
    pub fn prompt_message(candidate: &RecoveryCandidate) -> String {
        let tab_label = match candidate.tab_count() {
            1 => "1 tab".to_string(),
            n => format!("{} tabs", n),
        };

        format!(
            "An unsaved draft was found from {} with {}.\n\nRecover these drafts?",
            local_time(candidate.timestamp),
            tab_label
        )
    }

    /// Prompt text in the single-document wording.
    ///
    /// Only the first tab is described.
    pub fn legacy_prompt_message(candidate: &RecoveryCandidate) -> String {
        let file_info = match candidate.tabs.first().and_then(|tab| tab.file_path.as_ref()) {
            Some(path) => format!("\nFile: {}", path.display()),
            None => "\nUnsaved diagram".to_string(),
        };

        format!(
            "An unsaved draft was found from {}.{}\n\nRecover this draft?",
            local_time(candidate.timestamp),
            file_info
        )
    }

    /// Prompt text matching the shape the candidate was read from.
    pub fn message_for(candidate: &RecoveryCandidate) -> String {
        match candidate.origin {
            DraftOrigin::Legacy => Self::legacy_prompt_message(candidate),
            DraftOrigin::Tabs => Self::prompt_message(candidate),
        }
    }
}

fn local_time(timestamp: DateTime<Utc>) -> String {
    timestamp
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}
