//! Reading and writing draft records through a [`DraftStore`].
//!
//! Both storage shapes are parsed here and nowhere else; everything past this
//! boundary works with [`DraftRecord`].

use super::model::{
    ALL_DRAFT_KEYS, DRAFT_CONTENT_KEY, DRAFT_FILE_PATH_KEY, DRAFT_TIMESTAMP_KEY, DraftRecord,
    LegacyDraft, TAB_DRAFTS_KEY, TabDraft, TabDraftsRecord,
};
use super::store::DraftStore;
use crate::error::Result;
use chrono::Utc;
use serde_json::Value;
use std::path::PathBuf;

/// Writes a single-document draft under the legacy keys and flushes.
pub async fn save_draft(store: &dyn DraftStore, draft: &TabDraft) -> Result<()> {
    let file_path = draft
        .file_path
        .as_ref()
        .map(|path| Value::String(path.to_string_lossy().into_owned()))
        .unwrap_or(Value::Null);

    store
        .set(DRAFT_CONTENT_KEY, Value::String(draft.content.clone()))
        .await?;
    store
        .set(DRAFT_TIMESTAMP_KEY, Value::String(Utc::now().to_rfc3339()))
        .await?;
    store.set(DRAFT_FILE_PATH_KEY, file_path).await?;
    store.flush().await
}

/// Writes every tab under [`TAB_DRAFTS_KEY`] with a fresh timestamp and flushes.
pub async fn save_tab_drafts(store: &dyn DraftStore, tabs: &[TabDraft]) -> Result<()> {
    let record = TabDraftsRecord::now(tabs.to_vec());
    store
        .set(TAB_DRAFTS_KEY, serde_json::to_value(&record)?)
        .await?;
    store.flush().await
}

/// Deletes both draft shapes and flushes.
pub async fn clear_drafts(store: &dyn DraftStore) -> Result<()> {
    for key in ALL_DRAFT_KEYS {
        store.delete(key).await?;
    }
    store.flush().await
}

/// Reads the multi-document record.
///
/// Only a record with at least one tab and a timestamp counts; anything else
/// (absent, malformed, empty) reads as `None`.
pub async fn load_tab_drafts(store: &dyn DraftStore) -> Result<Option<TabDraftsRecord>> {
    let Some(value) = store.get(TAB_DRAFTS_KEY).await? else {
        return Ok(None);
    };

    let record: TabDraftsRecord = match serde_json::from_value(value) {
        Ok(record) => record,
        Err(e) => {
            tracing::debug!("[Recovery] Ignoring malformed {}: {}", TAB_DRAFTS_KEY, e);
            return Ok(None);
        }
    };

    if record.tabs.is_empty() || record.timestamp.is_empty() {
        return Ok(None);
    }
    Ok(Some(record))
}

/// Reads the legacy single-document keys.
///
/// Content and timestamp must both be non-empty strings.
pub async fn load_legacy_draft(store: &dyn DraftStore) -> Result<Option<LegacyDraft>> {
    let content = non_empty_string(store.get(DRAFT_CONTENT_KEY).await?);
    let timestamp = non_empty_string(store.get(DRAFT_TIMESTAMP_KEY).await?);
    let (Some(content), Some(timestamp)) = (content, timestamp) else {
        return Ok(None);
    };

    let file_path = non_empty_string(store.get(DRAFT_FILE_PATH_KEY).await?).map(PathBuf::from);

    Ok(Some(LegacyDraft {
        content,
        timestamp,
        file_path,
    }))
}

/// Reads whichever draft is stored, preferring the multi-document shape.
pub async fn load_draft(store: &dyn DraftStore) -> Result<Option<DraftRecord>> {
    if let Some(record) = load_tab_drafts(store).await? {
        return Ok(Some(DraftRecord::Tabs(record)));
    }
    Ok(load_legacy_draft(store).await?.map(DraftRecord::Legacy))
}

fn non_empty_string(value: Option<Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        _ => None,
    }
}
