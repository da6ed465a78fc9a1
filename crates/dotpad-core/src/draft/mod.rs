//! Draft persistence: storage contract, record shapes, autosave and recovery.
//!
//! # Module Structure
//!
//! - `model`: Persisted record shapes and their normalized recovery form
//! - `store`: The key/value store contract (`DraftStore`) and an in-memory store
//! - `persist`: Reading and writing records through a store
//! - `autosave`: Interval-driven, change-detecting draft writes
//! - `recovery`: Startup check, prompt and cleanup

pub mod autosave;
mod model;
pub mod persist;
pub mod recovery;
mod store;

pub use autosave::{
    AutosaveHandle, AutosaveScheduler, AutosaveTarget, AutosaveTicker, LegacyDraftTarget,
    TabDraftsTarget, TickOutcome,
};
pub use model::{
    ALL_DRAFT_KEYS, DRAFT_CONTENT_KEY, DRAFT_FILE_PATH_KEY, DRAFT_TIMESTAMP_KEY, DraftOrigin,
    DraftRecord, LegacyDraft, MAX_DRAFT_AGE_DAYS, RecoveryCandidate, TAB_DRAFTS_KEY, TabDraft,
    TabDraftsRecord, max_draft_age,
};
pub use persist::{clear_drafts, load_draft, save_draft, save_tab_drafts};
pub use recovery::RecoveryNegotiator;
pub use store::{DraftStore, MemoryDraftStore};
