//! Desktop shell collaborators: dialogs and document file access.

use crate::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Title of the draft recovery confirmation prompt.
pub const RECOVERY_DIALOG_TITLE: &str = "Recover Unsaved Work";

/// File name proposed by the save dialog for untitled documents.
pub const DEFAULT_SAVE_NAME: &str = "diagram.dot";

/// Native dialogs offered by the desktop shell.
///
/// Every method waits on the user; `None`/`false` mean the user dismissed the
/// dialog.
#[async_trait]
pub trait DialogService: Send + Sync {
    /// Asks the user for a document to open.
    async fn pick_open_path(&self) -> Option<PathBuf>;

    /// Asks the user where to save a document, proposing `default_name`.
    async fn pick_save_path(&self, default_name: &str) -> Option<PathBuf>;

    /// Shows a yes/no prompt.
    async fn confirm(&self, title: &str, message: &str) -> bool;
}

/// Raw document file access.
#[async_trait]
pub trait DocumentIo: Send + Sync {
    async fn read_to_string(&self, path: &Path) -> Result<String>;

    async fn write(&self, path: &Path, contents: &str) -> Result<()>;
}
