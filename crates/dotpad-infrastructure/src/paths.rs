//! Path management for dotpad's own files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/dotpad/            # Config directory (platform specific)
//! ├── config.toml              # Editor configuration
//! └── drafts.json              # Autosaved drafts
//! ```

use dotpad_core::error::{DotpadError, Result};
use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = "dotpad";
const CONFIG_FILE_NAME: &str = "config.toml";
const DRAFTS_FILE_NAME: &str = "drafts.json";

/// Resolves where dotpad keeps its files.
///
/// By default everything lives under the platform config directory. A custom
/// base directory replaces it entirely (used by tests and `--data-dir`).
#[derive(Debug, Clone, Default)]
pub struct DotpadPaths {
    base: Option<PathBuf>,
}

impl DotpadPaths {
    pub fn new(base: Option<PathBuf>) -> Self {
        Self { base }
    }

    /// Paths rooted at `base` instead of the platform directory.
    pub fn with_base(base: impl AsRef<Path>) -> Self {
        Self::new(Some(base.as_ref().to_path_buf()))
    }

    /// Returns the dotpad configuration directory.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: e.g. `~/.config/dotpad/`
    /// - `Err(DotpadError::Config)`: The platform has no config directory
    pub fn config_dir(&self) -> Result<PathBuf> {
        if let Some(base) = &self.base {
            return Ok(base.clone());
        }

        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .ok_or_else(|| DotpadError::config("Cannot find config directory"))
    }

    pub fn config_file(&self) -> Result<PathBuf> {
        Ok(self.config_dir()?.join(CONFIG_FILE_NAME))
    }

    pub fn drafts_file(&self) -> Result<PathBuf> {
        Ok(self.config_dir()?.join(DRAFTS_FILE_NAME))
    }
}
