//! Configuration service implementation.
//!
//! Loads [`EditorConfig`] from `config.toml` in the dotpad config directory.

use crate::paths::DotpadPaths;
use crate::storage::AtomicFile;
use dotpad_core::config::EditorConfig;
use dotpad_core::error::Result;
use std::sync::{Arc, PoisonError, RwLock};

/// Loads and caches the editor configuration.
///
/// A missing file is created with the defaults; an unreadable one falls back
/// to the defaults without touching the file.
#[derive(Debug, Clone)]
pub struct ConfigService {
    paths: DotpadPaths,
    config: Arc<RwLock<Option<EditorConfig>>>,
}

impl ConfigService {
    pub fn new(paths: DotpadPaths) -> Self {
        Self {
            paths,
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Gets the configuration, loading from file if not cached.
    pub fn get_config(&self) -> EditorConfig {
        {
            let cached = self.config.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(config) = cached.as_ref() {
                return config.clone();
            }
        }

        let loaded = match self.load_config() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("[Config] Using defaults, failed to load config: {}", e);
                EditorConfig::default()
            }
        };

        *self.config.write().unwrap_or_else(PoisonError::into_inner) = Some(loaded.clone());
        loaded
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        *self.config.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    fn load_config(&self) -> Result<EditorConfig> {
        let file = AtomicFile::<EditorConfig>::toml(self.paths.config_file()?);

        if let Some(config) = file.load()? {
            return Ok(config);
        }

        let defaults = EditorConfig::default();
        file.save(&defaults)?;
        tracing::info!("[Config] Wrote default config to {}", file.path().display());
        Ok(defaults)
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new(DotpadPaths::default())
    }
}
