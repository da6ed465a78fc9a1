//! Atomic whole-file persistence.
//!
//! Each save replaces the file in one step, so readers see either the previous
//! or the new content, never a partial write.

use dotpad_core::error::{DotpadError, Result};
use serde::{Serialize, de::DeserializeOwned};
use std::fs::{self, File};
use std::io::Write as IoWrite;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

/// On-disk encoding of an [`AtomicFile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Toml,
}

impl FileFormat {
    fn encode<T: Serialize>(self, data: &T) -> Result<String> {
        Ok(match self {
            Self::Json => serde_json::to_string_pretty(data)?,
            Self::Toml => toml::to_string_pretty(data)?,
        })
    }

    fn decode<T: DeserializeOwned>(self, content: &str) -> Result<T> {
        Ok(match self {
            Self::Json => serde_json::from_str(content)?,
            Self::Toml => toml::from_str(content)?,
        })
    }
}

/// A typed handle to a file that is always rewritten atomically.
///
/// Provides:
/// - **Atomicity**: Updates go to a sibling temp file that is renamed over the target
/// - **Durability**: The temp file is fsynced before the rename
///
/// The handle performs blocking I/O; async callers wrap it in
/// `tokio::task::spawn_blocking`.
#[derive(Debug)]
pub struct AtomicFile<T> {
    path: PathBuf,
    format: FileFormat,
    _phantom: PhantomData<fn() -> T>,
}

impl<T> Clone for AtomicFile<T> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            format: self.format,
            _phantom: PhantomData,
        }
    }
}

impl<T> AtomicFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: PathBuf, format: FileFormat) -> Self {
        Self {
            path,
            format,
            _phantom: PhantomData,
        }
    }

    pub fn json(path: PathBuf) -> Self {
        Self::new(path, FileFormat::Json)
    }

    pub fn toml(path: PathBuf) -> Self {
        Self::new(path, FileFormat::Toml)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads and decodes the file.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(T))`: Successfully loaded and decoded
    /// - `Ok(None)`: File doesn't exist or is blank
    /// - `Err`: Failed to read or decode the file
    pub fn load(&self) -> Result<Option<T>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(None);
        }

        self.format.decode(&content).map(Some)
    }

    /// Encodes `data` and replaces the file with it.
    pub fn save(&self, data: &T) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
        }

        let encoded = self.format.encode(data)?;

        let tmp_path = self.temp_path()?;
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(encoded.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    /// Temp file next to the target, so the rename stays on one filesystem.
    fn temp_path(&self) -> Result<PathBuf> {
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| DotpadError::io(format!("Invalid file path: {}", self.path.display())))?;

        let mut tmp_name = file_name.to_os_string();
        tmp_name.push(".tmp");
        Ok(self.path.with_file_name(tmp_name))
    }
}
