//! Document file access on the local filesystem.

use async_trait::async_trait;
use dotpad_core::dialog::DocumentIo;
use dotpad_core::error::Result;
use std::path::Path;

/// [`DocumentIo`] over `tokio::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsDocumentIo;

#[async_trait]
impl DocumentIo for FsDocumentIo {
    async fn read_to_string(&self, path: &Path) -> Result<String> {
        Ok(tokio::fs::read_to_string(path).await?)
    }

    async fn write(&self, path: &Path, contents: &str) -> Result<()> {
        tokio::fs::write(path, contents).await?;
        tracing::debug!("[Documents] Wrote {} bytes to {}", contents.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn writes_then_reads_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("flow.dot");

        FsDocumentIo.write(&path, "digraph { a -> b }").await.unwrap();

        assert_eq!(
            FsDocumentIo.read_to_string(&path).await.unwrap(),
            "digraph { a -> b }"
        );
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();

        let err = FsDocumentIo
            .read_to_string(&dir.path().join("missing.dot"))
            .await
            .unwrap_err();
        assert!(err.is_io());
    }
}
