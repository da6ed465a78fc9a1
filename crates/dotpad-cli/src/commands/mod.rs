//! Subcommand implementations.

pub mod drafts;
pub mod lint;
pub mod render;

use anyhow::{Context, Result};
use dotpad_core::EditorConfig;
use dotpad_infrastructure::GraphvizRenderer;
use std::path::Path;

/// Builds the Graphviz renderer configured for this install and checks it runs.
pub(crate) async fn graphviz(config: &EditorConfig) -> Result<GraphvizRenderer> {
    let renderer = GraphvizRenderer::new(config.graphviz_binary.clone());
    let version = renderer.initialize().await.with_context(|| {
        format!(
            "Graphviz is not available at {}",
            renderer.binary().display()
        )
    })?;
    tracing::debug!("[Graphviz] {}", version);
    Ok(renderer)
}

pub(crate) async fn read_source(file: &Path) -> Result<String> {
    tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))
}
