//! Rendering collaborator interface.

use crate::diagnostic::Diagnostic;
use crate::engine::LayoutEngine;
use crate::error::Result;
use async_trait::async_trait;

/// Turns DOT source into a visual artifact.
///
/// The layout engine itself lives outside this crate; implementations wrap a
/// Graphviz build (subprocess, library binding, ...) behind this contract.
#[async_trait]
pub trait DiagramRenderer: Send + Sync {
    /// Renders `source` to an SVG document.
    ///
    /// # Returns
    ///
    /// - `Ok(svg)`: The rendered artifact
    /// - `Err(DotpadError::Render(_))`: The engine rejected the source; the payload
    ///   carries the engine's diagnostic text
    /// - `Err(_)`: The engine could not be reached
    async fn render(&self, source: &str, engine: LayoutEngine) -> Result<String>;

    /// Checks `source` without committing a render anywhere.
    ///
    /// Empty or whitespace-only documents are valid. The default implementation
    /// performs a render and converts a failure into a [`Diagnostic`].
    async fn validate(&self, source: &str, engine: LayoutEngine) -> Option<Diagnostic> {
        if source.trim().is_empty() {
            return None;
        }

        match self.render(source, engine).await {
            Ok(_) => None,
            Err(err) => Some(Diagnostic::from_message(err.detail())),
        }
    }
}
