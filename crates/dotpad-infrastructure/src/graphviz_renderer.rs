//! Graphviz `dot` subprocess renderer.

use async_trait::async_trait;
use dotpad_core::engine::LayoutEngine;
use dotpad_core::error::{DotpadError, Result};
use dotpad_core::renderer::DiagramRenderer;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::sync::OnceCell;

const DEFAULT_BINARY: &str = "dot";

/// Renders DOT source by piping it through the Graphviz `dot` executable.
///
/// The executable is probed once, on first use or through
/// [`GraphvizRenderer::initialize`]; later calls reuse that result. Each render
/// is a fresh process, so concurrent renders never share state.
#[derive(Debug)]
pub struct GraphvizRenderer {
    binary: PathBuf,
    version: OnceCell<std::result::Result<String, String>>,
}

impl Default for GraphvizRenderer {
    fn default() -> Self {
        Self::new(None)
    }
}

impl GraphvizRenderer {
    /// `binary` defaults to `dot` looked up on `PATH`.
    pub fn new(binary: Option<PathBuf>) -> Self {
        Self {
            binary: binary.unwrap_or_else(|| PathBuf::from(DEFAULT_BINARY)),
            version: OnceCell::new(),
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Probes the executable. Idempotent; the first outcome is kept.
    ///
    /// # Returns
    ///
    /// The version banner printed by `dot -V`.
    pub async fn initialize(&self) -> Result<String> {
        self.version
            .get_or_init(|| async {
                let probed = probe(&self.binary).await;
                match &probed {
                    Ok(version) => tracing::info!("[Graphviz] Using {}", version),
                    Err(e) => tracing::warn!("[Graphviz] {}", e),
                }
                probed
            })
            .await
            .clone()
            .map_err(DotpadError::io)
    }
}

#[async_trait]
impl DiagramRenderer for GraphvizRenderer {
    async fn render(&self, source: &str, engine: LayoutEngine) -> Result<String> {
        self.initialize().await?;

        let mut child = Command::new(&self.binary)
            .args(render_args(engine))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| DotpadError::internal("Graphviz stdin was not captured"))?;
        let input = source.to_string();
        // Written from a separate task so a large SVG on stdout cannot stall the pipe.
        let writer = tokio::spawn(async move {
            let written = stdin.write_all(input.as_bytes()).await;
            drop(stdin);
            written
        });

        let output = child.wait_with_output().await?;
        if let Ok(Err(e)) = writer.await {
            tracing::debug!("[Graphviz] Failed to write stdin: {}", e);
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let message = if stderr.is_empty() {
                format!("Graphviz exited with {}", output.status)
            } else {
                stderr
            };
            return Err(DotpadError::render(message));
        }

        String::from_utf8(output.stdout)
            .map_err(|e| DotpadError::render(format!("Graphviz produced invalid UTF-8: {}", e)))
    }
}

fn render_args(engine: LayoutEngine) -> [String; 2] {
    [format!("-K{}", engine), "-Tsvg".to_string()]
}

async fn probe(binary: &Path) -> std::result::Result<String, String> {
    let output = Command::new(binary)
        .arg("-V")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|e| format!("Graphviz not available at {}: {}", binary.display(), e))?;

    if !output.status.success() {
        return Err(format!(
            "Graphviz probe failed at {}: {}",
            binary.display(),
            output.status
        ));
    }

    // `dot -V` prints its banner on stderr.
    let banner = String::from_utf8_lossy(&output.stderr).trim().to_string();
    if banner.is_empty() {
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    } else {
        Ok(banner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_select_engine_and_svg() {
        assert_eq!(render_args(LayoutEngine::Dot), ["-Kdot", "-Tsvg"]);
        assert_eq!(render_args(LayoutEngine::Sfdp), ["-Ksfdp", "-Tsvg"]);
    }

    #[tokio::test]
    async fn missing_binary_is_an_io_error_not_a_render_error() {
        let renderer = GraphvizRenderer::new(Some(PathBuf::from("/nonexistent/dotpad/dot")));

        let err = renderer.initialize().await.unwrap_err();
        assert!(err.is_io());
        // Cached: the second call reports the same failure.
        assert_eq!(renderer.initialize().await.unwrap_err(), err);

        let err = renderer
            .render("digraph { a }", LayoutEngine::Dot)
            .await
            .unwrap_err();
        assert!(!err.is_render());
    }

    #[tokio::test]
    async fn renders_with_installed_graphviz() {
        let renderer = GraphvizRenderer::default();
        if renderer.initialize().await.is_err() {
            return;
        }

        let svg = renderer
            .render("digraph { a -> b }", LayoutEngine::Dot)
            .await
            .unwrap();
        assert!(svg.contains("<svg"));

        let err = renderer
            .render("digraph { a -> }", LayoutEngine::Dot)
            .await
            .unwrap_err();
        assert!(err.is_render());
        assert!(renderer
            .validate("digraph { a -> }", LayoutEngine::Dot)
            .await
            .is_some());
    }
}
