use anyhow::{Context, Result, bail};
use dotpad_core::renderer::DiagramRenderer;
use dotpad_core::{DotpadError, EditorConfig, LayoutEngine};
use std::path::Path;

pub async fn run(
    config: &EditorConfig,
    file: &Path,
    engine: LayoutEngine,
    output: Option<&Path>,
) -> Result<()> {
    let source = super::read_source(file).await?;
    if source.trim().is_empty() {
        bail!("{} is empty, nothing to render", file.display());
    }

    let renderer = super::graphviz(config).await?;
    let svg = match renderer.render(source.trim(), engine).await {
        Ok(svg) => svg,
        Err(DotpadError::Render(details)) => {
            bail!("Render failed ({}): {}", engine, details.trim())
        }
        Err(e) => return Err(e.into()),
    };

    match output {
        Some(path) => {
            tokio::fs::write(path, svg)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("[Render] Wrote {} with {}", path.display(), engine);
        }
        None => println!("{}", svg),
    }

    Ok(())
}
