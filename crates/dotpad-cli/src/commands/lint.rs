use anyhow::{Result, bail};
use dotpad_core::renderer::DiagramRenderer;
use dotpad_core::{EditorConfig, LayoutEngine};
use std::path::Path;

/// Validates `file` and prints the diagnostic as `file:line:column: message`.
///
/// Exits with an error when the document does not render.
pub async fn run(config: &EditorConfig, file: &Path, engine: LayoutEngine) -> Result<()> {
    let source = super::read_source(file).await?;
    let renderer = super::graphviz(config).await?;

    let Some(diagnostic) = renderer.validate(&source, engine).await else {
        println!("{}: ok", file.display());
        return Ok(());
    };

    let resolved = diagnostic.resolve(&source);
    let position = match (diagnostic.line, diagnostic.column) {
        (Some(line), Some(column)) => format!("{}:{}", line, column),
        (Some(line), None) => line.to_string(),
        _ => format!("bytes {}..{}", resolved.from, resolved.to),
    };

    println!(
        "{}:{}: {}",
        file.display(),
        position,
        diagnostic.message.trim()
    );
    bail!("{} has errors", file.display())
}
