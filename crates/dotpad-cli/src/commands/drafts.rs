//! `dotpad drafts`: inspect, clear and restore autosaved drafts.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use dotpad_application::EditorUseCase;
use dotpad_core::EditorConfig;
use dotpad_core::dialog::{DialogService, DocumentIo};
use dotpad_core::draft::{
    DraftStore, RecoveryNegotiator, TabDraft, clear_drafts, load_draft, max_draft_age,
};
use dotpad_core::tabs::{TextBuffer, display_name};
use dotpad_infrastructure::{DotpadPaths, FsDocumentIo, GraphvizRenderer, JsonDraftStore};
use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

async fn open_store(paths: &DotpadPaths) -> Result<Arc<JsonDraftStore>> {
    let path = paths.drafts_file()?;
    let store = JsonDraftStore::open(path.clone())
        .await
        .with_context(|| format!("Failed to open draft store {}", path.display()))?;
    Ok(Arc::new(store))
}

/// Prints the stored draft without touching it.
pub async fn show(paths: &DotpadPaths, json: bool) -> Result<()> {
    let store = open_store(paths).await?;

    let Some(record) = load_draft(store.as_ref()).await? else {
        println!("No drafts stored in {}", store.path().display());
        return Ok(());
    };

    let stale = record.is_stale_at(Utc::now(), max_draft_age());
    let raw_timestamp = record.raw_timestamp().to_string();

    let Some(candidate) = record.into_candidate() else {
        println!(
            "Stored draft has an unreadable timestamp ({:?}) and will be discarded",
            raw_timestamp
        );
        return Ok(());
    };

    if json {
        let value = serde_json::json!({
            "origin": format!("{:?}", candidate.origin).to_lowercase(),
            "timestamp": candidate.timestamp.to_rfc3339(),
            "stale": stale,
            "tabs": candidate.tabs,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("{}", RecoveryNegotiator::message_for(&candidate));
    if stale {
        println!("\n(older than the recovery window; it will be discarded on next start)");
    }
    println!();
    for (index, draft) in candidate.tabs.iter().enumerate() {
        println!(
            "  [{}] {} ({} lines)",
            index + 1,
            display_name(draft.file_path.as_deref()),
            draft.content.lines().count()
        );
    }

    Ok(())
}

pub async fn clear(paths: &DotpadPaths) -> Result<()> {
    let store = open_store(paths).await?;
    clear_drafts(store.as_ref()).await?;
    println!("Drafts cleared");
    Ok(())
}

/// Runs the startup recovery flow and writes the restored documents into
/// `out_dir`, never over their original files.
pub async fn recover(
    paths: &DotpadPaths,
    config: &EditorConfig,
    out_dir: &Path,
    assume_yes: bool,
) -> Result<()> {
    let store: Arc<dyn DraftStore> = open_store(paths).await?;
    // Recovery only replays text; previews that fail to render are harmless here.
    let renderer = Arc::new(GraphvizRenderer::new(config.graphviz_binary.clone()));
    let editor = EditorUseCase::<TextBuffer>::new(renderer, Some(store), config);

    let dialog = TerminalDialog { assume_yes };
    if !editor.recover(&dialog).await {
        println!("Nothing recovered");
        return Ok(());
    }

    tokio::fs::create_dir_all(out_dir)
        .await
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    let io = FsDocumentIo;
    for (target, content) in write_targets(out_dir, &editor.drafts()) {
        io.write(&target, &content).await?;
        println!("Recovered {}", target.display());
    }

    Ok(())
}

/// Output path and content for each recovered tab; names are kept unique.
fn write_targets(out_dir: &Path, drafts: &[TabDraft]) -> Vec<(PathBuf, String)> {
    let mut used = HashSet::new();
    drafts
        .iter()
        .enumerate()
        .map(|(index, draft)| {
            let name = match draft.file_path.as_deref() {
                Some(path) => display_name(Some(path)),
                None => format!("recovered-{}.dot", index + 1),
            };
            let name = if used.insert(name.clone()) {
                name
            } else {
                let unique = format!("{}-{}", index + 1, name);
                used.insert(unique.clone());
                unique
            };
            (out_dir.join(name), draft.content.clone())
        })
        .collect()
}

/// Dialogs answered on the terminal.
struct TerminalDialog {
    assume_yes: bool,
}

#[async_trait]
impl DialogService for TerminalDialog {
    async fn pick_open_path(&self) -> Option<PathBuf> {
        None
    }

    async fn pick_save_path(&self, _default_name: &str) -> Option<PathBuf> {
        None
    }

    async fn confirm(&self, title: &str, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }

        let prompt = format!("{}\n\n{}\n[y/N] ", title, message);
        tokio::task::spawn_blocking(move || {
            print!("{}", prompt);
            std::io::stdout().flush().ok()?;
            let mut answer = String::new();
            std::io::stdin().read_line(&mut answer).ok()?;
            Some(matches!(answer.trim(), "y" | "Y" | "yes" | "Yes"))
        })
        .await
        .ok()
        .flatten()
        .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(content: &str, path: Option<&str>) -> TabDraft {
        TabDraft {
            content: content.to_string(),
            file_path: path.map(PathBuf::from),
        }
    }

    #[test]
    fn write_targets_name_untitled_and_keep_names_unique() {
        let out = Path::new("/tmp/out");
        let targets = write_targets(
            out,
            &[
                draft("a", Some("/home/me/flow.dot")),
                draft("b", None),
                draft("c", Some("/elsewhere/flow.dot")),
            ],
        );

        let names: Vec<_> = targets
            .iter()
            .map(|(path, _)| path.strip_prefix(out).unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["flow.dot", "recovered-2.dot", "3-flow.dot"]);
        assert_eq!(targets[2].1, "c");
    }

    async fn seed(paths: &DotpadPaths, tabs: &[TabDraft]) {
        let store = open_store(paths).await.unwrap();
        dotpad_core::draft::save_tab_drafts(store.as_ref(), tabs)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn clear_removes_stored_drafts() {
        let dir = tempfile::tempdir().unwrap();
        let paths = DotpadPaths::with_base(dir.path());
        seed(&paths, &[draft("digraph { a }", None)]).await;

        clear(&paths).await.unwrap();

        let store = open_store(&paths).await.unwrap();
        assert!(load_draft(store.as_ref()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn recover_writes_documents_and_discards_drafts() {
        let dir = tempfile::tempdir().unwrap();
        let paths = DotpadPaths::with_base(dir.path());
        let out_dir = dir.path().join("recovered");
        seed(
            &paths,
            &[
                draft("digraph { a }", None),
                draft("digraph { b }", Some("/home/me/flow.dot")),
            ],
        )
        .await;

        recover(&paths, &EditorConfig::default(), &out_dir, true)
            .await
            .unwrap();

        assert_eq!(
            std::fs::read_to_string(out_dir.join("recovered-1.dot")).unwrap(),
            "digraph { a }"
        );
        assert_eq!(
            std::fs::read_to_string(out_dir.join("flow.dot")).unwrap(),
            "digraph { b }"
        );
        let store = open_store(&paths).await.unwrap();
        assert!(load_draft(store.as_ref()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn recover_without_drafts_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let paths = DotpadPaths::with_base(dir.path());
        let out_dir = dir.path().join("recovered");

        recover(&paths, &EditorConfig::default(), &out_dir, true)
            .await
            .unwrap();

        assert!(!out_dir.exists());
    }

    #[tokio::test]
    async fn assume_yes_confirms_without_reading_stdin() {
        let dialog = TerminalDialog { assume_yes: true };
        assert!(dialog.confirm("title", "message").await);
        assert!(dialog.pick_save_path("diagram.dot").await.is_none());
    }
}
