//! Editor use case implementation.
//!
//! This module provides the `EditorUseCase` which wires the tab set, the live
//! preview, linting and draft persistence together the way the editor window
//! drives them.

use crate::status::StatusBoard;
use anyhow::{Context, Result};
use chrono::Utc;
use dotpad_core::config::EditorConfig;
use dotpad_core::dialog::{DEFAULT_SAVE_NAME, DialogService, DocumentIo};
use dotpad_core::draft::{
    AutosaveHandle, AutosaveScheduler, DraftStore, RecoveryNegotiator, TabDraft, TabDraftsTarget,
    clear_drafts,
};
use dotpad_core::engine::LayoutEngine;
use dotpad_core::lint::{LintPipeline, LintReport};
use dotpad_core::preview::{PreviewState, RenderPipeline};
use dotpad_core::renderer::DiagramRenderer;
use dotpad_core::tabs::{BufferView, DEFAULT_SNIPPET, MAX_TABS, TabId, TabManager};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Use case for one editor window.
///
/// `EditorUseCase` coordinates `TabManager`, `RenderPipeline`, `LintPipeline`
/// and the draft store.
///
/// # Responsibilities
///
/// - Keeping the preview and lint results in step with the active tab
/// - Opening and saving documents through the shell's dialogs
/// - Autosaving every tab and offering recovery on startup
/// - Posting user-facing notices to the [`StatusBoard`]
///
/// # Thread Safety
///
/// The tab set sits behind a synchronous mutex that is never held across an
/// `.await`; every follow-up render is scheduled, not awaited.
pub struct EditorUseCase<B: BufferView> {
    tabs: Arc<Mutex<TabManager<B>>>,
    preview: RenderPipeline,
    lint: LintPipeline,
    store: Option<Arc<dyn DraftStore>>,
    status: Arc<StatusBoard>,
    autosave_interval: Duration,
    autosave: Mutex<Option<AutosaveHandle>>,
}

impl<B: BufferView + 'static> EditorUseCase<B> {
    /// Creates a new `EditorUseCase` with no open tabs.
    ///
    /// # Arguments
    ///
    /// * `renderer` - Layout engine used for both preview and lint
    /// * `store` - Draft store; without one autosave and recovery are disabled
    /// * `config` - Delays, autosave interval and initial layout engine
    pub fn new(
        renderer: Arc<dyn DiagramRenderer>,
        store: Option<Arc<dyn DraftStore>>,
        config: &EditorConfig,
    ) -> Self {
        let status = Arc::new(StatusBoard::new());

        let preview = RenderPipeline::with_listener(renderer.clone(), status.clone())
            .with_delay(config.render_delay());
        preview.set_engine(config.default_engine);

        let lint = LintPipeline::new(renderer).with_delay(config.lint_delay());
        lint.set_engine(config.default_engine);

        Self {
            tabs: Arc::new(Mutex::new(TabManager::new())),
            preview,
            lint,
            store,
            status,
            autosave_interval: config.autosave_interval(),
            autosave: Mutex::new(None),
        }
    }

    /// Opens the first tab with the starter diagram, committed as clean.
    ///
    /// Does nothing if a tab is already open.
    pub fn open_initial_tab(&self) -> Option<TabId> {
        {
            let mut tabs = lock(&self.tabs);
            if let Some(active) = tabs.active_id() {
                return Some(active);
            }
            tabs.create_tab(DEFAULT_SNIPPET, None)?;
        }
        self.commit_active_sync(false);
        self.refresh_active();
        self.active_id()
    }

    /// Opens a new tab and makes it active.
    ///
    /// Returns `None` and posts a notice when [`MAX_TABS`] tabs are open.
    pub fn new_tab(&self, content: &str, file_path: Option<PathBuf>) -> Option<TabId> {
        let created = lock(&self.tabs)
            .create_tab(content, file_path)
            .map(|tab| tab.id());

        match created {
            Some(id) => {
                tracing::info!("[EditorUseCase] Opened {}", id);
                self.refresh_active();
                Some(id)
            }
            None => {
                self.status
                    .info(&format!("Maximum {} tabs reached", MAX_TABS));
                None
            }
        }
    }

    /// Activates `id` and renders it. Switching to the active tab is a no-op.
    pub fn switch_to(&self, id: TabId) -> Option<TabId> {
        {
            let mut tabs = lock(&self.tabs);
            if tabs.active_id() == Some(id) {
                return Some(id);
            }
            tabs.switch_to(id)?;
        }
        self.refresh_active();
        Some(id)
    }

    pub fn next_tab(&self) -> Option<TabId> {
        let next = lock(&self.tabs).next_tab().map(|tab| tab.id())?;
        self.switch_to(next)
    }

    pub fn previous_tab(&self) -> Option<TabId> {
        let previous = lock(&self.tabs).previous_tab().map(|tab| tab.id())?;
        self.switch_to(previous)
    }

    /// Closes `id` unless it is the last tab.
    ///
    /// # Returns
    ///
    /// The active tab afterwards.
    pub fn close_tab(&self, id: TabId) -> Option<TabId> {
        let closed = {
            let mut tabs = lock(&self.tabs);
            if tabs.len() <= 1 || tabs.tab(id).is_none() {
                None
            } else {
                Some(tabs.close_tab(id).map(|tab| tab.id()))
            }
        };

        match closed {
            Some(active) => {
                tracing::info!("[EditorUseCase] Closed {}", id);
                self.refresh_active();
                active
            }
            None => self.active_id(),
        }
    }

    /// Replaces the active document's text, as an edit in the widget would.
    pub fn edit_active(&self, text: &str) -> bool {
        let revision = {
            let mut tabs = lock(&self.tabs);
            let Some(tab) = tabs.active_tab_mut() else {
                return false;
            };
            tab.buffer_mut().replace_content(text);
            tab.buffer().revision()
        };

        self.preview.schedule(text);
        self.lint.schedule(revision, text);
        true
    }

    /// Marks the active document as committed.
    ///
    /// A `saved` commit also clears the stored drafts.
    pub async fn commit_active(&self, saved: bool) {
        self.commit_active_sync(saved);
        if saved {
            self.clear_drafts().await;
        }
    }

    pub fn set_active_path(&self, path: Option<PathBuf>) {
        if let Some(tab) = lock(&self.tabs).active_tab_mut() {
            tab.set_file_path(path);
        }
    }

    /// Changes the layout engine and re-renders the active tab.
    pub fn set_engine(&self, engine: LayoutEngine) {
        self.preview.set_engine(engine);
        self.lint.set_engine(engine);
        tracing::info!("[EditorUseCase] Layout engine set to {}", engine);
        self.refresh_active();
    }

    /// Asks for a document and opens it in a new tab.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(id))`: The new tab
    /// - `Ok(None)`: Dialog dismissed, or no room for another tab
    /// - `Err(_)`: The file could not be read
    pub async fn open_file(
        &self,
        dialog: &dyn DialogService,
        io: &dyn DocumentIo,
    ) -> Result<Option<TabId>> {
        let Some(path) = dialog.pick_open_path().await else {
            return Ok(None);
        };

        let content = io
            .read_to_string(&path)
            .await
            .with_context(|| format!("Failed to open {}", path.display()))?;

        Ok(self.new_tab(&content, Some(path)))
    }

    /// Saves the active document, asking for a path when it has none.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(path))`: Written to `path`; the tab is clean and drafts are cleared
    /// - `Ok(None)`: No active tab, or the save dialog was dismissed
    /// - `Err(_)`: The file could not be written
    pub async fn save_active(
        &self,
        dialog: &dyn DialogService,
        io: &dyn DocumentIo,
    ) -> Result<Option<PathBuf>> {
        let Some((id, content, current_path)) = lock(&self.tabs)
            .active_tab()
            .map(|tab| (tab.id(), tab.content(), tab.file_path().map(PathBuf::from)))
        else {
            return Ok(None);
        };

        let path = match current_path {
            Some(path) => path,
            None => match dialog.pick_save_path(DEFAULT_SAVE_NAME).await {
                Some(path) => path,
                None => return Ok(None),
            },
        };

        io.write(&path, &content)
            .await
            .with_context(|| format!("Failed to save {}", path.display()))?;

        // Edits made during the write stay dirty.
        if let Some(tab) = lock(&self.tabs).tab_mut(id) {
            tab.set_file_path(Some(path.clone()));
            tab.commit_content(&content, true, Utc::now());
        }
        self.clear_drafts().await;

        tracing::info!("[EditorUseCase] Saved {} to {}", id, path.display());
        Ok(Some(path))
    }

    /// Offers the stored draft for recovery and replays it if accepted.
    ///
    /// The first draft goes into the active tab, the rest into new tabs, and
    /// the first one ends up active. Drafts are discarded afterwards whatever
    /// the answer.
    ///
    /// # Returns
    ///
    /// Whether drafts were restored.
    pub async fn recover(&self, dialog: &dyn DialogService) -> bool {
        let Some(store) = self.store.clone() else {
            return false;
        };
        let negotiator = RecoveryNegotiator::new(store);

        let Some(candidate) = negotiator.check().await else {
            return false;
        };

        let accepted = negotiator.confirm(&candidate, dialog).await;
        if accepted {
            self.replay(&candidate.tabs);
        }
        negotiator.discard().await;

        tracing::info!(
            "[Recovery] Draft with {} tab(s) {}",
            candidate.tab_count(),
            if accepted { "restored" } else { "discarded" }
        );
        accepted
    }

    /// Starts autosaving every tab. Replaces a running autosave.
    ///
    /// Returns `false` without a draft store.
    pub fn start_autosave(&self) -> bool {
        let Some(store) = self.store.clone() else {
            return false;
        };

        let tabs = self.tabs.clone();
        let status = self.status.clone();
        let handle = AutosaveScheduler::new(self.autosave_interval).start(
            move || lock(&tabs).drafts(),
            TabDraftsTarget::new(store),
            move || status.success("Draft saved"),
        );

        if let Some(previous) = lock(&self.autosave).replace(handle) {
            previous.stop();
        }
        true
    }

    pub fn stop_autosave(&self) {
        if let Some(handle) = lock(&self.autosave).take() {
            handle.stop();
        }
    }

    pub fn active_id(&self) -> Option<TabId> {
        lock(&self.tabs).active_id()
    }

    pub fn active_content(&self) -> Option<String> {
        lock(&self.tabs).active_tab().map(|tab| tab.content())
    }

    /// Status-bar summary of the active tab.
    pub fn active_file_status(&self) -> Option<String> {
        lock(&self.tabs).active_tab().map(|tab| tab.file_status())
    }

    pub fn tab_count(&self) -> usize {
        lock(&self.tabs).len()
    }

    pub fn drafts(&self) -> Vec<TabDraft> {
        lock(&self.tabs).drafts()
    }

    /// Runs `f` against the tab set.
    ///
    /// `f` must not block; the tab set is locked while it runs.
    pub fn with_tabs<R>(&self, f: impl FnOnce(&TabManager<B>) -> R) -> R {
        f(&lock(&self.tabs))
    }

    pub fn preview(&self) -> PreviewState {
        self.preview.preview()
    }

    pub fn lint_report(&self) -> Option<LintReport> {
        self.lint.report()
    }

    pub fn status(&self) -> &StatusBoard {
        &self.status
    }

    fn replay(&self, drafts: &[TabDraft]) {
        let Some((first, rest)) = drafts.split_first() else {
            return;
        };

        let first_id = {
            let mut tabs = lock(&self.tabs);
            match tabs.active_tab_mut() {
                Some(tab) => {
                    tab.buffer_mut().replace_content(&first.content);
                    if first.file_path.is_some() {
                        tab.set_file_path(first.file_path.clone());
                    }
                    Some(tab.id())
                }
                None => tabs
                    .create_tab(&first.content, first.file_path.clone())
                    .map(|tab| tab.id()),
            }
        };
        self.refresh_active();

        for draft in rest {
            self.new_tab(&draft.content, draft.file_path.clone());
        }

        if !rest.is_empty()
            && let Some(first_id) = first_id
        {
            self.switch_to(first_id);
        }
    }

    fn commit_active_sync(&self, saved: bool) {
        if let Some(tab) = lock(&self.tabs).active_tab_mut() {
            tab.commit(saved, Utc::now());
        }
    }

    /// Clears the stored drafts after a save.
    ///
    /// Other tabs may still hold unsaved work; autosave then has to write them
    /// again on its next tick even though their snapshot has not changed.
    async fn clear_drafts(&self) {
        let Some(store) = &self.store else {
            return;
        };
        if let Err(e) = clear_drafts(store.as_ref()).await {
            tracing::warn!("[Autosave] Failed to clear drafts: {}", e);
        }

        let dirty_left = lock(&self.tabs).tabs().any(|tab| tab.is_dirty());
        if dirty_left && let Some(handle) = lock(&self.autosave).as_ref() {
            tracing::debug!("[Autosave] Unsaved tabs remain, rewriting drafts on next tick");
            handle.reset_baseline();
        }
    }

    /// Schedules preview and lint for whatever tab is active now.
    fn refresh_active(&self) {
        let active = lock(&self.tabs)
            .active_tab()
            .map(|tab| (tab.content(), tab.buffer().revision()));

        if let Some((content, revision)) = active {
            self.preview.schedule(content.clone());
            self.lint.schedule(revision, content);
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::StatusLevel;
    use async_trait::async_trait;
    use dotpad_core::draft::{MemoryDraftStore, TAB_DRAFTS_KEY, save_tab_drafts};
    use dotpad_core::error::{DotpadError, Result as CoreResult};
    use dotpad_core::tabs::TextBuffer;
    use std::collections::HashMap;
    use std::path::Path;

    const SETTLE: Duration = Duration::from_secs(5);

    #[derive(Default)]
    struct MockRenderer {
        engines: Mutex<Vec<LayoutEngine>>,
    }

    #[async_trait]
    impl DiagramRenderer for MockRenderer {
        async fn render(&self, source: &str, engine: LayoutEngine) -> CoreResult<String> {
            self.engines.lock().unwrap().push(engine);
            if source.contains("broken") {
                return Err(DotpadError::render(
                    "Error: <stdin>: syntax error in line 1 near 'broken'\nmore detail",
                ));
            }
            Ok(format!("<svg><!-- {} --></svg>", source))
        }
    }

    #[derive(Default)]
    struct ScriptedDialog {
        open_path: Option<PathBuf>,
        save_path: Option<PathBuf>,
        answer: bool,
        prompts: Mutex<Vec<String>>,
        save_requests: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl DialogService for ScriptedDialog {
        async fn pick_open_path(&self) -> Option<PathBuf> {
            self.open_path.clone()
        }

        async fn pick_save_path(&self, default_name: &str) -> Option<PathBuf> {
            self.save_requests
                .lock()
                .unwrap()
                .push(default_name.to_string());
            self.save_path.clone()
        }

        async fn confirm(&self, _title: &str, message: &str) -> bool {
            self.prompts.lock().unwrap().push(message.to_string());
            self.answer
        }
    }

    #[derive(Default)]
    struct MemoryIo {
        files: Mutex<HashMap<PathBuf, String>>,
    }

    #[async_trait]
    impl DocumentIo for MemoryIo {
        async fn read_to_string(&self, path: &Path) -> CoreResult<String> {
            self.files
                .lock()
                .unwrap()
                .get(path)
                .cloned()
                .ok_or_else(|| DotpadError::io(format!("{} not found", path.display())))
        }

        async fn write(&self, path: &Path, contents: &str) -> CoreResult<()> {
            self.files
                .lock()
                .unwrap()
                .insert(path.to_path_buf(), contents.to_string());
            Ok(())
        }
    }

    /// Writes after a delay so edits can land mid-save.
    #[derive(Default)]
    struct SlowIo {
        inner: MemoryIo,
    }

    #[async_trait]
    impl DocumentIo for SlowIo {
        async fn read_to_string(&self, path: &Path) -> CoreResult<String> {
            self.inner.read_to_string(path).await
        }

        async fn write(&self, path: &Path, contents: &str) -> CoreResult<()> {
            tokio::time::sleep(Duration::from_millis(100)).await;
            self.inner.write(path, contents).await
        }
    }

    struct Fixture {
        editor: EditorUseCase<TextBuffer>,
        renderer: Arc<MockRenderer>,
        store: Arc<MemoryDraftStore>,
    }

    fn fixture() -> Fixture {
        let renderer = Arc::new(MockRenderer::default());
        let store = Arc::new(MemoryDraftStore::new());
        let editor = EditorUseCase::new(
            renderer.clone(),
            Some(store.clone() as Arc<dyn DraftStore>),
            &EditorConfig::default(),
        );
        Fixture {
            editor,
            renderer,
            store,
        }
    }

    fn draft(content: &str, path: Option<&str>) -> TabDraft {
        TabDraft {
            content: content.to_string(),
            file_path: path.map(PathBuf::from),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn initial_tab_is_clean_and_rendered() {
        let f = fixture();

        let id = f.editor.open_initial_tab();
        assert_eq!(id, Some(TabId::new(1)));
        assert_eq!(f.editor.status().current().level, StatusLevel::Loading);

        tokio::time::sleep(SETTLE).await;

        assert_eq!(f.editor.active_content().as_deref(), Some(DEFAULT_SNIPPET));
        assert_eq!(
            f.editor.active_file_status().as_deref(),
            Some("Untitled - Not saved yet")
        );
        assert!(matches!(f.editor.preview(), PreviewState::Rendered(_)));
        assert_eq!(
            f.editor.status().current().message,
            "Preview updated successfully"
        );
        assert!(f.editor.lint_report().unwrap().is_clean());
    }

    #[tokio::test(start_paused = true)]
    async fn eleventh_tab_is_refused_with_notice() {
        let f = fixture();
        f.editor.open_initial_tab();
        for i in 1..MAX_TABS {
            assert!(f.editor.new_tab(&format!("digraph g{} {{}}", i), None).is_some());
        }

        assert!(f.editor.new_tab("digraph extra {}", None).is_none());

        assert_eq!(f.editor.tab_count(), MAX_TABS);
        let status = f.editor.status().current();
        assert_eq!(status.message, "Maximum 10 tabs reached");
        assert_eq!(status.level, StatusLevel::Info);
    }

    #[tokio::test(start_paused = true)]
    async fn last_tab_cannot_be_closed() {
        let f = fixture();
        let id = f.editor.open_initial_tab().unwrap();

        assert_eq!(f.editor.close_tab(id), Some(id));
        assert_eq!(f.editor.tab_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn closing_active_tab_renders_replacement() {
        let f = fixture();
        f.editor.open_initial_tab();
        let second = f.editor.new_tab("digraph second {}", None).unwrap();
        tokio::time::sleep(SETTLE).await;

        let active = f.editor.close_tab(second);
        tokio::time::sleep(SETTLE).await;

        assert_eq!(active, Some(TabId::new(1)));
        match f.editor.preview() {
            PreviewState::Rendered(svg) => assert!(svg.contains("digraph G")),
            other => panic!("unexpected preview: {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn navigation_wraps_and_renders_settled_tab() {
        let f = fixture();
        f.editor.open_initial_tab();
        f.editor.new_tab("digraph two {}", None);
        f.editor.new_tab("digraph three {}", None);

        assert_eq!(f.editor.next_tab(), Some(TabId::new(1)));
        assert_eq!(f.editor.previous_tab(), Some(TabId::new(3)));
        assert_eq!(f.editor.previous_tab(), Some(TabId::new(2)));
        tokio::time::sleep(SETTLE).await;

        assert_eq!(
            f.editor.preview(),
            PreviewState::Rendered("<svg><!-- digraph two {} --></svg>".to_string())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn edits_mark_dirty_until_committed() {
        let f = fixture();
        f.editor.open_initial_tab();

        assert!(f.editor.edit_active("digraph { a -> b }"));
        assert_eq!(
            f.editor.active_file_status().as_deref(),
            Some("Untitled - Unsaved changes")
        );

        f.editor.commit_active(false).await;
        assert_eq!(
            f.editor.active_file_status().as_deref(),
            Some("Untitled - Not saved yet")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn render_failure_reaches_status_line() {
        let f = fixture();
        f.editor.open_initial_tab();

        f.editor.edit_active("digraph { broken");
        tokio::time::sleep(SETTLE).await;

        let status = f.editor.status().current();
        assert_eq!(
            status.message,
            "Render failed: Error: <stdin>: syntax error in line 1 near 'broken'"
        );
        assert_eq!(status.level, StatusLevel::Error);
        let report = f.editor.lint_report().unwrap();
        assert_eq!(report.diagnostics.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn engine_change_rerenders_with_new_engine() {
        let f = fixture();
        f.editor.open_initial_tab();
        tokio::time::sleep(SETTLE).await;

        f.editor.set_engine(LayoutEngine::Circo);
        tokio::time::sleep(SETTLE).await;

        let engines = f.renderer.engines.lock().unwrap().clone();
        assert_eq!(engines.first(), Some(&LayoutEngine::Dot));
        assert_eq!(engines.last(), Some(&LayoutEngine::Circo));
    }

    #[tokio::test(start_paused = true)]
    async fn save_as_for_untitled_then_clears_drafts() {
        let f = fixture();
        f.editor.open_initial_tab();
        f.editor.edit_active("digraph { saved }");
        save_tab_drafts(f.store.as_ref(), &[draft("digraph { saved }", None)])
            .await
            .unwrap();
        let dialog = ScriptedDialog {
            save_path: Some(PathBuf::from("/work/flow.dot")),
            ..Default::default()
        };
        let io = MemoryIo::default();

        let saved = f.editor.save_active(&dialog, &io).await.unwrap();

        assert_eq!(saved, Some(PathBuf::from("/work/flow.dot")));
        assert_eq!(*dialog.save_requests.lock().unwrap(), vec!["diagram.dot"]);
        assert_eq!(
            io.files.lock().unwrap()[Path::new("/work/flow.dot")],
            "digraph { saved }"
        );
        let status = f.editor.active_file_status().unwrap();
        assert!(status.starts_with("flow.dot - Saved "), "{}", status);
        assert!(f.store.snapshot().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn edit_during_save_stays_dirty() {
        let f = fixture();
        f.editor.open_initial_tab();
        f.editor.set_active_path(Some(PathBuf::from("/work/a.dot")));
        f.editor.edit_active("digraph { v1 }");
        let io = SlowIo::default();
        let dialog = ScriptedDialog::default();

        let (saved, _) = tokio::join!(f.editor.save_active(&dialog, &io), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            f.editor.edit_active("digraph { v2 unsaved }")
        });

        assert_eq!(saved.unwrap(), Some(PathBuf::from("/work/a.dot")));
        assert_eq!(
            io.inner.files.lock().unwrap()[Path::new("/work/a.dot")],
            "digraph { v1 }"
        );
        assert_eq!(
            f.editor.active_content().as_deref(),
            Some("digraph { v2 unsaved }")
        );
        assert_eq!(
            f.editor.active_file_status().as_deref(),
            Some("a.dot - Unsaved changes")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn autosave_rewrites_other_tabs_after_save() {
        let f = fixture();
        f.editor.open_initial_tab();
        f.editor.set_active_path(Some(PathBuf::from("/work/one.dot")));
        f.editor.new_tab("digraph two {}", None);
        f.editor.edit_active("digraph two { unsaved }");
        assert!(f.editor.start_autosave());
        tokio::time::sleep(Duration::from_secs(31)).await;
        assert!(f.store.get(TAB_DRAFTS_KEY).await.unwrap().is_some());

        f.editor.switch_to(TabId::new(1));
        f.editor
            .save_active(&ScriptedDialog::default(), &MemoryIo::default())
            .await
            .unwrap();
        assert_eq!(f.store.get(TAB_DRAFTS_KEY).await.unwrap(), None);

        tokio::time::sleep(Duration::from_secs(30)).await;

        let stored = f.store.get(TAB_DRAFTS_KEY).await.unwrap().unwrap();
        assert_eq!(stored["tabs"][1]["content"], "digraph two { unsaved }");
        f.editor.stop_autosave();
    }

    #[tokio::test(start_paused = true)]
    async fn save_with_every_tab_clean_leaves_drafts_cleared() {
        let f = fixture();
        f.editor.open_initial_tab();
        f.editor.set_active_path(Some(PathBuf::from("/work/one.dot")));
        f.editor.edit_active("digraph { one }");
        assert!(f.editor.start_autosave());
        tokio::time::sleep(Duration::from_secs(31)).await;

        f.editor
            .save_active(&ScriptedDialog::default(), &MemoryIo::default())
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_secs(60)).await;

        assert_eq!(f.store.get(TAB_DRAFTS_KEY).await.unwrap(), None);
        f.editor.stop_autosave();
    }

    #[tokio::test(start_paused = true)]
    async fn save_without_dialog_when_path_known() {
        let f = fixture();
        f.editor.open_initial_tab();
        f.editor.set_active_path(Some(PathBuf::from("/work/known.dot")));
        let dialog = ScriptedDialog::default();
        let io = MemoryIo::default();

        let saved = f.editor.save_active(&dialog, &io).await.unwrap();

        assert_eq!(saved, Some(PathBuf::from("/work/known.dot")));
        assert!(dialog.save_requests.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn dismissed_save_dialog_writes_nothing() {
        let f = fixture();
        f.editor.open_initial_tab();
        let io = MemoryIo::default();

        let saved = f
            .editor
            .save_active(&ScriptedDialog::default(), &io)
            .await
            .unwrap();

        assert_eq!(saved, None);
        assert!(io.files.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn open_file_adds_clean_tab() {
        let f = fixture();
        f.editor.open_initial_tab();
        let io = MemoryIo::default();
        io.write(Path::new("/work/net.gv"), "graph { a -- b }")
            .await
            .unwrap();
        let dialog = ScriptedDialog {
            open_path: Some(PathBuf::from("/work/net.gv")),
            ..Default::default()
        };

        let id = f.editor.open_file(&dialog, &io).await.unwrap();

        assert_eq!(id, Some(TabId::new(2)));
        assert_eq!(
            f.editor.active_file_status().as_deref(),
            Some("net.gv - Opened from disk")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn open_missing_file_is_an_error() {
        let f = fixture();
        f.editor.open_initial_tab();
        let dialog = ScriptedDialog {
            open_path: Some(PathBuf::from("/work/missing.dot")),
            ..Default::default()
        };

        let err = f
            .editor
            .open_file(&dialog, &MemoryIo::default())
            .await
            .unwrap_err();

        assert!(err.to_string().contains("missing.dot"));
        assert_eq!(f.editor.tab_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn accepted_recovery_replays_every_tab() {
        let f = fixture();
        f.editor.open_initial_tab();
        let drafts = vec![
            draft("digraph one {}", Some("/work/one.dot")),
            draft("digraph two {}", None),
            draft("digraph three {}", Some("/work/three.dot")),
        ];
        save_tab_drafts(f.store.as_ref(), &drafts).await.unwrap();
        let dialog = ScriptedDialog {
            answer: true,
            ..Default::default()
        };

        assert!(f.editor.recover(&dialog).await);

        assert_eq!(f.editor.drafts(), drafts);
        assert_eq!(f.editor.active_id(), Some(TabId::new(1)));
        assert_eq!(
            f.editor.active_file_status().as_deref(),
            Some("one.dot - Unsaved changes")
        );
        assert!(dialog.prompts.lock().unwrap()[0].contains("with 3 tabs."));
        assert_eq!(f.store.get(TAB_DRAFTS_KEY).await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn declined_recovery_still_discards() {
        let f = fixture();
        f.editor.open_initial_tab();
        save_tab_drafts(f.store.as_ref(), &[draft("digraph lost {}", None)])
            .await
            .unwrap();

        assert!(!f.editor.recover(&ScriptedDialog::default()).await);

        assert_eq!(f.editor.tab_count(), 1);
        assert_eq!(f.editor.active_content().as_deref(), Some(DEFAULT_SNIPPET));
        assert!(f.store.snapshot().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn nothing_to_recover_skips_prompt() {
        let f = fixture();
        f.editor.open_initial_tab();
        let dialog = ScriptedDialog::default();

        assert!(!f.editor.recover(&dialog).await);
        assert!(dialog.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn autosave_writes_all_tabs_and_reports() {
        let f = fixture();
        f.editor.open_initial_tab();
        f.editor.new_tab("digraph second {}", Some(PathBuf::from("/work/2.dot")));
        assert!(f.editor.start_autosave());

        tokio::time::sleep(Duration::from_secs(31)).await;

        let stored = f.store.get(TAB_DRAFTS_KEY).await.unwrap().unwrap();
        assert_eq!(stored["tabs"][1]["content"], "digraph second {}");
        assert_eq!(stored["tabs"][1]["filePath"], "/work/2.dot");
        assert_eq!(f.editor.status().current().message, "Draft saved");

        f.editor.stop_autosave();
    }

    #[tokio::test(start_paused = true)]
    async fn without_store_autosave_and_recovery_are_off() {
        let editor: EditorUseCase<TextBuffer> = EditorUseCase::new(
            Arc::new(MockRenderer::default()),
            None,
            &EditorConfig::default(),
        );
        editor.open_initial_tab();

        assert!(!editor.start_autosave());
        assert!(!editor.recover(&ScriptedDialog::default()).await);
    }
}
