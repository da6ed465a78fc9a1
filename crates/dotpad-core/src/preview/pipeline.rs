use crate::config::DEFAULT_RENDER_DELAY_MS;
use crate::engine::LayoutEngine;
use crate::renderer::DiagramRenderer;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Placeholder shown for empty documents.
pub const EMPTY_PREVIEW_MESSAGE: &str = "Add DOT markup to see the preview.";

/// Headline shown when the layout engine rejects a document.
pub const RENDER_FAILED_MESSAGE: &str = "Graphviz could not render this diagram.";

/// What the preview surface currently shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PreviewState {
    /// Nothing committed yet.
    #[default]
    Idle,
    Placeholder(String),
    /// Rendered SVG document.
    Rendered(String),
    Failed {
        message: String,
        details: String,
    },
}

/// Progress notifications from a [`RenderPipeline`].
///
/// Every method defaults to a no-op. Callbacks run on the runtime's worker
/// threads and must not block.
pub trait RenderStatusListener: Send + Sync {
    /// A render was requested. Fires synchronously inside `schedule`.
    fn on_render_start(&self) {}

    fn on_render_success(&self) {}

    /// The document was empty; `reason` is the placeholder text.
    fn on_render_empty(&self, _reason: &str) {}

    /// The layout engine failed; `details` is its message.
    fn on_render_error(&self, _details: &str) {}
}

struct Silent;

impl RenderStatusListener for Silent {}

/// Debounced, most-recent-wins preview rendering.
///
/// Cloning yields another handle to the same pipeline (shared token counter
/// and preview).
#[derive(Clone)]
pub struct RenderPipeline {
    inner: Arc<Inner>,
}

struct Inner {
    renderer: Arc<dyn DiagramRenderer>,
    listener: Arc<dyn RenderStatusListener>,
    delay: Duration,
    latest: AtomicU64,
    engine: Mutex<LayoutEngine>,
    preview: Mutex<PreviewState>,
}

impl RenderPipeline {
    pub fn new(renderer: Arc<dyn DiagramRenderer>) -> Self {
        Self::with_listener(renderer, Arc::new(Silent))
    }

    pub fn with_listener(
        renderer: Arc<dyn DiagramRenderer>,
        listener: Arc<dyn RenderStatusListener>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                renderer,
                listener,
                delay: Duration::from_millis(DEFAULT_RENDER_DELAY_MS),
                latest: AtomicU64::new(0),
                engine: Mutex::new(LayoutEngine::default()),
                preview: Mutex::new(PreviewState::Idle),
            }),
        }
    }

    /// Replaces the quiet period. Only takes effect before the pipeline is cloned.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        match Arc::get_mut(&mut self.inner) {
            Some(inner) => inner.delay = delay,
            None => tracing::warn!("[Preview] Pipeline already shared, keeping its render delay"),
        }
        self
    }

    /// Requests a render of `source`.
    ///
    /// Returns immediately with the request's token. After the quiet period the
    /// request proceeds only if no newer one was made. Failures are reported to
    /// the listener and the preview, never to the caller.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule(&self, source: impl Into<String>) -> u64 {
        let source = source.into();
        let token = self.inner.latest.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.listener.on_render_start();

        let inner = self.inner.clone();
        tokio::spawn(async move {
            inner.run(token, source).await;
        });

        token
    }

    /// Layout engine used by renders that have not reached the engine yet.
    pub fn set_engine(&self, engine: LayoutEngine) {
        *lock(&self.inner.engine) = engine;
    }

    pub fn engine(&self) -> LayoutEngine {
        *lock(&self.inner.engine)
    }

    pub fn preview(&self) -> PreviewState {
        lock(&self.inner.preview).clone()
    }

    /// Token of the most recent request; 0 before the first one.
    pub fn latest_token(&self) -> u64 {
        self.inner.latest.load(Ordering::SeqCst)
    }

    pub fn delay(&self) -> Duration {
        self.inner.delay
    }
}

impl Inner {
    fn is_current(&self, token: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == token
    }

    async fn run(&self, token: u64, source: String) {
        tokio::time::sleep(self.delay).await;
        if !self.is_current(token) {
            tracing::debug!("[Preview] Request {} superseded before rendering", token);
            return;
        }

        let trimmed = source.trim();
        if trimmed.is_empty() {
            self.commit(PreviewState::Placeholder(EMPTY_PREVIEW_MESSAGE.to_string()));
            self.listener.on_render_empty(EMPTY_PREVIEW_MESSAGE);
            return;
        }

        let engine = *lock(&self.engine);
        let result = self.renderer.render(trimmed, engine).await;

        if !self.is_current(token) {
            tracing::debug!("[Preview] Discarding result of superseded request {}", token);
            return;
        }

        match result {
            Ok(svg) => {
                self.commit(PreviewState::Rendered(svg));
                self.listener.on_render_success();
            }
            Err(e) => {
                let details = e.detail();
                tracing::warn!("[Preview] Render failed ({}): {}", engine, details);
                self.commit(PreviewState::Failed {
                    message: RENDER_FAILED_MESSAGE.to_string(),
                    details: details.clone(),
                });
                self.listener.on_render_error(&details);
            }
        }
    }

    fn commit(&self, state: PreviewState) {
        *lock(&self.preview) = state;
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
