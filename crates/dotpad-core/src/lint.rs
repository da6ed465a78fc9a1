//! Debounced validation of the active document.
//!
//! Works like the preview pipeline but reports positioned diagnostics for an
//! editor gutter. Reports are tagged with the buffer revision they were
//! computed for.

use crate::config::DEFAULT_LINT_DELAY_MS;
use crate::diagnostic::LintDiagnostic;
use crate::engine::LayoutEngine;
use crate::renderer::DiagramRenderer;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Diagnostics for one buffer revision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintReport {
    pub revision: u64,
    pub diagnostics: Vec<LintDiagnostic>,
}

impl LintReport {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

pub trait LintListener: Send + Sync {
    fn on_lint(&self, _report: &LintReport) {}
}

struct Silent;

impl LintListener for Silent {}

#[derive(Clone)]
pub struct LintPipeline {
    inner: Arc<Inner>,
}

struct Inner {
    renderer: Arc<dyn DiagramRenderer>,
    listener: Arc<dyn LintListener>,
    delay: Duration,
    latest: AtomicU64,
    engine: Mutex<LayoutEngine>,
    report: Mutex<Option<LintReport>>,
}

impl LintPipeline {
    pub fn new(renderer: Arc<dyn DiagramRenderer>) -> Self {
        Self::with_listener(renderer, Arc::new(Silent))
    }

    pub fn with_listener(
        renderer: Arc<dyn DiagramRenderer>,
        listener: Arc<dyn LintListener>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                renderer,
                listener,
                delay: Duration::from_millis(DEFAULT_LINT_DELAY_MS),
                latest: AtomicU64::new(0),
                engine: Mutex::new(LayoutEngine::default()),
                report: Mutex::new(None),
            }),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        match Arc::get_mut(&mut self.inner) {
            Some(inner) => inner.delay = delay,
            None => tracing::warn!("[Lint] Pipeline already shared, keeping its delay"),
        }
        self
    }

    /// Requests validation of `text`, the content of buffer `revision`.
    ///
    /// Only the most recent request commits a report.
    pub fn schedule(&self, revision: u64, text: impl Into<String>) {
        let text = text.into();
        let request = self.inner.latest.fetch_add(1, Ordering::SeqCst) + 1;

        let inner = self.inner.clone();
        tokio::spawn(async move {
            inner.run(request, revision, text).await;
        });
    }

    pub fn set_engine(&self, engine: LayoutEngine) {
        *lock(&self.inner.engine) = engine;
    }

    /// Most recently committed report.
    pub fn report(&self) -> Option<LintReport> {
        lock(&self.inner.report).clone()
    }
}

impl Inner {
    fn is_current(&self, request: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == request
    }

    async fn run(&self, request: u64, revision: u64, text: String) {
        tokio::time::sleep(self.delay).await;
        if !self.is_current(request) {
            return;
        }

        let diagnostics = if text.trim().is_empty() {
            Vec::new()
        } else {
            let engine = *lock(&self.engine);
            let found = self.renderer.validate(&text, engine).await;
            if !self.is_current(request) {
                tracing::debug!("[Lint] Discarding result for revision {}", revision);
                return;
            }
            found.map(|d| vec![d.resolve(&text)]).unwrap_or_default()
        };

        let report = LintReport {
            revision,
            diagnostics,
        };
        *lock(&self.report) = Some(report.clone());
        self.listener.on_lint(&report);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
