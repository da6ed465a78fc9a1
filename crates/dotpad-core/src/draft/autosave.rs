//! Periodic draft persistence.

use super::model::TabDraft;
use super::persist::{save_draft, save_tab_drafts};
use super::store::DraftStore;
use crate::config::DEFAULT_AUTOSAVE_INTERVAL_SECS;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;

/// Where autosave writes its snapshots.
#[async_trait]
pub trait AutosaveTarget: Send + Sync + 'static {
    /// What gets compared between ticks and written when it changed.
    type Snapshot: Clone + PartialEq + Send + Sync + 'static;

    async fn persist(&self, snapshot: &Self::Snapshot) -> Result<()>;
}

/// Single-document drafts under the legacy keys.
#[derive(Clone)]
pub struct LegacyDraftTarget {
    store: Arc<dyn DraftStore>,
}

impl LegacyDraftTarget {
    pub fn new(store: Arc<dyn DraftStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AutosaveTarget for LegacyDraftTarget {
    type Snapshot = TabDraft;

    async fn persist(&self, snapshot: &TabDraft) -> Result<()> {
        save_draft(self.store.as_ref(), snapshot).await
    }
}

/// Every open tab under the multi-document key.
#[derive(Clone)]
pub struct TabDraftsTarget {
    store: Arc<dyn DraftStore>,
}

impl TabDraftsTarget {
    pub fn new(store: Arc<dyn DraftStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AutosaveTarget for TabDraftsTarget {
    type Snapshot = Vec<TabDraft>;

    async fn persist(&self, snapshot: &Vec<TabDraft>) -> Result<()> {
        save_tab_drafts(self.store.as_ref(), snapshot).await
    }
}

/// Result of one autosave tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Snapshot equals the last persisted one; nothing written.
    Unchanged,
    Saved,
    /// Write failed; the next tick retries.
    Failed,
}

/// Change detection between ticks.
///
/// The baseline only moves on a successful write, so a failed write is retried
/// on the next tick even if nothing else changed.
#[derive(Debug)]
pub struct AutosaveTicker<S> {
    last_saved: Option<S>,
}

impl<S> Default for AutosaveTicker<S> {
    fn default() -> Self {
        Self { last_saved: None }
    }
}

impl<S: Clone + PartialEq + Send + Sync + 'static> AutosaveTicker<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_saved(&self) -> Option<&S> {
        self.last_saved.as_ref()
    }

    /// Forgets the baseline so the next tick writes whatever it is given.
    pub fn reset(&mut self) {
        self.last_saved = None;
    }

    pub async fn tick<T>(&mut self, snapshot: S, target: &T) -> TickOutcome
    where
        T: AutosaveTarget<Snapshot = S>,
    {
        if self.last_saved.as_ref() == Some(&snapshot) {
            return TickOutcome::Unchanged;
        }

        match target.persist(&snapshot).await {
            Ok(()) => {
                self.last_saved = Some(snapshot);
                TickOutcome::Saved
            }
            Err(e) => {
                tracing::warn!("[Autosave] Failed to save draft: {}", e);
                TickOutcome::Failed
            }
        }
    }
}

/// Runs an [`AutosaveTicker`] on a fixed interval.
#[derive(Debug, Clone, Copy)]
pub struct AutosaveScheduler {
    interval: Duration,
}

impl Default for AutosaveScheduler {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_AUTOSAVE_INTERVAL_SECS))
    }
}

impl AutosaveScheduler {
    /// A zero interval falls back to the default.
    pub fn new(interval: Duration) -> Self {
        let interval = if interval.is_zero() {
            Duration::from_secs(DEFAULT_AUTOSAVE_INTERVAL_SECS)
        } else {
            interval
        };
        Self { interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Starts ticking.
    ///
    /// The first tick happens one interval after this call. On every tick
    /// `provider` is sampled and, if the snapshot changed, written to `target`;
    /// `on_saved` runs after each successful write. Ticks run on one task and
    /// never overlap; a slow write delays the following ticks.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start<T, P, F>(&self, provider: P, target: T, on_saved: F) -> AutosaveHandle
    where
        T: AutosaveTarget,
        P: Fn() -> T::Snapshot + Send + Sync + 'static,
        F: Fn() + Send + Sync + 'static,
    {
        let period = self.interval;
        let token = CancellationToken::new();
        let cancelled = token.clone();
        let reset = Arc::new(AtomicBool::new(false));
        let reset_requested = reset.clone();

        let task = tokio::spawn(async move {
            let mut ticker = AutosaveTicker::new();
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            tracing::info!("[Autosave] Started ({:?} interval)", period);

            loop {
                tokio::select! {
                    biased;
                    _ = cancelled.cancelled() => break,
                    _ = interval.tick() => {}
                }

                if reset_requested.swap(false, Ordering::SeqCst) {
                    ticker.reset();
                }

                match ticker.tick(provider(), &target).await {
                    TickOutcome::Saved => {
                        tracing::debug!("[Autosave] Draft saved");
                        on_saved();
                    }
                    TickOutcome::Unchanged => tracing::debug!("[Autosave] No changes"),
                    TickOutcome::Failed => {}
                }
            }

            tracing::info!("[Autosave] Stopped");
        });

        AutosaveHandle { token, reset, task }
    }
}

/// Stops an autosave loop when told to or when dropped.
#[derive(Debug)]
pub struct AutosaveHandle {
    token: CancellationToken,
    reset: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl AutosaveHandle {
    /// Prevents further ticks. A write already in progress still completes.
    pub fn stop(&self) {
        self.token.cancel();
    }

    /// Makes the next tick write even if the snapshot did not change.
    ///
    /// Needed after something else deleted the stored drafts.
    pub fn reset_baseline(&self) {
        self.reset.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Whether the loop task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for AutosaveHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
