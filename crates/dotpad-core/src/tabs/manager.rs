use super::buffer::BufferView;
use super::model::{Tab, TabId};
use crate::draft::TabDraft;
use std::path::PathBuf;

/// Maximum number of tabs open at the same time.
pub const MAX_TABS: usize = 10;

/// Owns the set of open tabs.
///
/// `TabManager` is responsible for:
/// - Enforcing the [`MAX_TABS`] limit
/// - Handing out increasing, never reused tab ids
/// - Tracking the single active tab, and keeping only its buffer visible
/// - Choosing the replacement when the active tab closes
///
/// Tabs are kept in a `Vec` in creation order; every positional rule (close
/// replacement, next/previous) is defined against that order. Refusals (unknown
/// id, capacity, last tab) are reported through the return value only.
#[derive(Debug)]
pub struct TabManager<B: BufferView> {
    tabs: Vec<Tab<B>>,
    active: Option<TabId>,
    next_id: u64,
}

impl<B: BufferView> Default for TabManager<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: BufferView> TabManager<B> {
    pub fn new() -> Self {
        Self {
            tabs: Vec::new(),
            active: None,
            next_id: 1,
        }
    }

    /// Creates a tab holding `content` and makes it active.
    ///
    /// The previously active tab is hidden but stays open.
    ///
    /// # Returns
    ///
    /// - `Some(tab)`: The new, active tab
    /// - `None`: [`MAX_TABS`] tabs are already open; nothing changed
    pub fn create_tab(&mut self, content: &str, file_path: Option<PathBuf>) -> Option<&Tab<B>> {
        if self.is_full() {
            tracing::debug!("[Tabs] Refusing new tab: limit of {} reached", MAX_TABS);
            return None;
        }

        let id = TabId::new(self.next_id);
        self.next_id += 1;

        self.tabs.push(Tab::new(id, file_path, content));
        self.activate(id);

        tracing::debug!("[Tabs] Created {}", id);
        self.tab(id)
    }

    /// Closes a tab.
    ///
    /// Unknown ids and the last remaining tab are refused; the current active
    /// tab is returned unchanged in both cases. Otherwise the tab and its buffer
    /// are dropped and, if it was active, the tab to its right (or, failing
    /// that, to its left) becomes active.
    ///
    /// # Returns
    ///
    /// The active tab after the call.
    pub fn close_tab(&mut self, id: TabId) -> Option<&Tab<B>> {
        if self.tabs.len() <= 1 {
            return self.active_tab();
        }
        self.remove_tab(id)
    }

    /// Removes a tab without the last-tab guard.
    ///
    /// Removing the only tab leaves the manager empty with no active tab. The
    /// replacement rule is the same as [`Self::close_tab`].
    pub fn remove_tab(&mut self, id: TabId) -> Option<&Tab<B>> {
        let Some(index) = self.position(id) else {
            return self.active_tab();
        };

        let was_active = self.active == Some(id);
        let last_index = self.tabs.len() - 1;
        drop(self.tabs.remove(index));
        tracing::debug!("[Tabs] Closed {}", id);

        if self.tabs.is_empty() {
            self.active = None;
            return None;
        }

        if was_active {
            // Right neighbour has shifted into `index`; fall back to the left one.
            let replacement = if index < last_index { index } else { index - 1 };
            let replacement_id = self.tabs[replacement].id();
            self.active = None;
            self.activate(replacement_id);
        }

        self.active_tab()
    }

    /// Makes `id` the active tab.
    ///
    /// # Returns
    ///
    /// - `Some(tab)`: The now active tab (also when it already was active)
    /// - `None`: Unknown id; nothing changed
    pub fn switch_to(&mut self, id: TabId) -> Option<&Tab<B>> {
        self.position(id)?;
        if self.active != Some(id) {
            self.activate(id);
        }
        self.tab(id)
    }

    /// The tab after the active one in creation order, wrapping around.
    ///
    /// `None` with fewer than two tabs. Does not switch.
    pub fn next_tab(&self) -> Option<&Tab<B>> {
        self.neighbour(1)
    }

    /// The tab before the active one in creation order, wrapping around.
    ///
    /// `None` with fewer than two tabs. Does not switch.
    pub fn previous_tab(&self) -> Option<&Tab<B>> {
        self.neighbour(self.tabs.len().saturating_sub(1))
    }

    pub fn active_id(&self) -> Option<TabId> {
        self.active
    }

    pub fn active_tab(&self) -> Option<&Tab<B>> {
        self.active.and_then(|id| self.tab(id))
    }

    pub fn active_tab_mut(&mut self) -> Option<&mut Tab<B>> {
        let id = self.active?;
        self.tab_mut(id)
    }

    pub fn tab(&self, id: TabId) -> Option<&Tab<B>> {
        self.tabs.iter().find(|tab| tab.id() == id)
    }

    pub fn tab_mut(&mut self, id: TabId) -> Option<&mut Tab<B>> {
        self.tabs.iter_mut().find(|tab| tab.id() == id)
    }

    /// All tabs in creation order.
    pub fn tabs(&self) -> impl Iterator<Item = &Tab<B>> {
        self.tabs.iter()
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.tabs.len() >= MAX_TABS
    }

    /// Draft snapshot of every tab, in creation order.
    pub fn drafts(&self) -> Vec<TabDraft> {
        self.tabs.iter().map(Tab::to_draft).collect()
    }

    fn position(&self, id: TabId) -> Option<usize> {
        self.tabs.iter().position(|tab| tab.id() == id)
    }

    fn neighbour(&self, step: usize) -> Option<&Tab<B>> {
        if self.tabs.len() < 2 {
            return None;
        }
        let index = self.position(self.active?)?;
        self.tabs.get((index + step) % self.tabs.len())
    }

    fn activate(&mut self, id: TabId) {
        if let Some(previous) = self.active.and_then(|previous| self.tab_mut(previous)) {
            previous.buffer_mut().set_visible(false);
        }
        if let Some(tab) = self.tab_mut(id) {
            tab.buffer_mut().set_visible(true);
        }
        self.active = Some(id);
    }
}
