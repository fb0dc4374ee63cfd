//! Tab state machine.
//!
//! [`TabState`] is the authoritative ordered set of open tabs, the active tab,
//! and the pinned set. Transitions are plain synchronous methods; the
//! [`Workspace`](crate::Workspace) decides whether a transition needs the
//! navigation guard by applying it to a clone first and comparing active keys.
//!
//! Invariants held by every method:
//! - the home tab is open, pinned, and at index 0
//! - the active key names an open tab
//! - the pinned set only names open tabs
//! - `open` never grows the list past `max_tabs`

use std::collections::BTreeSet;

use crate::error::WorkspaceError;
use crate::models::{Tab, TabKey};

/// Result of a successful [`TabState::open`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOutcome {
    /// A new tab was appended and activated.
    Opened,
    /// The tab was already open and has been activated.
    Activated,
}

/// Ordered open tabs, active tab, and pinned set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabState {
    tabs: Vec<Tab>,
    active: TabKey,
    pinned: BTreeSet<TabKey>,
    home: TabKey,
    max_tabs: usize,
}

impl TabState {
    /// Fresh state holding only the home tab, pinned and active.
    pub fn new(home: Tab, max_tabs: usize) -> Self {
        let home_key = home.key().clone();
        Self {
            tabs: vec![home],
            active: home_key.clone(),
            pinned: BTreeSet::from([home_key.clone()]),
            home: home_key,
            max_tabs: max_tabs.max(1),
        }
    }

    /// Rebuild state from a stored snapshot.
    ///
    /// Duplicates and stored copies of the home tab are dropped, the home tab
    /// is forced to index 0, and the list is cut at `max_tabs`. The stored
    /// active key is kept only if it survived.
    pub fn restore(
        home: Tab,
        max_tabs: usize,
        tabs: impl IntoIterator<Item = Tab>,
        active: Option<&TabKey>,
    ) -> Self {
        let mut state = Self::new(home, max_tabs);
        for tab in tabs {
            if state.contains(tab.key()) {
                continue;
            }
            if state.tabs.len() >= state.max_tabs {
                tracing::warn!(key = %tab.key(), max = state.max_tabs, "Dropping restored tab over limit");
                continue;
            }
            state.tabs.push(tab);
        }
        if let Some(active) = active.filter(|key| state.contains(key)) {
            state.active = active.clone();
        }
        state
    }

    // ========== Queries ==========

    /// Open tabs in display order.
    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    /// Always false: the home tab cannot be closed.
    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn active_key(&self) -> &TabKey {
        &self.active
    }

    /// The active tab.
    pub fn active_tab(&self) -> Option<&Tab> {
        self.get(&self.active)
    }

    pub fn home_key(&self) -> &TabKey {
        &self.home
    }

    pub fn max_tabs(&self) -> usize {
        self.max_tabs
    }

    pub fn pinned_keys(&self) -> &BTreeSet<TabKey> {
        &self.pinned
    }

    pub fn is_home(&self, key: &TabKey) -> bool {
        self.home == *key
    }

    pub fn is_pinned(&self, key: &TabKey) -> bool {
        self.pinned.contains(key)
    }

    pub fn contains(&self, key: &TabKey) -> bool {
        self.position(key).is_some()
    }

    /// Index of a tab in display order.
    pub fn position(&self, key: &TabKey) -> Option<usize> {
        self.tabs.iter().position(|tab| tab.key() == key)
    }

    pub fn get(&self, key: &TabKey) -> Option<&Tab> {
        self.tabs.iter().find(|tab| tab.key() == key)
    }

    /// Whether a tab is open and not pinned.
    pub fn is_closable(&self, key: &TabKey) -> bool {
        self.contains(key) && !self.is_pinned(key)
    }

    // ========== Transitions ==========

    /// Open a tab, or activate it if its key is already open.
    pub fn open(&mut self, tab: Tab) -> Result<OpenOutcome, WorkspaceError> {
        if self.contains(tab.key()) {
            self.active = tab.key().clone();
            return Ok(OpenOutcome::Activated);
        }
        if self.tabs.len() >= self.max_tabs {
            return Err(WorkspaceError::tab_limit(self.max_tabs));
        }
        self.active = tab.key().clone();
        self.tabs.push(tab);
        Ok(OpenOutcome::Opened)
    }

    /// Make an open tab active.
    pub fn activate(&mut self, key: &TabKey) -> Result<(), WorkspaceError> {
        if !self.contains(key) {
            return Err(WorkspaceError::tab_not_open(key.as_str()));
        }
        self.active = key.clone();
        Ok(())
    }

    /// Close one tab and return the active key afterwards.
    ///
    /// Pinned and unknown keys are a no-op. Closing the active tab activates
    /// the last remaining tab, not the neighbour.
    pub fn close(&mut self, key: &TabKey) -> TabKey {
        if self.is_pinned(key) {
            return self.active.clone();
        }
        let Some(index) = self.position(key) else {
            return self.active.clone();
        };

        self.tabs.remove(index);
        if self.active == *key {
            self.active = self.last_key();
        }
        self.active.clone()
    }

    /// Keep `key` and the pinned tabs; activate home.
    pub fn close_others(&mut self, key: &TabKey) -> TabKey {
        self.retain_pinned_or(|_, tab| tab.key() == key);
        self.active = self.home.clone();
        self.active.clone()
    }

    /// Close every unpinned tab to the right of `key`.
    ///
    /// The active key is left alone if its tab survives; otherwise `key`
    /// becomes active. Unknown keys are a no-op.
    pub fn close_right(&mut self, key: &TabKey) -> TabKey {
        let Some(index) = self.position(key) else {
            return self.active.clone();
        };

        self.retain_pinned_or(|position, _| position <= index);
        if !self.contains(&self.active) {
            self.active = key.clone();
        }
        self.active.clone()
    }

    /// Keep only the pinned tabs; activate home.
    pub fn close_all(&mut self) -> TabKey {
        self.retain_pinned_or(|_, _| false);
        self.active = self.home.clone();
        self.active.clone()
    }

    /// Flip a tab's pinned state, returning the new state.
    ///
    /// Returns `None` for the home tab and for keys that are not open.
    pub fn toggle_pin(&mut self, key: &TabKey) -> Option<bool> {
        if self.is_home(key) || !self.contains(key) {
            return None;
        }
        if self.pinned.remove(key) {
            Some(false)
        } else {
            self.pinned.insert(key.clone());
            Some(true)
        }
    }

    /// Splice the tab at `from` into position `to`.
    ///
    /// Callers validate the move; see [`crate::reorder::plan_move`].
    pub(crate) fn move_tab(&mut self, from: usize, to: usize) {
        let tab = self.tabs.remove(from);
        self.tabs.insert(to, tab);
    }

    fn retain_pinned_or(&mut self, mut keep: impl FnMut(usize, &Tab) -> bool) -> usize {
        let before = self.tabs.len();
        let pinned = &self.pinned;
        let mut index = 0;
        self.tabs.retain(|tab| {
            let retained = pinned.contains(tab.key()) || keep(index, tab);
            index += 1;
            retained
        });
        before - self.tabs.len()
    }

    fn last_key(&self) -> TabKey {
        self.tabs.last().map(|tab| tab.key().clone()).unwrap_or_else(|| self.home.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(path: &str) -> TabKey {
        TabKey::parse(path).unwrap()
    }

    fn tab(path: &str) -> Tab {
        Tab::new(key(path), path.trim_start_matches('/'))
    }

    fn keys(state: &TabState) -> Vec<&str> {
        state.tabs().iter().map(|tab| tab.key().as_str()).collect()
    }

    fn state_with(paths: &[&str], max_tabs: usize) -> TabState {
        let mut state = TabState::new(tab("/home"), max_tabs);
        for path in paths {
            state.open(tab(path)).unwrap();
        }
        state
    }

    #[test]
    fn test_new_state_has_pinned_active_home() {
        let state = TabState::new(tab("/home"), 5);
        assert_eq!(keys(&state), vec!["/home"]);
        assert_eq!(state.active_key(), &key("/home"));
        assert!(state.is_pinned(&key("/home")));
        assert!(!state.is_empty());
    }

    #[test]
    fn test_open_appends_and_activates() {
        let mut state = TabState::new(tab("/home"), 5);
        assert_eq!(state.open(tab("/a")).unwrap(), OpenOutcome::Opened);
        assert_eq!(keys(&state), vec!["/home", "/a"]);
        assert_eq!(state.active_key(), &key("/a"));
    }

    #[test]
    fn test_open_existing_is_idempotent() {
        let mut state = state_with(&["/a", "/b"], 5);
        assert_eq!(state.open(tab("/a")).unwrap(), OpenOutcome::Activated);
        assert_eq!(keys(&state), vec!["/home", "/a", "/b"]);
        assert_eq!(state.active_key(), &key("/a"));
    }

    #[test]
    fn test_open_over_limit_leaves_state() {
        let mut state = state_with(&["/a"], 2);
        let before = state.clone();
        assert!(matches!(state.open(tab("/b")), Err(WorkspaceError::TabLimitReached { max: 2 })));
        assert_eq!(state, before);

        // Re-opening an existing tab at the limit still works
        assert_eq!(state.open(tab("/home")).unwrap(), OpenOutcome::Activated);
    }

    #[test]
    fn test_activate_unknown_fails() {
        let mut state = state_with(&["/a"], 5);
        assert!(matches!(state.activate(&key("/zzz")), Err(WorkspaceError::TabNotOpen { .. })));
        assert_eq!(state.active_key(), &key("/a"));
        state.activate(&key("/home")).unwrap();
        assert_eq!(state.active_key(), &key("/home"));
    }

    #[test]
    fn test_close_pinned_is_noop() {
        let mut state = state_with(&["/a", "/b"], 5);
        state.toggle_pin(&key("/a"));
        let before = state.clone();

        assert_eq!(state.close(&key("/a")), key("/b"));
        assert_eq!(state.close(&key("/home")), key("/b"));
        assert_eq!(state, before);
    }

    #[test]
    fn test_close_active_selects_last_tab() {
        let mut state = state_with(&["/a", "/b", "/c"], 5);
        state.activate(&key("/a")).unwrap();

        assert_eq!(state.close(&key("/a")), key("/c"));
        assert_eq!(keys(&state), vec!["/home", "/b", "/c"]);
    }

    #[test]
    fn test_close_inactive_keeps_active() {
        let mut state = state_with(&["/a", "/b"], 5);
        assert_eq!(state.close(&key("/a")), key("/b"));
        assert_eq!(keys(&state), vec!["/home", "/b"]);
        assert_eq!(state.close(&key("/missing")), key("/b"));
    }

    #[test]
    fn test_close_all_keeps_pinned_and_activates_home() {
        let mut state = state_with(&["/a", "/b"], 5);
        state.toggle_pin(&key("/a"));

        assert_eq!(state.close_all(), key("/home"));
        assert_eq!(keys(&state), vec!["/home", "/a"]);
    }

    #[test]
    fn test_close_others_activates_home() {
        let mut state = state_with(&["/a", "/b", "/c"], 5);
        state.toggle_pin(&key("/c"));

        assert_eq!(state.close_others(&key("/a")), key("/home"));
        assert_eq!(keys(&state), vec!["/home", "/a", "/c"]);
    }

    #[test]
    fn test_close_right_removes_unpinned_tail() {
        let mut state = state_with(&["/a", "/b", "/c"], 5);
        state.activate(&key("/home")).unwrap();

        assert_eq!(state.close_right(&key("/a")), key("/home"));
        assert_eq!(keys(&state), vec!["/home", "/a"]);
    }

    #[test]
    fn test_close_right_keeps_surviving_active() {
        let mut state = state_with(&["/a", "/b", "/c"], 5);
        state.activate(&key("/a")).unwrap();

        assert_eq!(state.close_right(&key("/b")), key("/a"));
        assert_eq!(keys(&state), vec!["/home", "/a", "/b"]);
    }

    #[test]
    fn test_close_right_moves_removed_active_to_anchor() {
        let mut state = state_with(&["/a", "/b", "/c"], 5);
        state.toggle_pin(&key("/c"));
        state.activate(&key("/b")).unwrap();

        assert_eq!(state.close_right(&key("/a")), key("/a"));
        assert_eq!(keys(&state), vec!["/home", "/a", "/c"]);
    }

    #[test]
    fn test_toggle_pin() {
        let mut state = state_with(&["/a"], 5);
        assert_eq!(state.toggle_pin(&key("/a")), Some(true));
        assert!(state.is_pinned(&key("/a")));
        assert_eq!(state.toggle_pin(&key("/a")), Some(false));
        assert!(!state.is_pinned(&key("/a")));

        assert_eq!(state.toggle_pin(&key("/home")), None);
        assert!(state.is_pinned(&key("/home")));
        assert_eq!(state.toggle_pin(&key("/missing")), None);
    }

    #[test]
    fn test_restore_forces_home_first_and_limit() {
        let stored = vec![tab("/a"), tab("/home"), tab("/a"), tab("/b"), tab("/c")];
        let state = TabState::restore(tab("/home"), 3, stored, Some(&key("/c")));

        assert_eq!(keys(&state), vec!["/home", "/a", "/b"]);
        assert_eq!(state.active_key(), &key("/home"));
        assert_eq!(state.pinned_keys().len(), 1);
    }

    #[test]
    fn test_restore_keeps_surviving_active() {
        let state = TabState::restore(tab("/home"), 5, vec![tab("/a")], Some(&key("/a")));
        assert_eq!(state.active_key(), &key("/a"));
        assert_eq!(state.active_tab().map(Tab::label), Some("a"));
    }
}
