//! Drag-and-drop reordering of the tab strip.
//!
//! The presentation layer owns pointer tracking; it reports which tab a drag
//! started on, which tab it is over, and when it ends. This module turns that
//! into a list splice while keeping the home tab fixed at index 0.

use crate::models::TabKey;
use crate::state::TabState;

/// A validated move of one tab to a new index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabMove {
    pub from: usize,
    pub to: usize,
}

/// Whether the presentation layer should allow dragging this tab.
pub fn is_draggable(state: &TabState, key: &TabKey) -> bool {
    state.contains(key) && !state.is_home(key)
}

/// Work out where `dragged` lands when dropped on `target`.
///
/// The dragged tab takes the target's current index and everything else keeps
/// its relative order. Returns `None` when the drop must be ignored: same tab,
/// the home tab being dragged, an unknown key, or a drop that would displace
/// the home tab from index 0.
pub fn plan_move(state: &TabState, dragged: &TabKey, target: &TabKey) -> Option<TabMove> {
    if dragged == target || state.is_home(dragged) {
        return None;
    }
    let from = state.position(dragged)?;
    let to = state.position(target)?;

    let home_first = state.tabs().first().is_some_and(|tab| state.is_home(tab.key()));
    if to == 0 && home_first {
        return None;
    }
    Some(TabMove { from, to })
}

/// Apply a drop directly to the state.
pub fn apply_move(state: &mut TabState, dragged: &TabKey, target: &TabKey) -> Option<TabMove> {
    let planned = plan_move(state, dragged, target)?;
    state.move_tab(planned.from, planned.to);
    tracing::debug!(key = %dragged, from = planned.from, to = planned.to, "Tab moved");
    Some(planned)
}

#[derive(Debug, Clone)]
struct DragSession {
    dragged: TabKey,
    over: Option<TabKey>,
}

/// Tracks the drag in progress for one workspace.
#[derive(Debug, Default)]
pub struct ReorderController {
    session: Option<DragSession>,
}

impl ReorderController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start dragging a tab. Refused for the home tab and unknown keys.
    pub fn begin(&mut self, state: &TabState, key: &TabKey) -> bool {
        if !is_draggable(state, key) {
            self.session = None;
            return false;
        }
        self.session = Some(DragSession { dragged: key.clone(), over: None });
        true
    }

    /// Record the tab currently under the pointer.
    pub fn hover(&mut self, key: &TabKey) {
        if let Some(session) = &mut self.session {
            session.over = Some(key.clone());
        }
    }

    /// The tab being dragged, if any.
    pub fn dragging(&self) -> Option<&TabKey> {
        self.session.as_ref().map(|session| &session.dragged)
    }

    /// End the drag over the last hovered tab and apply the move.
    pub fn finish(&mut self, state: &mut TabState) -> Option<TabMove> {
        let session = self.session.take()?;
        let target = session.over?;
        apply_move(state, &session.dragged, &target)
    }

    /// Abandon the drag without moving anything.
    pub fn cancel(&mut self) {
        self.session = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Tab;

    fn key(path: &str) -> TabKey {
        TabKey::parse(path).unwrap()
    }

    fn state_with(paths: &[&str]) -> TabState {
        let mut state = TabState::new(Tab::new(key("/home"), "Home"), 10);
        for path in paths {
            state.open(Tab::new(key(path), *path)).unwrap();
        }
        state
    }

    fn keys(state: &TabState) -> Vec<&str> {
        state.tabs().iter().map(|tab| tab.key().as_str()).collect()
    }

    #[test]
    fn test_move_right_takes_target_position() {
        let mut state = state_with(&["/a", "/b", "/c", "/d"]);
        let moved = apply_move(&mut state, &key("/a"), &key("/c")).unwrap();

        assert_eq!(moved, TabMove { from: 1, to: 3 });
        assert_eq!(keys(&state), vec!["/home", "/b", "/c", "/a", "/d"]);
    }

    #[test]
    fn test_move_left_takes_target_position() {
        let mut state = state_with(&["/a", "/b", "/c", "/d"]);
        apply_move(&mut state, &key("/d"), &key("/b")).unwrap();
        assert_eq!(keys(&state), vec!["/home", "/a", "/d", "/b", "/c"]);
    }

    #[test]
    fn test_home_never_moves() {
        let mut state = state_with(&["/a", "/b"]);
        let before = state.clone();

        assert_eq!(apply_move(&mut state, &key("/home"), &key("/b")), None);
        assert_eq!(apply_move(&mut state, &key("/b"), &key("/home")), None);
        assert_eq!(apply_move(&mut state, &key("/a"), &key("/a")), None);
        assert_eq!(apply_move(&mut state, &key("/a"), &key("/missing")), None);
        assert_eq!(state, before);
    }

    #[test]
    fn test_move_keeps_active_key() {
        let mut state = state_with(&["/a", "/b"]);
        apply_move(&mut state, &key("/b"), &key("/a")).unwrap();
        assert_eq!(state.active_key(), &key("/b"));
    }

    #[test]
    fn test_drag_session() {
        let mut state = state_with(&["/a", "/b", "/c"]);
        let mut controller = ReorderController::new();

        assert!(!controller.begin(&state, &key("/home")));
        assert_eq!(controller.dragging(), None);

        assert!(controller.begin(&state, &key("/c")));
        controller.hover(&key("/b"));
        controller.hover(&key("/a"));
        assert_eq!(controller.finish(&mut state), Some(TabMove { from: 3, to: 1 }));
        assert_eq!(keys(&state), vec!["/home", "/c", "/a", "/b"]);
        assert_eq!(controller.dragging(), None);
    }

    #[test]
    fn test_drag_without_hover_or_cancelled_is_noop() {
        let mut state = state_with(&["/a", "/b"]);
        let before = state.clone();
        let mut controller = ReorderController::new();

        controller.begin(&state, &key("/a"));
        assert_eq!(controller.finish(&mut state), None);

        controller.begin(&state, &key("/a"));
        controller.hover(&key("/b"));
        controller.cancel();
        assert_eq!(controller.finish(&mut state), None);
        assert_eq!(state, before);
    }
}
