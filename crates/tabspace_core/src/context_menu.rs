//! Per-tab context menu entries.
//!
//! Pure derivation from [`TabState`]; safe to call on every render.

use crate::models::TabKey;
use crate::state::TabState;

/// Actions offered in a tab's context menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TabMenuAction {
    TogglePin,
    Close,
    CloseOthers,
    CloseRight,
    CloseAll,
}

impl TabMenuAction {
    /// Stable identifier for the presentation layer.
    pub fn id(&self) -> &'static str {
        match self {
            Self::TogglePin => "toggle-pin",
            Self::Close => "close",
            Self::CloseOthers => "close-others",
            Self::CloseRight => "close-right",
            Self::CloseAll => "close-all",
        }
    }
}

/// One entry of a tab's context menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabMenuEntry {
    pub action: TabMenuAction,
    pub label: &'static str,
    pub disabled: bool,
}

impl TabMenuEntry {
    fn new(action: TabMenuAction, label: &'static str, disabled: bool) -> Self {
        Self { action, label, disabled }
    }
}

/// Build the context menu for `key`. Returns an empty menu for keys that are not open.
pub fn build_tab_menu(state: &TabState, key: &TabKey) -> Vec<TabMenuEntry> {
    let Some(index) = state.position(key) else {
        return Vec::new();
    };

    let pinned = state.is_pinned(key);
    let closable_others = state
        .tabs()
        .iter()
        .any(|tab| tab.key() != key && !state.is_pinned(tab.key()));
    let closable_right = state.tabs()[index + 1..].iter().any(|tab| !state.is_pinned(tab.key()));

    vec![
        TabMenuEntry::new(
            TabMenuAction::TogglePin,
            if pinned { "Unpin" } else { "Pin" },
            state.is_home(key),
        ),
        TabMenuEntry::new(TabMenuAction::Close, "Close", pinned),
        TabMenuEntry::new(TabMenuAction::CloseOthers, "Close Others", !closable_others),
        TabMenuEntry::new(TabMenuAction::CloseRight, "Close to the Right", !closable_right),
        TabMenuEntry::new(TabMenuAction::CloseAll, "Close All", pinned && !closable_others),
    ]
}
