//! Events broadcast by the workspace after committed transitions.

use super::tab::TabKey;

/// Events emitted by a [`Workspace`](crate::Workspace).
///
/// `ActiveTabChanged` is the host's cue to navigate to the key's path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkspaceEvent {
    /// A tab was added.
    TabOpened { key: TabKey },
    /// A tab was removed.
    TabClosed { key: TabKey },
    /// The active tab changed.
    ActiveTabChanged { key: TabKey },
    /// A tab was moved within the strip.
    TabMoved { key: TabKey, from: usize, to: usize },
    /// A tab was pinned or unpinned.
    PinChanged { key: TabKey, pinned: bool },
    /// The listed tabs should be remounted.
    Reloaded { keys: Vec<TabKey> },
}
