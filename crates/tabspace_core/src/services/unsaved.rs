//! Unsaved-work registry.
//!
//! Hosted pages register a handle under their tab key on mount and remove it on
//! unmount. The navigation guard only ever asks the handle two things: is there
//! unsaved work, and (optionally) save it now.

use futures_util::future::BoxFuture;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::WorkspaceError;
use crate::models::TabKey;

/// Capability a hosted page exposes to the workspace.
pub trait UnsavedWork: Send + Sync {
    /// Whether leaving the page now would lose work.
    fn has_unsaved_changes(&self) -> bool;

    /// Whether [`save_and_continue`](Self::save_and_continue) is available.
    fn can_save(&self) -> bool {
        false
    }

    /// Save the page's work. Only called when `can_save` returns true.
    fn save_and_continue(&self) -> BoxFuture<'_, Result<(), WorkspaceError>> {
        Box::pin(futures_util::future::ready(Ok(())))
    }
}

/// Handles registered by hosted pages, keyed by tab.
#[derive(Default)]
pub struct UnsavedWorkRegistry {
    handles: RwLock<HashMap<TabKey, Arc<dyn UnsavedWork>>>,
}

impl UnsavedWorkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a page's handle, replacing any previous one for the same tab.
    pub fn register(&self, key: TabKey, handle: Arc<dyn UnsavedWork>) {
        tracing::trace!(key = %key, "Unsaved-work handle registered");
        self.handles.write().insert(key, handle);
    }

    /// Remove a page's handle.
    pub fn unregister(&self, key: &TabKey) -> Option<Arc<dyn UnsavedWork>> {
        let handle = self.handles.write().remove(key);
        if handle.is_some() {
            tracing::trace!(key = %key, "Unsaved-work handle unregistered");
        }
        handle
    }

    /// Get the handle for a tab.
    pub fn get(&self, key: &TabKey) -> Option<Arc<dyn UnsavedWork>> {
        self.handles.read().get(key).cloned()
    }

    /// Whether the tab's page currently reports unsaved work.
    pub fn has_unsaved_changes(&self, key: &TabKey) -> bool {
        self.get(key).is_some_and(|handle| handle.has_unsaved_changes())
    }

    /// Number of registered handles.
    pub fn len(&self) -> usize {
        self.handles.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.read().is_empty()
    }
}
