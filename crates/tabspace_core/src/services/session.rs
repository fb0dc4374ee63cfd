//! Two-entry tab snapshot over a [`TabStore`].
//!
//! Entry one holds the ordered tab list as JSON key/label pairs, entry two the
//! active key as plain text. Writes are best-effort and reads are lenient: a
//! broken entry is logged and treated as absent.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::storage::TabStore;
use crate::config::WorkspaceConfig;
use crate::error::WorkspaceError;
use crate::models::{Tab, TabKey};
use crate::state::TabState;

/// Serialized form of one tab. Component references are never stored.
#[derive(Debug, Serialize, Deserialize)]
struct StoredTab {
    key: String,
    label: String,
}

/// Tabs read back from the store at cold start, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoredSession {
    pub tabs: Vec<Tab>,
    pub active: Option<TabKey>,
}

/// Reads and writes the tab snapshot.
pub struct SessionStore {
    store: Arc<dyn TabStore>,
    tabs_entry: String,
    active_entry: String,
}

impl SessionStore {
    pub fn new(store: Arc<dyn TabStore>, config: &WorkspaceConfig) -> Self {
        Self {
            store,
            tabs_entry: config.tabs_entry.clone(),
            active_entry: config.active_entry.clone(),
        }
    }

    /// Read the stored snapshot, skipping anything malformed.
    pub fn restore(&self) -> RestoredSession {
        let tabs = match self.read_tabs() {
            Ok(tabs) => tabs,
            Err(e) => {
                tracing::warn!(entry = %self.tabs_entry, error = %e, "Ignoring stored tab list");
                Vec::new()
            }
        };

        let active = match self.store.get(&self.active_entry) {
            Ok(Some(raw)) => TabKey::parse(&raw).ok(),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(entry = %self.active_entry, error = %e, "Ignoring stored active key");
                None
            }
        };

        tracing::info!(tabs = tabs.len(), active = ?active, "Session snapshot read");
        RestoredSession { tabs, active }
    }

    fn read_tabs(&self) -> Result<Vec<Tab>, WorkspaceError> {
        let Some(json) = self.store.get(&self.tabs_entry)? else {
            return Ok(Vec::new());
        };

        let records: Vec<StoredTab> = serde_json::from_str(&json)?;
        let tabs = records
            .into_iter()
            .filter_map(|record| match TabKey::parse(&record.key) {
                Ok(key) => Some(Tab::new(key, record.label)),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping stored tab");
                    None
                }
            })
            .collect();
        Ok(tabs)
    }

    /// Mirror the committed state into the store. Failures are logged, not returned.
    pub fn persist(&self, state: &TabState) {
        if let Err(e) = self.write(state) {
            tracing::warn!(error = %e, "Failed to persist tab state");
        }
    }

    fn write(&self, state: &TabState) -> Result<(), WorkspaceError> {
        let records: Vec<StoredTab> = state
            .tabs()
            .iter()
            .map(|tab| StoredTab { key: tab.key().to_string(), label: tab.label().to_string() })
            .collect();

        self.store.set(&self.tabs_entry, &serde_json::to_string(&records)?)?;
        self.store.set(&self.active_entry, state.active_key().as_str())?;
        tracing::trace!(tabs = records.len(), "Tab state persisted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::storage::MemoryStore;

    fn key(path: &str) -> TabKey {
        TabKey::parse(path).unwrap()
    }

    fn session(store: &Arc<MemoryStore>) -> SessionStore {
        SessionStore::new(store.clone(), &WorkspaceConfig::default())
    }

    #[test]
    fn test_empty_store_restores_nothing() {
        let store = Arc::new(MemoryStore::new());
        assert_eq!(session(&store).restore(), RestoredSession::default());
    }

    #[test]
    fn test_persist_then_restore() {
        let store = Arc::new(MemoryStore::new());
        let mut state = TabState::new(Tab::new(key("/home"), "Home"), 5);
        state.open(Tab::new(key("/orders"), "Orders")).unwrap();

        session(&store).persist(&state);

        assert_eq!(
            store.get("tabspace.tabs").unwrap().as_deref(),
            Some(r#"[{"key":"/home","label":"Home"},{"key":"/orders","label":"Orders"}]"#)
        );
        assert_eq!(store.get("tabspace.active").unwrap().as_deref(), Some("/orders"));

        let restored = session(&store).restore();
        assert_eq!(restored.tabs, state.tabs());
        assert_eq!(restored.active, Some(key("/orders")));
    }

    #[test]
    fn test_malformed_entries_are_skipped() {
        let store = Arc::new(MemoryStore::new());
        store
            .set(
                "tabspace.tabs",
                r#"[{"key":"","label":"Broken"},{"key":"/Users","label":"Users"}]"#,
            )
            .unwrap();
        store.set("tabspace.active", "   ").unwrap();

        let restored = session(&store).restore();
        assert_eq!(restored.tabs, vec![Tab::new(key("/users"), "Users")]);
        assert_eq!(restored.active, None);
    }

    #[test]
    fn test_corrupt_tab_list_is_ignored() {
        let store = Arc::new(MemoryStore::new());
        store.set("tabspace.tabs", "{not json").unwrap();
        store.set("tabspace.active", "/home").unwrap();

        let restored = session(&store).restore();
        assert!(restored.tabs.is_empty());
        assert_eq!(restored.active, Some(key("/home")));
    }
}
