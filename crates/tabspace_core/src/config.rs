//! Workspace configuration.
//!
//! Every field has a default, so a partial JSON document (or none at all) is a
//! valid configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::WorkspaceError;
use crate::models::TabKey;

/// Default path of the home tab.
pub const DEFAULT_HOME_PATH: &str = "/home";
/// Default maximum number of open tabs.
pub const DEFAULT_MAX_TABS: usize = 20;

/// Configuration for a [`Workspace`](crate::Workspace).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceConfig {
    /// Path of the pinned, always-first home tab.
    pub home_path: String,
    /// Maximum number of open tabs, home included.
    pub max_tabs: usize,
    /// Store entry holding the serialized tab list.
    pub tabs_entry: String,
    /// Store entry holding the active key.
    pub active_entry: String,
    /// Buffer size of the workspace event channel.
    pub event_capacity: usize,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            home_path: DEFAULT_HOME_PATH.to_string(),
            max_tabs: DEFAULT_MAX_TABS,
            tabs_entry: "tabspace.tabs".to_string(),
            active_entry: "tabspace.active".to_string(),
            event_capacity: 64,
        }
    }
}

impl WorkspaceConfig {
    /// Create a configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of tabs.
    pub fn with_max_tabs(mut self, max_tabs: usize) -> Self {
        self.max_tabs = max_tabs;
        self
    }

    /// Set the home tab path.
    pub fn with_home_path(mut self, path: impl Into<String>) -> Self {
        self.home_path = path.into();
        self
    }

    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, WorkspaceError> {
        serde_json::from_str(json)
            .map_err(|e| WorkspaceError::config(format!("Invalid workspace config: {e}")))
    }

    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self, WorkspaceError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            WorkspaceError::config(format!("Failed to read config '{}': {e}", path.display()))
        })?;
        let config = Self::from_json(&contents)?;
        tracing::debug!(path = %path.display(), max_tabs = config.max_tabs, "Workspace config loaded");
        Ok(config)
    }

    /// Validate the configuration, returning the normalized home key.
    pub fn validate(&self) -> Result<TabKey, WorkspaceError> {
        if self.max_tabs == 0 {
            return Err(WorkspaceError::config("max_tabs must be at least 1"));
        }
        if self.tabs_entry.is_empty() || self.active_entry.is_empty() {
            return Err(WorkspaceError::config("store entry names must not be empty"));
        }
        if self.tabs_entry == self.active_entry {
            return Err(WorkspaceError::config("tabs_entry and active_entry must differ"));
        }
        if self.event_capacity == 0 {
            return Err(WorkspaceError::config("event_capacity must be at least 1"));
        }
        TabKey::parse(&self.home_path)
            .map_err(|e| WorkspaceError::config(format!("Invalid home_path: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = WorkspaceConfig::from_json(r#"{ "max_tabs": 5 }"#).unwrap();
        assert_eq!(config.max_tabs, 5);
        assert_eq!(config.home_path, DEFAULT_HOME_PATH);
        assert_eq!(config.tabs_entry, "tabspace.tabs");
    }

    #[test]
    fn test_validate_normalizes_home() {
        let config = WorkspaceConfig::new().with_home_path("/Dashboard");
        assert_eq!(config.validate().unwrap().as_str(), "/dashboard");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(WorkspaceConfig::new().with_max_tabs(0).validate().is_err());
        assert!(WorkspaceConfig::new().with_home_path(" ").validate().is_err());

        let mut config = WorkspaceConfig::new();
        config.active_entry = config.tabs_entry.clone();
        assert!(matches!(config.validate(), Err(WorkspaceError::Config { .. })));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("workspace.json");
        std::fs::write(&path, r#"{ "home_path": "/start", "max_tabs": 3 }"#).unwrap();

        let config = WorkspaceConfig::load(&path).unwrap();
        assert_eq!(config.home_path, "/start");
        assert_eq!(config.max_tabs, 3);

        assert!(WorkspaceConfig::load(&dir.path().join("missing.json")).is_err());
    }
}
