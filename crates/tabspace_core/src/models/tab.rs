//! Tab identity models.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::WorkspaceError;

/// Normalized tab identifier.
///
/// Keys are lower-cased, trimmed paths and double as the route to navigate to,
/// so `/Orders` and `/orders ` name the same tab.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TabKey(String);

impl TabKey {
    /// Normalize a path into a tab key.
    pub fn parse(path: impl AsRef<str>) -> Result<Self, WorkspaceError> {
        let raw = path.as_ref();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(WorkspaceError::invalid_key(raw, "key is empty"));
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(WorkspaceError::invalid_key(raw, "key contains whitespace"));
        }
        Ok(Self(trimmed.to_lowercase()))
    }

    /// The normalized key text, which is also the routable path.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TabKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TabKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TabKey {
    type Error = WorkspaceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<TabKey> for String {
    fn from(key: TabKey) -> Self {
        key.0
    }
}

/// One open document in the workspace.
///
/// The label is resolved once when the tab is created and never re-resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tab {
    key: TabKey,
    label: String,
}

impl Tab {
    /// Create a tab with a frozen label.
    pub fn new(key: TabKey, label: impl Into<String>) -> Self {
        Self { key, label: label.into() }
    }

    pub fn key(&self) -> &TabKey {
        &self.key
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lowercases_and_trims() {
        let key = TabKey::parse("  /Orders/List ").unwrap();
        assert_eq!(key.as_str(), "/orders/list");
        assert_eq!(key, TabKey::parse("/orders/LIST").unwrap());
    }

    #[test]
    fn test_parse_rejects_malformed_keys() {
        assert!(matches!(TabKey::parse("   "), Err(WorkspaceError::InvalidKey { .. })));
        assert!(matches!(TabKey::parse("/a b"), Err(WorkspaceError::InvalidKey { .. })));
    }

    #[test]
    fn test_key_serializes_as_plain_string() {
        let tab = Tab::new(TabKey::parse("/Home").unwrap(), "Home");
        let json = serde_json::to_string(&tab).unwrap();
        assert_eq!(json, r#"{"key":"/home","label":"Home"}"#);

        let back: Tab = serde_json::from_str(r#"{"key":"/HOME","label":"Home"}"#).unwrap();
        assert_eq!(back, tab);
    }

    #[test]
    fn test_deserialize_rejects_empty_key() {
        let result = serde_json::from_str::<Tab>(r#"{"key":"","label":"x"}"#);
        assert!(result.is_err());
    }
}
