//! Error types for the tab workspace.
//!
//! Route and tab-limit failures are expected outcomes: they are surfaced to the
//! user through the informational modal and returned as values, never raised as
//! panics. `InvalidKey` is reserved for programmer errors such as empty keys.

use thiserror::Error;

/// Main error type for the tab workspace.
#[derive(Debug, Error)]
pub enum WorkspaceError {
    /// No route matches the requested path.
    #[error("No page is registered for '{key}'")]
    RouteNotFound {
        /// Normalized key that failed to resolve.
        key: String,
    },

    /// The configured maximum number of open tabs has been reached.
    #[error("Cannot open more than {max} tabs")]
    TabLimitReached {
        /// Configured maximum.
        max: usize,
    },

    /// Activation of a key that is not currently open.
    #[error("No open tab for '{key}'")]
    TabNotOpen {
        /// Key that is not in the open set.
        key: String,
    },

    /// A malformed tab key.
    #[error("Invalid tab key '{input}': {reason}")]
    InvalidKey {
        /// Raw input that was rejected.
        input: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// The page's save action failed while leaving a tab.
    #[error("Failed to save '{key}': {message}")]
    SaveFailed {
        /// Key of the tab being saved.
        key: String,
        /// Human-readable error message.
        message: String,
    },

    /// Persisted tab store error.
    #[error("Storage error: {message}")]
    Storage {
        /// Human-readable error message.
        message: String,
        /// Actionable hint for the user.
        hint: Option<String>,
        /// Optional underlying error source.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration error.
    #[error("Config error: {message}")]
    Config {
        /// Human-readable error message.
        message: String,
    },
}

impl WorkspaceError {
    // ========== Constructors ==========

    /// Create a route-not-found error.
    pub fn route_not_found(key: impl Into<String>) -> Self {
        Self::RouteNotFound { key: key.into() }
    }

    /// Create a tab-limit error.
    pub fn tab_limit(max: usize) -> Self {
        Self::TabLimitReached { max }
    }

    /// Create a tab-not-open error.
    pub fn tab_not_open(key: impl Into<String>) -> Self {
        Self::TabNotOpen { key: key.into() }
    }

    /// Create an invalid key error.
    pub fn invalid_key(input: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidKey { input: input.into(), reason }
    }

    /// Create a save failure for the given tab.
    pub fn save_failed(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SaveFailed { key: key.into(), message: message.into() }
    }

    /// Create a new storage error.
    pub fn storage(message: impl Into<String>, hint: Option<&str>) -> Self {
        Self::Storage { message: message.into(), hint: hint.map(String::from), source: None }
    }

    /// Create a new storage error with source.
    pub fn storage_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Storage { message: message.into(), hint: None, source: Some(Box::new(source)) }
    }

    /// Create a new config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config { message: message.into() }
    }

    // ========== Methods ==========

    /// Get the error category name.
    pub fn category(&self) -> &'static str {
        match self {
            Self::RouteNotFound { .. } | Self::TabNotOpen { .. } => "Route Not Found",
            Self::TabLimitReached { .. } => "Too Many Tabs",
            Self::InvalidKey { .. } => "Invalid Key",
            Self::SaveFailed { .. } => "Save",
            Self::Storage { .. } => "Storage",
            Self::Config { .. } => "Config",
        }
    }

    /// Get actionable hint for the user.
    pub fn hint(&self) -> Option<&str> {
        match self {
            Self::RouteNotFound { .. } | Self::TabNotOpen { .. } => {
                Some("Check the address or pick the page from the menu")
            }
            Self::TabLimitReached { .. } => Some("Close some tabs and try again"),
            Self::InvalidKey { .. } => None,
            Self::SaveFailed { .. } => Some("Fix the problem on the page, then try again"),
            Self::Storage { hint, .. } => hint.as_deref(),
            Self::Config { .. } => None,
        }
    }

    /// Convert to user-displayable error info.
    pub fn to_error_info(&self) -> ErrorInfo {
        ErrorInfo {
            error_type: self.category().to_string(),
            message: self.to_string(),
            hint: self.hint().map(String::from),
        }
    }
}

/// User-displayable error information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorInfo {
    /// Category name (e.g., "Too Many Tabs").
    pub error_type: String,
    /// User-friendly message.
    pub message: String,
    /// Actionable suggestion.
    pub hint: Option<String>,
}

// ========== Error Conversions ==========

/// Convert from std::io::Error to WorkspaceError.
impl From<std::io::Error> for WorkspaceError {
    fn from(err: std::io::Error) -> Self {
        WorkspaceError::Storage {
            message: err.to_string(),
            hint: Some("Check file permissions and disk space".to_string()),
            source: Some(Box::new(err)),
        }
    }
}

/// Convert from serde_json::Error to WorkspaceError.
impl From<serde_json::Error> for WorkspaceError {
    fn from(err: serde_json::Error) -> Self {
        WorkspaceError::Storage {
            message: format!("JSON error: {err}"),
            hint: Some("Stored tab data may be corrupted".to_string()),
            source: Some(Box::new(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err = WorkspaceError::storage_with_source("Failed to save session state", io);

        assert_eq!(err.category(), "Storage");
        assert_eq!(err.hint(), None);
        let source = std::error::Error::source(&err).map(|e| e.to_string());
        assert_eq!(source.as_deref(), Some("read-only"));
    }

    #[test]
    fn test_error_info_carries_hint() {
        let info = WorkspaceError::tab_limit(2).to_error_info();
        assert_eq!(info.error_type, "Too Many Tabs");
        assert_eq!(info.message, "Cannot open more than 2 tabs");
        assert_eq!(info.hint.as_deref(), Some("Close some tabs and try again"));
    }

    #[test]
    fn test_tab_not_open_reports_as_route_not_found() {
        let err = WorkspaceError::tab_not_open("/orders");
        assert_eq!(err.category(), WorkspaceError::route_not_found("/orders").category());
    }

    #[test]
    fn test_json_error_converts_to_storage() {
        let err: WorkspaceError = serde_json::from_str::<Vec<String>>("{").unwrap_err().into();
        assert_eq!(err.category(), "Storage");
        assert!(err.to_string().starts_with("Storage error: JSON error"));
    }
}
