//! Persisted tab store.
//!
//! A synchronous string key-value store used only to survive a full reload.
//! The workspace writes it after every committed transition and reads it once
//! at startup; it is never a source of truth otherwise.
//!
//! # Data Directory Locations
//!
//! - **macOS**: `~/Library/Application Support/dev.tabspace.Tabspace`
//! - **Windows**: `%APPDATA%\tabspace\Tabspace`
//! - **Linux**: `~/.local/share/tabspace`
//! - **Debug builds**: `./tabspace_data` in current directory

use crate::error::WorkspaceError;

use chrono::Utc;
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Key-value store backing tab persistence.
pub trait TabStore: Send + Sync {
    /// Read an entry.
    fn get(&self, key: &str) -> Result<Option<String>, WorkspaceError>;

    /// Write an entry, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), WorkspaceError>;
}

/// Get the default data directory for the application.
pub fn default_data_dir() -> PathBuf {
    #[cfg(debug_assertions)]
    {
        PathBuf::from("./tabspace_data")
    }

    #[cfg(not(debug_assertions))]
    {
        dirs::data_dir()
            .map(|d| {
                #[cfg(target_os = "macos")]
                {
                    d.join("dev.tabspace.Tabspace")
                }
                #[cfg(target_os = "windows")]
                {
                    d.join("tabspace").join("Tabspace")
                }
                #[cfg(not(any(target_os = "macos", target_os = "windows")))]
                {
                    d.join("tabspace")
                }
            })
            .unwrap_or_else(|| PathBuf::from("./tabspace_data"))
    }
}

/// Initialize the data directory, creating it if needed.
pub fn init_data_dir(path: &Path) -> Result<(), WorkspaceError> {
    if path.exists() {
        if !path.is_dir() {
            return Err(WorkspaceError::storage(
                format!("Data path exists but is not a directory: {}", path.display()),
                Some("Select a different location or remove the existing file"),
            ));
        }
        return Ok(());
    }

    std::fs::create_dir_all(path).map_err(|e| {
        WorkspaceError::storage(
            format!("Failed to create data directory '{}': {}", path.display(), e),
            Some("Check permissions or select a different location"),
        )
    })?;

    tracing::info!(path = %path.display(), "Created data directory");
    Ok(())
}

// ============================================================================
// MemoryStore
// ============================================================================

/// In-memory store, equivalent to a browser session store that lives as long
/// as the process.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TabStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, WorkspaceError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), WorkspaceError> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// ============================================================================
// SqliteStore
// ============================================================================

/// SQLite-backed store for hosts that persist sessions across process restarts.
///
/// Thread-safe via internal Mutex.
pub struct SqliteStore {
    connection: Mutex<Connection>,
    db_path: PathBuf,
}

impl SqliteStore {
    /// Open or create the session database in the given data directory.
    pub fn open(data_dir: &Path) -> Result<Self, WorkspaceError> {
        init_data_dir(data_dir)?;
        Self::open_with_path(data_dir.join("session.db"))
    }

    /// Open a store with a specific database path.
    pub fn open_with_path(db_path: PathBuf) -> Result<Self, WorkspaceError> {
        let connection = Connection::open(&db_path).map_err(|e| {
            WorkspaceError::storage_with_source(
                format!("Failed to open database '{}'", db_path.display()),
                e,
            )
        })?;

        connection
            .execute_batch(
                "
                PRAGMA journal_mode = WAL;
                PRAGMA synchronous = NORMAL;
                PRAGMA busy_timeout = 5000;
                ",
            )
            .map_err(|e| WorkspaceError::storage_with_source("Failed to configure database", e))?;

        connection
            .execute(
                "CREATE TABLE IF NOT EXISTS session_state (
                    key TEXT PRIMARY KEY,
                    value TEXT NOT NULL,
                    updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
                ) STRICT",
                [],
            )
            .map_err(|e| WorkspaceError::storage_with_source("Failed to create session table", e))?;

        tracing::info!(path = %db_path.display(), "Session store opened");
        Ok(Self { connection: Mutex::new(connection), db_path })
    }

    /// Path of the backing database file.
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }
}

impl TabStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, WorkspaceError> {
        let conn = self.connection.lock();

        conn.query_row("SELECT value FROM session_state WHERE key = ?", [key], |row| row.get(0))
            .optional()
            .map_err(|e| WorkspaceError::storage_with_source("Failed to load session state", e))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), WorkspaceError> {
        let conn = self.connection.lock();
        let now = Utc::now().to_rfc3339();

        conn.execute(
            "INSERT INTO session_state (key, value, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at",
            params![key, value, now],
        )
        .map_err(|e| WorkspaceError::storage_with_source("Failed to save session state", e))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryStore::new();
        assert_eq!(store.get("tabs").unwrap(), None);

        store.set("tabs", "[]").unwrap();
        store.set("tabs", "[1]").unwrap();
        assert_eq!(store.get("tabs").unwrap().as_deref(), Some("[1]"));
    }

    #[test]
    fn test_sqlite_store_persists_across_instances() {
        let dir = tempdir().unwrap();

        {
            let store = SqliteStore::open(dir.path()).unwrap();
            store.set("active", "/orders").unwrap();
            store.set("active", "/home").unwrap();
        }

        let store = SqliteStore::open(dir.path()).unwrap();
        assert_eq!(store.get("active").unwrap().as_deref(), Some("/home"));
        assert_eq!(store.get("missing").unwrap(), None);
        assert!(store.db_path().ends_with("session.db"));
    }

    #[test]
    fn test_open_creates_missing_data_dir() {
        let dir = tempdir().unwrap();
        let data_dir = dir.path().join("fresh").join("data");

        let store = SqliteStore::open(&data_dir).unwrap();
        assert!(data_dir.is_dir());
        assert_eq!(store.db_path(), data_dir.join("session.db"));
    }

    #[test]
    fn test_init_data_dir_rejects_file() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("not_a_dir");
        std::fs::write(&file, "x").unwrap();

        assert!(init_data_dir(&file).is_err());
        assert!(init_data_dir(&dir.path().join("nested").join("data")).is_ok());
    }

    #[test]
    fn test_sqlite_failure_carries_source() {
        let dir = tempdir().unwrap();

        // A directory cannot be opened as a database file
        let err = SqliteStore::open_with_path(dir.path().to_path_buf()).err().unwrap();
        assert_eq!(err.category(), "Storage");
        assert!(std::error::Error::source(&err).is_some());
    }
}
