//! SQLite key-value storage for persisted session state.
//!
//! The session snapshot is a single JSON blob kept under a fixed key. This
//! module stores such blobs in a small `kv_store` table so the arena can
//! resume a session across runs.

use chrono::Utc;
use duel_core::StateStore;
use rusqlite::{Connection, OptionalExtension, Result as SqliteResult};
use std::path::Path;

/// SQLite-backed key-value blob store.
///
/// # Example
///
/// ```ignore
/// let mut storage = Storage::open("data/arena.db")?;
/// storage.save(STATE_KEY, &encoded)?;
/// let blob = storage.load(STATE_KEY)?;
/// ```
pub struct Storage {
    conn: Connection,
}

impl Storage {
    /// Opens or creates a SQLite database at the given path.
    ///
    /// If the database does not exist, it will be created. The schema
    /// is automatically initialized on first open. Pass `":memory:"` for a
    /// throwaway in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or if schema
    /// initialization fails.
    pub fn open<P: AsRef<Path>>(path: P) -> SqliteResult<Self> {
        let conn = Connection::open(path)?;
        let storage = Self { conn };
        storage.init_schema()?;
        Ok(storage)
    }

    /// Initializes the database schema if the table does not exist.
    fn init_schema(&self) -> SqliteResult<()> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS kv_store (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            ",
        )
    }

    /// Returns when `key` was last written, as an RFC 3339 timestamp.
    pub fn updated_at(&self, key: &str) -> SqliteResult<Option<String>> {
        self.conn
            .query_row(
                "SELECT updated_at FROM kv_store WHERE key = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()
    }
}

impl StateStore for Storage {
    type Error = rusqlite::Error;

    fn load(&self, key: &str) -> SqliteResult<Option<String>> {
        self.conn
            .query_row("SELECT value FROM kv_store WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()
    }

    fn save(&mut self, key: &str, value: &str) -> SqliteResult<()> {
        self.conn.execute(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at",
            (key, value, Utc::now().to_rfc3339()),
        )?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> SqliteResult<()> {
        self.conn
            .execute("DELETE FROM kv_store WHERE key = ?1", [key])?;
        Ok(())
    }
}
