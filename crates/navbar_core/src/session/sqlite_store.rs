//! SQLite-backed session store.
//!
//! # Responsibility
//! - Persist session slots across host restarts in `session_slots`.
//! - Notify in-process listeners after every committed write.
//!
//! # Invariants
//! - Slot keys are non-blank.
//! - Listeners fire only after the row change is committed.

use crate::db::{open_db, open_db_in_memory};
use crate::session::store::{SessionListener, SessionStore, StoreError, StoreResult};
use crate::subscription::{ListenerId, ListenerRegistry};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// Session slots stored in a SQLite database.
pub struct SqliteSessionStore {
    conn: Connection,
    listeners: ListenerRegistry<str>,
}

impl SqliteSessionStore {
    /// Opens (and migrates) the database at `path`.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Ok(Self::from_connection(open_db(path)?))
    }

    /// Opens a migrated in-memory database.
    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self::from_connection(open_db_in_memory()?))
    }

    /// Wraps an already migrated connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn,
            listeners: ListenerRegistry::new(),
        }
    }

    /// Inserts or replaces one slot value.
    pub fn put(&self, key: &str, value: &str) -> StoreResult<()> {
        let key = normalize_key(key)?;
        self.conn.execute(
            "INSERT INTO session_slots (key, value, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value, now_epoch_ms()],
        )?;
        debug!("event=session_slot_write module=session status=ok op=put slot={key}");
        self.listeners.notify(key);
        Ok(())
    }

    /// Deletes one slot. Returns `false` when the slot was already absent.
    pub fn remove(&self, key: &str) -> StoreResult<bool> {
        let key = normalize_key(key)?;
        let affected = self
            .conn
            .execute("DELETE FROM session_slots WHERE key = ?1;", [key])?;
        if affected == 0 {
            return Ok(false);
        }
        debug!("event=session_slot_write module=session status=ok op=remove slot={key}");
        self.listeners.notify(key);
        Ok(true)
    }

    /// Sorted keys of every present slot.
    pub fn keys(&self) -> StoreResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key FROM session_slots ORDER BY key ASC;")?;
        let keys = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(keys)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl SessionStore for SqliteSessionStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let key = normalize_key(key)?;
        let value = self
            .conn
            .query_row(
                "SELECT value FROM session_slots WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn subscribe(&self, listener: SessionListener) -> ListenerId {
        self.listeners.add(listener)
    }

    fn unsubscribe(&self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }
}

fn normalize_key(key: &str) -> StoreResult<&str> {
    let trimmed = key.trim();
    if trimmed.is_empty() {
        return Err(StoreError::InvalidKey(key.to_string()));
    }
    Ok(trimmed)
}

fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis() as i64)
}
