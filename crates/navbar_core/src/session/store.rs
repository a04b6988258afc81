//! Session store capability and the in-memory implementation.

use crate::db::DbError;
use crate::subscription::{ListenerId, ListenerRegistry};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

/// Callback receiving the key of a slot that changed.
pub type SessionListener = Rc<dyn Fn(&str)>;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure reading or writing a backing session store.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    InvalidKey(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidKey(key) => write!(f, "session slot key is invalid: `{key}`"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidKey(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Read-only key/value view over persisted session tokens.
///
/// Writers live outside the navbar; they announce changes through the
/// listeners registered with `subscribe`.
pub trait SessionStore {
    /// Returns the raw serialized value of `key`, or `None` when absent.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Registers `listener` for slot change notifications.
    fn subscribe(&self, listener: SessionListener) -> ListenerId;

    /// Removes a listener. Returns `false` when `id` was unknown.
    fn unsubscribe(&self, id: ListenerId) -> bool;
}

/// Process-local session store, the `sessionStorage` of a host shell.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    slots: RefCell<BTreeMap<String, String>>,
    listeners: ListenerRegistry<str>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes one slot and notifies listeners.
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        self.slots.borrow_mut().insert(key.clone(), value.into());
        self.listeners.notify(key.as_str());
    }

    /// Clears one slot. Listeners are notified only when a value was removed.
    pub fn remove(&self, key: &str) -> bool {
        let removed = self.slots.borrow_mut().remove(key).is_some();
        if removed {
            self.listeners.notify(key);
        }
        removed
    }

    /// Number of live change listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.slots.borrow().get(key).cloned())
    }

    fn subscribe(&self, listener: SessionListener) -> ListenerId {
        self.listeners.add(listener)
    }

    fn unsubscribe(&self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }
}
