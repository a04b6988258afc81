//! Session slot resolution.
//!
//! # Responsibility
//! - Read the team slot, then the admin slot, and stop at the first present.
//! - Surface malformed slot content as `SessionDecodeError`.
//!
//! # Invariants
//! - `resolve` never writes to the store.
//! - A present team slot shadows the admin slot, even when it fails to decode.
//! - `resolve_or_guest` degrades every failure to `Identity::Guest`.

use crate::config::NavbarConfig;
use crate::logging::single_line;
use crate::session::identity::Identity;
use crate::session::store::{SessionStore, StoreError};
use log::{debug, warn};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

const MAX_DECODE_MESSAGE_CHARS: usize = 120;

/// Which of the two prioritized slots a value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionSlot {
    Team,
    Admin,
}

impl SessionSlot {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Team => "team",
            Self::Admin => "admin",
        }
    }
}

/// Slot content that is not valid serialized JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionDecodeError {
    pub slot: SessionSlot,
    pub key: String,
    pub message: String,
}

impl Display for SessionDecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} session slot `{}` holds malformed content: {}",
            self.slot.as_str(),
            self.key,
            self.message
        )
    }
}

impl Error for SessionDecodeError {}

/// Failure resolving identity.
#[derive(Debug)]
pub enum SessionError {
    Decode(SessionDecodeError),
    Store { slot: SessionSlot, source: StoreError },
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Decode(err) => write!(f, "{err}"),
            Self::Store { slot, source } => {
                write!(f, "failed to read {} session slot: {source}", slot.as_str())
            }
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Decode(err) => Some(err),
            Self::Store { source, .. } => Some(source),
        }
    }
}

impl From<SessionDecodeError> for SessionError {
    fn from(value: SessionDecodeError) -> Self {
        Self::Decode(value)
    }
}

/// The pair of store keys identity depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotKeys {
    pub team: String,
    pub admin: String,
}

impl SlotKeys {
    /// Returns `true` when a change to `key` can alter the resolved identity.
    pub fn watches(&self, key: &str) -> bool {
        key == self.team || key == self.admin
    }

    fn key(&self, slot: SessionSlot) -> &str {
        match slot {
            SessionSlot::Team => &self.team,
            SessionSlot::Admin => &self.admin,
        }
    }
}

/// Resolves `Identity` from an injected `SessionStore`.
pub struct SessionResolver {
    store: Rc<dyn SessionStore>,
    keys: SlotKeys,
}

impl SessionResolver {
    pub fn new(
        store: Rc<dyn SessionStore>,
        team_key: impl Into<String>,
        admin_key: impl Into<String>,
    ) -> Self {
        Self {
            store,
            keys: SlotKeys {
                team: team_key.into(),
                admin: admin_key.into(),
            },
        }
    }

    /// Uses the slot keys configured in `config`.
    pub fn from_config(store: Rc<dyn SessionStore>, config: &NavbarConfig) -> Self {
        Self::new(store, &config.team_slot_key, &config.admin_slot_key)
    }

    pub fn keys(&self) -> &SlotKeys {
        &self.keys
    }

    /// Resolves identity from the current slot contents.
    ///
    /// A slot holding the JSON literal `null` counts as present and resolves
    /// to `Guest` without consulting the next slot.
    pub fn resolve(&self) -> Result<Identity, SessionError> {
        if let Some(payload) = self.read_slot(SessionSlot::Team)? {
            return Ok(match payload {
                Value::Null => Identity::Guest,
                payload => Identity::Team(payload),
            });
        }
        if let Some(payload) = self.read_slot(SessionSlot::Admin)? {
            return Ok(match payload {
                Value::Null => Identity::Guest,
                payload => Identity::Admin(payload),
            });
        }
        Ok(Identity::Guest)
    }

    /// Resolves identity, logging any failure and falling back to `Guest`.
    pub fn resolve_or_guest(&self) -> Identity {
        match self.resolve() {
            Ok(identity) => {
                debug!(
                    "event=session_resolve module=session status=ok identity={}",
                    identity.kind().as_str()
                );
                identity
            }
            Err(err) => {
                let (error_code, slot) = match &err {
                    SessionError::Decode(decode) => ("session_decode_failed", decode.slot),
                    SessionError::Store { slot, .. } => ("session_store_failed", *slot),
                };
                warn!(
                    "event=session_resolve module=session status=error identity=guest slot={} error_code={} error={}",
                    slot.as_str(),
                    error_code,
                    single_line(&err.to_string(), MAX_DECODE_MESSAGE_CHARS * 2)
                );
                Identity::Guest
            }
        }
    }

    fn read_slot(&self, slot: SessionSlot) -> Result<Option<Value>, SessionError> {
        let key = self.keys.key(slot);
        let raw = self
            .store
            .get(key)
            .map_err(|source| SessionError::Store { slot, source })?;
        let Some(raw) = raw else {
            return Ok(None);
        };
        // serde_json messages cite line/column only, never slot content.
        let payload = serde_json::from_str::<Value>(&raw).map_err(|err| SessionDecodeError {
            slot,
            key: key.to_string(),
            message: single_line(&err.to_string(), MAX_DECODE_MESSAGE_CHARS),
        })?;
        Ok(Some(payload))
    }
}

#[cfg(test)]
mod tests {
    use super::{SessionError, SessionResolver, SessionSlot};
    use crate::session::identity::Identity;
    use crate::session::store::MemorySessionStore;
    use serde_json::json;
    use std::rc::Rc;

    fn resolver_with(team: Option<&str>, admin: Option<&str>) -> SessionResolver {
        let store = Rc::new(MemorySessionStore::new());
        if let Some(value) = team {
            store.set("team", value);
        }
        if let Some(value) = admin {
            store.set("admin_user", value);
        }
        SessionResolver::new(store, "team", "admin_user")
    }

    #[test]
    fn both_slots_absent_resolves_guest() {
        let resolver = resolver_with(None, None);
        assert_eq!(resolver.resolve().expect("resolve"), Identity::Guest);
    }

    #[test]
    fn team_slot_wins_over_admin_slot() {
        let resolver = resolver_with(Some(r#"{"id":"t1"}"#), Some(r#"{"id":"a1"}"#));
        assert_eq!(
            resolver.resolve().expect("resolve"),
            Identity::Team(json!({"id": "t1"}))
        );
    }

    #[test]
    fn admin_slot_used_when_team_absent() {
        let resolver = resolver_with(None, Some(r#"{"email":"ops@example.com"}"#));
        assert_eq!(
            resolver.resolve().expect("resolve"),
            Identity::Admin(json!({"email": "ops@example.com"}))
        );
    }

    #[test]
    fn malformed_team_slot_is_a_decode_error_not_guest() {
        let resolver = resolver_with(Some("{not json"), Some(r#"{"id":"a1"}"#));
        let err = resolver.resolve().expect_err("malformed slot must fail");
        match err {
            SessionError::Decode(decode) => {
                assert_eq!(decode.slot, SessionSlot::Team);
                assert_eq!(decode.key, "team");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(resolver.resolve_or_guest(), Identity::Guest);
    }

    #[test]
    fn null_payload_counts_as_present_and_resolves_guest() {
        let resolver = resolver_with(Some("null"), Some(r#"{"id":"a1"}"#));
        assert_eq!(resolver.resolve().expect("resolve"), Identity::Guest);
    }

    #[test]
    fn watches_only_configured_keys() {
        let resolver = resolver_with(None, None);
        assert!(resolver.keys().watches("team"));
        assert!(resolver.keys().watches("admin_user"));
        assert!(!resolver.keys().watches("theme"));
    }
}
