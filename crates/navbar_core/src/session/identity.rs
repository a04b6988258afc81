//! Resolved viewer identity.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Viewer role derived from the session slots.
///
/// Payloads are opaque: their shape belongs to the auth system that wrote
/// the slot, so the navbar only ever branches on the variant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Identity {
    /// No usable session; the least-privileged view.
    #[default]
    Guest,
    /// Signed-in hackathon team.
    Team(Value),
    /// Signed-in organizer.
    Admin(Value),
}

impl Identity {
    pub fn kind(&self) -> IdentityKind {
        match self {
            Self::Guest => IdentityKind::Guest,
            Self::Team(_) => IdentityKind::Team,
            Self::Admin(_) => IdentityKind::Admin,
        }
    }

    pub fn is_guest(&self) -> bool {
        matches!(self, Self::Guest)
    }

    /// Session payload for signed-in identities.
    pub fn payload(&self) -> Option<&Value> {
        match self {
            Self::Guest => None,
            Self::Team(payload) | Self::Admin(payload) => Some(payload),
        }
    }
}

/// Payload-free identity tag, safe to log and to send across FFI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityKind {
    Guest,
    Team,
    Admin,
}

impl IdentityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Guest => "guest",
            Self::Team => "team",
            Self::Admin => "admin",
        }
    }
}
