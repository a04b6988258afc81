//! Viewer identity from persisted session slots.
//!
//! # Responsibility
//! - Define the read-only `SessionStore` capability the navbar consumes.
//! - Resolve the two prioritized slots into a single `Identity`.
//!
//! # Invariants
//! - The team slot is consulted before the admin slot.
//! - Nothing in this module writes a slot on behalf of the navbar.

pub mod identity;
pub mod resolver;
pub mod sqlite_store;
pub mod store;
