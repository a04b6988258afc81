//! Navigation link table and view composition.
//!
//! # Responsibility
//! - Own the static table of navbar links and who may see them.
//! - Compose identity, scroll, menu and route state into a `NavbarView`.
//!
//! # Invariants
//! - Composition is a pure function of its inputs.
//! - Sign-out entries are plain navigation targets; the navbar never clears
//!   a session itself.

pub mod composer;
pub mod links;
