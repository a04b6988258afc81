//! Navigation bar controller core.
//!
//! Resolves the viewer identity from session slots, tracks scroll and menu
//! interaction state, and composes the link set the presentation layer draws.

pub mod config;
pub mod db;
pub mod logging;
pub mod menu;
pub mod nav;
pub mod navbar;
pub mod route;
pub mod scroll;
pub mod session;
pub mod subscription;

pub use config::{load_config_from_path, ConfigError, ConfigResult, MobilePanelMode, NavbarConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use menu::{MenuState, MenuStateMachine};
pub use nav::composer::{
    chrome_style, compose, ChromeStyle, ComposeInput, MenuIcon, NavbarView, RenderedLink,
};
pub use nav::links::{LinkStyle, NavLink, NavLinkId, NAV_LINKS};
pub use navbar::Navbar;
pub use route::{is_active, Route, RouteTracker};
pub use scroll::{is_compact, ScrollMonitor, ScrollSource, ViewportScroll};
pub use session::identity::{Identity, IdentityKind};
pub use session::resolver::{
    SessionDecodeError, SessionError, SessionResolver, SessionSlot, SlotKeys,
};
pub use session::sqlite_store::SqliteSessionStore;
pub use session::store::{MemorySessionStore, SessionStore, StoreError, StoreResult};
pub use subscription::{ListenerId, ListenerRegistry, Subscription};

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
