//! FFI navbar API for the Flutter shell.
//!
//! # Responsibility
//! - Expose mount, interaction and view calls to Dart via FRB.
//! - Bridge host-pushed scroll offsets and session slots into core.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - All calls run on the UI isolate thread; state is thread-local.
//! - At most one navbar is mounted at a time; remounting unmounts first.

use log::warn;
use navbar_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    MemorySessionStore, Navbar, NavbarConfig, NavbarView, RenderedLink, ViewportScroll,
};
use std::cell::RefCell;
use std::rc::Rc;

thread_local! {
    static SESSION_STORE: Rc<MemorySessionStore> = Rc::new(MemorySessionStore::new());
    static VIEWPORT: Rc<ViewportScroll> = Rc::new(ViewportScroll::new());
    static MOUNTED: RefCell<Option<Navbar>> = const { RefCell::new(None) };
}

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Returns an empty string on success and the error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One rendered link as seen by Dart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLinkItem {
    pub id: String,
    pub label: String,
    pub target: String,
    /// `plain|button`.
    pub style: String,
    pub active: bool,
}

/// Flattened `NavbarView`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavbarFrame {
    pub brand: String,
    pub home_target: String,
    /// `guest|team|admin`.
    pub identity: String,
    /// `compact|transparent`.
    pub chrome: String,
    /// `menu|close`.
    pub menu_icon: String,
    pub mobile_panel_open: bool,
    pub desktop_links: Vec<NavLinkItem>,
    pub mobile_links: Vec<NavLinkItem>,
}

/// Response envelope for every navbar call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavbarResponse {
    pub ok: bool,
    /// Fresh frame after the call; `None` when nothing is mounted.
    pub frame: Option<NavbarFrame>,
    pub message: String,
}

impl NavbarResponse {
    fn success(message: impl Into<String>, frame: NavbarFrame) -> Self {
        Self {
            ok: true,
            frame: Some(frame),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            frame: None,
            message: message.into(),
        }
    }
}

/// Mounts the navbar on `route`.
///
/// `config_json` is an optional `NavbarConfig` JSON document; absent fields
/// keep defaults.
#[flutter_rust_bridge::frb(sync)]
pub fn navbar_mount(route: String, config_json: Option<String>) -> NavbarResponse {
    let config = match config_json.as_deref().map(str::trim) {
        None | Some("") => NavbarConfig::default(),
        Some(raw) => match NavbarConfig::from_json_str(raw) {
            Ok(config) => config,
            Err(err) => return NavbarResponse::failure(format!("navbar_mount failed: {err}")),
        },
    };

    let store = SESSION_STORE.with(Rc::clone);
    let viewport = VIEWPORT.with(Rc::clone);
    MOUNTED.with(|slot| {
        let mut slot = slot.borrow_mut();
        if let Some(previous) = slot.take() {
            warn!("event=navbar_mount module=ffi status=remount navbar_id={}", previous.id());
            previous.unmount();
        }
        let mut navbar = Navbar::mount(config, store, viewport, route);
        let frame = to_frame(navbar.view());
        *slot = Some(navbar);
        NavbarResponse::success("Navbar mounted.", frame)
    })
}

/// Unmounts the navbar. Returns `false` when nothing was mounted.
#[flutter_rust_bridge::frb(sync)]
pub fn navbar_unmount() -> bool {
    MOUNTED.with(|slot| match slot.borrow_mut().take() {
        Some(navbar) => {
            navbar.unmount();
            true
        }
        None => false,
    })
}

/// Mirrors one host session slot write (`Some`) or removal (`None`).
///
/// Succeeds with or without a mounted navbar; a mounted one re-resolves
/// identity and returns the fresh frame, otherwise `frame` is `None`.
#[flutter_rust_bridge::frb(sync)]
pub fn navbar_set_session_slot(key: String, value: Option<String>) -> NavbarResponse {
    let key = key.trim().to_string();
    if key.is_empty() {
        return NavbarResponse::failure("navbar_set_session_slot failed: key must not be blank");
    }
    SESSION_STORE.with(|store| match value {
        Some(value) => store.set(key, value),
        None => {
            store.remove(&key);
        }
    });
    frame_if_mounted("Session slot updated.", "Session slot updated; no navbar mounted.")
}

/// Host viewport scroll event.
#[flutter_rust_bridge::frb(sync)]
pub fn navbar_scroll(offset: f64) -> NavbarResponse {
    VIEWPORT.with(|viewport| viewport.scroll_to(offset));
    frame_if_mounted("Scroll applied.", "Scroll applied; no navbar mounted.")
}

/// Hamburger button click.
#[flutter_rust_bridge::frb(sync)]
pub fn navbar_toggle_menu() -> NavbarResponse {
    with_mounted("navbar_toggle_menu", "Menu toggled.", |navbar| {
        navbar.toggle_menu();
    })
}

/// Router location change.
#[flutter_rust_bridge::frb(sync)]
pub fn navbar_route_changed(route: String) -> NavbarResponse {
    with_mounted("navbar_route_changed", "Route updated.", |navbar| {
        navbar.on_route_changed(route);
    })
}

/// Current frame without any state change.
#[flutter_rust_bridge::frb(sync)]
pub fn navbar_view() -> NavbarResponse {
    with_mounted("navbar_view", "Frame composed.", |_| {})
}

fn with_mounted(
    operation: &str,
    message: &str,
    f: impl FnOnce(&mut Navbar),
) -> NavbarResponse {
    MOUNTED.with(|slot| match slot.borrow_mut().as_mut() {
        Some(navbar) => {
            f(navbar);
            NavbarResponse::success(message, to_frame(navbar.view()))
        }
        None => NavbarResponse::failure(format!("{operation} failed: navbar is not mounted")),
    })
}

/// For host-state mirrors: the write already landed, so an absent navbar
/// is still a success, just without a frame.
fn frame_if_mounted(mounted_message: &str, unmounted_message: &str) -> NavbarResponse {
    MOUNTED.with(|slot| match slot.borrow_mut().as_mut() {
        Some(navbar) => NavbarResponse::success(mounted_message, to_frame(navbar.view())),
        None => NavbarResponse {
            ok: true,
            frame: None,
            message: unmounted_message.to_string(),
        },
    })
}

fn to_frame(view: NavbarView) -> NavbarFrame {
    NavbarFrame {
        brand: view.brand,
        home_target: view.home_target.to_string(),
        identity: view.identity.as_str().to_string(),
        chrome: tag(&view.chrome),
        menu_icon: tag(&view.menu_icon),
        mobile_panel_open: view.mobile_panel_open,
        desktop_links: view.desktop_links.into_iter().map(to_item).collect(),
        mobile_links: view.mobile_links.into_iter().map(to_item).collect(),
    }
}

fn to_item(link: RenderedLink) -> NavLinkItem {
    NavLinkItem {
        id: link.id.as_str().to_string(),
        label: link.label.to_string(),
        target: link.target.to_string(),
        style: tag(&link.style),
        active: link.active,
    }
}

/// Serialized snake_case tag of a unit enum, matching the JSON view.
fn tag(value: &impl serde::Serialize) -> String {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(tag)) => tag,
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, init_logging, navbar_mount, navbar_route_changed, navbar_scroll,
        navbar_set_session_slot, navbar_toggle_menu, navbar_unmount, navbar_view, ping,
    };

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_relative_log_dir() {
        let error = init_logging("info".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn calls_before_mount_fail_without_panicking() {
        navbar_unmount();
        let response = navbar_toggle_menu();
        assert!(!response.ok);
        assert!(response.message.contains("not mounted"));
        assert!(response.frame.is_none());
    }

    #[test]
    fn mount_rejects_invalid_config() {
        let response = navbar_mount("/".to_string(), Some("{\"compact_threshold_px\":-5}".to_string()));
        assert!(!response.ok);
        assert!(response.message.contains("compact_threshold_px"));
    }

    #[test]
    fn full_interaction_round() {
        let mounted = navbar_mount("/".to_string(), None);
        assert!(mounted.ok, "{}", mounted.message);
        let frame = mounted.frame.expect("mount returns a frame");
        assert_eq!(frame.identity, "guest");
        assert_eq!(frame.chrome, "transparent");
        assert_eq!(frame.menu_icon, "menu");
        assert_eq!(frame.desktop_links[0].style, "plain");

        let toggled = navbar_toggle_menu().frame.expect("frame");
        assert!(toggled.mobile_panel_open);
        assert_eq!(toggled.chrome, "compact");

        let navigated = navbar_route_changed("/about".to_string())
            .frame
            .expect("frame");
        assert!(!navigated.mobile_panel_open);
        let active = navigated
            .desktop_links
            .iter()
            .filter(|link| link.active)
            .map(|link| link.id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(active, vec!["about"]);

        let scrolled = navbar_scroll(42.0).frame.expect("frame");
        assert_eq!(scrolled.chrome, "compact");

        let signed_in = navbar_set_session_slot(
            "team".to_string(),
            Some(r#"{"id":"t1"}"#.to_string()),
        )
        .frame
        .expect("frame");
        assert_eq!(signed_in.identity, "team");
        assert_eq!(
            signed_in.desktop_links.last().map(|link| link.target.as_str()),
            Some("/logout")
        );

        navbar_set_session_slot("team".to_string(), None);
        assert_eq!(navbar_view().frame.expect("frame").identity, "guest");

        assert!(navbar_unmount());
        assert!(!navbar_unmount());
    }

    #[test]
    fn slot_written_before_mount_is_reported_ok_and_applied() {
        navbar_unmount();
        let written =
            navbar_set_session_slot("team".to_string(), Some(r#"{"id":"t1"}"#.to_string()));
        assert!(written.ok, "{}", written.message);
        assert!(written.frame.is_none());
        assert!(written.message.contains("no navbar mounted"));

        let scrolled = navbar_scroll(120.0);
        assert!(scrolled.ok, "{}", scrolled.message);
        assert!(scrolled.frame.is_none());

        let frame = navbar_mount("/".to_string(), None)
            .frame
            .expect("mount returns a frame");
        assert_eq!(frame.identity, "team");
        assert_eq!(frame.chrome, "compact");
        assert!(navbar_unmount());
    }

    #[test]
    fn blank_slot_key_is_rejected() {
        let response = navbar_set_session_slot("  ".to_string(), Some("{}".to_string()));
        assert!(!response.ok);
        assert!(response.message.contains("blank"));
    }
}
