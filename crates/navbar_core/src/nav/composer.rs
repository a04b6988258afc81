//! Pure composition of navbar state into a declarative view.

use crate::config::MobilePanelMode;
use crate::menu::MenuState;
use crate::nav::links::{nav_link, LinkStyle, NavLink, NavLinkId, LEGACY_MOBILE_LINKS, NAV_LINKS};
use crate::route::{is_active, Route};
use crate::session::identity::{Identity, IdentityKind};
use serde::Serialize;

/// Background treatment of the navbar chrome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChromeStyle {
    Compact,
    Transparent,
}

/// Glyph on the disclosure button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuIcon {
    Menu,
    Close,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedLink {
    pub id: NavLinkId,
    pub label: &'static str,
    pub target: &'static str,
    pub style: LinkStyle,
    pub active: bool,
}

/// Everything the presentation layer needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavbarView {
    pub brand: String,
    pub home_target: &'static str,
    pub identity: IdentityKind,
    pub chrome: ChromeStyle,
    pub menu_icon: MenuIcon,
    pub mobile_panel_open: bool,
    pub desktop_links: Vec<RenderedLink>,
    pub mobile_links: Vec<RenderedLink>,
}

impl NavbarView {
    pub fn desktop_ids(&self) -> Vec<NavLinkId> {
        self.desktop_links.iter().map(|link| link.id).collect()
    }

    pub fn mobile_ids(&self) -> Vec<NavLinkId> {
        self.mobile_links.iter().map(|link| link.id).collect()
    }

    /// Ids of desktop links highlighted for the current route.
    pub fn active_desktop_ids(&self) -> Vec<NavLinkId> {
        self.desktop_links
            .iter()
            .filter(|link| link.active)
            .map(|link| link.id)
            .collect()
    }
}

/// Inputs of one composition pass.
#[derive(Debug, Clone, Copy)]
pub struct ComposeInput<'a> {
    pub identity: &'a Identity,
    pub compact: bool,
    pub menu: MenuState,
    pub current: &'a Route,
    pub brand: &'a str,
    pub mobile_panel: MobilePanelMode,
}

/// Desktop bar entries visible to `identity`, in render order.
pub fn desktop_links(identity: &Identity) -> Vec<&'static NavLink> {
    NAV_LINKS
        .iter()
        .filter(|link| link.desktop && link.is_visible_to(identity))
        .collect()
}

/// Mobile panel entries for `identity` under `mode`.
pub fn mobile_links(identity: &Identity, mode: MobilePanelMode) -> Vec<&'static NavLink> {
    match mode {
        MobilePanelMode::Shared => NAV_LINKS
            .iter()
            .filter(|link| link.mobile && link.is_visible_to(identity))
            .collect(),
        MobilePanelMode::LegacyStatic => LEGACY_MOBILE_LINKS
            .iter()
            .filter_map(|id| nav_link(*id))
            .collect(),
    }
}

/// Open panels need the opaque background even at the top of the page.
pub fn chrome_style(compact: bool, menu: MenuState) -> ChromeStyle {
    if compact || menu.is_open() {
        ChromeStyle::Compact
    } else {
        ChromeStyle::Transparent
    }
}

pub fn compose(input: &ComposeInput<'_>) -> NavbarView {
    let current = input.current.as_str();
    let render = |links: Vec<&'static NavLink>| -> Vec<RenderedLink> {
        links
            .into_iter()
            .map(|link| RenderedLink {
                id: link.id,
                label: link.label,
                target: link.target,
                style: link.style,
                active: is_active(current, link.target),
            })
            .collect()
    };

    NavbarView {
        brand: input.brand.to_string(),
        home_target: "/",
        identity: input.identity.kind(),
        chrome: chrome_style(input.compact, input.menu),
        menu_icon: if input.menu.is_open() {
            MenuIcon::Close
        } else {
            MenuIcon::Menu
        },
        mobile_panel_open: input.menu.is_open(),
        desktop_links: render(desktop_links(input.identity)),
        mobile_links: render(mobile_links(input.identity, input.mobile_panel)),
    }
}
