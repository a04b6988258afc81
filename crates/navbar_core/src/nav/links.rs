//! Static navbar link table.

use crate::session::identity::Identity;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavLinkId {
    Home,
    About,
    Team,
    YourProject,
    SubmitProject,
    SignOutTeam,
    SignOutAdmin,
    SignIn,
    AdminLogin,
    Register,
}

impl NavLinkId {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::About => "about",
            Self::Team => "team",
            Self::YourProject => "your_project",
            Self::SubmitProject => "submit_project",
            Self::SignOutTeam => "sign_out_team",
            Self::SignOutAdmin => "sign_out_admin",
            Self::SignIn => "sign_in",
            Self::AdminLogin => "admin_login",
            Self::Register => "register",
        }
    }
}

/// Presentation hint: regular nav item or filled call-to-action button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkStyle {
    Plain,
    Button,
}

/// One entry of the link table.
#[derive(Clone, Copy)]
pub struct NavLink {
    pub id: NavLinkId,
    pub target: &'static str,
    pub label: &'static str,
    pub style: LinkStyle,
    /// Rendered in the desktop bar.
    pub desktop: bool,
    /// Rendered in the mobile disclosure panel.
    pub mobile: bool,
    visible_to: fn(&Identity) -> bool,
}

impl NavLink {
    pub fn is_visible_to(&self, identity: &Identity) -> bool {
        (self.visible_to)(identity)
    }
}

impl Debug for NavLink {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavLink")
            .field("id", &self.id)
            .field("target", &self.target)
            .field("style", &self.style)
            .field("desktop", &self.desktop)
            .field("mobile", &self.mobile)
            .finish()
    }
}

fn everyone(_: &Identity) -> bool {
    true
}

fn team_only(identity: &Identity) -> bool {
    matches!(identity, Identity::Team(_))
}

fn admin_only(identity: &Identity) -> bool {
    matches!(identity, Identity::Admin(_))
}

fn guest_only(identity: &Identity) -> bool {
    identity.is_guest()
}

const fn entry(
    id: NavLinkId,
    target: &'static str,
    label: &'static str,
    style: LinkStyle,
    surfaces: (bool, bool),
    visible_to: fn(&Identity) -> bool,
) -> NavLink {
    NavLink {
        id,
        target,
        label,
        style,
        desktop: surfaces.0,
        mobile: surfaces.1,
        visible_to,
    }
}

const BOTH: (bool, bool) = (true, true);
const MOBILE_ONLY: (bool, bool) = (false, true);

/// Every link in render order. Visibility predicates partition the
/// signed-in entries by identity variant, so at most one role's set shows.
pub const NAV_LINKS: &[NavLink] = &[
    entry(NavLinkId::Home, "/", "Home", LinkStyle::Plain, BOTH, everyone),
    entry(NavLinkId::About, "/about", "About", LinkStyle::Plain, BOTH, everyone),
    entry(NavLinkId::Team, "/team", "Team", LinkStyle::Plain, BOTH, team_only),
    entry(
        NavLinkId::YourProject,
        "/project",
        "Your Project",
        LinkStyle::Plain,
        BOTH,
        team_only,
    ),
    entry(
        NavLinkId::SubmitProject,
        "/project-submit",
        "Submit Project",
        LinkStyle::Plain,
        BOTH,
        team_only,
    ),
    entry(
        NavLinkId::SignOutTeam,
        "/logout",
        "Sign Out",
        LinkStyle::Button,
        BOTH,
        team_only,
    ),
    entry(
        NavLinkId::SignOutAdmin,
        "/admin-logout",
        "Sign Out",
        LinkStyle::Button,
        BOTH,
        admin_only,
    ),
    entry(NavLinkId::SignIn, "/login", "Sign In", LinkStyle::Plain, BOTH, guest_only),
    entry(
        NavLinkId::AdminLogin,
        "/admin-login",
        "Admin Login",
        LinkStyle::Plain,
        BOTH,
        guest_only,
    ),
    entry(
        NavLinkId::Register,
        "/register",
        "Register",
        LinkStyle::Button,
        MOBILE_ONLY,
        guest_only,
    ),
];

/// Identity-independent mobile panel kept for `MobilePanelMode::LegacyStatic`.
pub const LEGACY_MOBILE_LINKS: &[NavLinkId] = &[
    NavLinkId::Home,
    NavLinkId::About,
    NavLinkId::SignIn,
    NavLinkId::Register,
];

/// Looks up one table entry.
pub fn nav_link(id: NavLinkId) -> Option<&'static NavLink> {
    NAV_LINKS.iter().find(|link| link.id == id)
}

#[cfg(test)]
mod tests {
    use super::{nav_link, NavLinkId, NAV_LINKS};
    use std::collections::HashSet;

    #[test]
    fn ids_and_targets_are_unique() {
        let ids = NAV_LINKS.iter().map(|link| link.id).collect::<HashSet<_>>();
        let targets = NAV_LINKS.iter().map(|link| link.target).collect::<HashSet<_>>();
        assert_eq!(ids.len(), NAV_LINKS.len());
        assert_eq!(targets.len(), NAV_LINKS.len());
    }

    #[test]
    fn every_id_has_a_table_entry() {
        for id in [
            NavLinkId::Home,
            NavLinkId::About,
            NavLinkId::Team,
            NavLinkId::YourProject,
            NavLinkId::SubmitProject,
            NavLinkId::SignOutTeam,
            NavLinkId::SignOutAdmin,
            NavLinkId::SignIn,
            NavLinkId::AdminLogin,
            NavLinkId::Register,
        ] {
            let link = nav_link(id).unwrap_or_else(|| panic!("{} missing", id.as_str()));
            assert_eq!(link.id, id);
        }
    }

    #[test]
    fn sign_out_links_target_dedicated_routes() {
        let team = nav_link(NavLinkId::SignOutTeam).expect("team sign-out entry");
        let admin = nav_link(NavLinkId::SignOutAdmin).expect("admin sign-out entry");
        assert_eq!(team.target, "/logout");
        assert_eq!(admin.target, "/admin-logout");
    }
}
