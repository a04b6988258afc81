//! Mounted navbar controller.
//!
//! # Responsibility
//! - Own the per-mount interaction state: identity, compact flag, menu, route.
//! - Hold the scroll and session-change subscriptions for the mount lifetime.
//! - Produce a fresh `NavbarView` on demand.
//!
//! # Invariants
//! - Every mount starts with the menu `Closed`.
//! - Both subscriptions are released exactly once, on unmount or drop.
//! - A route change closes the menu once per distinct route value.
//! - Identity is re-resolved after a watched slot changes, not on navigation.
//! - The controller is `!Send`; all transitions run on the host UI thread.

use crate::config::NavbarConfig;
use crate::menu::{MenuState, MenuStateMachine};
use crate::nav::composer::{compose, ComposeInput, NavbarView};
use crate::route::{Route, RouteTracker};
use crate::scroll::{is_compact, ScrollMonitor, ScrollSource};
use crate::session::identity::Identity;
use crate::session::resolver::SessionResolver;
use crate::session::store::SessionStore;
use crate::subscription::Subscription;
use log::{debug, info};
use std::cell::Cell;
use std::rc::Rc;
use uuid::Uuid;

pub struct Navbar {
    id: Uuid,
    config: NavbarConfig,
    resolver: SessionResolver,
    identity: Identity,
    session_stale: Rc<Cell<bool>>,
    compact: Rc<Cell<bool>>,
    menu: MenuStateMachine,
    route: RouteTracker,
    scroll_subscription: Subscription,
    session_subscription: Subscription,
}

impl Navbar {
    /// Mounts a navbar on `current_route`.
    ///
    /// Subscriptions are acquired before identity is resolved; if anything
    /// after acquisition unwinds, the guards release them on the way out.
    pub fn mount(
        config: NavbarConfig,
        store: Rc<dyn SessionStore>,
        scroll: Rc<dyn ScrollSource>,
        current_route: impl Into<Route>,
    ) -> Self {
        let id = Uuid::new_v4();
        let resolver = SessionResolver::from_config(Rc::clone(&store), &config);

        let session_stale = Rc::new(Cell::new(false));
        let session_subscription = {
            // Capture keys only: holding the resolver here would cycle through the store.
            let stale = Rc::clone(&session_stale);
            let keys = resolver.keys().clone();
            let listener_id = store.subscribe(Rc::new(move |key: &str| {
                if keys.watches(key) {
                    debug!(
                        "event=session_changed module=navbar status=ok navbar_id={id} slot={key}"
                    );
                    stale.set(true);
                }
            }));
            let store = Rc::clone(&store);
            Subscription::new("session", move || {
                store.unsubscribe(listener_id);
            })
        };

        let compact = Rc::new(Cell::new(is_compact(
            scroll.vertical_offset(),
            config.compact_threshold_px,
        )));
        let scroll_subscription = {
            let compact = Rc::clone(&compact);
            ScrollMonitor::attach(scroll, config.compact_threshold_px, move |value| {
                compact.set(value)
            })
        };

        let identity = resolver.resolve_or_guest();
        let route = RouteTracker::new(current_route.into());

        info!(
            "event=navbar_mount module=navbar status=ok navbar_id={} identity={} route={} compact={}",
            id,
            identity.kind().as_str(),
            route.current(),
            compact.get()
        );

        Self {
            id,
            config,
            resolver,
            identity,
            session_stale,
            compact,
            menu: MenuStateMachine::new(),
            route,
            scroll_subscription,
            session_subscription,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &NavbarConfig {
        &self.config
    }

    /// Identity as of the last resolution.
    ///
    /// Call `view` or `refresh_session` to pick up pending slot changes.
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn is_compact(&self) -> bool {
        self.compact.get()
    }

    pub fn menu_state(&self) -> MenuState {
        self.menu.state()
    }

    pub fn current_route(&self) -> &Route {
        self.route.current()
    }

    /// Returns `true` while a watched slot changed since the last resolution.
    pub fn session_is_stale(&self) -> bool {
        self.session_stale.get()
    }

    /// Hamburger button click.
    pub fn toggle_menu(&mut self) -> MenuState {
        let state = self.menu.toggle();
        debug!(
            "event=menu_toggle module=navbar status=ok navbar_id={} menu={}",
            self.id,
            state.as_str()
        );
        state
    }

    /// Router location update. Returns `true` when the route actually changed.
    pub fn on_route_changed(&mut self, route: impl Into<Route>) -> bool {
        if !self.route.observe(route.into()) {
            return false;
        }
        let menu = self.menu.on_route_changed();
        debug!(
            "event=route_changed module=navbar status=ok navbar_id={} route={} menu={}",
            self.id,
            self.route.current(),
            menu.as_str()
        );
        true
    }

    /// Re-reads both session slots unconditionally.
    ///
    /// Needed for stores written by another process, which cannot notify.
    pub fn refresh_session(&mut self) -> &Identity {
        self.session_stale.set(false);
        let identity = self.resolver.resolve_or_guest();
        if identity.kind() != self.identity.kind() {
            info!(
                "event=identity_changed module=navbar status=ok navbar_id={} from={} to={}",
                self.id,
                self.identity.kind().as_str(),
                identity.kind().as_str()
            );
        }
        self.identity = identity;
        &self.identity
    }

    /// Composes the current frame, re-resolving identity first when stale.
    pub fn view(&mut self) -> NavbarView {
        if self.session_stale.get() {
            self.refresh_session();
        }
        compose(&ComposeInput {
            identity: &self.identity,
            compact: self.compact.get(),
            menu: self.menu.state(),
            current: self.route.current(),
            brand: &self.config.brand,
            mobile_panel: self.config.mobile_panel,
        })
    }

    /// Tears the navbar down, releasing both subscriptions.
    pub fn unmount(self) {
        let Self {
            id,
            scroll_subscription,
            session_subscription,
            ..
        } = self;
        scroll_subscription.release();
        session_subscription.release();
        info!("event=navbar_unmount module=navbar status=ok navbar_id={id}");
    }
}
