//! Listener registries and release guards for host signals.
//!
//! # Responsibility
//! - Keep per-source listener tables keyed by stable `ListenerId`.
//! - Tie every acquired subscription to a guard that releases it exactly once.
//!
//! # Invariants
//! - A `Subscription` runs its release action at most once, either on
//!   `release()` or on drop, whichever comes first.
//! - Notification iterates a snapshot, so listeners may add or remove
//!   listeners on the same registry without a `RefCell` double borrow.

use log::debug;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter};
use std::rc::Rc;
use uuid::Uuid;

/// Stable handle for one registered listener.
pub type ListenerId = Uuid;

/// Table of listeners receiving `&A` notifications.
pub struct ListenerRegistry<A: ?Sized> {
    listeners: RefCell<BTreeMap<ListenerId, Rc<dyn Fn(&A)>>>,
}

impl<A: ?Sized> ListenerRegistry<A> {
    pub fn new() -> Self {
        Self {
            listeners: RefCell::new(BTreeMap::new()),
        }
    }

    /// Registers `listener` and returns its removal handle.
    pub fn add(&self, listener: Rc<dyn Fn(&A)>) -> ListenerId {
        let id = Uuid::new_v4();
        self.listeners.borrow_mut().insert(id, listener);
        id
    }

    /// Removes one listener. Returns `false` when `id` was not registered.
    pub fn remove(&self, id: ListenerId) -> bool {
        self.listeners.borrow_mut().remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.borrow().is_empty()
    }

    /// Delivers `value` to every listener registered at call time.
    pub fn notify(&self, value: &A) {
        let snapshot = self
            .listeners
            .borrow()
            .values()
            .cloned()
            .collect::<Vec<_>>();
        for listener in snapshot {
            listener(value);
        }
    }
}

impl<A: ?Sized> Default for ListenerRegistry<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: ?Sized> Debug for ListenerRegistry<A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.len())
            .finish()
    }
}

/// Guard owning one live subscription.
///
/// Dropping the guard releases the subscription, so early returns and
/// unwinding during mount cannot leak a listener.
#[must_use = "dropping a Subscription releases it immediately"]
pub struct Subscription {
    label: &'static str,
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Wraps `release` so it runs exactly once.
    pub fn new(label: &'static str, release: impl FnOnce() + 'static) -> Self {
        Self {
            label,
            release: Some(Box::new(release)),
        }
    }

    /// Short name of the signal this guard is attached to.
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Returns `true` until the subscription is released.
    pub fn is_active(&self) -> bool {
        self.release.is_some()
    }

    /// Releases the subscription now.
    pub fn release(mut self) {
        self.release_once();
    }

    fn release_once(&mut self) {
        if let Some(release) = self.release.take() {
            release();
            debug!(
                "event=subscription_release module=subscription status=ok signal={}",
                self.label
            );
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_once();
    }
}

impl Debug for Subscription {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("label", &self.label)
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{ListenerRegistry, Subscription};
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[test]
    fn registry_delivers_to_all_and_removes_by_id() {
        let registry = ListenerRegistry::<str>::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let first_seen = Rc::clone(&seen);
        let first = registry.add(Rc::new(move |key: &str| {
            first_seen.borrow_mut().push(format!("a:{key}"));
        }));
        let second_seen = Rc::clone(&seen);
        registry.add(Rc::new(move |key: &str| {
            second_seen.borrow_mut().push(format!("b:{key}"));
        }));
        assert_eq!(registry.len(), 2);

        registry.notify("team");
        assert_eq!(seen.borrow().len(), 2);

        assert!(registry.remove(first));
        assert!(!registry.remove(first));
        registry.notify("admin_user");
        assert_eq!(seen.borrow().last().map(String::as_str), Some("b:admin_user"));
        assert_eq!(seen.borrow().len(), 3);
    }

    #[test]
    fn listener_may_unregister_itself_during_notify() {
        let registry = Rc::new(ListenerRegistry::<f64>::new());
        let own_id = Rc::new(Cell::new(None));

        let inner_registry = Rc::clone(&registry);
        let inner_id = Rc::clone(&own_id);
        let id = registry.add(Rc::new(move |_: &f64| {
            if let Some(id) = inner_id.get() {
                inner_registry.remove(id);
            }
        }));
        own_id.set(Some(id));

        registry.notify(&12.0);
        assert!(registry.is_empty());
    }

    #[test]
    fn subscription_releases_once_on_explicit_release() {
        let releases = Rc::new(Cell::new(0));
        let counter = Rc::clone(&releases);
        let subscription = Subscription::new("scroll", move || counter.set(counter.get() + 1));
        assert!(subscription.is_active());
        assert_eq!(subscription.label(), "scroll");

        subscription.release();
        assert_eq!(releases.get(), 1);
    }

    #[test]
    fn subscription_releases_on_drop() {
        let releases = Rc::new(Cell::new(0));
        {
            let counter = Rc::clone(&releases);
            let _subscription =
                Subscription::new("session", move || counter.set(counter.get() + 1));
        }
        assert_eq!(releases.get(), 1);
    }

    #[test]
    fn subscription_releases_on_early_return() {
        fn mount_then_fail(releases: Rc<Cell<u32>>) -> Result<Subscription, String> {
            let counter = Rc::clone(&releases);
            let _subscription =
                Subscription::new("scroll", move || counter.set(counter.get() + 1));
            Err("mount failed after subscribing".to_string())
        }

        let releases = Rc::new(Cell::new(0));
        assert!(mount_then_fail(Rc::clone(&releases)).is_err());
        assert_eq!(releases.get(), 1);
    }
}
