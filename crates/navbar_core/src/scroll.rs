//! Viewport scroll tracking for compact chrome.
//!
//! # Invariants
//! - `compact` is `offset > threshold`; the threshold itself is not compact.
//! - `on_change` only sees values that differ from the previous emission.
//! - The source listener lives exactly as long as the returned `Subscription`.

use crate::subscription::{ListenerId, ListenerRegistry, Subscription};
use log::debug;
use std::cell::Cell;
use std::rc::Rc;

/// Callback receiving the new vertical offset, in device-independent pixels.
pub type ScrollListener = Rc<dyn Fn(&f64)>;

/// Host viewport scroll signal.
pub trait ScrollSource {
    /// Current vertical offset.
    fn vertical_offset(&self) -> f64;

    fn add_listener(&self, listener: ScrollListener) -> ListenerId;

    fn remove_listener(&self, id: ListenerId) -> bool;
}

/// Returns whether `offset` is past `threshold`.
pub fn is_compact(offset: f64, threshold: f64) -> bool {
    offset > threshold
}

/// Edge detector over successive scroll offsets.
#[derive(Debug)]
pub struct ScrollMonitor {
    threshold: f64,
    last: Cell<bool>,
}

impl ScrollMonitor {
    /// Starts from the state implied by `initial_offset`.
    pub fn new(threshold: f64, initial_offset: f64) -> Self {
        Self {
            threshold,
            last: Cell::new(is_compact(initial_offset, threshold)),
        }
    }

    pub fn is_compact(&self) -> bool {
        self.last.get()
    }

    /// Records `offset`; returns the new value only when it flipped.
    pub fn observe(&self, offset: f64) -> Option<bool> {
        let compact = is_compact(offset, self.threshold);
        if compact == self.last.get() {
            return None;
        }
        self.last.set(compact);
        Some(compact)
    }

    /// Subscribes to `source` and forwards flips to `on_change`.
    ///
    /// The monitor is seeded from the source's current offset, so a page
    /// restored mid-scroll does not emit a spurious first flip.
    pub fn attach(
        source: Rc<dyn ScrollSource>,
        threshold: f64,
        on_change: impl Fn(bool) + 'static,
    ) -> Subscription {
        let monitor = Self::new(threshold, source.vertical_offset());
        let listener: ScrollListener = Rc::new(move |offset: &f64| {
            if let Some(compact) = monitor.observe(*offset) {
                debug!("event=scroll_compact module=scroll status=ok compact={compact}");
                on_change(compact);
            }
        });
        let id = source.add_listener(listener);
        Subscription::new("scroll", move || {
            source.remove_listener(id);
        })
    }
}

/// In-process scroll source driven by the host shell.
#[derive(Debug, Default)]
pub struct ViewportScroll {
    offset: Cell<f64>,
    listeners: ListenerRegistry<f64>,
}

impl ViewportScroll {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the viewport and dispatches one scroll signal.
    pub fn scroll_to(&self, offset: f64) {
        self.offset.set(offset);
        self.listeners.notify(&offset);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl ScrollSource for ViewportScroll {
    fn vertical_offset(&self) -> f64 {
        self.offset.get()
    }

    fn add_listener(&self, listener: ScrollListener) -> ListenerId {
        self.listeners.add(listener)
    }

    fn remove_listener(&self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }
}
