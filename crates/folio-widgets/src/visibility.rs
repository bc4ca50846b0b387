//! Viewport visibility latch.

use folio_core::{Component, Delivery, ElementId, Event, ListenKind, Listener, SharedHost};
use std::any::Any;
use std::fmt;

/// Fraction of an element that must be visible to count as in view.
pub const DEFAULT_THRESHOLD: f64 = 0.1;

/// Message emitted when visibility flips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilityChanged {
    /// Whether the element is now in view
    pub in_view: bool,
}

/// Tracks whether an element is in the viewport.
///
/// With `once` (the default) the latch stops observing after the first time
/// the element comes into view and stays in view forever after.
pub struct InView {
    threshold: f64,
    once: bool,
    in_view: bool,
    observer: Option<Listener>,
}

impl Default for InView {
    fn default() -> Self {
        Self::new()
    }
}

impl InView {
    /// Create a trigger-once latch with the default threshold.
    pub const fn new() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            once: true,
            in_view: false,
            observer: None,
        }
    }

    /// Set the visibility threshold.
    #[must_use]
    pub const fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set whether the latch triggers only once.
    #[must_use]
    pub const fn once(mut self, once: bool) -> Self {
        self.once = once;
        self
    }

    /// Whether the element is in view.
    #[must_use]
    pub const fn is_in_view(&self) -> bool {
        self.in_view
    }

    /// Whether an observer is installed.
    #[must_use]
    pub const fn is_observing(&self) -> bool {
        self.observer.is_some()
    }

    /// Observe `element`.
    pub fn mount(&mut self, host: &SharedHost, element: ElementId) {
        if self.once && self.in_view {
            return;
        }
        self.observer = None;
        self.observer = Some(Listener::on_element(host, element, ListenKind::Visibility));
    }

    /// Record an intersection report.
    pub fn observe(&mut self, ratio: f64, intersecting: bool) -> Option<VisibilityChanged> {
        if self.once && self.in_view {
            return None;
        }
        let visible = intersecting && ratio >= self.threshold;
        if visible && self.once {
            self.observer = None;
        }
        if visible == self.in_view {
            return None;
        }
        self.in_view = visible;
        tracing::trace!(in_view = visible, ratio, "visibility changed");
        Some(VisibilityChanged { in_view: visible })
    }
}

impl Component for InView {
    fn handle(&mut self, delivery: &Delivery) -> Option<Box<dyn Any>> {
        let Delivery::Event {
            listener,
            event: Event::Intersect {
                ratio,
                intersecting,
            },
        } = delivery
        else {
            return None;
        };
        if self.observer.as_ref().map(Listener::id) != Some(*listener) {
            return None;
        }
        let changed = self.observe(*ratio, *intersecting)?;
        Some(Box::new(changed))
    }
}

impl fmt::Debug for InView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InView")
            .field("threshold", &self.threshold)
            .field("once", &self.once)
            .field("in_view", &self.in_view)
            .field("observing", &self.is_observing())
            .finish()
    }
}
