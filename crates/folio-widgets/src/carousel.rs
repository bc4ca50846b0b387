//! Manually indexed carousel with keyboard navigation and wraparound.

use crate::error::{Result, WidgetError};
use folio_core::{
    Component, Delivery, ElementId, Easing, Key, ListenKind, Listener, Motion, Pose, SharedHost,
};
use std::any::Any;
use std::fmt;

/// Duration of each half of a slide change.
pub const SLIDE_TRANSITION_MS: f64 = 300.0;

/// Message emitted when the current item changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarouselChanged {
    /// Previous index
    pub from: usize,
    /// New index
    pub to: usize,
}

/// Which item a running slide transition is animating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideStage {
    /// The previous item is leaving
    Exiting(usize),
    /// The new item is arriving
    Entering(usize),
}

/// Exit-then-enter transition between two items.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlideTransition {
    /// Item leaving
    pub from: usize,
    /// Item arriving
    pub to: usize,
    /// Host time the change happened at
    pub started_at: f64,
}

impl SlideTransition {
    /// Leaving item fades out to the left.
    pub const EXIT: Motion = Motion {
        from: Pose::REST,
        to: Pose {
            opacity: 0.0,
            x: -50.0,
            y: 0.0,
            scale: 1.0,
        },
        duration_ms: SLIDE_TRANSITION_MS,
        delay_ms: 0.0,
        easing: Easing::EaseInOut,
    };

    /// Arriving item fades in from the right.
    pub const ENTER: Motion = Motion {
        from: Pose {
            opacity: 0.0,
            x: 50.0,
            y: 0.0,
            scale: 1.0,
        },
        to: Pose::REST,
        duration_ms: SLIDE_TRANSITION_MS,
        delay_ms: 0.0,
        easing: Easing::EaseInOut,
    };

    /// Stage and pose `now_ms`, or `None` once settled. The arriving item
    /// waits for the leaving one to finish.
    #[must_use]
    pub fn stage_at(&self, now_ms: f64) -> Option<(SlideStage, Pose)> {
        let elapsed = now_ms - self.started_at;
        let exit = Self::EXIT.total_ms();
        if elapsed < exit {
            Some((SlideStage::Exiting(self.from), Self::EXIT.pose_at(elapsed)))
        } else if elapsed < exit + Self::ENTER.total_ms() {
            Some((
                SlideStage::Entering(self.to),
                Self::ENTER.pose_at(elapsed - exit),
            ))
        } else {
            None
        }
    }
}

struct Mounted {
    host: SharedHost,
    container: ElementId,
    keys: Listener,
}

/// Carousel over a non-empty list of items.
pub struct Carousel<T> {
    items: Vec<T>,
    current: usize,
    transition: Option<SlideTransition>,
    mounted: Option<Mounted>,
}

impl<T> Carousel<T> {
    /// Create a carousel showing the first item.
    pub fn new(items: Vec<T>) -> Result<Self> {
        if items.is_empty() {
            return Err(WidgetError::EmptyCarousel);
        }
        Ok(Self {
            items,
            current: 0,
            transition: None,
            mounted: None,
        })
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether there are no items. Never true for a constructed carousel.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Index of the current item.
    #[must_use]
    pub const fn current(&self) -> usize {
        self.current
    }

    /// The current item.
    #[must_use]
    pub fn current_item(&self) -> &T {
        &self.items[self.current]
    }

    /// All items.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Advance, wrapping from the last item to the first.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> CarouselChanged {
        self.set_current((self.current + 1) % self.items.len())
    }

    /// Go back, wrapping from the first item to the last.
    pub fn prev(&mut self) -> CarouselChanged {
        let len = self.items.len();
        self.set_current((self.current + len - 1) % len)
    }

    /// Jump to `index`. Out-of-range indices leave the carousel unchanged.
    pub fn go_to(&mut self, index: usize) -> Result<CarouselChanged> {
        if index >= self.items.len() {
            return Err(WidgetError::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        Ok(self.set_current(index))
    }

    /// ArrowLeft goes back, ArrowRight forward. Returns the change, if the
    /// key navigates.
    pub fn handle_key(&mut self, key: Key) -> Option<CarouselChanged> {
        match key {
            Key::Left => Some(self.prev()),
            Key::Right => Some(self.next()),
            _ => None,
        }
    }

    /// Pagination dots as `(index, is_current)`.
    pub fn dots(&self) -> impl Iterator<Item = (usize, bool)> + '_ {
        (0..self.items.len()).map(move |i| (i, i == self.current))
    }

    /// Accessible label for dot `index`.
    #[must_use]
    pub fn dot_label(index: usize) -> String {
        format!("Go to project {}", index + 1)
    }

    /// Live position label, e.g. `"Project 2 of 4"`.
    #[must_use]
    pub fn position_label(&self) -> String {
        format!("Project {} of {}", self.current + 1, self.items.len())
    }

    /// Most recent slide transition.
    #[must_use]
    pub const fn transition(&self) -> Option<&SlideTransition> {
        self.transition.as_ref()
    }

    /// Listen for arrow keys on `container` and its descendants.
    pub fn mount(&mut self, host: &SharedHost, container: ElementId) {
        self.mounted = None;
        self.mounted = Some(Mounted {
            host: SharedHost::clone(host),
            container,
            keys: Listener::on_element(host, container, ListenKind::KeyDown),
        });
        tracing::debug!(%container, items = self.items.len(), "carousel mounted");
    }

    /// Remove the key listener.
    pub fn unmount(&mut self) {
        if let Some(mounted) = self.mounted.take() {
            tracing::debug!(container = %mounted.container, "carousel unmounted");
        }
    }

    /// Whether a key listener is installed.
    #[must_use]
    pub const fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }

    fn set_current(&mut self, index: usize) -> CarouselChanged {
        let from = self.current;
        self.current = index;
        let started_at = self.mounted.as_ref().map_or(0.0, |m| m.host.now_ms());
        self.transition = Some(SlideTransition {
            from,
            to: index,
            started_at,
        });
        tracing::trace!(from, to = index, "carousel index changed");
        CarouselChanged { from, to: index }
    }
}

impl<T> Component for Carousel<T> {
    fn handle(&mut self, delivery: &Delivery) -> Option<Box<dyn Any>> {
        let Delivery::Event { listener, event } = delivery else {
            return None;
        };
        if self.mounted.as_ref().map(|m| m.keys.id()) != Some(*listener) {
            return None;
        }
        let changed = self.handle_key(event.key_code()?)?;
        Some(Box::new(changed))
    }
}

impl<T: fmt::Debug> fmt::Debug for Carousel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Carousel")
            .field("items", &self.items)
            .field("current", &self.current)
            .field("transition", &self.transition)
            .field("mounted", &self.is_mounted())
            .finish()
    }
}
