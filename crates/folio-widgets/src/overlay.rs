//! Modal overlay with focus management.
//!
//! An [`OverlayManager`] owns the behaviour of one dialog: while it is open the
//! body cannot scroll, Escape and backdrop clicks dismiss it, Tab cycles within
//! the dialog, and on close focus returns to whatever was focused before.

use folio_core::{
    Component, Delivery, ElementId, Event, Key, ListenKind, Listener, Motion, ScrollLock,
    SharedHost, Timer,
};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;

/// Delay before focus moves into a freshly opened overlay, letting the entry
/// animation start.
pub const DEFAULT_FOCUS_DELAY_MS: u32 = 50;

/// Overlay width variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OverlaySize {
    /// 28rem
    Medium,
    /// 42rem
    #[default]
    Large,
    /// 56rem
    ExtraLarge,
    /// 90% of the viewport in both directions
    Full,
}

impl OverlaySize {
    /// CSS `max-width` for this size.
    #[must_use]
    pub const fn max_width(self) -> &'static str {
        match self {
            Self::Medium => "28rem",
            Self::Large => "42rem",
            Self::ExtraLarge => "56rem",
            Self::Full => "90vw",
        }
    }

    /// CSS `max-height` for this size.
    #[must_use]
    pub const fn max_height(self) -> &'static str {
        "90vh"
    }
}

/// Visible lifecycle of an overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayPhase {
    /// Not shown
    Closed,
    /// Entry animation running
    Opening,
    /// Fully shown
    Open,
    /// Exit animation running
    Closing,
}

/// Reason the overlay was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CloseReason {
    /// Closed via escape key
    Escape,
    /// Closed via backdrop click
    Backdrop,
    /// Closed via close button
    CloseButton,
    /// Closed programmatically
    Programmatic,
}

/// Message emitted on every open/close transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayEvent {
    /// The overlay opened
    Opened,
    /// The overlay closed
    Closed {
        /// Reason for closure
        reason: CloseReason,
    },
}

/// Resources held only while open. Fields drop in declaration order, so
/// listeners go first, then the pending focus move, then the scroll lock.
struct Mounted {
    escape: Listener,
    trap: Listener,
    backdrop: Listener,
    close_button: Option<Listener>,
    focus_timer: Option<Timer>,
    _scroll_lock: ScrollLock,
}

#[derive(Debug, Clone, Copy)]
struct Transition {
    opened: bool,
    at: f64,
}

enum Route {
    FocusTimer,
    Escape,
    Trap,
    Backdrop,
    CloseButton,
}

/// Modal overlay manager.
pub struct OverlayManager {
    host: SharedHost,
    container: ElementId,
    backdrop: ElementId,
    close_button: Option<ElementId>,
    size: OverlaySize,
    title: Option<String>,
    focus_delay_ms: u32,
    restore_to: Option<ElementId>,
    last_transition: Option<Transition>,
    mounted: Option<Mounted>,
}

impl OverlayManager {
    /// Create a closed overlay for a dialog `container` sitting on `backdrop`.
    pub fn new(host: &SharedHost, container: ElementId, backdrop: ElementId) -> Self {
        Self {
            host: SharedHost::clone(host),
            container,
            backdrop,
            close_button: None,
            size: OverlaySize::default(),
            title: None,
            focus_delay_ms: DEFAULT_FOCUS_DELAY_MS,
            restore_to: None,
            last_transition: None,
            mounted: None,
        }
    }

    /// Set the close button element.
    #[must_use]
    pub const fn with_close_button(mut self, button: ElementId) -> Self {
        self.close_button = Some(button);
        self
    }

    /// Set overlay size.
    #[must_use]
    pub const fn size(mut self, size: OverlaySize) -> Self {
        self.size = size;
        self
    }

    /// Set the title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the delay before focus moves into the overlay.
    #[must_use]
    pub const fn focus_delay_ms(mut self, delay_ms: u32) -> Self {
        self.focus_delay_ms = delay_ms;
        self
    }

    /// Check if the overlay is open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.mounted.is_some()
    }

    /// Element focus will return to on close.
    #[must_use]
    pub const fn restore_target(&self) -> Option<ElementId> {
        self.restore_to
    }

    /// Dialog container element.
    #[must_use]
    pub const fn container(&self) -> ElementId {
        self.container
    }

    /// Configured size.
    #[must_use]
    pub const fn overlay_size(&self) -> OverlaySize {
        self.size
    }

    /// Title, if any.
    #[must_use]
    pub fn overlay_title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Lifecycle phase at the host's current time.
    #[must_use]
    pub fn phase(&self) -> OverlayPhase {
        self.phase_at(self.host.now_ms())
    }

    /// Lifecycle phase at `now_ms`.
    #[must_use]
    pub fn phase_at(&self, now_ms: f64) -> OverlayPhase {
        let since = self.last_transition.map(|t| (t.opened, now_ms - t.at));
        match (self.is_open(), since) {
            (true, Some((true, elapsed))) if elapsed < Motion::MODAL_CONTENT_ENTER.total_ms() => {
                OverlayPhase::Opening
            }
            (true, _) => OverlayPhase::Open,
            (false, Some((false, elapsed))) if elapsed < Motion::MODAL_CONTENT_EXIT.total_ms() => {
                OverlayPhase::Closing
            }
            (false, _) => OverlayPhase::Closed,
        }
    }

    /// Open the overlay. `trigger` is used as the restore target when the host
    /// reports no focused element. Opening an open overlay does nothing.
    pub fn open(&mut self, trigger: Option<ElementId>) -> Option<OverlayEvent> {
        if self.is_open() {
            return None;
        }
        self.restore_to = self.host.active_element().or(trigger);

        let scroll_lock = ScrollLock::acquire(&self.host);
        let host = &self.host;
        self.mounted = Some(Mounted {
            escape: Listener::on_document(host, ListenKind::KeyDown),
            trap: Listener::on_element(host, self.container, ListenKind::KeyDown),
            backdrop: Listener::on_element(host, self.backdrop, ListenKind::Click),
            close_button: self
                .close_button
                .map(|button| Listener::on_element(host, button, ListenKind::Click)),
            focus_timer: Some(Timer::schedule(host, self.focus_delay_ms)),
            _scroll_lock: scroll_lock,
        });
        self.last_transition = Some(Transition {
            opened: true,
            at: self.host.now_ms(),
        });
        tracing::debug!(
            container = %self.container,
            restore_to = ?self.restore_to,
            "overlay opened"
        );
        Some(OverlayEvent::Opened)
    }

    /// Close the overlay and restore focus. Closing a closed overlay does
    /// nothing.
    pub fn close(&mut self, reason: CloseReason) -> Option<OverlayEvent> {
        let mounted = self.mounted.take()?;
        drop(mounted);
        self.last_transition = Some(Transition {
            opened: false,
            at: self.host.now_ms(),
        });

        if let Some(previous) = self.restore_to.take() {
            if self.host.contains(previous) {
                self.host.focus(previous);
            } else {
                tracing::debug!(element = %previous, "focus restore target gone");
            }
        }
        tracing::debug!(container = %self.container, ?reason, "overlay closed");
        Some(OverlayEvent::Closed { reason })
    }

    /// Keep Tab and Shift+Tab inside the overlay. Returns true if the default
    /// traversal was prevented.
    pub fn handle_key_down(&self, event: &Event) -> bool {
        let Event::KeyDown {
            key: Key::Tab,
            modifiers,
            ..
        } = event
        else {
            return false;
        };
        if !self.is_open() {
            return false;
        }

        let focusable = self.host.focusable_within(self.container);
        let (Some(&first), Some(&last)) = (focusable.first(), focusable.last()) else {
            return false;
        };
        let active = self.host.active_element();

        let wrap_to = if modifiers.shift {
            (active == Some(first)).then_some(last)
        } else {
            (active == Some(last)).then_some(first)
        };
        match wrap_to {
            Some(target) => {
                self.host.prevent_default();
                self.host.focus(target);
                true
            }
            None => false,
        }
    }

    /// Close if the click landed on the backdrop itself rather than on
    /// anything inside it.
    pub fn handle_backdrop_click(&mut self, target: ElementId) -> Option<OverlayEvent> {
        if target == self.backdrop {
            self.close(CloseReason::Backdrop)
        } else {
            None
        }
    }

    fn route(&self, delivery: &Delivery) -> Option<Route> {
        let mounted = self.mounted.as_ref()?;
        match delivery {
            Delivery::Timer(id) => mounted
                .focus_timer
                .as_ref()
                .filter(|timer| timer.id() == *id)
                .map(|_| Route::FocusTimer),
            Delivery::Event { listener, .. } => {
                if *listener == mounted.escape.id() {
                    Some(Route::Escape)
                } else if *listener == mounted.trap.id() {
                    Some(Route::Trap)
                } else if *listener == mounted.backdrop.id() {
                    Some(Route::Backdrop)
                } else if mounted.close_button.as_ref().map(Listener::id) == Some(*listener) {
                    Some(Route::CloseButton)
                } else {
                    None
                }
            }
            Delivery::Frame(_) => None,
        }
    }

    fn move_focus_in(&mut self) {
        if let Some(mounted) = self.mounted.as_mut() {
            mounted.focus_timer = None;
        }
        if self.host.contains(self.container) {
            self.host.focus(self.container);
        } else {
            tracing::debug!(container = %self.container, "overlay container not attached");
        }
    }
}

impl Component for OverlayManager {
    fn handle(&mut self, delivery: &Delivery) -> Option<Box<dyn Any>> {
        let event = match (self.route(delivery)?, delivery) {
            (Route::FocusTimer, _) => {
                self.move_focus_in();
                None
            }
            (Route::Escape, Delivery::Event { event, .. }) => {
                if event.key_code() == Some(Key::Escape) {
                    self.close(CloseReason::Escape)
                } else {
                    None
                }
            }
            (Route::Trap, Delivery::Event { event, .. }) => {
                self.handle_key_down(event);
                None
            }
            (Route::Backdrop, Delivery::Event { event, .. }) => match event {
                Event::Click { target } => self.handle_backdrop_click(*target),
                _ => None,
            },
            (Route::CloseButton, _) => self.close(CloseReason::CloseButton),
            _ => None,
        };
        event.map(|e| Box::new(e) as Box<dyn Any>)
    }
}

impl fmt::Debug for OverlayManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverlayManager")
            .field("container", &self.container)
            .field("backdrop", &self.backdrop)
            .field("open", &self.is_open())
            .field("restore_to", &self.restore_to)
            .field("size", &self.size)
            .field("title", &self.title)
            .finish_non_exhaustive()
    }
}
