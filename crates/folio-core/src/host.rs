//! The document host: the platform capabilities components rely on.
//!
//! Components never touch the DOM directly. They hold a [`SharedHost`] and ask
//! it to move focus, install listeners, schedule timers and frames, and scroll.
//! The browser runtime implements [`Host`] on top of `web-sys`; tests use an
//! in-memory document.
//!
//! Every resource a host hands out is identified by an id. The host reports
//! fired resources back to the application as [`Delivery`] values, and the
//! application routes each delivery to the component that owns the id.

use crate::event::Event;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

/// Opaque handle to an element known to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(pub u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "element#{}", self.0)
    }
}

/// Handle to an installed event listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListenerId(pub u64);

/// Handle to a pending timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerId(pub u64);

/// Handle to a pending animation-frame request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameId(pub u64);

/// Where a listener is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListenTarget {
    /// The whole document
    Document,
    /// The window (page scroll)
    Window,
    /// A single element and, for bubbling events, its descendants
    Element(ElementId),
}

/// What a listener listens for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListenKind {
    /// `keydown`
    KeyDown,
    /// `click`
    Click,
    /// `scroll`
    Scroll,
    /// Viewport intersection changes
    Visibility,
    /// Media `error` events
    MediaError,
}

/// Scroll animation behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ScrollBehavior {
    /// Jump immediately
    Instant,
    /// Animated and interruptible
    #[default]
    Smooth,
}

/// A fired host resource, routed back to its owner.
#[derive(Debug, Clone, PartialEq)]
pub enum Delivery {
    /// A timeout elapsed
    Timer(TimerId),
    /// An animation frame is due
    Frame(FrameId),
    /// A listener matched an event
    Event {
        /// Listener that matched
        listener: ListenerId,
        /// The event
        event: Event,
    },
}

/// Platform capabilities consumed by the site's components.
///
/// All methods take `&self`: the browser APIs behind them are themselves
/// shared handles, and single-threaded hosts keep their bookkeeping behind
/// interior mutability.
pub trait Host {
    /// Monotonic clock in milliseconds.
    fn now_ms(&self) -> f64;

    /// Element that currently has keyboard focus.
    fn active_element(&self) -> Option<ElementId>;

    /// Move focus to an element. Returns false if the element is gone or
    /// cannot take focus.
    fn focus(&self, element: ElementId) -> bool;

    /// Whether the element is still attached to the document.
    fn contains(&self, element: ElementId) -> bool;

    /// Focusable descendants of `container` in document order: buttons,
    /// links with `href`, inputs, selects, textareas, and elements with a
    /// non-negative `tabindex`. Queried fresh on every call.
    fn focusable_within(&self, container: ElementId) -> Vec<ElementId>;

    /// Rendered width of an element in CSS pixels.
    fn client_width(&self, element: ElementId) -> Option<f64>;

    /// Height of the layout viewport in CSS pixels.
    fn viewport_height(&self) -> f64;

    /// Current inline `overflow` of the document body.
    fn body_overflow(&self) -> String;

    /// Set the inline `overflow` of the document body.
    fn set_body_overflow(&self, value: &str);

    /// Install a listener.
    fn add_listener(&self, target: ListenTarget, kind: ListenKind) -> ListenerId;

    /// Remove a listener. Unknown ids are ignored.
    fn remove_listener(&self, id: ListenerId);

    /// Suppress the default action of the event being dispatched.
    fn prevent_default(&self);

    /// Schedule a timeout.
    fn set_timeout(&self, delay_ms: u32) -> TimerId;

    /// Cancel a timeout. Unknown or fired ids are ignored.
    fn clear_timeout(&self, id: TimerId);

    /// Request the next animation frame.
    fn request_frame(&self) -> FrameId;

    /// Cancel a frame request. Unknown or fired ids are ignored.
    fn cancel_frame(&self, id: FrameId);

    /// Scroll a container horizontally.
    fn scroll_element_to(&self, element: ElementId, left: f64, behavior: ScrollBehavior);

    /// Scroll the window so that `element` is at the top of the viewport.
    fn scroll_into_view(&self, element: ElementId, behavior: ScrollBehavior);

    /// Start playback of a media element. Returns false if playback was
    /// rejected.
    fn play_media(&self, element: ElementId) -> bool;

    /// Pause a media element.
    fn pause_media(&self, element: ElementId);
}

/// Reference-counted host shared by every mounted component.
pub type SharedHost = Rc<dyn Host>;
