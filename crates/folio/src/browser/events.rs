//! Browser event handling: DOM event names and conversion of web events to
//! folio events.

use folio_core::ListenKind;

/// DOM event type a listener kind subscribes to. Visibility is observed with
/// an `IntersectionObserver` and has no event type.
pub const fn dom_event_type(kind: ListenKind) -> Option<&'static str> {
    match kind {
        ListenKind::KeyDown => Some("keydown"),
        ListenKind::Click => Some("click"),
        ListenKind::Scroll => Some("scroll"),
        ListenKind::MediaError => Some("error"),
        ListenKind::Visibility => None,
    }
}

/// Intersection ratios at which the observer reports, covering the
/// visibility thresholds the site uses.
pub const INTERSECTION_THRESHOLDS: [f64; 6] = [0.0, 0.1, 0.25, 0.5, 0.75, 1.0];

/// CSS selector matching elements that take part in sequential focus
/// navigation.
pub const FOCUSABLE_SELECTOR: &str =
    "button, [href], input, select, textarea, [tabindex]:not([tabindex^=\"-\"])";

#[cfg(target_arch = "wasm32")]
pub use dom::{keyboard_event_to_folio, modifiers_of};

#[cfg(target_arch = "wasm32")]
mod dom {
    use folio_core::{ElementId, Event, Key, Modifiers};
    use web_sys::KeyboardEvent;

    /// Modifier state of a keyboard event.
    pub fn modifiers_of(event: &KeyboardEvent) -> Modifiers {
        Modifiers {
            shift: event.shift_key(),
            ctrl: event.ctrl_key(),
            alt: event.alt_key(),
            meta: event.meta_key(),
        }
    }

    /// Convert a `keydown` event. `target` is the focused element it was
    /// dispatched to.
    pub fn keyboard_event_to_folio(event: &KeyboardEvent, target: Option<ElementId>) -> Event {
        Event::KeyDown {
            key: Key::from_dom(&event.key()),
            modifiers: modifiers_of(event),
            target,
        }
    }
}
