//! Test harness driving components against a [`FakeDocument`].

use crate::document::FakeDocument;
use folio_core::{dispatch, Component, Delivery, ElementId, Key, Modifiers, SharedHost};
use std::any::Any;
use std::rc::Rc;

/// Default frame interval (60 Hz).
pub const FRAME_MS: f64 = 16.0;

/// Messages emitted by components during one interaction.
pub type Messages = Vec<Box<dyn Any>>;

/// Test harness for interacting with mounted components.
///
/// Each interaction asks the document for the deliveries a browser would
/// produce and forwards them, in order, to the given components. Deliveries
/// for listeners removed earlier in the same batch are dropped, matching DOM
/// dispatch.
pub struct Harness {
    document: Rc<FakeDocument>,
    host: SharedHost,
    frame_ms: f64,
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

impl Harness {
    /// Create a harness over an empty document.
    pub fn new() -> Self {
        let document = FakeDocument::new();
        let host: SharedHost = document.clone();
        Self {
            document,
            host,
            frame_ms: FRAME_MS,
        }
    }

    /// Set the frame interval used by [`Harness::run_frames`].
    pub fn frame_ms(mut self, ms: f64) -> Self {
        self.frame_ms = ms;
        self
    }

    /// The underlying document.
    pub fn document(&self) -> &FakeDocument {
        &self.document
    }

    /// A shared handle for mounting components.
    pub fn host(&self) -> SharedHost {
        SharedHost::clone(&self.host)
    }

    // === Dispatch ===

    /// Forward deliveries to components.
    pub fn deliver(
        &self,
        deliveries: Vec<Delivery>,
        components: &mut [&mut dyn Component],
    ) -> Messages {
        let mut messages = Vec::new();
        for delivery in deliveries {
            if let Delivery::Event { listener, .. } = &delivery {
                if !self.document.has_listener(*listener) {
                    continue;
                }
            }
            messages.extend(dispatch(components, &delivery));
        }
        messages
    }

    // === Event Simulation ===

    /// Press a key on the focused element.
    pub fn press(&self, key: Key, components: &mut [&mut dyn Component]) -> Messages {
        self.press_with(key, Modifiers::NONE, components)
    }

    /// Press a key with modifiers. Applies the browser's default Tab
    /// traversal unless a handler prevented it.
    pub fn press_with(
        &self,
        key: Key,
        modifiers: Modifiers,
        components: &mut [&mut dyn Component],
    ) -> Messages {
        let deliveries = self.document.key_down(key, modifiers);
        let messages = self.deliver(deliveries, components);
        if !self.document.take_default_prevented() && key == Key::Tab {
            self.document.default_tab(modifiers.shift);
        }
        messages
    }

    /// Click an element.
    pub fn click(&self, target: ElementId, components: &mut [&mut dyn Component]) -> Messages {
        let deliveries = self.document.click(target);
        self.deliver(deliveries, components)
    }

    /// Let `ms` milliseconds pass, firing due timeouts.
    pub fn advance(&self, ms: f64, components: &mut [&mut dyn Component]) -> Messages {
        let deliveries = self.document.advance(ms);
        self.deliver(deliveries, components)
    }

    /// Run `count` animation frames.
    pub fn run_frames(&self, count: usize, components: &mut [&mut dyn Component]) -> Messages {
        let mut messages = Vec::new();
        for _ in 0..count {
            let deliveries = self.document.frame(self.frame_ms);
            messages.extend(self.deliver(deliveries, components));
        }
        messages
    }

    /// Scroll a container horizontally.
    pub fn scroll_element(
        &self,
        element: ElementId,
        left: f64,
        components: &mut [&mut dyn Component],
    ) -> Messages {
        let deliveries = self.document.scroll_element(element, left);
        self.deliver(deliveries, components)
    }

    /// Scroll the window vertically.
    pub fn scroll_window(&self, top: f64, components: &mut [&mut dyn Component]) -> Messages {
        let deliveries = self.document.scroll_window(top);
        self.deliver(deliveries, components)
    }

    /// Change an element's visible ratio.
    pub fn intersect(
        &self,
        element: ElementId,
        ratio: f64,
        components: &mut [&mut dyn Component],
    ) -> Messages {
        let deliveries = self.document.intersect(element, ratio);
        self.deliver(deliveries, components)
    }

    /// Fail a media element.
    pub fn media_error(&self, element: ElementId, components: &mut [&mut dyn Component]) -> Messages {
        let deliveries = self.document.media_error(element);
        self.deliver(deliveries, components)
    }
}

/// Messages of type `T`, in emission order.
pub fn messages_of<T: 'static>(messages: &[Box<dyn Any>]) -> Vec<&T> {
    messages
        .iter()
        .filter_map(|m| m.downcast_ref::<T>())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::{ListenKind, Listener, Timer};

    /// Records every key it receives and removes its own listener on Escape.
    struct KeyRecorder {
        listener: Option<Listener>,
        seen: Vec<Key>,
    }

    impl Component for KeyRecorder {
        fn handle(&mut self, delivery: &Delivery) -> Option<Box<dyn Any>> {
            let Delivery::Event { listener, event } = delivery else {
                return None;
            };
            if self.listener.as_ref().map(Listener::id) != Some(*listener) {
                return None;
            }
            let key = event.key_code()?;
            self.seen.push(key);
            if key == Key::Escape {
                self.listener = None;
            }
            Some(Box::new(key))
        }
    }

    struct Ticker {
        timer: Option<Timer>,
        fired: usize,
    }

    impl Component for Ticker {
        fn handle(&mut self, delivery: &Delivery) -> Option<Box<dyn Any>> {
            match delivery {
                Delivery::Timer(id) if self.timer.as_ref().map(Timer::id) == Some(*id) => {
                    self.timer = None;
                    self.fired += 1;
                    None
                }
                _ => None,
            }
        }
    }

    // ===== Key Tests =====

    #[test]
    fn test_press_routes_to_document_listener() {
        let harness = Harness::new();
        let host = harness.host();
        let mut recorder = KeyRecorder {
            listener: Some(Listener::on_document(&host, ListenKind::KeyDown)),
            seen: Vec::new(),
        };
        let messages = harness.press(Key::Enter, &mut [&mut recorder]);
        assert_eq!(recorder.seen, vec![Key::Enter]);
        assert_eq!(messages_of::<Key>(&messages), vec![&Key::Enter]);
    }

    #[test]
    fn test_removed_listener_skipped_within_batch() {
        let harness = Harness::new();
        let host = harness.host();
        let mut a = KeyRecorder {
            listener: Some(Listener::on_document(&host, ListenKind::KeyDown)),
            seen: Vec::new(),
        };
        harness.press(Key::Escape, &mut [&mut a]);
        harness.press(Key::Escape, &mut [&mut a]);
        assert_eq!(a.seen, vec![Key::Escape]);
        assert_eq!(harness.document().listener_count(), 0);
    }

    #[test]
    fn test_default_tab_applied_when_not_prevented() {
        let harness = Harness::new();
        let first = harness.document().button(None);
        let second = harness.document().button(None);
        harness.host().focus(first);
        harness.press(Key::Tab, &mut []);
        assert_eq!(harness.document().focused(), Some(second));
    }

    // ===== Time Tests =====

    #[test]
    fn test_advance_fires_timer() {
        let harness = Harness::new();
        let mut ticker = Ticker {
            timer: Some(Timer::schedule(&harness.host(), 50)),
            fired: 0,
        };
        harness.advance(49.0, &mut [&mut ticker]);
        assert_eq!(ticker.fired, 0);
        harness.advance(1.0, &mut [&mut ticker]);
        assert_eq!(ticker.fired, 1);
        assert_eq!(harness.document().pending_timers(), 0);
    }

    #[test]
    fn test_run_frames_advances_clock() {
        let harness = Harness::new().frame_ms(10.0);
        harness.run_frames(3, &mut []);
        assert!((harness.document().now() - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_click_without_listeners_is_quiet() {
        let harness = Harness::new();
        let button = harness.document().button(None);
        assert!(harness.click(button, &mut []).is_empty());
    }
}
