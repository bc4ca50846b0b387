//! [`Host`] implementation backed by the browser DOM.
//!
//! Listener, timer and frame callbacks are `wasm_bindgen` closures owned by
//! the host. A fired or removed closure is parked in a retired list and only
//! dropped at the start of the next top-level callback, so a component may
//! release the very resource whose callback is running.

use super::events::{
    dom_event_type, keyboard_event_to_folio, FOCUSABLE_SELECTOR, INTERSECTION_THRESHOLDS,
};
use folio_core::{
    Delivery, ElementId, Event, FrameId, Host, HostError, ListenKind, ListenTarget, ListenerId,
    ScrollBehavior, TimerId,
};
use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    Document, Element, EventTarget, HtmlElement, HtmlMediaElement, IntersectionObserver,
    IntersectionObserverEntry, IntersectionObserverInit, KeyboardEvent, ScrollIntoViewOptions,
    ScrollToOptions, Window,
};

/// Receiver of every delivery the host produces.
pub type Sink = Rc<dyn Fn(Delivery)>;

type DomCallback = Closure<dyn FnMut(web_sys::Event)>;
type ObserverCallback = Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>;

enum Installed {
    Dom {
        target: EventTarget,
        event_type: &'static str,
        callback: DomCallback,
    },
    Observer {
        observer: IntersectionObserver,
        _callback: ObserverCallback,
    },
}

impl Installed {
    fn detach(&self) {
        match self {
            Self::Dom {
                target,
                event_type,
                callback,
            } => {
                let _ = target
                    .remove_event_listener_with_callback(event_type, callback.as_ref().unchecked_ref());
            }
            Self::Observer { observer, .. } => observer.disconnect(),
        }
    }
}

struct InstalledListener {
    target: ListenTarget,
    kind: ListenKind,
    installed: Installed,
}

#[derive(Default)]
struct State {
    next_id: u64,
    elements: Vec<Element>,
    listeners: HashMap<u64, InstalledListener>,
    timers: HashMap<u64, (i32, Closure<dyn FnMut()>)>,
    frames: HashMap<u64, (i32, Closure<dyn FnMut(f64)>)>,
    retired: Vec<Box<dyn Any>>,
}

struct Inner {
    window: Window,
    document: Document,
    state: RefCell<State>,
    sink: RefCell<Option<Sink>>,
    current_event: RefCell<Option<web_sys::Event>>,
    depth: Cell<u32>,
}

impl Inner {
    fn next_id(&self) -> u64 {
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        state.next_id
    }

    fn register(&self, element: &Element) -> ElementId {
        let mut state = self.state.borrow_mut();
        if let Some(index) = state.elements.iter().position(|known| known == element) {
            return ElementId(index as u64);
        }
        state.elements.push(element.clone());
        ElementId(state.elements.len() as u64 - 1)
    }

    fn element(&self, id: ElementId) -> Option<Element> {
        let index = usize::try_from(id.0).ok()?;
        self.state.borrow().elements.get(index).cloned()
    }

    fn retire(&self, resource: Box<dyn Any>) {
        self.state.borrow_mut().retired.push(resource);
    }

    /// Drop retired closures, unless a callback is still on the stack.
    fn sweep(&self) {
        if self.depth.get() == 0 {
            let retired = std::mem::take(&mut self.state.borrow_mut().retired);
            drop(retired);
        }
    }

    fn dispatch(&self, delivery: Delivery, event: Option<web_sys::Event>) {
        let Some(sink) = self.sink.borrow().clone() else {
            return;
        };
        self.depth.set(self.depth.get() + 1);
        let previous = self.current_event.replace(event);
        sink(delivery);
        self.current_event.replace(previous);
        self.depth.set(self.depth.get() - 1);
    }

    fn on_dom_event(&self, id: u64, target: ListenTarget, kind: ListenKind, event: web_sys::Event) {
        let event_target = event
            .target()
            .and_then(|t| t.dyn_into::<Element>().ok())
            .map(|element| self.register(&element));
        let translated = match kind {
            ListenKind::KeyDown => {
                let Some(key) = event.dyn_ref::<KeyboardEvent>() else {
                    return;
                };
                keyboard_event_to_folio(key, event_target)
            }
            ListenKind::Click => {
                let Some(target) = event_target else {
                    return;
                };
                Event::Click { target }
            }
            ListenKind::Scroll => self.scroll_position(target),
            ListenKind::MediaError => Event::MediaError,
            ListenKind::Visibility => return,
        };
        self.sweep();
        self.dispatch(
            Delivery::Event {
                listener: ListenerId(id),
                event: translated,
            },
            Some(event),
        );
    }

    fn scroll_position(&self, target: ListenTarget) -> Event {
        match target {
            ListenTarget::Element(element) => {
                let (left, top) = self.element(element).map_or((0.0, 0.0), |el| {
                    (el.scroll_left() as f64, el.scroll_top() as f64)
                });
                Event::Scroll { left, top }
            }
            ListenTarget::Window | ListenTarget::Document => Event::Scroll {
                left: self.window.scroll_x().unwrap_or(0.0),
                top: self.window.scroll_y().unwrap_or(0.0),
            },
        }
    }

    fn on_intersection(&self, id: u64, entries: &js_sys::Array) {
        self.sweep();
        for entry in entries.iter() {
            let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                continue;
            };
            self.dispatch(
                Delivery::Event {
                    listener: ListenerId(id),
                    event: Event::Intersect {
                        ratio: entry.intersection_ratio(),
                        intersecting: entry.is_intersecting(),
                    },
                },
                None,
            );
        }
    }

    fn fire_timer(&self, id: u64) {
        self.sweep();
        let Some((_, callback)) = self.state.borrow_mut().timers.remove(&id) else {
            return;
        };
        self.retire(Box::new(callback));
        self.dispatch(Delivery::Timer(TimerId(id)), None);
    }

    fn fire_frame(&self, id: u64) {
        self.sweep();
        let Some((_, callback)) = self.state.borrow_mut().frames.remove(&id) else {
            return;
        };
        self.retire(Box::new(callback));
        self.dispatch(Delivery::Frame(FrameId(id)), None);
    }

    fn media_rejected(&self, element: ElementId) {
        let listeners: Vec<u64> = self
            .state
            .borrow()
            .listeners
            .iter()
            .filter(|(_, l)| {
                l.kind == ListenKind::MediaError && l.target == ListenTarget::Element(element)
            })
            .map(|(id, _)| *id)
            .collect();
        self.sweep();
        for id in listeners {
            self.dispatch(
                Delivery::Event {
                    listener: ListenerId(id),
                    event: Event::MediaError,
                },
                None,
            );
        }
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        let state = self.state.get_mut();
        for listener in state.listeners.values() {
            listener.installed.detach();
        }
        for (handle, _) in state.timers.values() {
            self.window.clear_timeout_with_handle(*handle);
        }
        for (handle, _) in state.frames.values() {
            let _ = self.window.cancel_animation_frame(*handle);
        }
    }
}

fn warn(message: &str) {
    web_sys::console::warn_1(&JsValue::from_str(message));
}

const fn scroll_behavior(behavior: ScrollBehavior) -> web_sys::ScrollBehavior {
    match behavior {
        ScrollBehavior::Instant => web_sys::ScrollBehavior::Instant,
        ScrollBehavior::Smooth => web_sys::ScrollBehavior::Smooth,
    }
}

/// The browser document as a [`Host`].
#[derive(Clone)]
pub struct WebHost {
    inner: Rc<Inner>,
}

impl WebHost {
    /// Bind to the current window and document.
    pub fn new() -> Result<Self, HostError> {
        let window = web_sys::window().ok_or(HostError::NoWindow)?;
        let document = window.document().ok_or(HostError::NoDocument)?;
        if document.body().is_none() {
            return Err(HostError::NoBody);
        }
        Ok(Self {
            inner: Rc::new(Inner {
                window,
                document,
                state: RefCell::new(State::default()),
                sink: RefCell::new(None),
                current_event: RefCell::new(None),
                depth: Cell::new(0),
            }),
        })
    }

    /// Route deliveries to `sink`.
    pub fn set_sink(&self, sink: Sink) {
        *self.inner.sink.borrow_mut() = Some(sink);
    }

    /// Look up an element by its DOM `id`.
    pub fn element_by_id(&self, dom_id: &str) -> Option<ElementId> {
        let element = self.inner.document.get_element_by_id(dom_id)?;
        Some(self.inner.register(&element))
    }

    /// Look up an element that must exist.
    pub fn require_by_id(&self, dom_id: &str) -> Result<ElementId, HostError> {
        self.element_by_id(dom_id)
            .ok_or_else(|| HostError::ElementNotFound(format!("#{dom_id}")))
    }

    /// Look up a `<video>`/`<audio>` element. Absent is fine; present with
    /// another type is an error.
    pub fn media_by_id(&self, dom_id: &str) -> Result<Option<ElementId>, HostError> {
        let Some(id) = self.element_by_id(dom_id) else {
            return Ok(None);
        };
        if self.media_element(id).is_none() {
            return Err(HostError::WrongElementType {
                selector: format!("#{dom_id}"),
                expected: "HtmlMediaElement",
            });
        }
        Ok(Some(id))
    }

    /// Descendants of `within` matching a CSS selector, in document order.
    pub fn query_all(&self, within: ElementId, selector: &str) -> Vec<ElementId> {
        let Some(Ok(nodes)) = self
            .inner
            .element(within)
            .map(|el| el.query_selector_all(selector))
        else {
            return Vec::new();
        };
        (0..nodes.length())
            .filter_map(|i| nodes.get(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .map(|element| self.inner.register(&element))
            .collect()
    }

    /// The DOM element behind an id.
    pub fn element(&self, id: ElementId) -> Option<Element> {
        self.inner.element(id)
    }

    /// Number of installed listeners.
    pub fn listener_count(&self) -> usize {
        self.inner.state.borrow().listeners.len()
    }

    fn install(&self, id: u64, target: ListenTarget, kind: ListenKind) -> Result<Installed, JsValue> {
        let weak = Rc::downgrade(&self.inner);
        if let Some(event_type) = dom_event_type(kind) {
            let event_target: EventTarget = match target {
                ListenTarget::Document => self.inner.document.clone().into(),
                ListenTarget::Window => self.inner.window.clone().into(),
                ListenTarget::Element(element) => {
                    self.inner.element(element).ok_or("Unknown element")?.into()
                }
            };
            let callback = DomCallback::new(move |event: web_sys::Event| {
                if let Some(inner) = weak.upgrade() {
                    inner.on_dom_event(id, target, kind, event);
                }
            });
            event_target
                .add_event_listener_with_callback(event_type, callback.as_ref().unchecked_ref())?;
            return Ok(Installed::Dom {
                target: event_target,
                event_type,
                callback,
            });
        }

        let ListenTarget::Element(element) = target else {
            return Err("Visibility is observed on elements only".into());
        };
        let element = self.inner.element(element).ok_or("Unknown element")?;
        let callback = ObserverCallback::new(
            move |entries: js_sys::Array, _observer: IntersectionObserver| {
                if let Some(inner) = weak.upgrade() {
                    inner.on_intersection(id, &entries);
                }
            },
        );
        let thresholds: js_sys::Array = INTERSECTION_THRESHOLDS
            .iter()
            .map(|t| JsValue::from_f64(*t))
            .collect();
        let init = IntersectionObserverInit::new();
        init.set_threshold(&thresholds);
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
        observer.observe(&element);
        Ok(Installed::Observer {
            observer,
            _callback: callback,
        })
    }

    fn media_element(&self, element: ElementId) -> Option<HtmlMediaElement> {
        self.inner.element(element)?.dyn_into::<HtmlMediaElement>().ok()
    }
}

impl Host for WebHost {
    fn now_ms(&self) -> f64 {
        self.inner.window.performance().map_or(0.0, |p| p.now())
    }

    fn active_element(&self) -> Option<ElementId> {
        let active = self.inner.document.active_element()?;
        let body = self.inner.document.body();
        if body.is_some_and(|body| AsRef::<Element>::as_ref(&body) == &active) {
            return None;
        }
        Some(self.inner.register(&active))
    }

    fn focus(&self, element: ElementId) -> bool {
        if !self.contains(element) {
            return false;
        }
        let Some(el) = self
            .inner
            .element(element)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        else {
            return false;
        };
        el.focus().is_ok()
            && self
                .inner
                .document
                .active_element()
                .is_some_and(|active| AsRef::<Element>::as_ref(&el) == &active)
    }

    fn contains(&self, element: ElementId) -> bool {
        self.inner
            .element(element)
            .is_some_and(|el| self.inner.document.contains(Some(el.as_ref())))
    }

    fn focusable_within(&self, container: ElementId) -> Vec<ElementId> {
        self.query_all(container, FOCUSABLE_SELECTOR)
    }

    fn client_width(&self, element: ElementId) -> Option<f64> {
        if !self.contains(element) {
            return None;
        }
        self.inner
            .element(element)
            .map(|el| f64::from(el.client_width()))
    }

    fn viewport_height(&self) -> f64 {
        self.inner
            .window
            .inner_height()
            .ok()
            .and_then(|h| h.as_f64())
            .unwrap_or(0.0)
    }

    fn body_overflow(&self) -> String {
        self.inner
            .document
            .body()
            .and_then(|body| body.style().get_property_value("overflow").ok())
            .unwrap_or_default()
    }

    fn set_body_overflow(&self, value: &str) {
        let Some(body) = self.inner.document.body() else {
            return;
        };
        let style = body.style();
        let result = if value.is_empty() {
            style.remove_property("overflow").map(drop)
        } else {
            style.set_property("overflow", value)
        };
        if let Err(err) = result {
            warn(&format!("failed to set body overflow: {err:?}"));
        }
    }

    fn add_listener(&self, target: ListenTarget, kind: ListenKind) -> ListenerId {
        let id = self.inner.next_id();
        match self.install(id, target, kind) {
            Ok(installed) => {
                self.inner.state.borrow_mut().listeners.insert(
                    id,
                    InstalledListener {
                        target,
                        kind,
                        installed,
                    },
                );
            }
            Err(err) => warn(&format!("failed to install {kind:?} listener: {err:?}")),
        }
        ListenerId(id)
    }

    fn remove_listener(&self, id: ListenerId) {
        let removed = self.inner.state.borrow_mut().listeners.remove(&id.0);
        if let Some(listener) = removed {
            listener.installed.detach();
            self.inner.retire(Box::new(listener.installed));
        }
    }

    fn prevent_default(&self) {
        if let Some(event) = self.inner.current_event.borrow().as_ref() {
            event.prevent_default();
        }
    }

    fn set_timeout(&self, delay_ms: u32) -> TimerId {
        let id = self.inner.next_id();
        let weak = Rc::downgrade(&self.inner);
        let callback = Closure::<dyn FnMut()>::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.fire_timer(id);
            }
        });
        let delay = i32::try_from(delay_ms).unwrap_or(i32::MAX);
        match self
            .inner
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                delay,
            ) {
            Ok(handle) => {
                self.inner
                    .state
                    .borrow_mut()
                    .timers
                    .insert(id, (handle, callback));
            }
            Err(err) => warn(&format!("failed to schedule timeout: {err:?}")),
        }
        TimerId(id)
    }

    fn clear_timeout(&self, id: TimerId) {
        let removed = self.inner.state.borrow_mut().timers.remove(&id.0);
        if let Some((handle, callback)) = removed {
            self.inner.window.clear_timeout_with_handle(handle);
            self.inner.retire(Box::new(callback));
        }
    }

    fn request_frame(&self) -> FrameId {
        let id = self.inner.next_id();
        let weak = Rc::downgrade(&self.inner);
        let callback = Closure::<dyn FnMut(f64)>::new(move |_timestamp: f64| {
            if let Some(inner) = weak.upgrade() {
                inner.fire_frame(id);
            }
        });
        match self
            .inner
            .window
            .request_animation_frame(callback.as_ref().unchecked_ref())
        {
            Ok(handle) => {
                self.inner
                    .state
                    .borrow_mut()
                    .frames
                    .insert(id, (handle, callback));
            }
            Err(err) => warn(&format!("failed to request animation frame: {err:?}")),
        }
        FrameId(id)
    }

    fn cancel_frame(&self, id: FrameId) {
        let removed = self.inner.state.borrow_mut().frames.remove(&id.0);
        if let Some((handle, callback)) = removed {
            let _ = self.inner.window.cancel_animation_frame(handle);
            self.inner.retire(Box::new(callback));
        }
    }

    fn scroll_element_to(&self, element: ElementId, left: f64, behavior: ScrollBehavior) {
        let Some(el) = self.inner.element(element) else {
            return;
        };
        let options = ScrollToOptions::new();
        options.set_left(left);
        options.set_behavior(scroll_behavior(behavior));
        el.scroll_to_with_scroll_to_options(&options);
    }

    fn scroll_into_view(&self, element: ElementId, behavior: ScrollBehavior) {
        let Some(el) = self.inner.element(element) else {
            return;
        };
        let options = ScrollIntoViewOptions::new();
        options.set_behavior(scroll_behavior(behavior));
        el.scroll_into_view_with_scroll_into_view_options(&options);
    }

    fn play_media(&self, element: ElementId) -> bool {
        let Some(media) = self.media_element(element) else {
            return false;
        };
        let Ok(promise) = media.play() else {
            return false;
        };
        let weak = Rc::downgrade(&self.inner);
        wasm_bindgen_futures::spawn_local(async move {
            if JsFuture::from(promise).await.is_err() {
                if let Some(inner) = weak.upgrade() {
                    inner.media_rejected(element);
                }
            }
        });
        true
    }

    fn pause_media(&self, element: ElementId) {
        if let Some(media) = self.media_element(element) {
            if let Err(err) = media.pause() {
                warn(&format!("failed to pause media: {err:?}"));
            }
        }
    }
}
