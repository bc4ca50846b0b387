//! In-memory document implementing [`Host`].
//!
//! The document keeps a tree of elements, a focus pointer, the body's overflow
//! style, a virtual clock, and the bookkeeping for every listener, timer and
//! frame handed out. Input methods (`key_down`, `click`, `scroll_element`, …)
//! return the [`Delivery`] values a browser would have produced, in dispatch
//! order, without invoking anything themselves.

use folio_core::{
    Delivery, ElementId, Event, FrameId, Host, Key, ListenKind, ListenTarget, ListenerId,
    Modifiers, ScrollBehavior, TimerId,
};
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::rc::Rc;

/// Overflow reported before any inline style is set.
pub const INITIAL_OVERFLOW: &str = "visible";

/// Default viewport used by [`FakeDocument::new`].
pub const DEFAULT_VIEWPORT: (f64, f64) = (1280.0, 720.0);

/// Element kinds, as far as focus is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Plain container; cannot take focus
    Container,
    /// `<button>`
    Button,
    /// `<a href>`
    Link,
    /// `<a>` without `href`; not focusable
    Anchor,
    /// `<input>`
    Input,
    /// `<select>`
    Select,
    /// `<textarea>`
    Textarea,
    /// Any element with an explicit `tabindex`
    Tabindex(i32),
    /// `<video>`
    Video,
}

impl NodeKind {
    /// Whether the element is part of the sequential tab order.
    #[must_use]
    pub const fn is_tabbable(self) -> bool {
        match self {
            Self::Button | Self::Link | Self::Input | Self::Select | Self::Textarea => true,
            Self::Tabindex(index) => index >= 0,
            Self::Container | Self::Anchor | Self::Video => false,
        }
    }

    /// Whether the element accepts programmatic focus.
    #[must_use]
    pub const fn is_focusable(self) -> bool {
        self.is_tabbable() || matches!(self, Self::Tabindex(_))
    }
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<ElementId>,
    kind: NodeKind,
    attached: bool,
    width: f64,
    scroll_left: f64,
}

/// A recorded scroll request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollRequest {
    /// `element.scrollTo({ left })`
    Element {
        /// Scrolled container
        element: ElementId,
        /// Target offset
        left: f64,
        /// Requested behaviour
        behavior: ScrollBehavior,
    },
    /// `element.scrollIntoView()`
    IntoView {
        /// Element brought into view
        element: ElementId,
        /// Requested behaviour
        behavior: ScrollBehavior,
    },
}

/// A recorded media command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaCall {
    /// `play()` was called
    Play(ElementId),
    /// `pause()` was called
    Pause(ElementId),
}

#[derive(Debug)]
struct State {
    next_id: u64,
    nodes: BTreeMap<ElementId, Node>,
    active: Option<ElementId>,
    overflow: Option<String>,
    listeners: BTreeMap<u64, (ListenTarget, ListenKind)>,
    timers: BTreeMap<u64, f64>,
    frames: BTreeSet<u64>,
    now: f64,
    viewport: (f64, f64),
    window_scroll: f64,
    scroll_requests: Vec<ScrollRequest>,
    media_calls: Vec<MediaCall>,
    rejects_play: HashSet<ElementId>,
}

impl State {
    fn allocate(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn is_attached(&self, element: ElementId) -> bool {
        self.nodes.get(&element).is_some_and(|n| n.attached)
    }

    fn is_descendant(&self, element: ElementId, ancestor: ElementId) -> bool {
        let mut current = self.nodes.get(&element).and_then(|n| n.parent);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes.get(&id).and_then(|n| n.parent);
        }
        false
    }

    /// `element` followed by its ancestors, innermost first.
    fn bubble_path(&self, element: ElementId) -> Vec<ElementId> {
        let mut path = Vec::new();
        let mut current = Some(element);
        while let Some(id) = current {
            if !self.is_attached(id) {
                break;
            }
            path.push(id);
            current = self.nodes.get(&id).and_then(|n| n.parent);
        }
        path
    }

    fn listeners_for(&self, target: ListenTarget, kind: ListenKind) -> Vec<ListenerId> {
        self.listeners
            .iter()
            .filter(|(_, (t, k))| *t == target && *k == kind)
            .map(|(id, _)| ListenerId(*id))
            .collect()
    }

    /// Bubbling dispatch: element path first, then the document.
    fn bubbling(&self, origin: Option<ElementId>, kind: ListenKind, event: &Event) -> Vec<Delivery> {
        let mut listeners = Vec::new();
        if let Some(origin) = origin {
            for element in self.bubble_path(origin) {
                listeners.extend(self.listeners_for(ListenTarget::Element(element), kind));
            }
        }
        listeners.extend(self.listeners_for(ListenTarget::Document, kind));
        deliveries(listeners, event)
    }

    fn tab_order(&self) -> Vec<ElementId> {
        self.nodes
            .iter()
            .filter(|(_, n)| n.attached && n.kind.is_tabbable())
            .map(|(id, _)| *id)
            .collect()
    }
}

fn deliveries(listeners: Vec<ListenerId>, event: &Event) -> Vec<Delivery> {
    listeners
        .into_iter()
        .map(|listener| Delivery::Event {
            listener,
            event: event.clone(),
        })
        .collect()
}

/// In-memory document host.
#[derive(Debug)]
pub struct FakeDocument {
    state: RefCell<State>,
    default_prevented: Cell<bool>,
}

impl Default for FakeDocument {
    fn default() -> Self {
        Self {
            state: RefCell::new(State {
                next_id: 0,
                nodes: BTreeMap::new(),
                active: None,
                overflow: None,
                listeners: BTreeMap::new(),
                timers: BTreeMap::new(),
                frames: BTreeSet::new(),
                now: 0.0,
                viewport: DEFAULT_VIEWPORT,
                window_scroll: 0.0,
                scroll_requests: Vec::new(),
                media_calls: Vec::new(),
                rejects_play: HashSet::new(),
            }),
            default_prevented: Cell::new(false),
        }
    }
}

impl FakeDocument {
    /// Create an empty document.
    #[must_use]
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    // === Tree construction ===

    /// Append an element of `kind` under `parent` (or at the root).
    pub fn create(&self, parent: Option<ElementId>, kind: NodeKind) -> ElementId {
        let mut state = self.state.borrow_mut();
        let id = ElementId(state.allocate());
        state.nodes.insert(
            id,
            Node {
                parent,
                kind,
                attached: true,
                width: 0.0,
                scroll_left: 0.0,
            },
        );
        id
    }

    /// Append a plain container.
    pub fn container(&self, parent: Option<ElementId>) -> ElementId {
        self.create(parent, NodeKind::Container)
    }

    /// Append a button.
    pub fn button(&self, parent: Option<ElementId>) -> ElementId {
        self.create(parent, NodeKind::Button)
    }

    /// Append a link with `href`.
    pub fn link(&self, parent: Option<ElementId>) -> ElementId {
        self.create(parent, NodeKind::Link)
    }

    /// Append a text input.
    pub fn input(&self, parent: Option<ElementId>) -> ElementId {
        self.create(parent, NodeKind::Input)
    }

    /// Detach an element and its whole subtree.
    pub fn remove(&self, element: ElementId) {
        let mut state = self.state.borrow_mut();
        let doomed: Vec<ElementId> = state
            .nodes
            .keys()
            .copied()
            .filter(|id| *id == element || state.is_descendant(*id, element))
            .collect();
        for id in &doomed {
            if let Some(node) = state.nodes.get_mut(id) {
                node.attached = false;
            }
        }
        if state.active.is_some_and(|a| doomed.contains(&a)) {
            state.active = None;
        }
        tracing::trace!(%element, detached = doomed.len(), "removed subtree");
    }

    /// Set the rendered width of an element.
    pub fn set_width(&self, element: ElementId, width: f64) {
        if let Some(node) = self.state.borrow_mut().nodes.get_mut(&element) {
            node.width = width;
        }
    }

    /// Set the viewport size.
    pub fn set_viewport(&self, width: f64, height: f64) {
        self.state.borrow_mut().viewport = (width, height);
    }

    /// Make `play()` on `element` reject.
    pub fn reject_play(&self, element: ElementId) {
        self.state.borrow_mut().rejects_play.insert(element);
    }

    /// Set the body's overflow style directly.
    pub fn set_overflow(&self, value: &str) {
        self.state.borrow_mut().overflow = Some(value.to_string());
    }

    // === Inspection ===

    /// Current virtual time.
    #[must_use]
    pub fn now(&self) -> f64 {
        self.state.borrow().now
    }

    /// Focused element.
    #[must_use]
    pub fn focused(&self) -> Option<ElementId> {
        self.state.borrow().active
    }

    /// Number of installed listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.state.borrow().listeners.len()
    }

    /// Whether a listener is still installed.
    #[must_use]
    pub fn has_listener(&self, id: ListenerId) -> bool {
        self.state.borrow().listeners.contains_key(&id.0)
    }

    /// Number of listeners of `kind` on `target`.
    #[must_use]
    pub fn listeners_on(&self, target: ListenTarget, kind: ListenKind) -> usize {
        self.state.borrow().listeners_for(target, kind).len()
    }

    /// Number of pending timeouts.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.state.borrow().timers.len()
    }

    /// Number of pending frame requests.
    #[must_use]
    pub fn pending_frames(&self) -> usize {
        self.state.borrow().frames.len()
    }

    /// All scroll requests so far.
    #[must_use]
    pub fn scroll_requests(&self) -> Vec<ScrollRequest> {
        self.state.borrow().scroll_requests.clone()
    }

    /// All media commands so far.
    #[must_use]
    pub fn media_calls(&self) -> Vec<MediaCall> {
        self.state.borrow().media_calls.clone()
    }

    /// Vertical scroll offset of the window.
    #[must_use]
    pub fn window_scroll(&self) -> f64 {
        self.state.borrow().window_scroll
    }

    /// Horizontal scroll offset of an element.
    #[must_use]
    pub fn scroll_left(&self, element: ElementId) -> f64 {
        self.state
            .borrow()
            .nodes
            .get(&element)
            .map_or(0.0, |n| n.scroll_left)
    }

    /// Whether `prevent_default` was called since the last reset, clearing
    /// the flag.
    pub fn take_default_prevented(&self) -> bool {
        self.default_prevented.replace(false)
    }

    // === Input ===

    /// Advance the clock and fire due timeouts in due order.
    pub fn advance(&self, ms: f64) -> Vec<Delivery> {
        let mut state = self.state.borrow_mut();
        state.now += ms;
        let now = state.now;
        let mut due: Vec<(f64, u64)> = state
            .timers
            .iter()
            .filter(|(_, at)| **at <= now)
            .map(|(id, at)| (*at, *id))
            .collect();
        due.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        for (_, id) in &due {
            state.timers.remove(id);
        }
        if !due.is_empty() {
            tracing::trace!(now, fired = due.len(), "timers due");
        }
        due.into_iter()
            .map(|(_, id)| Delivery::Timer(TimerId(id)))
            .collect()
    }

    /// Advance the clock by one frame and fire due timeouts, then every
    /// pending frame request.
    pub fn frame(&self, frame_ms: f64) -> Vec<Delivery> {
        let mut out = self.advance(frame_ms);
        let frames = std::mem::take(&mut self.state.borrow_mut().frames);
        out.extend(frames.into_iter().map(|id| Delivery::Frame(FrameId(id))));
        out
    }

    /// Press a key on the focused element.
    pub fn key_down(&self, key: Key, modifiers: Modifiers) -> Vec<Delivery> {
        self.default_prevented.set(false);
        let state = self.state.borrow();
        let target = state.active;
        let event = Event::KeyDown {
            key,
            modifiers,
            target,
        };
        state.bubbling(target, ListenKind::KeyDown, &event)
    }

    /// Click an element.
    pub fn click(&self, target: ElementId) -> Vec<Delivery> {
        self.default_prevented.set(false);
        let state = self.state.borrow();
        if !state.is_attached(target) {
            return Vec::new();
        }
        state.bubbling(Some(target), ListenKind::Click, &Event::Click { target })
    }

    /// Scroll a container horizontally.
    pub fn scroll_element(&self, element: ElementId, left: f64) -> Vec<Delivery> {
        let mut state = self.state.borrow_mut();
        if let Some(node) = state.nodes.get_mut(&element) {
            node.scroll_left = left;
        }
        let listeners = state.listeners_for(ListenTarget::Element(element), ListenKind::Scroll);
        deliveries(listeners, &Event::Scroll { left, top: 0.0 })
    }

    /// Scroll the window vertically.
    pub fn scroll_window(&self, top: f64) -> Vec<Delivery> {
        let mut state = self.state.borrow_mut();
        state.window_scroll = top;
        let listeners = state.listeners_for(ListenTarget::Window, ListenKind::Scroll);
        deliveries(listeners, &Event::Scroll { left: 0.0, top })
    }

    /// Report a visibility change for an observed element.
    pub fn intersect(&self, element: ElementId, ratio: f64) -> Vec<Delivery> {
        let state = self.state.borrow();
        let listeners =
            state.listeners_for(ListenTarget::Element(element), ListenKind::Visibility);
        deliveries(
            listeners,
            &Event::Intersect {
                ratio,
                intersecting: ratio > 0.0,
            },
        )
    }

    /// Report a media failure on an element.
    pub fn media_error(&self, element: ElementId) -> Vec<Delivery> {
        let state = self.state.borrow();
        let listeners =
            state.listeners_for(ListenTarget::Element(element), ListenKind::MediaError);
        deliveries(listeners, &Event::MediaError)
    }

    /// Browser default for Tab: move along the document's tab order, wrapping
    /// at either end. Elements are in document order by creation.
    pub fn default_tab(&self, backwards: bool) {
        let mut state = self.state.borrow_mut();
        let order = state.tab_order();
        if order.is_empty() {
            return;
        }
        let next = match state.active {
            Some(active) => match order.iter().position(|id| *id == active) {
                Some(i) if backwards => (i + order.len() - 1) % order.len(),
                Some(i) => (i + 1) % order.len(),
                // Focus sits on a non-tabbable element: continue from its
                // place in document order.
                None if backwards => order
                    .iter()
                    .rposition(|id| *id < active)
                    .unwrap_or(order.len() - 1),
                None => order.iter().position(|id| *id > active).unwrap_or(0),
            },
            None if backwards => order.len() - 1,
            None => 0,
        };
        state.active = Some(order[next]);
    }
}

impl Host for FakeDocument {
    fn now_ms(&self) -> f64 {
        self.state.borrow().now
    }

    fn active_element(&self) -> Option<ElementId> {
        self.state.borrow().active
    }

    fn focus(&self, element: ElementId) -> bool {
        let mut state = self.state.borrow_mut();
        let focusable = state
            .nodes
            .get(&element)
            .is_some_and(|n| n.attached && n.kind.is_focusable());
        if focusable {
            state.active = Some(element);
        }
        focusable
    }

    fn contains(&self, element: ElementId) -> bool {
        self.state.borrow().is_attached(element)
    }

    fn focusable_within(&self, container: ElementId) -> Vec<ElementId> {
        let state = self.state.borrow();
        state
            .nodes
            .iter()
            .filter(|(id, n)| {
                n.attached && n.kind.is_tabbable() && state.is_descendant(**id, container)
            })
            .map(|(id, _)| *id)
            .collect()
    }

    fn client_width(&self, element: ElementId) -> Option<f64> {
        let state = self.state.borrow();
        state
            .nodes
            .get(&element)
            .filter(|n| n.attached)
            .map(|n| n.width)
    }

    fn viewport_height(&self) -> f64 {
        self.state.borrow().viewport.1
    }

    fn body_overflow(&self) -> String {
        self.state
            .borrow()
            .overflow
            .clone()
            .unwrap_or_else(|| INITIAL_OVERFLOW.to_string())
    }

    fn set_body_overflow(&self, value: &str) {
        self.state.borrow_mut().overflow = Some(value.to_string());
    }

    fn add_listener(&self, target: ListenTarget, kind: ListenKind) -> ListenerId {
        let mut state = self.state.borrow_mut();
        let id = state.allocate();
        state.listeners.insert(id, (target, kind));
        ListenerId(id)
    }

    fn remove_listener(&self, id: ListenerId) {
        self.state.borrow_mut().listeners.remove(&id.0);
    }

    fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    fn set_timeout(&self, delay_ms: u32) -> TimerId {
        let mut state = self.state.borrow_mut();
        let id = state.allocate();
        let due = state.now + f64::from(delay_ms);
        state.timers.insert(id, due);
        TimerId(id)
    }

    fn clear_timeout(&self, id: TimerId) {
        self.state.borrow_mut().timers.remove(&id.0);
    }

    fn request_frame(&self) -> FrameId {
        let mut state = self.state.borrow_mut();
        let id = state.allocate();
        state.frames.insert(id);
        FrameId(id)
    }

    fn cancel_frame(&self, id: FrameId) {
        self.state.borrow_mut().frames.remove(&id.0);
    }

    fn scroll_element_to(&self, element: ElementId, left: f64, behavior: ScrollBehavior) {
        self.state
            .borrow_mut()
            .scroll_requests
            .push(ScrollRequest::Element {
                element,
                left,
                behavior,
            });
    }

    fn scroll_into_view(&self, element: ElementId, behavior: ScrollBehavior) {
        self.state
            .borrow_mut()
            .scroll_requests
            .push(ScrollRequest::IntoView { element, behavior });
    }

    fn play_media(&self, element: ElementId) -> bool {
        let mut state = self.state.borrow_mut();
        state.media_calls.push(MediaCall::Play(element));
        !state.rejects_play.contains(&element)
    }

    fn pause_media(&self, element: ElementId) {
        self.state
            .borrow_mut()
            .media_calls
            .push(MediaCall::Pause(element));
    }
}
