//! WASM browser tests - run with `wasm-pack test --headless --chrome`

#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

use folio::{Host, ListenKind, Listener, ScrollLock, SharedHost, WebHost};
use std::rc::Rc;
use web_sys::Element;

fn document() -> web_sys::Document {
    web_sys::window()
        .and_then(|w| w.document())
        .expect("document")
}

fn append(parent: &Element, tag: &str, id: &str) -> Element {
    let element = document().create_element(tag).expect("create");
    element.set_id(id);
    parent.append_child(&element).expect("append");
    element
}

fn fixture(prefix: &str) -> (WebHost, Element) {
    let body = document().body().expect("body");
    let root = append(&body, "div", &format!("{prefix}-root"));
    (WebHost::new().expect("host"), root)
}

// ============================================================================
// Element Registry Tests
// ============================================================================

#[wasm_bindgen_test]
fn test_element_ids_are_stable() {
    let (host, root) = fixture("registry");
    append(&root, "button", "registry-button");
    let first = host.element_by_id("registry-button").expect("button");
    let second = host.element_by_id("registry-button").expect("button");
    assert_eq!(first, second);
    assert!(host.element_by_id("registry-missing").is_none());
    root.remove();
}

#[wasm_bindgen_test]
fn test_contains_tracks_detach() {
    let (host, root) = fixture("contains");
    let button = append(&root, "button", "contains-button");
    let id = host.element_by_id("contains-button").expect("button");
    assert!(host.contains(id));
    button.remove();
    assert!(!host.contains(id));
    assert!(!host.focus(id));
    root.remove();
}

// ============================================================================
// Focus Tests
// ============================================================================

#[wasm_bindgen_test]
fn test_focusable_within_document_order() {
    let (host, root) = fixture("focusable");
    append(&root, "button", "focusable-a");
    let link = append(&root, "a", "focusable-b");
    link.set_attribute("href", "#top").expect("href");
    append(&root, "a", "focusable-no-href");
    let skipped = append(&root, "div", "focusable-skipped");
    skipped.set_attribute("tabindex", "-1").expect("tabindex");
    append(&root, "input", "focusable-c");

    let container = host.element_by_id("focusable-root").expect("root");
    let expected: Vec<_> = ["focusable-a", "focusable-b", "focusable-c"]
        .iter()
        .map(|id| host.element_by_id(id).expect("element"))
        .collect();
    assert_eq!(host.focusable_within(container), expected);
    root.remove();
}

#[wasm_bindgen_test]
fn test_focus_moves_active_element() {
    let (host, root) = fixture("focus");
    append(&root, "button", "focus-button");
    let button = host.element_by_id("focus-button").expect("button");
    assert!(host.focus(button));
    assert_eq!(host.active_element(), Some(button));
    root.remove();
}

// ============================================================================
// Resource Tests
// ============================================================================

#[wasm_bindgen_test]
fn test_scroll_lock_restores_inline_overflow() {
    let (host, root) = fixture("lock");
    let shared: SharedHost = Rc::new(host.clone());
    shared.set_body_overflow("");
    {
        let _lock = ScrollLock::acquire(&shared);
        assert_eq!(shared.body_overflow(), "hidden");
    }
    assert_eq!(shared.body_overflow(), "");
    root.remove();
}

#[wasm_bindgen_test]
fn test_listener_guard_releases() {
    let (host, root) = fixture("listener");
    let shared: SharedHost = Rc::new(host.clone());
    {
        let _listener = Listener::on_document(&shared, ListenKind::KeyDown);
        assert_eq!(host.listener_count(), 1);
    }
    assert_eq!(host.listener_count(), 0);
    root.remove();
}

#[wasm_bindgen_test]
fn test_clock_is_monotonic() {
    let (host, root) = fixture("clock");
    let a = host.now_ms();
    let b = host.now_ms();
    assert!(b >= a);
    root.remove();
}

// ============================================================================
// Motion Export Tests
// ============================================================================

#[wasm_bindgen_test]
fn test_motion_json_applies_stagger() {
    let json = folio::browser::app::motion_json("fade-in-up", 2)
        .expect("serialize")
        .expect("preset");
    let motion: folio::Motion = serde_json::from_str(&json).expect("parse");
    assert_eq!(motion.delay_ms, 400.0);
    assert!(folio::browser::app::motion_json("slide", 0)
        .expect("serialize")
        .is_none());
}

#[wasm_bindgen_test]
fn test_spring_json() {
    let json = folio::browser::app::spring_json("stiff")
        .expect("serialize")
        .expect("preset");
    assert!(json.contains("\"stiffness\":400.0"));
}
