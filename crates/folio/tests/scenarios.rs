//! End-to-end interaction scenarios against the in-memory document.

#![cfg(not(target_arch = "wasm32"))]

use folio::content::{SiteConfig, SiteContent};
use folio::widgets::{
    count_up, overlay, panel_index, panel_tracker, visibility, Carousel, CarouselChanged,
    CloseReason, CountUp, OverlayManager, StatCounter,
};
use folio::{ElementId, Key, Modifiers, OverlayElements, Page, PageElements};
use folio_test::{messages_of, Harness, NodeKind};
use proptest::prelude::*;

fn dialog(harness: &Harness) -> (OverlayElements, ElementId, ElementId) {
    let document = harness.document();
    let backdrop = document.container(None);
    let container = document.create(Some(backdrop), NodeKind::Tabindex(-1));
    let close_button = document.button(Some(container));
    let last = document.input(Some(container));
    (
        OverlayElements {
            backdrop,
            container,
            close_button: Some(close_button),
        },
        close_button,
        last,
    )
}

// ============================================================================
// Overlay Scenarios
// ============================================================================

#[test]
fn test_dialog_focus_cycle() {
    let harness = Harness::new();
    let trigger = harness.document().button(None);
    let (elements, first, last) = dialog(&harness);
    let mut manager =
        OverlayManager::new(&harness.host(), elements.container, elements.backdrop)
            .with_close_button(first);

    harness.host().focus(trigger);
    manager.open(Some(trigger));
    harness.advance(50.0, &mut [&mut manager]);
    assert_eq!(harness.document().focused(), Some(elements.container));

    harness.host().focus(last);
    harness.press(Key::Tab, &mut [&mut manager]);
    assert_eq!(harness.document().focused(), Some(first));
    harness.press_with(Key::Tab, Modifiers::SHIFT, &mut [&mut manager]);
    assert_eq!(harness.document().focused(), Some(last));

    harness.press(Key::Escape, &mut [&mut manager]);
    assert!(!manager.is_open());
    assert_eq!(harness.document().focused(), Some(trigger));
    assert_eq!(harness.document().listener_count(), 0);
    assert_eq!(harness.document().pending_timers(), 0);
}

#[test]
fn test_nested_dialogs_restore_overflow() {
    let harness = Harness::new();
    harness.document().set_overflow("scroll");
    let (outer_elements, _, _) = dialog(&harness);
    let (inner_elements, _, _) = dialog(&harness);
    let mut outer = OverlayManager::new(
        &harness.host(),
        outer_elements.container,
        outer_elements.backdrop,
    );
    let mut inner = OverlayManager::new(
        &harness.host(),
        inner_elements.container,
        inner_elements.backdrop,
    );

    outer.open(None);
    inner.open(None);
    assert_eq!(harness.host().body_overflow(), "hidden");
    inner.close(CloseReason::Programmatic);
    assert_eq!(harness.host().body_overflow(), "hidden");
    outer.close(CloseReason::Programmatic);
    assert_eq!(harness.host().body_overflow(), "scroll");
}

// ============================================================================
// Count-Up Scenarios
// ============================================================================

#[test]
fn test_hero_stat_finishes_at_exact_value() {
    let harness = Harness::new();
    let mut stat = StatCounter::new(&harness.host(), 15, "+", "Years scaling technical orgs");
    stat.set_visible(true);
    harness.run_frames(120, &mut [&mut stat]);
    assert_eq!(stat.display(), "15+");
    assert_eq!(harness.document().pending_frames(), 0);
}

#[test]
fn test_count_up_ignores_toggles_after_start() {
    let harness = Harness::new();
    let mut counter = CountUp::new(&harness.host(), 100);
    counter.set_enabled(true);
    harness.run_frames(10, &mut [&mut counter]);
    let midway = counter.value();
    counter.set_enabled(false);
    counter.set_enabled(true);
    harness.run_frames(200, &mut [&mut counter]);
    assert!(midway < 100);
    assert_eq!(counter.value(), 100);
}

proptest! {
    #[test]
    fn prop_count_up_monotonic_to_end(end in 0i64..10_000, frame in 5.0f64..40.0) {
        let harness = Harness::new().frame_ms(frame);
        let mut counter = CountUp::new(&harness.host(), end).duration_ms(1500.0);
        counter.set_enabled(true);
        let mut last = counter.value();
        for _ in 0..400 {
            harness.run_frames(1, &mut [&mut counter]);
            prop_assert!(counter.value() >= last);
            last = counter.value();
        }
        prop_assert_eq!(counter.value(), end);
    }
}

// ============================================================================
// Carousel and Panel Scenarios
// ============================================================================

#[test]
fn test_creative_carousel_arrow_right_wraps() {
    let harness = Harness::new();
    let content = SiteContent::embedded().expect("content");
    let mut carousel = Carousel::new(content.creative.projects).expect("carousel");
    let container = harness.document().create(None, NodeKind::Tabindex(0));
    carousel.mount(&harness.host(), container);
    harness.host().focus(container);

    let mut seen = Vec::new();
    for _ in 0..4 {
        let messages = harness.press(Key::Right, &mut [&mut carousel]);
        seen.extend(messages_of::<CarouselChanged>(&messages).iter().map(|c| c.to));
    }
    assert_eq!(seen, vec![1, 2, 3, 0]);
}

#[test]
fn test_panel_index_rounding() {
    for (k, offset) in [0.0, 1280.0, 2560.0, 3840.0].into_iter().enumerate() {
        assert_eq!(panel_index(offset, 1280.0, 4), k);
    }
    assert_eq!(panel_index(639.0, 1280.0, 4), 0);
    assert_eq!(panel_index(640.0, 1280.0, 4), 1);
}

// ============================================================================
// Page Scenarios
// ============================================================================

#[test]
fn test_config_defaults_match_component_defaults() {
    let config = SiteConfig::default();
    assert_eq!(config.focus_delay_ms, overlay::DEFAULT_FOCUS_DELAY_MS);
    assert_eq!(config.stat_duration_ms, count_up::STAT_DURATION_MS);
    assert_eq!(config.hero_fade_threshold, panel_tracker::DEFAULT_FADE_THRESHOLD);
    assert_eq!(config.hero_panel_count, panel_tracker::DEFAULT_PANEL_COUNT);
    assert_eq!(config.visibility_threshold, visibility::DEFAULT_THRESHOLD);
}

#[test]
fn test_dropping_page_releases_everything() {
    let harness = Harness::new();
    let (service_overlay, _, _) = dialog(&harness);
    let elements = PageElements {
        hero_strip: Some(harness.document().container(None)),
        hero_stats: Some(harness.document().container(None)),
        carousel: Some(harness.document().create(None, NodeKind::Tabindex(0))),
        service_overlay: Some(service_overlay),
        video: Some(harness.document().create(None, NodeKind::Video)),
        ..PageElements::default()
    };
    let content = SiteContent::embedded().expect("content");
    let mut page =
        Page::new(&harness.host(), content, &SiteConfig::default(), elements).expect("page");
    page.mount();
    page.select_service("people-infra", None);
    assert!(harness.document().listener_count() > 0);
    assert_eq!(harness.host().body_overflow(), "hidden");

    drop(page);
    assert_eq!(harness.document().listener_count(), 0);
    assert_eq!(harness.document().pending_timers(), 0);
    assert_eq!(harness.document().pending_frames(), 0);
    assert_eq!(harness.host().body_overflow(), "visible");
}
