//! Hero panel strip: active-panel tracking and the scrolled-past fade.

use crate::error::{Result, WidgetError};
use folio_core::{
    Component, Delivery, ElementId, Event, Host, ListenKind, ListenTarget, Listener,
    ScrollBehavior, SharedHost,
};
use std::any::Any;
use std::fmt;

/// Panels in the hero strip.
pub const DEFAULT_PANEL_COUNT: usize = 4;

/// Fraction of the viewport height past which the hero counts as scrolled
/// away.
pub const DEFAULT_FADE_THRESHOLD: f64 = 0.5;

/// Panel whose start is nearest to `scroll_left`, clamped to
/// `[0, panel_count - 1]`. A zero or negative width yields panel 0.
#[must_use]
pub fn panel_index(scroll_left: f64, panel_width: f64, panel_count: usize) -> usize {
    if panel_count == 0 || panel_width <= 0.0 || panel_width.is_nan() {
        return 0;
    }
    let raw = (scroll_left / panel_width).round();
    if raw.is_nan() || raw <= 0.0 {
        0
    } else {
        (raw as usize).min(panel_count - 1)
    }
}

/// Message emitted when the active panel changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelChanged {
    /// Previous panel
    pub from: usize,
    /// New panel
    pub to: usize,
}

struct Mounted {
    host: SharedHost,
    container: ElementId,
    scroll: Listener,
}

/// Tracks which panel of a horizontally snapping strip is in view.
pub struct PanelTracker {
    panel_count: usize,
    scroll_offset: f64,
    panel_width: f64,
    active: usize,
    mounted: Option<Mounted>,
}

impl PanelTracker {
    /// Create a tracker for `panel_count` panels, first panel active.
    pub fn new(panel_count: usize) -> Self {
        Self {
            panel_count,
            scroll_offset: 0.0,
            panel_width: 0.0,
            active: 0,
            mounted: None,
        }
    }

    /// Active panel.
    #[must_use]
    pub const fn active(&self) -> usize {
        self.active
    }

    /// Number of panels.
    #[must_use]
    pub const fn panel_count(&self) -> usize {
        self.panel_count
    }

    /// Last observed scroll offset.
    #[must_use]
    pub const fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    /// Indicator dots as `(index, is_active)`.
    pub fn indicators(&self) -> impl Iterator<Item = (usize, bool)> + '_ {
        (0..self.panel_count).map(move |i| (i, i == self.active))
    }

    /// Record a scroll position and recompute the active panel.
    pub fn on_scroll(&mut self, scroll_left: f64, panel_width: f64) -> Option<PanelChanged> {
        self.scroll_offset = scroll_left;
        self.panel_width = panel_width;
        let next = panel_index(scroll_left, panel_width, self.panel_count);
        if next == self.active {
            return None;
        }
        let from = self.active;
        self.active = next;
        tracing::trace!(from, to = next, "active panel changed");
        Some(PanelChanged { from, to: next })
    }

    /// Track scrolling of `container`.
    pub fn mount(&mut self, host: &SharedHost, container: ElementId) {
        self.mounted = None;
        self.mounted = Some(Mounted {
            host: SharedHost::clone(host),
            container,
            scroll: Listener::on_element(host, container, ListenKind::Scroll),
        });
    }

    /// Stop tracking.
    pub fn unmount(&mut self) {
        self.mounted = None;
    }

    /// Smooth-scroll the strip so panel `index` starts at the left edge.
    pub fn scroll_to_panel(&self, index: usize) -> Result<()> {
        if index >= self.panel_count {
            return Err(WidgetError::PanelOutOfRange {
                index,
                count: self.panel_count,
            });
        }
        let Some(mounted) = &self.mounted else {
            tracing::debug!(index, "panel strip not mounted");
            return Ok(());
        };
        let Some(width) = mounted.host.client_width(mounted.container) else {
            tracing::debug!(container = %mounted.container, "panel strip not attached");
            return Ok(());
        };
        mounted
            .host
            .scroll_element_to(mounted.container, index as f64 * width, ScrollBehavior::Smooth);
        Ok(())
    }
}

impl Component for PanelTracker {
    fn handle(&mut self, delivery: &Delivery) -> Option<Box<dyn Any>> {
        let Delivery::Event {
            listener,
            event: Event::Scroll { left, .. },
        } = delivery
        else {
            return None;
        };
        let mounted = self.mounted.as_ref()?;
        if mounted.scroll.id() != *listener {
            return None;
        }
        let width = mounted
            .host
            .client_width(mounted.container)
            .unwrap_or(self.panel_width);
        let changed = self.on_scroll(*left, width)?;
        Some(Box::new(changed))
    }
}

impl fmt::Debug for PanelTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PanelTracker")
            .field("panel_count", &self.panel_count)
            .field("scroll_offset", &self.scroll_offset)
            .field("panel_width", &self.panel_width)
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}

/// Message emitted when the hero is scrolled past or back into view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeroFadeChanged {
    /// Whether the page is scrolled past the hero
    pub scrolled_past: bool,
}

/// Window-scroll flag used to fade out the panel indicator.
pub struct HeroFade {
    threshold: f64,
    scrolled_past: bool,
    mounted: Option<(SharedHost, Listener)>,
}

impl Default for HeroFade {
    fn default() -> Self {
        Self::new()
    }
}

impl HeroFade {
    /// Create with the default threshold.
    pub const fn new() -> Self {
        Self {
            threshold: DEFAULT_FADE_THRESHOLD,
            scrolled_past: false,
            mounted: None,
        }
    }

    /// Set the threshold as a fraction of the viewport height.
    #[must_use]
    pub const fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Whether the page is scrolled past the hero.
    #[must_use]
    pub const fn scrolled_past(&self) -> bool {
        self.scrolled_past
    }

    /// Indicator opacity.
    #[must_use]
    pub const fn indicator_opacity(&self) -> f64 {
        if self.scrolled_past {
            0.0
        } else {
            1.0
        }
    }

    /// Record the window's vertical scroll.
    pub fn on_window_scroll(&mut self, scroll_y: f64, viewport_height: f64) -> Option<HeroFadeChanged> {
        let past = scroll_y > viewport_height * self.threshold;
        if past == self.scrolled_past {
            return None;
        }
        self.scrolled_past = past;
        Some(HeroFadeChanged { scrolled_past: past })
    }

    /// Listen to window scrolling.
    pub fn mount(&mut self, host: &SharedHost) {
        self.mounted = None;
        let listener = Listener::install(host, ListenTarget::Window, ListenKind::Scroll);
        self.mounted = Some((SharedHost::clone(host), listener));
    }
}

impl Component for HeroFade {
    fn handle(&mut self, delivery: &Delivery) -> Option<Box<dyn Any>> {
        let Delivery::Event {
            listener,
            event: Event::Scroll { top, .. },
        } = delivery
        else {
            return None;
        };
        let (host, own) = self.mounted.as_ref()?;
        if own.id() != *listener {
            return None;
        }
        let viewport = host.viewport_height();
        let changed = self.on_window_scroll(*top, viewport)?;
        Some(Box::new(changed))
    }
}

impl fmt::Debug for HeroFade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeroFade")
            .field("threshold", &self.threshold)
            .field("scrolled_past", &self.scrolled_past)
            .finish_non_exhaustive()
    }
}

/// Smooth-scroll the page to the first content section. Does nothing if the
/// section is missing.
pub fn scroll_to_content(host: &dyn Host, section: Option<ElementId>) {
    match section {
        Some(element) if host.contains(element) => {
            host.scroll_into_view(element, ScrollBehavior::Smooth);
        }
        _ => tracing::debug!("content section not found"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_test::{messages_of, Harness, ScrollRequest};
    use proptest::prelude::*;

    // =========================================================================
    // Index Derivation Tests
    // =========================================================================

    #[test]
    fn test_index_at_panel_starts() {
        assert_eq!(panel_index(0.0, 1280.0, 4), 0);
        assert_eq!(panel_index(1280.0, 1280.0, 4), 1);
        assert_eq!(panel_index(3840.0, 1280.0, 4), 3);
    }

    #[test]
    fn test_index_half_panel_rounds_up() {
        assert_eq!(panel_index(640.0, 1280.0, 4), 1);
        assert_eq!(panel_index(639.0, 1280.0, 4), 0);
    }

    #[test]
    fn test_index_overscroll_clamped() {
        assert_eq!(panel_index(10_000.0, 1280.0, 4), 3);
        assert_eq!(panel_index(-300.0, 1280.0, 4), 0);
    }

    #[test]
    fn test_index_degenerate_width() {
        assert_eq!(panel_index(500.0, 0.0, 4), 0);
        assert_eq!(panel_index(500.0, f64::NAN, 4), 0);
        assert_eq!(panel_index(500.0, 100.0, 0), 0);
    }

    proptest! {
        #[test]
        fn prop_exact_panel_offsets(k in 0usize..4, width in 1.0f64..4000.0) {
            prop_assert_eq!(panel_index(k as f64 * width, width, 4), k);
        }

        #[test]
        fn prop_index_in_range(left in -1e6f64..1e6, width in 0.0f64..4000.0, count in 1usize..10) {
            prop_assert!(panel_index(left, width, count) < count);
        }
    }

    // =========================================================================
    // PanelTracker Tests
    // =========================================================================

    #[test]
    fn test_on_scroll_reports_changes_only() {
        let mut tracker = PanelTracker::new(4);
        assert_eq!(tracker.on_scroll(100.0, 1280.0), None);
        assert_eq!(
            tracker.on_scroll(1300.0, 1280.0),
            Some(PanelChanged { from: 0, to: 1 })
        );
        assert_eq!(tracker.active(), 1);
        assert_eq!(tracker.scroll_offset(), 1300.0);
    }

    #[test]
    fn test_indicators() {
        let mut tracker = PanelTracker::new(4);
        tracker.on_scroll(2560.0, 1280.0);
        let dots: Vec<_> = tracker.indicators().collect();
        assert_eq!(dots, vec![(0, false), (1, false), (2, true), (3, false)]);
    }

    #[test]
    fn test_mounted_tracks_container_scroll() {
        let harness = Harness::new();
        let strip = harness.document().container(None);
        harness.document().set_width(strip, 1280.0);
        let mut tracker = PanelTracker::new(4);
        tracker.mount(&harness.host(), strip);

        let messages = harness.scroll_element(strip, 2600.0, &mut [&mut tracker]);
        assert_eq!(tracker.active(), 2);
        assert_eq!(
            messages_of::<PanelChanged>(&messages),
            vec![&PanelChanged { from: 0, to: 2 }]
        );
    }

    #[test]
    fn test_scroll_to_panel_requests_smooth_scroll() {
        let harness = Harness::new();
        let strip = harness.document().container(None);
        harness.document().set_width(strip, 1000.0);
        let mut tracker = PanelTracker::new(4);
        tracker.mount(&harness.host(), strip);

        tracker.scroll_to_panel(3).unwrap();
        assert_eq!(
            harness.document().scroll_requests(),
            vec![ScrollRequest::Element {
                element: strip,
                left: 3000.0,
                behavior: ScrollBehavior::Smooth
            }]
        );
    }

    #[test]
    fn test_scroll_to_panel_out_of_range() {
        let tracker = PanelTracker::new(4);
        assert_eq!(
            tracker.scroll_to_panel(4),
            Err(WidgetError::PanelOutOfRange { index: 4, count: 4 })
        );
    }

    #[test]
    fn test_unmount_removes_listener() {
        let harness = Harness::new();
        let strip = harness.document().container(None);
        let mut tracker = PanelTracker::new(4);
        tracker.mount(&harness.host(), strip);
        assert_eq!(harness.document().listener_count(), 1);
        tracker.unmount();
        assert_eq!(harness.document().listener_count(), 0);
        assert!(tracker.scroll_to_panel(1).is_ok());
    }

    // =========================================================================
    // HeroFade Tests
    // =========================================================================

    #[test]
    fn test_hero_fade_threshold_is_strict() {
        let mut fade = HeroFade::new();
        assert_eq!(fade.on_window_scroll(360.0, 720.0), None);
        assert!(!fade.scrolled_past());
        assert_eq!(
            fade.on_window_scroll(361.0, 720.0),
            Some(HeroFadeChanged { scrolled_past: true })
        );
        assert_eq!(fade.indicator_opacity(), 0.0);
        assert!(fade.on_window_scroll(0.0, 720.0).is_some());
        assert_eq!(fade.indicator_opacity(), 1.0);
    }

    #[test]
    fn test_hero_fade_mounted_uses_viewport() {
        let harness = Harness::new();
        harness.document().set_viewport(1280.0, 1000.0);
        let mut fade = HeroFade::new();
        fade.mount(&harness.host());
        harness.scroll_window(400.0, &mut [&mut fade]);
        assert!(!fade.scrolled_past());
        harness.scroll_window(600.0, &mut [&mut fade]);
        assert!(fade.scrolled_past());
    }

    #[test]
    fn test_hero_fade_independent_of_panels() {
        let harness = Harness::new();
        let strip = harness.document().container(None);
        harness.document().set_width(strip, 1280.0);
        let mut tracker = PanelTracker::new(4);
        let mut fade = HeroFade::new();
        tracker.mount(&harness.host(), strip);
        fade.mount(&harness.host());
        harness.scroll_window(2000.0, &mut [&mut tracker, &mut fade]);
        assert_eq!(tracker.active(), 0);
        assert!(fade.scrolled_past());
    }

    // =========================================================================
    // scroll_to_content Tests
    // =========================================================================

    #[test]
    fn test_scroll_to_content() {
        let harness = Harness::new();
        let section = harness.document().container(None);
        scroll_to_content(harness.document(), Some(section));
        scroll_to_content(harness.document(), None);
        assert_eq!(
            harness.document().scroll_requests(),
            vec![ScrollRequest::IntoView {
                element: section,
                behavior: ScrollBehavior::Smooth
            }]
        );
    }
}
