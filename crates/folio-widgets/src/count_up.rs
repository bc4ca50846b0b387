//! Count-up number animation.
//!
//! A [`CountUp`] stays idle until it is enabled for the first time (usually by
//! a visibility latch), then animates from `start` to `end` with an
//! ease-out-cubic curve, one host animation frame at a time. It runs exactly
//! once per instance.

use folio_core::{Component, Delivery, Easing, Frame, SharedHost};
use std::any::Any;
use std::fmt;

/// Default animation duration.
pub const DEFAULT_DURATION_MS: f64 = 2000.0;

/// Duration used by hero stat counters.
pub const STAT_DURATION_MS: f64 = 1500.0;

/// Count-up lifecycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CountUpPhase {
    /// Waiting to be enabled
    Idle,
    /// Animating
    Running {
        /// Host time the animation started at
        started_at: f64,
    },
    /// Reached `end`; never restarts
    Completed,
}

/// Message emitted after every animated frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountUpChanged {
    /// Displayed value
    pub value: i64,
    /// Whether this was the final frame
    pub completed: bool,
}

/// Value shown at `progress` (0.0 to 1.0) of a count from `start` to `end`.
///
/// The result is floored and kept between `start` and `end`, so it is
/// monotonic toward `end` across the whole `i64` range and equals `end` only
/// once progress reaches 1.
#[must_use]
pub fn count_up_value(start: i64, end: i64, progress: f64) -> i64 {
    if progress >= 1.0 {
        return end;
    }
    let eased = Easing::CubicOut.apply(progress);
    let span = end as f64 - start as f64;
    let value = span.mul_add(eased, start as f64).floor() as i64;
    value.clamp(start.min(end), start.max(end))
}

/// Frame-driven integer count-up.
pub struct CountUp {
    host: SharedHost,
    start: i64,
    end: i64,
    duration_ms: f64,
    value: i64,
    phase: CountUpPhase,
    frame: Option<Frame>,
}

impl CountUp {
    /// Create an idle count-up from 0 to `end`.
    pub fn new(host: &SharedHost, end: i64) -> Self {
        Self {
            host: SharedHost::clone(host),
            start: 0,
            end,
            duration_ms: DEFAULT_DURATION_MS,
            value: 0,
            phase: CountUpPhase::Idle,
            frame: None,
        }
    }

    /// Set the duration.
    #[must_use]
    pub const fn duration_ms(mut self, duration_ms: f64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    /// Set the start value.
    #[must_use]
    pub const fn start(mut self, start: i64) -> Self {
        self.start = start;
        self.value = start;
        self
    }

    /// Current value.
    #[must_use]
    pub const fn value(&self) -> i64 {
        self.value
    }

    /// Target value.
    #[must_use]
    pub const fn end(&self) -> i64 {
        self.end
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> CountUpPhase {
        self.phase
    }

    /// Whether the animation has ever started.
    #[must_use]
    pub fn has_started(&self) -> bool {
        self.phase != CountUpPhase::Idle
    }

    /// Change the target. Ignored once the animation has started.
    pub fn set_end(&mut self, end: i64) {
        if self.has_started() {
            tracing::trace!(end, "count-up already started, target kept");
            return;
        }
        self.end = end;
    }

    /// Gate the animation. The first `true` starts it; nothing else has any
    /// effect.
    pub fn set_enabled(&mut self, enabled: bool) {
        if !enabled || self.has_started() {
            return;
        }
        let started_at = self.host.now_ms();
        self.phase = CountUpPhase::Running { started_at };
        self.frame = Some(Frame::request(&self.host));
        tracing::debug!(start = self.start, end = self.end, "count-up started");
    }

    fn step(&mut self, now_ms: f64) -> CountUpChanged {
        let CountUpPhase::Running { started_at } = self.phase else {
            return CountUpChanged {
                value: self.value,
                completed: self.phase == CountUpPhase::Completed,
            };
        };
        let progress = if self.duration_ms <= 0.0 {
            1.0
        } else {
            ((now_ms - started_at) / self.duration_ms).min(1.0)
        };
        self.value = count_up_value(self.start, self.end, progress);

        let completed = progress >= 1.0;
        if completed {
            self.phase = CountUpPhase::Completed;
            self.frame = None;
            tracing::debug!(value = self.value, "count-up completed");
        } else {
            self.frame = Some(Frame::request(&self.host));
        }
        CountUpChanged {
            value: self.value,
            completed,
        }
    }
}

impl Component for CountUp {
    fn handle(&mut self, delivery: &Delivery) -> Option<Box<dyn Any>> {
        let Delivery::Frame(id) = delivery else {
            return None;
        };
        if self.frame.as_ref().map(Frame::id) != Some(*id) {
            return None;
        }
        let now = self.host.now_ms();
        Some(Box::new(self.step(now)))
    }
}

impl fmt::Debug for CountUp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CountUp")
            .field("start", &self.start)
            .field("end", &self.end)
            .field("duration_ms", &self.duration_ms)
            .field("value", &self.value)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

/// A hero statistic: an animated number with a suffix and a label.
#[derive(Debug)]
pub struct StatCounter {
    count_up: CountUp,
    suffix: String,
    label: String,
}

impl StatCounter {
    /// Create a stat counting up to `value` over [`STAT_DURATION_MS`].
    pub fn new(
        host: &SharedHost,
        value: i64,
        suffix: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            count_up: CountUp::new(host, value).duration_ms(STAT_DURATION_MS),
            suffix: suffix.into(),
            label: label.into(),
        }
    }

    /// Override the duration.
    #[must_use]
    pub fn duration_ms(mut self, duration_ms: f64) -> Self {
        self.count_up = self.count_up.duration_ms(duration_ms);
        self
    }

    /// Start counting once the stat is visible.
    pub fn set_visible(&mut self, visible: bool) {
        self.count_up.set_enabled(visible);
    }

    /// Formatted value, e.g. `"15+"`.
    #[must_use]
    pub fn display(&self) -> String {
        format!("{}{}", self.count_up.value(), self.suffix)
    }

    /// Caption under the number.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Underlying animation.
    #[must_use]
    pub const fn count_up(&self) -> &CountUp {
        &self.count_up
    }
}

impl Component for StatCounter {
    fn handle(&mut self, delivery: &Delivery) -> Option<Box<dyn Any>> {
        self.count_up.handle(delivery)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_test::{messages_of, Harness};
    use proptest::prelude::*;

    fn run_to_completion(harness: &Harness, counter: &mut CountUp) -> Vec<i64> {
        let mut seen = Vec::new();
        for _ in 0..10_000 {
            let messages = harness.run_frames(1, &mut [&mut *counter]);
            seen.extend(messages_of::<CountUpChanged>(&messages).iter().map(|m| m.value));
            if counter.phase() == CountUpPhase::Completed {
                break;
            }
        }
        seen
    }

    // =========================================================================
    // Value Curve Tests
    // =========================================================================

    #[test]
    fn test_value_endpoints() {
        assert_eq!(count_up_value(0, 100, 0.0), 0);
        assert_eq!(count_up_value(0, 100, 1.0), 100);
        assert_eq!(count_up_value(10, 20, 2.0), 20);
    }

    #[test]
    fn test_value_is_floored_ease_out_cubic() {
        // 1 - 0.5^3 = 0.875
        assert_eq!(count_up_value(0, 100, 0.5), 87);
        assert_eq!(count_up_value(0, 15, 0.5), 13);
    }

    #[test]
    fn test_value_spanning_full_range() {
        let mid = count_up_value(i64::MIN, i64::MAX, 0.5);
        assert!(mid > 0);
        assert_eq!(count_up_value(i64::MIN, i64::MAX, 0.0), i64::MIN);
        assert!(count_up_value(i64::MAX, i64::MIN, 0.999) < 0);
        assert_eq!(count_up_value(i64::MIN, i64::MAX, 1.0), i64::MAX);
    }

    #[test]
    fn test_value_never_passes_end_early() {
        let end = (1_i64 << 60) - 1;
        assert!(count_up_value(0, end, 0.999_999_9) <= end);
        assert!(count_up_value(end, 0, 0.999_999_9) >= 0);
    }

    #[test]
    fn test_value_counting_down() {
        assert_eq!(count_up_value(10, 0, 0.5), 1);
        assert_eq!(count_up_value(10, 0, 1.0), 0);
    }

    proptest! {
        #[test]
        fn prop_value_monotonic_in_progress(
            start in any::<i64>(),
            end in any::<i64>(),
            a in 0.0f64..1.0,
            b in 0.0f64..1.0,
        ) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let v_lo = count_up_value(start, end, lo);
            let v_hi = count_up_value(start, end, hi);
            if end >= start {
                prop_assert!(v_lo <= v_hi);
                prop_assert!(v_hi <= end);
            } else {
                prop_assert!(v_lo >= v_hi);
                prop_assert!(v_hi >= end);
            }
        }
    }

    // =========================================================================
    // CountUp Tests
    // =========================================================================

    #[test]
    fn test_idle_until_enabled() {
        let harness = Harness::new();
        let mut counter = CountUp::new(&harness.host(), 100);
        harness.run_frames(10, &mut [&mut counter]);
        assert_eq!(counter.phase(), CountUpPhase::Idle);
        assert_eq!(counter.value(), 0);
        assert_eq!(harness.document().pending_frames(), 0);
    }

    #[test]
    fn test_disabled_does_not_start() {
        let harness = Harness::new();
        let mut counter = CountUp::new(&harness.host(), 100);
        counter.set_enabled(false);
        assert!(!counter.has_started());
    }

    #[test]
    fn test_runs_to_exact_end() {
        let harness = Harness::new();
        let mut counter = CountUp::new(&harness.host(), 250).duration_ms(500.0);
        counter.set_enabled(true);
        let seen = run_to_completion(&harness, &mut counter);
        assert_eq!(counter.value(), 250);
        assert_eq!(seen.last(), Some(&250));
        assert!(seen.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(harness.document().pending_frames(), 0);
    }

    #[test]
    fn test_start_value_respected() {
        let harness = Harness::new();
        let mut counter = CountUp::new(&harness.host(), 20).start(5).duration_ms(100.0);
        assert_eq!(counter.value(), 5);
        counter.set_enabled(true);
        let seen = run_to_completion(&harness, &mut counter);
        assert!(seen.iter().all(|v| (5..=20).contains(v)));
        assert_eq!(counter.value(), 20);
    }

    #[test]
    fn test_zero_duration_completes_on_first_frame() {
        let harness = Harness::new();
        let mut counter = CountUp::new(&harness.host(), 42).duration_ms(0.0);
        counter.set_enabled(true);
        let messages = harness.run_frames(1, &mut [&mut counter]);
        assert_eq!(
            messages_of::<CountUpChanged>(&messages),
            vec![&CountUpChanged {
                value: 42,
                completed: true
            }]
        );
    }

    #[test]
    fn test_single_trigger_latch() {
        let harness = Harness::new();
        let mut counter = CountUp::new(&harness.host(), 100).duration_ms(320.0);
        counter.set_enabled(true);
        let started = counter.phase();
        harness.run_frames(5, &mut [&mut counter]);
        counter.set_enabled(false);
        counter.set_enabled(true);
        assert_eq!(
            std::mem::discriminant(&counter.phase()),
            std::mem::discriminant(&started)
        );
        if let (CountUpPhase::Running { started_at: a }, CountUpPhase::Running { started_at: b }) =
            (started, counter.phase())
        {
            assert_eq!(a, b);
        }

        run_to_completion(&harness, &mut counter);
        counter.set_enabled(false);
        counter.set_enabled(true);
        assert_eq!(counter.phase(), CountUpPhase::Completed);
        assert_eq!(harness.document().pending_frames(), 0);
        assert!(harness.run_frames(3, &mut [&mut counter]).is_empty());
    }

    #[test]
    fn test_set_end_ignored_after_start() {
        let harness = Harness::new();
        let mut counter = CountUp::new(&harness.host(), 10).duration_ms(50.0);
        counter.set_end(12);
        assert_eq!(counter.end(), 12);
        counter.set_enabled(true);
        counter.set_end(99);
        run_to_completion(&harness, &mut counter);
        assert_eq!(counter.value(), 12);
    }

    #[test]
    fn test_drop_cancels_pending_frame() {
        let harness = Harness::new();
        let mut counter = CountUp::new(&harness.host(), 10);
        counter.set_enabled(true);
        assert_eq!(harness.document().pending_frames(), 1);
        drop(counter);
        assert_eq!(harness.document().pending_frames(), 0);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_terminates_at_end(end in 0i64..100_000, duration in 0.0f64..3000.0) {
            let harness = Harness::new();
            let mut counter = CountUp::new(&harness.host(), end).duration_ms(duration);
            counter.set_enabled(true);
            let seen = run_to_completion(&harness, &mut counter);
            prop_assert_eq!(counter.phase(), CountUpPhase::Completed);
            prop_assert_eq!(counter.value(), end);
            prop_assert!(seen.windows(2).all(|w| w[0] <= w[1]));
        }
    }

    // =========================================================================
    // StatCounter Tests
    // =========================================================================

    #[test]
    fn test_stat_counter_finishes_at_value() {
        let harness = Harness::new();
        let mut stat = StatCounter::new(&harness.host(), 15, "+", "Years in HR");
        assert_eq!(stat.display(), "0+");
        stat.set_visible(true);
        harness.run_frames(120, &mut [&mut stat]);
        assert_eq!(stat.count_up().value(), 15);
        assert_eq!(stat.display(), "15+");
        assert_eq!(stat.label(), "Years in HR");
    }

    #[test]
    fn test_stat_counter_mid_animation() {
        let harness = Harness::new().frame_ms(750.0);
        let mut stat = StatCounter::new(&harness.host(), 15, "", "Companies");
        stat.set_visible(true);
        harness.run_frames(1, &mut [&mut stat]);
        // progress 0.5 -> 15 * 0.875 = 13.125
        assert_eq!(stat.display(), "13");
    }
}
