//! Easing curves, eased values and the site's motion presets.

use serde::{Deserialize, Serialize};

// =============================================================================
// Easing Functions
// =============================================================================

/// Standard easing functions for animations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Easing {
    /// Linear interpolation (no easing)
    #[default]
    Linear,
    /// Ease in (slow start)
    EaseIn,
    /// Ease out (slow end)
    EaseOut,
    /// Ease in and out (slow start and end)
    EaseInOut,
    /// Cubic ease out
    CubicOut,
}

impl Easing {
    /// Apply easing function to a normalized time value (0.0 to 1.0).
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => (1.0 - t).mul_add(-(1.0 - t), 1.0),
            Self::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0f64).mul_add(t, 2.0).powi(2) / 2.0
                }
            }
            Self::CubicOut => 1.0 - (1.0 - t).powi(3),
        }
    }
}

// =============================================================================
// EasedValue
// =============================================================================

/// A value animated from `from` to `to` over a fixed duration.
#[derive(Debug, Clone, PartialEq)]
pub struct EasedValue {
    /// Start value
    pub from: f64,
    /// End value
    pub to: f64,
    /// Total duration in milliseconds
    pub duration_ms: f64,
    /// Easing function
    pub easing: Easing,
}

impl EasedValue {
    /// Create new eased animation.
    #[must_use]
    pub const fn new(from: f64, to: f64, duration_ms: f64) -> Self {
        Self {
            from,
            to,
            duration_ms,
            easing: Easing::EaseOut,
        }
    }

    /// Set easing function.
    #[must_use]
    pub const fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Progress from 0.0 to 1.0 after `elapsed_ms`.
    #[must_use]
    pub fn progress(&self, elapsed_ms: f64) -> f64 {
        if self.duration_ms > 0.0 {
            (elapsed_ms / self.duration_ms).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }

    /// Value after `elapsed_ms`.
    #[must_use]
    pub fn value_at(&self, elapsed_ms: f64) -> f64 {
        let eased = self.easing.apply(self.progress(elapsed_ms));
        (self.to - self.from).mul_add(eased, self.from)
    }

    /// Whether the animation has finished after `elapsed_ms`.
    #[must_use]
    pub fn is_complete(&self, elapsed_ms: f64) -> bool {
        elapsed_ms >= self.duration_ms
    }
}

// =============================================================================
// Motion presets
// =============================================================================

/// Visual state a reveal animation moves between.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// Opacity (0.0 to 1.0)
    pub opacity: f64,
    /// Horizontal offset in pixels
    pub x: f64,
    /// Vertical offset in pixels
    pub y: f64,
    /// Uniform scale
    pub scale: f64,
}

impl Pose {
    /// Fully visible, untransformed.
    pub const REST: Self = Self {
        opacity: 1.0,
        x: 0.0,
        y: 0.0,
        scale: 1.0,
    };

    /// Transparent, otherwise untransformed.
    pub const HIDDEN: Self = Self {
        opacity: 0.0,
        x: 0.0,
        y: 0.0,
        scale: 1.0,
    };

    /// Interpolate between two poses.
    #[must_use]
    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        let mix = |a: f64, b: f64| (b - a).mul_add(t, a);
        Self {
            opacity: mix(self.opacity, other.opacity),
            x: mix(self.x, other.x),
            y: mix(self.y, other.y),
            scale: mix(self.scale, other.scale),
        }
    }

    /// CSS `transform` for this pose.
    #[must_use]
    pub fn to_css_transform(&self) -> String {
        format!(
            "translate({}px, {}px) scale({})",
            self.x, self.y, self.scale
        )
    }
}

/// A hidden → visible transition with timing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Motion {
    /// Starting pose
    pub from: Pose,
    /// Ending pose
    pub to: Pose,
    /// Duration in milliseconds
    pub duration_ms: f64,
    /// Delay before starting in milliseconds
    pub delay_ms: f64,
    /// Easing curve
    pub easing: Easing,
}

impl Motion {
    /// Fade in while rising 20px.
    pub const FADE_IN_UP: Self = Self::reveal(0.0, 20.0, 1.0, 600.0);
    /// Plain fade.
    pub const FADE_IN: Self = Self::reveal(0.0, 0.0, 1.0, 600.0);
    /// Fade in from the left.
    pub const FADE_IN_LEFT: Self = Self::reveal(-20.0, 0.0, 1.0, 600.0);
    /// Fade in from the right.
    pub const FADE_IN_RIGHT: Self = Self::reveal(20.0, 0.0, 1.0, 600.0);
    /// Fade in while growing from 95%.
    pub const SCALE_IN: Self = Self::reveal(0.0, 0.0, 0.95, 400.0);
    /// Staggered list item.
    pub const STAGGER_ITEM: Self = Self::reveal(0.0, 20.0, 1.0, 500.0);
    /// Modal backdrop fade.
    pub const MODAL_BACKDROP: Self = Self::reveal(0.0, 0.0, 1.0, 200.0).with_easing(Easing::Linear);
    /// Modal content entrance.
    pub const MODAL_CONTENT_ENTER: Self = Self::reveal(0.0, 20.0, 0.95, 300.0);
    /// Modal content exit.
    pub const MODAL_CONTENT_EXIT: Self = Self {
        from: Pose::REST,
        to: Pose {
            opacity: 0.0,
            x: 0.0,
            y: 20.0,
            scale: 0.95,
        },
        duration_ms: 200.0,
        delay_ms: 0.0,
        easing: Easing::EaseIn,
    };
    /// Hero panel fade.
    pub const HERO_PANEL: Self = Self::reveal(0.0, 0.0, 1.0, 800.0);
    /// Hero panel headline.
    pub const HERO_PANEL_TEXT: Self = Self::reveal(0.0, 30.0, 1.0, 600.0).with_delay(200.0);

    /// Look up a preset by its kebab-case name, e.g. `fade-in-up`.
    #[must_use]
    pub fn preset(name: &str) -> Option<Self> {
        let motion = match name {
            "fade-in-up" => Self::FADE_IN_UP,
            "fade-in" => Self::FADE_IN,
            "fade-in-left" => Self::FADE_IN_LEFT,
            "fade-in-right" => Self::FADE_IN_RIGHT,
            "scale-in" => Self::SCALE_IN,
            "stagger-item" => Self::STAGGER_ITEM,
            "modal-backdrop" => Self::MODAL_BACKDROP,
            "modal-content-enter" => Self::MODAL_CONTENT_ENTER,
            "modal-content-exit" => Self::MODAL_CONTENT_EXIT,
            "hero-panel" => Self::HERO_PANEL,
            "hero-panel-text" => Self::HERO_PANEL_TEXT,
            _ => return None,
        };
        Some(motion)
    }

    const fn reveal(x: f64, y: f64, scale: f64, duration_ms: f64) -> Self {
        Self {
            from: Pose {
                opacity: 0.0,
                x,
                y,
                scale,
            },
            to: Pose::REST,
            duration_ms,
            delay_ms: 0.0,
            easing: Easing::EaseOut,
        }
    }

    /// Set the delay.
    #[must_use]
    pub const fn with_delay(mut self, delay_ms: f64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    /// Set the easing curve.
    #[must_use]
    pub const fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Total time until the motion settles.
    #[must_use]
    pub fn total_ms(&self) -> f64 {
        self.delay_ms + self.duration_ms
    }

    /// Pose `elapsed_ms` after the motion was triggered.
    #[must_use]
    pub fn pose_at(&self, elapsed_ms: f64) -> Pose {
        let t = EasedValue::new(0.0, 1.0, self.duration_ms)
            .with_easing(self.easing)
            .value_at(elapsed_ms - self.delay_ms);
        self.from.lerp(&self.to, t)
    }
}

/// Delay schedule for staggered children.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stagger {
    /// Delay before the first child
    pub base_ms: f64,
    /// Extra delay per child index
    pub step_ms: f64,
}

impl Stagger {
    /// Container stagger used for section lists.
    pub const CONTAINER: Self = Self::new(200.0, 100.0);

    /// Create a stagger schedule.
    #[must_use]
    pub const fn new(base_ms: f64, step_ms: f64) -> Self {
        Self { base_ms, step_ms }
    }

    /// Delay for the child at `index`.
    #[must_use]
    pub fn delay_ms(&self, index: usize) -> f64 {
        self.step_ms.mul_add(index as f64, self.base_ms)
    }

    /// `motion` delayed for the child at `index`.
    #[must_use]
    pub fn apply(&self, motion: Motion, index: usize) -> Motion {
        motion.with_delay(self.delay_ms(index))
    }
}

// =============================================================================
// SpringConfig
// =============================================================================

/// Spring physics configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpringConfig {
    /// Stiffness (force per unit displacement)
    pub stiffness: f64,
    /// Damping (force per unit velocity)
    pub damping: f64,
    /// Mass
    pub mass: f64,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::GENTLE
    }
}

impl SpringConfig {
    /// Soft settle.
    pub const GENTLE: Self = Self::new(120.0, 14.0);
    /// Visible overshoot.
    pub const BOUNCY: Self = Self::new(300.0, 10.0);
    /// Fast, nearly no overshoot.
    pub const STIFF: Self = Self::new(400.0, 30.0);

    /// Look up a preset by name: `gentle`, `bouncy` or `stiff`.
    #[must_use]
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "gentle" => Some(Self::GENTLE),
            "bouncy" => Some(Self::BOUNCY),
            "stiff" => Some(Self::STIFF),
            _ => None,
        }
    }

    /// Create a unit-mass spring.
    #[must_use]
    pub const fn new(stiffness: f64, damping: f64) -> Self {
        Self {
            stiffness,
            damping,
            mass: 1.0,
        }
    }

    /// Damping ratio (zeta).
    #[must_use]
    pub fn damping_ratio(&self) -> f64 {
        self.damping / (2.0 * (self.stiffness * self.mass).sqrt())
    }

    /// Check if underdamped (oscillates).
    #[must_use]
    pub fn is_underdamped(&self) -> bool {
        self.damping_ratio() < 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // -------------------------------------------------------------------------
    // Easing tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_easing_linear() {
        assert!((Easing::Linear.apply(0.0) - 0.0).abs() < 0.001);
        assert!((Easing::Linear.apply(0.5) - 0.5).abs() < 0.001);
        assert!((Easing::Linear.apply(1.0) - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_easing_clamps_input() {
        assert!((Easing::Linear.apply(-0.5) - 0.0).abs() < 0.001);
        assert!((Easing::Linear.apply(1.5) - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_easing_cubic_out_formula() {
        for t in [0.0_f64, 0.1, 0.25, 0.5, 0.75, 0.9, 1.0] {
            let expected = 1.0 - (1.0 - t).powi(3);
            assert!((Easing::CubicOut.apply(t) - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn test_easing_ease_in_below_linear() {
        assert!(Easing::EaseIn.apply(0.5) < 0.5);
        assert!(Easing::EaseOut.apply(0.5) > 0.5);
    }

    proptest! {
        #[test]
        fn prop_easing_endpoints(idx in 0usize..5) {
            let easing = [
                Easing::Linear,
                Easing::EaseIn,
                Easing::EaseOut,
                Easing::EaseInOut,
                Easing::CubicOut,
            ][idx];
            prop_assert!(easing.apply(0.0).abs() < 1e-9);
            prop_assert!((easing.apply(1.0) - 1.0).abs() < 1e-9);
        }

        #[test]
        fn prop_cubic_out_monotonic(a in 0.0f64..1.0, b in 0.0f64..1.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(Easing::CubicOut.apply(lo) <= Easing::CubicOut.apply(hi));
        }
    }

    // -------------------------------------------------------------------------
    // EasedValue tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_eased_value_endpoints() {
        let v = EasedValue::new(10.0, 20.0, 100.0);
        assert_eq!(v.value_at(0.0), 10.0);
        assert_eq!(v.value_at(100.0), 20.0);
        assert_eq!(v.value_at(500.0), 20.0);
        assert!(v.is_complete(100.0));
        assert!(!v.is_complete(99.0));
    }

    #[test]
    fn test_eased_value_zero_duration() {
        let v = EasedValue::new(0.0, 1.0, 0.0);
        assert_eq!(v.progress(0.0), 1.0);
        assert_eq!(v.value_at(0.0), 1.0);
    }

    // -------------------------------------------------------------------------
    // Motion tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_motion_fade_in_up_starts_offset() {
        let start = Motion::FADE_IN_UP.pose_at(0.0);
        assert_eq!(start.opacity, 0.0);
        assert_eq!(start.y, 20.0);
        let end = Motion::FADE_IN_UP.pose_at(600.0);
        assert_eq!(end, Pose::REST);
    }

    #[test]
    fn test_motion_delay_holds_start_pose() {
        let m = Motion::HERO_PANEL_TEXT;
        assert_eq!(m.delay_ms, 200.0);
        assert_eq!(m.pose_at(150.0), m.from);
        assert_eq!(m.total_ms(), 800.0);
    }

    #[test]
    fn test_motion_modal_exit_reverses() {
        let m = Motion::MODAL_CONTENT_EXIT;
        assert_eq!(m.pose_at(0.0), Pose::REST);
        assert_eq!(m.pose_at(200.0).opacity, 0.0);
        assert_eq!(m.easing, Easing::EaseIn);
    }

    #[test]
    fn test_motion_preset_lookup() {
        assert_eq!(Motion::preset("fade-in-up"), Some(Motion::FADE_IN_UP));
        assert_eq!(Motion::preset("hero-panel-text"), Some(Motion::HERO_PANEL_TEXT));
        assert_eq!(Motion::preset("FADE-IN-UP"), None);
        assert_eq!(Motion::preset("slide"), None);
    }

    #[test]
    fn test_pose_css_transform() {
        let p = Pose {
            opacity: 1.0,
            x: -50.0,
            y: 0.0,
            scale: 1.0,
        };
        assert_eq!(p.to_css_transform(), "translate(-50px, 0px) scale(1)");
    }

    #[test]
    fn test_stagger_delay() {
        let s = Stagger::new(100.0, 100.0);
        assert_eq!(s.delay_ms(0), 100.0);
        assert_eq!(s.delay_ms(3), 400.0);
        assert_eq!(s.apply(Motion::FADE_IN_UP, 2).delay_ms, 300.0);
    }

    // -------------------------------------------------------------------------
    // Spring tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_spring_presets() {
        assert_eq!(SpringConfig::GENTLE.stiffness, 120.0);
        assert_eq!(SpringConfig::BOUNCY.damping, 10.0);
        assert!(SpringConfig::BOUNCY.is_underdamped());
        assert!(SpringConfig::STIFF.damping_ratio() > SpringConfig::BOUNCY.damping_ratio());
        assert_eq!(SpringConfig::default(), SpringConfig::GENTLE);
        assert_eq!(SpringConfig::preset("bouncy"), Some(SpringConfig::BOUNCY));
        assert_eq!(SpringConfig::preset("wobbly"), None);
    }
}
