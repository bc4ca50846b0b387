//! Input events delivered from the host to components.

use crate::host::ElementId;
use serde::{Deserialize, Serialize};

/// Input event types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// Key pressed
    KeyDown {
        /// Key pressed
        key: Key,
        /// Modifier state at the time of the press
        modifiers: Modifiers,
        /// Focused element that received the key, if any
        target: Option<ElementId>,
    },
    /// Primary button click
    Click {
        /// Innermost element under the pointer
        target: ElementId,
    },
    /// A scroll container (or the window) moved
    Scroll {
        /// Horizontal scroll offset in CSS pixels
        left: f64,
        /// Vertical scroll offset in CSS pixels
        top: f64,
    },
    /// Visibility of an observed element changed
    Intersect {
        /// Fraction of the element inside the viewport (0.0 to 1.0)
        ratio: f64,
        /// Whether the element intersects the viewport at all
        intersecting: bool,
    },
    /// A media element failed to load or play
    MediaError,
}

impl Event {
    /// Shorthand for a key press without modifiers.
    #[must_use]
    pub const fn key(key: Key) -> Self {
        Self::KeyDown {
            key,
            modifiers: Modifiers::NONE,
            target: None,
        }
    }

    /// The key of a key event.
    #[must_use]
    pub const fn key_code(&self) -> Option<Key> {
        match self {
            Self::KeyDown { key, .. } => Some(*key),
            _ => None,
        }
    }
}

/// Keyboard modifier state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Modifiers {
    /// Shift held
    pub shift: bool,
    /// Control held
    pub ctrl: bool,
    /// Alt/Option held
    pub alt: bool,
    /// Meta (Windows/Command) held
    pub meta: bool,
}

impl Modifiers {
    /// No modifiers held.
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Only shift held.
    pub const SHIFT: Self = Self {
        shift: true,
        ctrl: false,
        alt: false,
        meta: false,
    };
}

/// Keyboard key identifiers.
///
/// Only keys with a meaning for the site's interactions are named; everything
/// else maps to [`Key::Character`] or [`Key::Unidentified`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Tab key
    Tab,
    /// Escape key
    Escape,
    /// Enter/Return key
    Enter,
    /// Space key
    Space,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
    /// Home key
    Home,
    /// End key
    End,
    /// A printable character
    Character(char),
    /// Anything else
    Unidentified,
}

impl Key {
    /// Parse a DOM `KeyboardEvent.key` value.
    #[must_use]
    pub fn from_dom(key: &str) -> Self {
        match key {
            "Tab" => Self::Tab,
            "Escape" | "Esc" => Self::Escape,
            "Enter" => Self::Enter,
            " " | "Spacebar" => Self::Space,
            "ArrowUp" | "Up" => Self::Up,
            "ArrowDown" | "Down" => Self::Down,
            "ArrowLeft" | "Left" => Self::Left,
            "ArrowRight" | "Right" => Self::Right,
            "Home" => Self::Home,
            "End" => Self::End,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Self::Character(c),
                    _ => Self::Unidentified,
                }
            }
        }
    }
}
