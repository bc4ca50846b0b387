//! Core types for the Folio site runtime.
//!
//! This crate provides the vocabulary shared by every other Folio crate:
//! - Events: [`Event`], [`Key`], [`Modifiers`]
//! - The platform seam: [`Host`] and the ids it hands out
//! - Scoped host resources: [`Listener`], [`Timer`], [`Frame`], [`ScrollLock`]
//! - Animation: [`Easing`], [`EasedValue`], [`Motion`] presets
//! - The [`Component`] contract used to route host deliveries

pub mod animation;
mod component;
mod error;
mod event;
mod host;
pub mod lifecycle;

pub use animation::{EasedValue, Easing, Motion, Pose, SpringConfig, Stagger};
pub use component::{dispatch, Component};
pub use error::HostError;
pub use event::{Event, Key, Modifiers};
pub use host::{
    Delivery, ElementId, FrameId, Host, ListenKind, ListenTarget, ListenerId, ScrollBehavior,
    SharedHost, TimerId,
};
pub use lifecycle::{Frame, Listener, ScrollLock, Timer, LOCKED_OVERFLOW};
