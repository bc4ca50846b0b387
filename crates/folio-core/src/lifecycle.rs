//! Scoped host resources that release themselves on drop.
//!
//! Each guard pairs an acquisition on the [`Host`](crate::Host) with its
//! release, similar to the cleanup function of a React effect. A component
//! that holds its guards in fields tears everything down when it is dropped,
//! so no listener, timer or frame callback can outlive its owner.
//!
//! Replacing a guard in place (`self.frame = Some(Frame::request(..))`)
//! acquires the new resource before the old one is released. That is harmless
//! for ids, but not for [`ScrollLock`]: take the old lock out first.

use crate::host::{ElementId, FrameId, ListenKind, ListenTarget, ListenerId, SharedHost, TimerId};
use std::fmt;

/// Overflow value applied while the body is locked.
pub const LOCKED_OVERFLOW: &str = "hidden";

/// An installed event listener.
pub struct Listener {
    host: SharedHost,
    id: ListenerId,
    target: ListenTarget,
    kind: ListenKind,
}

impl Listener {
    /// Install a listener on `target`.
    pub fn install(host: &SharedHost, target: ListenTarget, kind: ListenKind) -> Self {
        let id = host.add_listener(target, kind);
        tracing::trace!(?target, ?kind, listener = id.0, "listener installed");
        Self {
            host: SharedHost::clone(host),
            id,
            target,
            kind,
        }
    }

    /// Install a document-level listener.
    pub fn on_document(host: &SharedHost, kind: ListenKind) -> Self {
        Self::install(host, ListenTarget::Document, kind)
    }

    /// Install a listener scoped to one element.
    pub fn on_element(host: &SharedHost, element: ElementId, kind: ListenKind) -> Self {
        Self::install(host, ListenTarget::Element(element), kind)
    }

    /// Listener id as reported in deliveries.
    #[must_use]
    pub const fn id(&self) -> ListenerId {
        self.id
    }

    /// Where the listener is attached.
    #[must_use]
    pub const fn target(&self) -> ListenTarget {
        self.target
    }

    /// What the listener listens for.
    #[must_use]
    pub const fn kind(&self) -> ListenKind {
        self.kind
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        self.host.remove_listener(self.id);
        tracing::trace!(listener = self.id.0, "listener removed");
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("id", &self.id)
            .field("target", &self.target)
            .field("kind", &self.kind)
            .finish()
    }
}

/// A pending timeout.
pub struct Timer {
    host: SharedHost,
    id: TimerId,
}

impl Timer {
    /// Schedule a timeout.
    pub fn schedule(host: &SharedHost, delay_ms: u32) -> Self {
        let id = host.set_timeout(delay_ms);
        Self {
            host: SharedHost::clone(host),
            id,
        }
    }

    /// Timer id as reported in deliveries.
    #[must_use]
    pub const fn id(&self) -> TimerId {
        self.id
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        self.host.clear_timeout(self.id);
    }
}

impl fmt::Debug for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timer").field("id", &self.id).finish()
    }
}

/// A pending animation-frame request.
pub struct Frame {
    host: SharedHost,
    id: FrameId,
}

impl Frame {
    /// Request the next animation frame.
    pub fn request(host: &SharedHost) -> Self {
        let id = host.request_frame();
        Self {
            host: SharedHost::clone(host),
            id,
        }
    }

    /// Frame id as reported in deliveries.
    #[must_use]
    pub const fn id(&self) -> FrameId {
        self.id
    }
}

impl Drop for Frame {
    fn drop(&mut self) {
        self.host.cancel_frame(self.id);
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame").field("id", &self.id).finish()
    }
}

/// Body scroll lock.
///
/// Acquiring records the body's overflow as observed at that moment and sets
/// it to `hidden`; dropping writes the recorded value back. Locks released in
/// reverse acquisition order therefore restore the original value exactly.
pub struct ScrollLock {
    host: SharedHost,
    previous: String,
}

impl ScrollLock {
    /// Lock body scrolling.
    pub fn acquire(host: &SharedHost) -> Self {
        let previous = host.body_overflow();
        host.set_body_overflow(LOCKED_OVERFLOW);
        tracing::debug!(%previous, "body scroll locked");
        Self {
            host: SharedHost::clone(host),
            previous,
        }
    }

    /// Overflow value that will be restored on release.
    #[must_use]
    pub fn previous(&self) -> &str {
        &self.previous
    }
}

impl Drop for ScrollLock {
    fn drop(&mut self) {
        self.host.set_body_overflow(&self.previous);
        tracing::debug!(restored = %self.previous, "body scroll unlocked");
    }
}

impl fmt::Debug for ScrollLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollLock")
            .field("previous", &self.previous)
            .finish()
    }
}
