//! Selection-driven detail overlay.

use crate::overlay::{CloseReason, OverlayEvent, OverlayManager};
use folio_core::{Component, Delivery, ElementId};
use std::any::Any;

/// An overlay showing details of a selected item. The overlay is open exactly
/// while an item is selected.
#[derive(Debug)]
pub struct DetailOverlay<T> {
    overlay: OverlayManager,
    selected: Option<T>,
}

impl<T> DetailOverlay<T> {
    /// Wrap an overlay.
    pub const fn new(overlay: OverlayManager) -> Self {
        Self {
            overlay,
            selected: None,
        }
    }

    /// Show `item`, opening the overlay if needed. `trigger` is the element
    /// that requested it.
    pub fn select(&mut self, item: T, trigger: Option<ElementId>) -> Option<OverlayEvent> {
        self.selected = Some(item);
        self.overlay.open(trigger)
    }

    /// Clear the selection and close.
    pub fn clear(&mut self) -> Option<OverlayEvent> {
        self.selected = None;
        self.overlay.close(CloseReason::Programmatic)
    }

    /// Selected item.
    #[must_use]
    pub const fn selected(&self) -> Option<&T> {
        self.selected.as_ref()
    }

    /// Whether the overlay is open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.overlay.is_open()
    }

    /// Underlying overlay.
    #[must_use]
    pub const fn overlay(&self) -> &OverlayManager {
        &self.overlay
    }
}

impl<T> Component for DetailOverlay<T> {
    fn handle(&mut self, delivery: &Delivery) -> Option<Box<dyn Any>> {
        let message = self.overlay.handle(delivery)?;
        if let Some(OverlayEvent::Closed { .. }) = message.downcast_ref::<OverlayEvent>() {
            self.selected = None;
        }
        Some(message)
    }
}
