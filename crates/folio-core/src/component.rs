//! The component contract: consume host deliveries, emit messages.

use crate::host::Delivery;
use std::any::Any;

/// A mounted piece of interactive UI.
///
/// The application forwards every [`Delivery`] it receives from the host to
/// its components. A component ignores deliveries whose id it does not own and
/// may return a message describing what happened (for example an overlay
/// reporting that it closed).
pub trait Component {
    /// Handle a delivery. Returns a message if the delivery changed state.
    fn handle(&mut self, delivery: &Delivery) -> Option<Box<dyn Any>>;
}

/// Forward a delivery to several components, collecting their messages.
pub fn dispatch(components: &mut [&mut dyn Component], delivery: &Delivery) -> Vec<Box<dyn Any>> {
    components
        .iter_mut()
        .filter_map(|component| component.handle(delivery))
        .collect()
}
