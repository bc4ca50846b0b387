//! Test tooling for Folio components.
//!
//! - [`FakeDocument`]: an in-memory [`Host`](folio_core::Host) with an element
//!   tree, focus, virtual clock, listeners, timers and frames
//! - [`Harness`]: drives components through key presses, clicks, scrolling
//!   and time
//!
//! ```
//! use folio_test::Harness;
//!
//! let harness = Harness::new();
//! let button = harness.document().button(None);
//! assert!(harness.click(button, &mut []).is_empty());
//! ```

#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::float_cmp)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::new_without_default)]

mod document;
mod harness;

pub use document::{
    FakeDocument, MediaCall, NodeKind, ScrollRequest, DEFAULT_VIEWPORT, INITIAL_OVERFLOW,
};
pub use harness::{messages_of, Harness, Messages, FRAME_MS};
