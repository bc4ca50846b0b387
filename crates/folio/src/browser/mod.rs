//! Browser runtime for the Folio site.
//!
//! This module binds the page to the real DOM: `WebHost` implements the
//! host seam on top of `web-sys`, and `App` is the `wasm_bindgen` entry
//! point that mounts every component.

// WASM-only modules
#[cfg(target_arch = "wasm32")]
pub mod app;
#[cfg(target_arch = "wasm32")]
pub mod host;

// Cross-platform modules
pub mod events;

#[cfg(target_arch = "wasm32")]
pub use app::App;
pub use events::{dom_event_type, FOCUSABLE_SELECTOR, INTERSECTION_THRESHOLDS};
#[cfg(target_arch = "wasm32")]
pub use host::{Sink, WebHost};
