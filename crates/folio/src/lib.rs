//! Folio: WASM-first runtime for a single-page portfolio site.
//!
//! The interactive pieces (modal dialogs, hero panel tracking, the creative
//! carousel, count-up statistics) live in [`widgets`] and run against the
//! [`Host`] seam. [`Page`] wires them to the site [`content`]; in the browser
//! `browser::App` mounts the page onto the document.
//!
//! # Browser Usage (WASM)
//!
//! ```javascript
//! import init, { App } from './folio.js';
//!
//! async function main() {
//!     await init();
//!     const app = new App();
//!     document.querySelector('#scroll-down').onclick = () => app.scroll_to_content();
//! }
//! ```

pub use folio_core::*;
pub use folio_content as content;
pub use folio_widgets as widgets;

pub mod browser;
pub mod page;

#[cfg(target_arch = "wasm32")]
pub use browser::{App, WebHost};

pub use page::{OverlayElements, Page, PageElements};
