//! Interactive components for the Folio site.
//!
//! Every component holds a [`SharedHost`](folio_core::SharedHost), releases
//! its host resources on drop, and implements [`Component`](folio_core::Component)
//! so the application can route deliveries to it.
//!
//! - [`OverlayManager`]: modal dialog with focus trap, focus restore,
//!   Escape/backdrop dismissal and body scroll lock
//! - [`CountUp`] and [`StatCounter`]: eased number animation
//! - [`Carousel`]: wrapping index controller with arrow-key navigation
//! - [`PanelTracker`] and [`HeroFade`]: hero strip scroll tracking
//! - [`InView`], [`MediaPlayback`], [`DetailOverlay`]

pub mod carousel;
pub mod count_up;
pub mod detail;
mod error;
pub mod media;
pub mod overlay;
pub mod panel_tracker;
pub mod visibility;

pub use carousel::{Carousel, CarouselChanged, SlideStage, SlideTransition};
pub use count_up::{count_up_value, CountUp, CountUpChanged, CountUpPhase, StatCounter};
pub use detail::DetailOverlay;
pub use error::{Result, WidgetError};
pub use media::{MediaChanged, MediaPlayback, MediaState};
pub use overlay::{CloseReason, OverlayEvent, OverlayManager, OverlayPhase, OverlaySize};
pub use panel_tracker::{
    panel_index, scroll_to_content, HeroFade, HeroFadeChanged, PanelChanged, PanelTracker,
};
pub use visibility::{InView, VisibilityChanged};
