//! Error types for widget operations.

use thiserror::Error;

/// Errors returned by widget operations that take an index.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WidgetError {
    /// A carousel needs at least one item
    #[error("carousel requires at least one item")]
    EmptyCarousel,

    /// Carousel index outside `[0, len)`
    #[error("index {index} out of range for {len} items")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Number of items
        len: usize,
    },

    /// Panel index outside `[0, count)`
    #[error("panel {index} out of range for {count} panels")]
    PanelOutOfRange {
        /// Requested panel
        index: usize,
        /// Number of panels
        count: usize,
    },
}

/// Result type for widget operations.
pub type Result<T> = std::result::Result<T, WidgetError>;
