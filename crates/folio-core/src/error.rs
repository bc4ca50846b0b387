//! Host error types.

use thiserror::Error;

/// Errors raised while binding to a host environment.
///
/// Components themselves never fail: a missing element is a silent no-op.
/// These errors only surface while the runtime is bootstrapping.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HostError {
    /// No global `window`
    #[error("no window available")]
    NoWindow,
    /// No `document` on the window
    #[error("no document available")]
    NoDocument,
    /// No `<body>` in the document
    #[error("document has no body")]
    NoBody,
    /// Element lookup by selector or id failed
    #[error("element not found: {0}")]
    ElementNotFound(String),
    /// Element exists but has the wrong type
    #[error("element {selector} is not a {expected}")]
    WrongElementType {
        /// Selector used for the lookup
        selector: String,
        /// Expected element interface
        expected: &'static str,
    },
}
