//! Error types for content and configuration loading.

use std::path::PathBuf;
use thiserror::Error;

/// A single problem found while validating site content.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Issue {
    /// A section that must have entries is empty
    #[error("section '{section}' is empty")]
    Empty {
        /// Section name
        section: &'static str,
    },
    /// Two entries in a section share an id
    #[error("duplicate id '{id}' in section '{section}'")]
    DuplicateId {
        /// Section name
        section: &'static str,
        /// Repeated id
        id: String,
    },
    /// A navigation link does not point at a page section
    #[error("navigation link '{href}' does not name a page section")]
    DanglingAnchor {
        /// Link target
        href: String,
    },
    /// No hero panel carries stats
    #[error("no hero panel carries stats")]
    MissingHeroStats,
    /// A link that must be absolute is not
    #[error("'{field}' is not an absolute http(s) URL: {value}")]
    InvalidUrl {
        /// Field path
        field: String,
        /// Offending value
        value: String,
    },
}

/// Error type for loading content and configuration.
#[derive(Debug, Error)]
pub enum ContentError {
    /// YAML parsing error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// File could not be read
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
    /// Content parsed but failed validation
    #[error("content has {} validation issue(s)", issues.len())]
    Invalid {
        /// Every issue found
        issues: Vec<Issue>,
    },
    /// A configuration value is out of range
    #[error("invalid value for '{field}': {message}")]
    InvalidValue {
        /// Field name
        field: &'static str,
        /// Error message
        message: String,
    },
}

/// Result alias for content operations.
pub type Result<T> = std::result::Result<T, ContentError>;
