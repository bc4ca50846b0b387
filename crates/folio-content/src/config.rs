//! Timing and tuning configuration.
//!
//! Every field has a default, so an empty TOML document yields the stock
//! site behaviour:
//!
//! ```toml
//! focus_delay_ms = 50
//! stat_duration_ms = 1500.0
//! hero_fade_threshold = 0.5
//! hero_panel_count = 4
//! content_anchor = "consulting"
//! visibility_threshold = 0.1
//! ```

use crate::error::{ContentError, Result};
use crate::site::SECTIONS;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Site tuning knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Delay before focus moves into an opened overlay
    #[serde(default = "default_focus_delay_ms")]
    pub focus_delay_ms: u32,
    /// Count-up duration of the hero stats
    #[serde(default = "default_stat_duration_ms")]
    pub stat_duration_ms: f64,
    /// Fraction of the viewport scrolled before the hero indicator fades
    #[serde(default = "default_hero_fade_threshold")]
    pub hero_fade_threshold: f64,
    /// Number of hero panels
    #[serde(default = "default_hero_panel_count")]
    pub hero_panel_count: usize,
    /// Section the scroll-down affordance targets
    #[serde(default = "default_content_anchor")]
    pub content_anchor: String,
    /// Visible fraction at which an element counts as in view
    #[serde(default = "default_visibility_threshold")]
    pub visibility_threshold: f64,
}

const fn default_focus_delay_ms() -> u32 {
    50
}

const fn default_stat_duration_ms() -> f64 {
    1500.0
}

const fn default_hero_fade_threshold() -> f64 {
    0.5
}

const fn default_hero_panel_count() -> usize {
    4
}

fn default_content_anchor() -> String {
    "consulting".to_string()
}

const fn default_visibility_threshold() -> f64 {
    0.1
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            focus_delay_ms: default_focus_delay_ms(),
            stat_duration_ms: default_stat_duration_ms(),
            hero_fade_threshold: default_hero_fade_threshold(),
            hero_panel_count: default_hero_panel_count(),
            content_anchor: default_content_anchor(),
            visibility_threshold: default_visibility_threshold(),
        }
    }
}

impl SiteConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ContentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loaded site config");
        Self::from_toml(&text)
    }

    /// Serialize as TOML.
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        non_negative("stat_duration_ms", self.stat_duration_ms)?;
        unit_interval("hero_fade_threshold", self.hero_fade_threshold)?;
        unit_interval("visibility_threshold", self.visibility_threshold)?;
        if self.hero_panel_count == 0 {
            return Err(ContentError::InvalidValue {
                field: "hero_panel_count",
                message: "must be at least 1".to_string(),
            });
        }
        if !SECTIONS.contains(&self.content_anchor.as_str()) {
            return Err(ContentError::InvalidValue {
                field: "content_anchor",
                message: format!("unknown section '{}'", self.content_anchor),
            });
        }
        Ok(())
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ContentError::InvalidValue {
            field,
            message: format!("must be a non-negative number, got {value}"),
        })
    }
}

fn unit_interval(field: &'static str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ContentError::InvalidValue {
            field,
            message: format!("must be between 0 and 1, got {value}"),
        })
    }
}
