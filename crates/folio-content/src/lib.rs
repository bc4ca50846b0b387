//! Site content and configuration for Folio.
//!
//! - [`SiteContent`]: every section's copy, parsed from a YAML manifest and
//!   validated (unique ids, navigation anchors naming page sections,
//!   absolute external links)
//! - [`SiteConfig`]: timing and tuning knobs loaded from TOML, defaulting to
//!   the stock site behaviour

mod config;
mod error;
mod site;

pub use config::SiteConfig;
pub use error::{ContentError, Issue, Result};
pub use site::{
    About, CallToAction, Contact, ContactInfo, Creative, CreativeKind, CreativeProject,
    EarlierRole, Feature, HeroPanel, HeroStat, Icon, Job, NavLink, Project, ProjectStory,
    Service, SiteContent, Summary, SECTIONS, SITE_YAML,
};
