//! Typed site content.
//!
//! The page is a fixed set of sections whose copy lives in a YAML manifest.
//! [`SiteContent::embedded`] parses the manifest compiled into the crate;
//! [`SiteContent::from_yaml`] and [`SiteContent::from_path`] load alternates.
//!
//! # Example
//!
//! ```
//! use folio_content::SiteContent;
//!
//! let site = SiteContent::embedded().expect("embedded content is valid");
//! assert_eq!(site.hero_panels.len(), 4);
//! assert_eq!(site.hero_stats().len(), 3);
//! ```

use crate::error::{ContentError, Issue, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

/// The manifest compiled into the crate.
pub const SITE_YAML: &str = include_str!("../content/site.yaml");

/// Page section anchors, in page order.
pub const SECTIONS: [&str; 6] = [
    "consulting",
    "project",
    "experience",
    "about",
    "creative",
    "contact",
];

/// Icon shown next to a service, feature or pillar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Icon {
    Cpu,
    Users,
    TrendingUp,
    Zap,
    MessageSquare,
    Database,
    Shield,
    BarChart,
    FileText,
    Code,
}

/// One panel of the horizontally scrolling hero strip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeroPanel {
    /// Panel number
    pub id: u32,
    /// Main line
    pub headline: String,
    /// Line under the headline
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtext: Option<String>,
    /// Animated statistics
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stats: Vec<HeroStat>,
}

/// An animated hero number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroStat {
    /// Target value
    pub value: i64,
    /// Appended after the number, e.g. `+`
    #[serde(default)]
    pub suffix: String,
    /// Caption
    pub label: String,
}

/// A consulting service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    pub icon: Icon,
    pub title: String,
    pub short_description: String,
    /// The problem the client faces
    pub challenge: String,
    pub approach: Vec<String>,
    pub results: Vec<String>,
}

/// A titled feature with an icon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    pub icon: Icon,
    pub title: String,
    pub description: String,
}

/// The featured project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub features: Vec<Feature>,
    pub tech_stack: Vec<String>,
    pub story: ProjectStory,
}

/// How the featured project came to be.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectStory {
    pub headline: String,
    pub description: String,
    pub github_url: String,
    pub github_handle: String,
}

/// A position in the work history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub company: String,
    pub role: String,
    pub period: String,
    pub location: String,
    pub short_description: String,
    /// Blank-line separated paragraphs
    pub full_description: String,
    pub highlights: Vec<String>,
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Job {
    /// Paragraphs of the full description.
    pub fn paragraphs(&self) -> impl Iterator<Item = &str> {
        self.full_description
            .split("\n\n")
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}

/// A role shown in the condensed earlier-career list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarlierRole {
    pub company: String,
    pub role: String,
}

/// Biography.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct About {
    pub paragraphs: Vec<String>,
    pub credentials: String,
}

/// Kind of creative work, which decides the embedded player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreativeKind {
    /// Spotify artist player
    Music,
    /// YouTube video player
    Film,
}

/// A creative project shown in the carousel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreativeProject {
    pub id: String,
    pub kind: CreativeKind,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embed_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_url: Option<String>,
}

impl CreativeProject {
    /// Player iframe source with the query the player expects.
    pub fn embed_src(&self) -> Option<String> {
        let url = self.embed_url.as_deref()?;
        let query = match self.kind {
            CreativeKind::Music => "utm_source=generator&theme=0",
            CreativeKind::Film => "rel=0",
        };
        Some(format!("{url}?{query}"))
    }

    /// Accessible title of the player iframe.
    pub fn player_title(&self) -> String {
        match self.kind {
            CreativeKind::Music => format!("Spotify player for {}", self.title),
            CreativeKind::Film => format!("YouTube video: {}", self.title),
        }
    }

    /// Label of the outbound link.
    pub const fn external_label(&self) -> &'static str {
        match self.kind {
            CreativeKind::Music => "Listen on Spotify",
            CreativeKind::Film => "Watch on YouTube",
        }
    }
}

/// The creative section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creative {
    pub projects: Vec<CreativeProject>,
    pub footer: String,
}

/// Contact details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: String,
    pub phone: String,
    pub location: String,
    pub linkedin: String,
    pub github: String,
    pub foundryhr: String,
}

impl ContactInfo {
    /// `mailto:` link.
    pub fn mailto(&self) -> String {
        format!("mailto:{}", self.email)
    }

    /// `tel:` link with separators removed.
    pub fn tel(&self) -> String {
        let digits: String = self
            .phone
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '+')
            .collect();
        format!("tel:{digits}")
    }
}

/// Closing call to action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallToAction {
    pub headline: String,
    pub description: String,
}

/// The contact section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub info: ContactInfo,
    pub cta: CallToAction,
}

/// A header navigation link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavLink {
    pub href: String,
    pub label: String,
}

impl NavLink {
    /// Target section id, if the link is an in-page anchor.
    pub fn anchor(&self) -> Option<&str> {
        self.href.strip_prefix('#')
    }
}

/// All copy on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteContent {
    pub hero_panels: Vec<HeroPanel>,
    pub services: Vec<Service>,
    #[serde(default)]
    pub consulting_benefits: Vec<String>,
    pub project: Project,
    pub jobs: Vec<Job>,
    #[serde(default)]
    pub earlier_career: Vec<EarlierRole>,
    #[serde(default)]
    pub experience_pillars: Vec<Feature>,
    pub about: About,
    pub creative: Creative,
    pub contact: Contact,
    pub nav_links: Vec<NavLink>,
}

impl SiteContent {
    /// Parse and validate the embedded manifest.
    pub fn embedded() -> Result<Self> {
        let site = Self::from_yaml(SITE_YAML)?;
        site.validate()?;
        Ok(site)
    }

    /// Parse a manifest. Does not validate.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Read and parse a manifest file. Does not validate.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| ContentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), bytes = yaml.len(), "loaded content manifest");
        Self::from_yaml(&yaml)
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Fail with every issue found, if any.
    pub fn validate(&self) -> Result<()> {
        let issues = self.issues();
        if issues.is_empty() {
            Ok(())
        } else {
            tracing::debug!(count = issues.len(), "content failed validation");
            Err(ContentError::Invalid { issues })
        }
    }

    /// Every validation issue, in section order.
    pub fn issues(&self) -> Vec<Issue> {
        let mut issues = Vec::new();

        require_entries("hero_panels", self.hero_panels.len(), &mut issues);
        require_entries("services", self.services.len(), &mut issues);
        require_entries("jobs", self.jobs.len(), &mut issues);
        require_entries("creative.projects", self.creative.projects.len(), &mut issues);
        require_entries("nav_links", self.nav_links.len(), &mut issues);

        if !self.hero_panels.is_empty() && self.hero_stats().is_empty() {
            issues.push(Issue::MissingHeroStats);
        }

        unique_ids(
            "hero_panels",
            self.hero_panels.iter().map(|p| p.id.to_string()),
            &mut issues,
        );
        unique_ids(
            "services",
            self.services.iter().map(|s| s.id.clone()),
            &mut issues,
        );
        unique_ids("jobs", self.jobs.iter().map(|j| j.id.clone()), &mut issues);
        unique_ids(
            "creative.projects",
            self.creative.projects.iter().map(|p| p.id.clone()),
            &mut issues,
        );

        for link in &self.nav_links {
            if !link.anchor().is_some_and(|a| SECTIONS.contains(&a)) {
                issues.push(Issue::DanglingAnchor {
                    href: link.href.clone(),
                });
            }
        }

        absolute_url("project.story.github_url", &self.project.story.github_url, &mut issues);
        for job in &self.jobs {
            if let Some(url) = &job.url {
                absolute_url(&format!("jobs.{}.url", job.id), url, &mut issues);
            }
        }
        for project in &self.creative.projects {
            if let Some(url) = &project.embed_url {
                absolute_url(&format!("creative.{}.embed_url", project.id), url, &mut issues);
            }
            if let Some(url) = &project.external_url {
                absolute_url(
                    &format!("creative.{}.external_url", project.id),
                    url,
                    &mut issues,
                );
            }
        }
        let info = &self.contact.info;
        absolute_url("contact.linkedin", &info.linkedin, &mut issues);
        absolute_url("contact.github", &info.github, &mut issues);
        absolute_url("contact.foundryhr", &info.foundryhr, &mut issues);

        issues
    }

    /// Stats of the first hero panel that carries any.
    pub fn hero_stats(&self) -> &[HeroStat] {
        self.hero_panels
            .iter()
            .find(|p| !p.stats.is_empty())
            .map(|p| p.stats.as_slice())
            .unwrap_or_default()
    }

    /// Look up a service.
    pub fn service(&self, id: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.id == id)
    }

    /// Look up a job.
    pub fn job(&self, id: &str) -> Option<&Job> {
        self.jobs.iter().find(|j| j.id == id)
    }

    /// Look up a creative project.
    pub fn creative_project(&self, id: &str) -> Option<&CreativeProject> {
        self.creative.projects.iter().find(|p| p.id == id)
    }

    /// Entry counts per section.
    pub fn summary(&self) -> Summary {
        Summary {
            hero_panels: self.hero_panels.len(),
            hero_stats: self.hero_stats().len(),
            services: self.services.len(),
            consulting_benefits: self.consulting_benefits.len(),
            project_features: self.project.features.len(),
            tech_stack: self.project.tech_stack.len(),
            jobs: self.jobs.len(),
            earlier_career: self.earlier_career.len(),
            experience_pillars: self.experience_pillars.len(),
            about_paragraphs: self.about.paragraphs.len(),
            creative_projects: self.creative.projects.len(),
            nav_links: self.nav_links.len(),
        }
    }
}

fn require_entries(section: &'static str, len: usize, issues: &mut Vec<Issue>) {
    if len == 0 {
        issues.push(Issue::Empty { section });
    }
}

fn unique_ids(section: &'static str, ids: impl Iterator<Item = String>, issues: &mut Vec<Issue>) {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id.clone()) {
            issues.push(Issue::DuplicateId { section, id });
        }
    }
}

fn absolute_url(field: &str, value: &str, issues: &mut Vec<Issue>) {
    if !(value.starts_with("https://") || value.starts_with("http://")) {
        issues.push(Issue::InvalidUrl {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
}

/// Entry counts per section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub hero_panels: usize,
    pub hero_stats: usize,
    pub services: usize,
    pub consulting_benefits: usize,
    pub project_features: usize,
    pub tech_stack: usize,
    pub jobs: usize,
    pub earlier_career: usize,
    pub experience_pillars: usize,
    pub about_paragraphs: usize,
    pub creative_projects: usize,
    pub nav_links: usize,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = [
            ("hero panels", self.hero_panels),
            ("hero stats", self.hero_stats),
            ("services", self.services),
            ("consulting benefits", self.consulting_benefits),
            ("project features", self.project_features),
            ("tech stack", self.tech_stack),
            ("jobs", self.jobs),
            ("earlier career", self.earlier_career),
            ("experience pillars", self.experience_pillars),
            ("about paragraphs", self.about_paragraphs),
            ("creative projects", self.creative_projects),
            ("nav links", self.nav_links),
        ];
        for (label, count) in rows {
            writeln!(f, "{label:<20} {count}")?;
        }
        Ok(())
    }
}
