//! Page composition: every interactive component of the site, wired to the
//! content and configuration and mounted onto host elements.
//!
//! The page is host-agnostic. The browser runtime resolves element ids from
//! the DOM and forwards host deliveries; tests drive it with an in-memory
//! document.

use folio_content::{CreativeProject, Job, Service, SiteConfig, SiteContent};
use folio_core::{dispatch, Component, Delivery, ElementId, SharedHost};
use folio_widgets::{
    scroll_to_content, Carousel, CarouselChanged, DetailOverlay, HeroFade, InView,
    MediaPlayback, MediaState, OverlayEvent, OverlayManager, PanelTracker, Result, StatCounter,
};
use std::any::Any;
use std::fmt;

/// Elements making up a modal dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayElements {
    /// Full-screen backdrop; clicking it closes the dialog
    pub backdrop: ElementId,
    /// Dialog surface receiving focus
    pub container: ElementId,
    /// Close button
    pub close_button: Option<ElementId>,
}

/// Host elements the page mounts onto. Missing elements leave the matching
/// feature inert.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageElements {
    /// Horizontally snapping hero strip
    pub hero_strip: Option<ElementId>,
    /// Container of the hero statistics
    pub hero_stats: Option<ElementId>,
    /// Section the scroll-down affordance targets
    pub content_section: Option<ElementId>,
    /// Creative carousel container
    pub carousel: Option<ElementId>,
    /// Service detail dialog
    pub service_overlay: Option<OverlayElements>,
    /// Job detail dialog
    pub job_overlay: Option<OverlayElements>,
    /// Featured project video
    pub video: Option<ElementId>,
}

/// The interactive state of the whole page.
pub struct Page {
    host: SharedHost,
    content: SiteContent,
    elements: PageElements,
    panels: PanelTracker,
    hero_fade: HeroFade,
    stats_latch: InView,
    stats: Vec<StatCounter>,
    creative: Carousel<CreativeProject>,
    services: Option<DetailOverlay<Service>>,
    jobs: Option<DetailOverlay<Job>>,
    video: Option<MediaPlayback>,
}

impl Page {
    /// Build the page. Fails if the content has no creative projects.
    pub fn new(
        host: &SharedHost,
        content: SiteContent,
        config: &SiteConfig,
        elements: PageElements,
    ) -> Result<Self> {
        let stats = content
            .hero_stats()
            .iter()
            .map(|stat| {
                StatCounter::new(host, stat.value, stat.suffix.as_str(), stat.label.as_str())
                    .duration_ms(config.stat_duration_ms)
            })
            .collect();
        let creative = Carousel::new(content.creative.projects.clone())?;
        let detail = |overlay: Option<OverlayElements>| {
            overlay.map(|elements| {
                let mut manager = OverlayManager::new(host, elements.container, elements.backdrop)
                    .focus_delay_ms(config.focus_delay_ms);
                if let Some(button) = elements.close_button {
                    manager = manager.with_close_button(button);
                }
                manager
            })
        };
        Ok(Self {
            host: SharedHost::clone(host),
            panels: PanelTracker::new(config.hero_panel_count),
            hero_fade: HeroFade::new().threshold(config.hero_fade_threshold),
            stats_latch: InView::new().threshold(config.visibility_threshold),
            stats,
            creative,
            services: detail(elements.service_overlay).map(DetailOverlay::new),
            jobs: detail(elements.job_overlay).map(DetailOverlay::new),
            video: elements.video.map(|video| MediaPlayback::new(host, video)),
            content,
            elements,
        })
    }

    /// Install every listener.
    pub fn mount(&mut self) {
        if let Some(strip) = self.elements.hero_strip {
            self.panels.mount(&self.host, strip);
        }
        self.hero_fade.mount(&self.host);
        if let Some(stats) = self.elements.hero_stats {
            self.stats_latch.mount(&self.host, stats);
        }
        if let Some(carousel) = self.elements.carousel {
            self.creative.mount(&self.host, carousel);
        }
        if let Some(video) = self.video.as_mut() {
            video.mount();
        }
        tracing::debug!(stats = self.stats.len(), "page mounted");
    }

    /// Route a host delivery to the components. Returns the emitted messages.
    pub fn handle(&mut self, delivery: &Delivery) -> Vec<Box<dyn Any>> {
        let messages = dispatch(&mut self.components(), delivery);
        if self.stats_latch.is_in_view() {
            for stat in &mut self.stats {
                stat.set_visible(true);
            }
        }
        messages
    }

    fn components(&mut self) -> Vec<&mut dyn Component> {
        let mut components: Vec<&mut dyn Component> = vec![
            &mut self.panels,
            &mut self.hero_fade,
            &mut self.stats_latch,
            &mut self.creative,
        ];
        components.extend(self.stats.iter_mut().map(|s| s as &mut dyn Component));
        if let Some(services) = self.services.as_mut() {
            components.push(services);
        }
        if let Some(jobs) = self.jobs.as_mut() {
            components.push(jobs);
        }
        if let Some(video) = self.video.as_mut() {
            components.push(video);
        }
        components
    }

    /// Content the page was built from.
    pub const fn content(&self) -> &SiteContent {
        &self.content
    }

    // ===== Hero =====

    /// Active hero panel.
    pub const fn active_panel(&self) -> usize {
        self.panels.active()
    }

    /// Hero panel tracker.
    pub const fn panels(&self) -> &PanelTracker {
        &self.panels
    }

    /// Scroll the hero strip to a panel.
    pub fn go_to_panel(&self, index: usize) -> Result<()> {
        self.panels.scroll_to_panel(index)
    }

    /// Opacity of the hero scroll indicator.
    pub const fn hero_indicator_opacity(&self) -> f64 {
        self.hero_fade.indicator_opacity()
    }

    /// Scroll down to the first content section.
    pub fn scroll_to_content(&self) {
        scroll_to_content(&*self.host, self.elements.content_section);
    }

    /// Hero statistics.
    pub fn stats(&self) -> &[StatCounter] {
        &self.stats
    }

    // ===== Creative carousel =====

    /// Creative carousel.
    pub const fn creative(&self) -> &Carousel<CreativeProject> {
        &self.creative
    }

    /// Show the next creative project.
    pub fn next_project(&mut self) -> CarouselChanged {
        self.creative.next()
    }

    /// Show the previous creative project.
    pub fn prev_project(&mut self) -> CarouselChanged {
        self.creative.prev()
    }

    /// Show a creative project by position.
    pub fn go_to_project(&mut self, index: usize) -> Result<CarouselChanged> {
        self.creative.go_to(index)
    }

    // ===== Detail overlays =====

    /// Open the service dialog for `id`, closing the job dialog first. Unknown
    /// ids are ignored.
    pub fn select_service(&mut self, id: &str, trigger: Option<ElementId>) -> Option<OverlayEvent> {
        let service = self.content.service(id)?.clone();
        if self.services.is_none() {
            return None;
        }
        if let Some(jobs) = self.jobs.as_mut() {
            jobs.clear();
        }
        self.services.as_mut()?.select(service, trigger)
    }

    /// Open the job dialog for `id`, closing the service dialog first. Unknown
    /// ids are ignored.
    pub fn select_job(&mut self, id: &str, trigger: Option<ElementId>) -> Option<OverlayEvent> {
        let job = self.content.job(id)?.clone();
        if self.jobs.is_none() {
            return None;
        }
        if let Some(services) = self.services.as_mut() {
            services.clear();
        }
        self.jobs.as_mut()?.select(job, trigger)
    }

    /// Close whichever dialog is open.
    pub fn close_overlays(&mut self) -> Vec<OverlayEvent> {
        let jobs = self.jobs.as_mut().and_then(DetailOverlay::clear);
        let services = self.services.as_mut().and_then(DetailOverlay::clear);
        jobs.into_iter().chain(services).collect()
    }

    /// Service shown in the dialog.
    pub fn selected_service(&self) -> Option<&Service> {
        self.services.as_ref()?.selected()
    }

    /// Job shown in the dialog.
    pub fn selected_job(&self) -> Option<&Job> {
        self.jobs.as_ref()?.selected()
    }

    // ===== Featured project video =====

    /// Play/pause the featured video.
    pub fn toggle_video(&mut self) -> Option<MediaState> {
        let video = self.video.as_mut()?;
        video.toggle();
        Some(video.state())
    }

    /// State of the featured video.
    pub fn video_state(&self) -> Option<MediaState> {
        self.video.as_ref().map(MediaPlayback::state)
    }
}

impl fmt::Debug for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("elements", &self.elements)
            .field("active_panel", &self.panels.active())
            .field("current_project", &self.creative.current())
            .field("stats", &self.stats.len())
            .finish_non_exhaustive()
    }
}
