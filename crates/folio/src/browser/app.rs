//! WASM application entry point.
//!
//! The page markup is static HTML. The app finds its elements by DOM id,
//! mounts the [`Page`] onto them and reflects component state back into the
//! markup after every batch of deliveries:
//!
//! | id / attribute | role |
//! |---|---|
//! | `#hero-panels` | horizontally snapping hero strip (required) |
//! | `#hero-indicators [data-panel-dot]` | one dot per panel, `active` class on the current one |
//! | `#hero-stats [data-stat-value]` | animated statistic numbers |
//! | `#hero-scroll-indicator` | faded out once the page scrolls past the hero |
//! | `#creative-carousel [data-slide]`, `[data-slide-dot]`, `[data-carousel-position]` | creative carousel |
//! | `#service-overlay`, `#service-overlay-panel`, `#service-overlay-close` | service dialog |
//! | `#job-overlay`, `#job-overlay-panel`, `#job-overlay-close` | job dialog |
//! | `[data-overlay-title]` inside a dialog panel | title of the selected item |
//! | `#project-video` | featured project video, `data-media-state` attribute |
//! | `#<content_anchor>` | first content section |

use super::host::WebHost;
use crate::page::{OverlayElements, Page, PageElements};
use folio_content::{SiteConfig, SiteContent};
use folio_core::{Delivery, ElementId, Motion, SharedHost, SpringConfig, Stagger};
use folio_widgets::MediaState;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt::Display;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

const HERO_STRIP: &str = "hero-panels";
const HERO_INDICATORS: &str = "hero-indicators";
const HERO_STATS: &str = "hero-stats";
const HERO_SCROLL_INDICATOR: &str = "hero-scroll-indicator";
const CAROUSEL: &str = "creative-carousel";
const SERVICE_OVERLAY: &str = "service-overlay";
const JOB_OVERLAY: &str = "job-overlay";
const PROJECT_VIDEO: &str = "project-video";

fn to_js(err: impl Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn overlay_elements(host: &WebHost, id: &str) -> Option<OverlayElements> {
    Some(OverlayElements {
        backdrop: host.element_by_id(id)?,
        container: host.element_by_id(&format!("{id}-panel"))?,
        close_button: host.element_by_id(&format!("{id}-close")),
    })
}

/// Elements the view writes to, resolved once at startup.
struct View {
    host: WebHost,
    panel_dots: Vec<ElementId>,
    stat_values: Vec<ElementId>,
    scroll_indicator: Option<ElementId>,
    slides: Vec<ElementId>,
    slide_dots: Vec<ElementId>,
    carousel_position: Vec<ElementId>,
    service_overlay: Option<(ElementId, Vec<ElementId>)>,
    job_overlay: Option<(ElementId, Vec<ElementId>)>,
    video: Option<ElementId>,
}

impl View {
    fn resolve(host: &WebHost, elements: &PageElements) -> Self {
        let within = |container: Option<ElementId>, selector: &str| {
            container.map_or_else(Vec::new, |c| host.query_all(c, selector))
        };
        let overlay = |overlay: Option<OverlayElements>| {
            overlay.map(|o| (o.backdrop, host.query_all(o.container, "[data-overlay-title]")))
        };
        Self {
            host: host.clone(),
            panel_dots: within(host.element_by_id(HERO_INDICATORS), "[data-panel-dot]"),
            stat_values: within(elements.hero_stats, "[data-stat-value]"),
            scroll_indicator: host.element_by_id(HERO_SCROLL_INDICATOR),
            slides: within(elements.carousel, "[data-slide]"),
            slide_dots: within(elements.carousel, "[data-slide-dot]"),
            carousel_position: within(elements.carousel, "[data-carousel-position]"),
            service_overlay: overlay(elements.service_overlay),
            job_overlay: overlay(elements.job_overlay),
            video: elements.video,
        }
    }

    fn render(&self, page: &Page) {
        for (index, dot) in self.panel_dots.iter().enumerate() {
            self.set_class(*dot, "active", index == page.active_panel());
        }
        for (value, stat) in self.stat_values.iter().zip(page.stats()) {
            self.set_text(*value, &stat.display());
        }
        if let Some(indicator) = self.scroll_indicator {
            self.set_style(indicator, "opacity", &page.hero_indicator_opacity().to_string());
        }

        let current = page.creative().current();
        for (index, slide) in self.slides.iter().enumerate() {
            self.set_hidden(*slide, index != current);
        }
        for (index, dot) in self.slide_dots.iter().enumerate() {
            self.set_class(*dot, "active", index == current);
        }
        for label in &self.carousel_position {
            self.set_text(*label, &page.creative().position_label());
        }

        if let Some((backdrop, titles)) = &self.service_overlay {
            let selected = page.selected_service();
            self.set_hidden(*backdrop, selected.is_none());
            for title in titles {
                self.set_text(*title, selected.map_or("", |s| s.title.as_str()));
            }
        }
        if let Some((backdrop, titles)) = &self.job_overlay {
            let selected = page.selected_job();
            self.set_hidden(*backdrop, selected.is_none());
            for title in titles {
                self.set_text(*title, selected.map_or("", |j| j.company.as_str()));
            }
        }

        if let (Some(video), Some(state)) = (self.video, page.video_state()) {
            let state = match state {
                MediaState::Playing => "playing",
                MediaState::Paused => "paused",
                MediaState::Fallback => "fallback",
            };
            self.set_attribute(video, "data-media-state", state);
        }
    }

    fn set_text(&self, id: ElementId, text: &str) {
        if let Some(el) = self.host.element(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_class(&self, id: ElementId, class: &str, on: bool) {
        if let Some(el) = self.host.element(id) {
            let _ = el.class_list().toggle_with_force(class, on);
        }
    }

    fn set_hidden(&self, id: ElementId, hidden: bool) {
        if let Some(el) = self.host.element(id) {
            let _ = el.toggle_attribute_with_force("hidden", hidden);
        }
    }

    fn set_attribute(&self, id: ElementId, name: &str, value: &str) {
        if let Some(el) = self.host.element(id) {
            let _ = el.set_attribute(name, value);
        }
    }

    fn set_style(&self, id: ElementId, property: &str, value: &str) {
        if let Some(el) = self
            .host
            .element(id)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        {
            let _ = el.style().set_property(property, value);
        }
    }
}

/// Page plus the deliveries that arrived while it was busy.
struct Runtime {
    page: RefCell<Page>,
    backlog: RefCell<VecDeque<Delivery>>,
    view: View,
}

impl Runtime {
    fn deliver(&self, delivery: Delivery) {
        self.backlog.borrow_mut().push_back(delivery);
        self.drain();
    }

    /// Process queued deliveries and re-render. A re-entrant call leaves
    /// its delivery to the outer drain.
    fn drain(&self) {
        let Ok(mut page) = self.page.try_borrow_mut() else {
            return;
        };
        loop {
            let next = self.backlog.borrow_mut().pop_front();
            let Some(delivery) = next else {
                break;
            };
            page.handle(&delivery);
        }
        self.view.render(&page);
    }

    fn update<R>(&self, f: impl FnOnce(&mut Page) -> R) -> Result<R, JsValue> {
        let result = {
            let mut page = self
                .page
                .try_borrow_mut()
                .map_err(|_| JsValue::from_str("Page is busy"))?;
            f(&mut page)
        };
        self.drain();
        Ok(result)
    }
}

/// The interactive site, mounted onto the current document.
#[wasm_bindgen]
pub struct App {
    runtime: Rc<Runtime>,
    host: WebHost,
}

#[wasm_bindgen]
impl App {
    /// Mount with the built-in content and default tuning.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<App, JsValue> {
        Self::boot(SiteConfig::default())
    }

    /// Mount with tuning read from a TOML document.
    pub fn with_config(config_toml: &str) -> Result<App, JsValue> {
        let config = SiteConfig::from_toml(config_toml).map_err(to_js)?;
        Self::boot(config)
    }

    /// Site content as JSON.
    pub fn content_json(&self) -> Result<String, JsValue> {
        self.runtime
            .update(|page| page.content().to_json())?
            .map_err(to_js)
    }

    /// Active hero panel.
    pub fn active_panel(&self) -> Result<usize, JsValue> {
        self.runtime.update(|page| page.active_panel())
    }

    /// Scroll the hero strip to a panel.
    pub fn go_to_panel(&self, index: usize) -> Result<(), JsValue> {
        self.runtime.update(|page| page.go_to_panel(index))?.map_err(to_js)
    }

    /// Scroll down to the first content section.
    pub fn scroll_to_content(&self) -> Result<(), JsValue> {
        self.runtime.update(|page| page.scroll_to_content())
    }

    /// Show the next creative project.
    pub fn next_project(&self) -> Result<usize, JsValue> {
        self.runtime.update(|page| page.next_project().to)
    }

    /// Show the previous creative project.
    pub fn prev_project(&self) -> Result<usize, JsValue> {
        self.runtime.update(|page| page.prev_project().to)
    }

    /// Show a creative project by position.
    pub fn go_to_project(&self, index: usize) -> Result<(), JsValue> {
        self.runtime
            .update(|page| page.go_to_project(index).map(drop))?
            .map_err(to_js)
    }

    /// Open the service dialog. Returns whether a dialog opened.
    pub fn open_service(&self, id: &str) -> Result<bool, JsValue> {
        self.runtime
            .update(|page| page.select_service(id, None).is_some())
    }

    /// Open the job dialog. Returns whether a dialog opened.
    pub fn open_job(&self, id: &str) -> Result<bool, JsValue> {
        self.runtime.update(|page| page.select_job(id, None).is_some())
    }

    /// Close any open dialog.
    pub fn close_overlay(&self) -> Result<(), JsValue> {
        self.runtime.update(|page| {
            page.close_overlays();
        })
    }

    /// Selected service as JSON.
    pub fn selected_service_json(&self) -> Result<Option<String>, JsValue> {
        self.runtime
            .update(|page| page.selected_service().map(serde_json::to_string).transpose())?
            .map_err(to_js)
    }

    /// Selected job as JSON.
    pub fn selected_job_json(&self) -> Result<Option<String>, JsValue> {
        self.runtime
            .update(|page| page.selected_job().map(serde_json::to_string).transpose())?
            .map_err(to_js)
    }

    /// Play/pause the featured video.
    pub fn toggle_video(&self) -> Result<(), JsValue> {
        self.runtime.update(|page| {
            page.toggle_video();
        })
    }

    /// Number of DOM listeners the app holds.
    pub fn listener_count(&self) -> usize {
        self.host.listener_count()
    }
}

impl App {
    fn boot(config: SiteConfig) -> Result<Self, JsValue> {
        console_error_panic_hook::set_once();

        let host = WebHost::new().map_err(to_js)?;
        let content = SiteContent::embedded().map_err(to_js)?;
        let elements = PageElements {
            hero_strip: Some(host.require_by_id(HERO_STRIP).map_err(to_js)?),
            hero_stats: host.element_by_id(HERO_STATS),
            content_section: host.element_by_id(&config.content_anchor),
            carousel: host.element_by_id(CAROUSEL),
            service_overlay: overlay_elements(&host, SERVICE_OVERLAY),
            job_overlay: overlay_elements(&host, JOB_OVERLAY),
            video: host.media_by_id(PROJECT_VIDEO).map_err(to_js)?,
        };
        let view = View::resolve(&host, &elements);

        let shared: SharedHost = Rc::new(host.clone());
        let mut page = Page::new(&shared, content, &config, elements).map_err(to_js)?;
        page.mount();

        let runtime = Rc::new(Runtime {
            page: RefCell::new(page),
            backlog: RefCell::new(VecDeque::new()),
            view,
        });
        let weak = Rc::downgrade(&runtime);
        host.set_sink(Rc::new(move |delivery| {
            if let Some(runtime) = weak.upgrade() {
                runtime.deliver(delivery);
            }
        }));
        runtime.drain();
        Ok(Self { runtime, host })
    }
}

/// Initialize panic hook for better error messages.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Reveal animation for the `index`-th child of a staggered list, as JSON.
/// `None` for an unknown preset name.
#[wasm_bindgen]
pub fn motion_json(name: &str, index: usize) -> Result<Option<String>, JsValue> {
    Motion::preset(name)
        .map(|motion| Stagger::CONTAINER.apply(motion, index))
        .map(|motion| serde_json::to_string(&motion))
        .transpose()
        .map_err(to_js)
}

/// Spring preset (`gentle`, `bouncy`, `stiff`) as JSON.
#[wasm_bindgen]
pub fn spring_json(name: &str) -> Result<Option<String>, JsValue> {
    SpringConfig::preset(name)
        .map(|spring| serde_json::to_string(&spring))
        .transpose()
        .map_err(to_js)
}

/// Log to browser console.
#[wasm_bindgen]
pub fn log(msg: &str) {
    web_sys::console::log_1(&JsValue::from_str(msg));
}
