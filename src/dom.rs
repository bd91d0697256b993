//! Browser side: `Page` over `web-sys` and the event wiring for every
//! page behavior.

use std::cell::RefCell;
use std::rc::Rc;

use chrono::Datelike;
use gloo_timers::callback::Timeout;
use log::{debug, info, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::js_sys::{Array, Reflect};
use web_sys::{
    AddEventListenerOptions, Document, Element, Event, EventTarget, HtmlElement, HtmlInputElement,
    HtmlSelectElement, HtmlTextAreaElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, Node, NodeList, ScrollBehavior, ScrollToOptions, Window,
};

use crate::config::{SiteConfig, CONFIG_ELEMENT_ID};
use crate::contact::{self, ContactForm, FieldKind};
use crate::error::Error;
use crate::fade::{FadeIn, ANIMATED_SELECTOR};
use crate::footer::{self, YEAR_ELEMENT_ID};
use crate::nav::{self, MobileMenu};
use crate::newsletter::{self, Newsletter, FORM_SELECTOR};
use crate::page::{Layout, Page, Scheduler, Task};
use crate::scroll::{self, ScrollChrome};
use crate::spy::ScrollSpy;

#[derive(Clone)]
pub struct DomPage {
    window: Window,
    document: Document,
}

impl DomPage {
    pub fn new(window: Window, document: Document) -> Self {
        Self { window, document }
    }

    /// Invalid selectors count as "not found".
    pub fn query(&self, selector: &str) -> Option<Element> {
        self.document.query_selector(selector).ok().flatten()
    }

    pub fn query_all(&self, selector: &str) -> Vec<Element> {
        elements(self.document.query_selector_all(selector))
    }

    pub fn by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn css_var(&self, name: &str) -> Option<String> {
        let root = self.document.document_element()?;
        let style = self.window.get_computed_style(&root).ok().flatten()?;
        style.get_property_value(name).ok()
    }

    pub fn config(&self) -> SiteConfig {
        let text = self.by_id(CONFIG_ELEMENT_ID).and_then(|el| el.text_content());
        SiteConfig::from_page_text(text.as_deref())
    }

    fn has_intersection_observer(&self) -> bool {
        Reflect::has(&self.window, &JsValue::from_str("IntersectionObserver")).unwrap_or(false)
    }
}

fn elements(list: Result<NodeList, JsValue>) -> Vec<Element> {
    let Ok(list) = list else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

impl Page for DomPage {
    type Element = Element;

    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn scroll_to(&self, top: f64) {
        let options = ScrollToOptions::new();
        options.set_top(top);
        options.set_behavior(ScrollBehavior::Smooth);
        self.window.scroll_to_with_scroll_to_options(&options);
    }

    fn layout(&self, el: &Element) -> Layout {
        el.dyn_ref::<HtmlElement>()
            .map(|html| Layout {
                top: f64::from(html.offset_top()),
                height: f64::from(html.offset_height()),
            })
            .unwrap_or_default()
    }

    fn set_class(&self, el: &Element, class: &str, on: bool) {
        let _ = el.class_list().toggle_with_force(class, on);
    }

    fn has_class(&self, el: &Element, class: &str) -> bool {
        el.class_list().contains(class)
    }

    fn set_attribute(&self, el: &Element, name: &str, value: &str) {
        let _ = el.set_attribute(name, value);
    }

    fn remove_attribute(&self, el: &Element, name: &str) {
        let _ = el.remove_attribute(name);
    }

    fn set_style(&self, el: &Element, property: &str, value: Option<&str>) {
        if let Some(html) = el.dyn_ref::<HtmlElement>() {
            let style = html.style();
            let _ = match value {
                Some(value) => style.set_property(property, value),
                None => style.remove_property(property).map(|_| ()),
            };
        }
    }

    fn value(&self, el: &Element) -> String {
        if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
            input.value()
        } else if let Some(area) = el.dyn_ref::<HtmlTextAreaElement>() {
            area.value()
        } else if let Some(select) = el.dyn_ref::<HtmlSelectElement>() {
            select.value()
        } else {
            String::new()
        }
    }

    fn set_value(&self, el: &Element, value: &str) {
        if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
            input.set_value(value);
        } else if let Some(area) = el.dyn_ref::<HtmlTextAreaElement>() {
            area.set_value(value);
        }
    }

    fn set_placeholder(&self, el: &Element, text: &str) {
        if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
            input.set_placeholder(text);
        } else if let Some(area) = el.dyn_ref::<HtmlTextAreaElement>() {
            area.set_placeholder(text);
        }
    }

    fn set_text(&self, el: &Element, text: &str) {
        el.set_text_content(Some(text));
    }

    fn inner_html(&self, el: &Element) -> String {
        el.inner_html()
    }

    fn set_inner_html(&self, el: &Element, html: &str) {
        el.set_inner_html(html);
    }

    fn lock_body_scroll(&self, locked: bool) {
        if let Some(body) = self.document.body() {
            let style = body.style();
            let _ = if locked {
                style.set_property("overflow", "hidden")
            } else {
                style.remove_property("overflow").map(|_| ())
            };
        }
    }
}

/// Timers backed by `setTimeout`. Handles are forgotten; nothing cancels them.
#[derive(Clone, Copy, Default)]
pub struct TimeoutScheduler;

impl Scheduler for TimeoutScheduler {
    fn schedule(&self, delay_ms: u32, task: Task) {
        Timeout::new(delay_ms, task).forget();
    }
}

// Listeners live as long as the page, so their closures are leaked.
fn listen(target: &EventTarget, event: &str, handler: impl FnMut(Event) + 'static) -> Result<(), Error> {
    let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
    callback.forget();
    Ok(())
}

fn listen_passive(target: &EventTarget, event: &str, handler: impl FnMut(Event) + 'static) -> Result<(), Error> {
    let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    let options = AddEventListenerOptions::new();
    options.set_passive(true);
    target.add_event_listener_with_callback_and_add_event_listener_options(
        event,
        callback.as_ref().unchecked_ref(),
        &options,
    )?;
    callback.forget();
    Ok(())
}

fn contains(container: &Element, event: &Event) -> bool {
    event
        .target()
        .and_then(|target| target.dyn_into::<Node>().ok())
        .is_some_and(|node| container.contains(Some(&node)))
}

/// Returns Ok(false) when the page has nothing for the feature to drive.
type Installer = fn(&DomPage, &SiteConfig) -> Result<bool, Error>;

fn install_scroll_chrome(page: &DomPage, config: &SiteConfig) -> Result<bool, Error> {
    let back_to_top = page.by_id("backToTop");
    let Some(chrome) = ScrollChrome::install(page, page.query(".site-header"), back_to_top.clone(), config) else {
        return Ok(false);
    };

    let p = page.clone();
    listen_passive(&page.window, "scroll", move |_| chrome.update(&p))?;

    if let Some(button) = back_to_top {
        let p = page.clone();
        listen(&button, "click", move |_| scroll::scroll_to_top(&p))?;
    }
    Ok(true)
}

fn install_mobile_menu(page: &DomPage, _config: &SiteConfig) -> Result<bool, Error> {
    let (Some(toggle), Some(links)) = (page.query(".nav-toggle"), page.query(".nav-links")) else {
        return Ok(false);
    };
    let header = page.query(".site-header");
    let menu = Rc::new(RefCell::new(MobileMenu::<DomPage>::new(toggle.clone(), links.clone())));

    {
        let menu = Rc::clone(&menu);
        let p = page.clone();
        listen(&toggle, "click", move |_| menu.borrow_mut().on_toggle(&p))?;
    }

    for link in elements(links.query_selector_all(".nav-link")) {
        let menu = Rc::clone(&menu);
        let p = page.clone();
        listen(&link, "click", move |_| menu.borrow_mut().on_link_click(&p))?;
    }

    let p = page.clone();
    listen(&page.document, "click", move |event| {
        let inside = nav::click_inside(
            header.as_ref().map(|header| contains(header, &event)),
            contains(&toggle, &event),
            contains(&links, &event),
        );
        menu.borrow_mut().on_document_click(&p, inside);
    })?;
    Ok(true)
}

fn install_anchor_scroll(page: &DomPage, config: &SiteConfig) -> Result<bool, Error> {
    let anchors = page.query_all(r##"a[href^="#"]"##);
    if anchors.is_empty() {
        return Ok(false);
    }
    for anchor in anchors {
        let p = page.clone();
        let fallback = config.nav_height_fallback;
        let href = anchor.get_attribute("href").unwrap_or_default();
        listen(&anchor, "click", move |event| {
            // a bare "#" is not a valid selector, so it falls through here
            let Some(target) = p.query(&href) else {
                return;
            };
            event.prevent_default();
            let offset = scroll::nav_offset(p.css_var("--nav-height").as_deref(), fallback);
            let top = scroll::anchor_target(target.get_bounding_client_rect().top(), p.scroll_y(), offset);
            p.scroll_to(top);
        })?;
    }
    Ok(true)
}

fn install_fade_in(page: &DomPage, config: &SiteConfig) -> Result<bool, Error> {
    let targets = page.query_all(ANIMATED_SELECTOR);
    if targets.is_empty() {
        return Ok(false);
    }
    let fade = Rc::new(RefCell::new(FadeIn::<DomPage>::new(page, targets, config.fade_threshold)));

    if !fade.borrow_mut().start(page, page.has_intersection_observer()) {
        info!("No IntersectionObserver, showing content without animation");
        return Ok(true);
    }

    let p = page.clone();
    let state = Rc::clone(&fade);
    let callback = Closure::wrap(Box::new(move |entries: Array, observer: IntersectionObserver| {
        for entry in entries.iter() {
            let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                continue;
            };
            let target = entry.target();
            let revealed = state.borrow_mut().on_intersection(
                &p,
                &target,
                entry.is_intersecting(),
                entry.intersection_ratio(),
            );
            if revealed {
                observer.unobserve(&target);
            }
        }
    }) as Box<dyn FnMut(Array, IntersectionObserver)>);

    let options = IntersectionObserverInit::new();
    options.set_threshold(&JsValue::from_f64(config.fade_threshold));
    let observer = match IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options) {
        Ok(observer) => observer,
        Err(err) => {
            fade.borrow_mut().reveal_all(page);
            return Err(err.into());
        }
    };
    callback.forget();

    for el in fade.borrow().elements() {
        observer.observe(el);
    }
    Ok(true)
}

fn install_contact_form(page: &DomPage, config: &SiteConfig) -> Result<bool, Error> {
    let (Some(form_el), Some(success)) = (page.by_id("contactForm"), page.by_id("formSuccess")) else {
        return Ok(false);
    };
    let submit = form_el.query_selector(r#"[type="submit"]"#).ok().flatten();

    let kind = |el: &Element| {
        if el.id() == "email" || el.get_attribute("type").as_deref() == Some("email") {
            FieldKind::Email
        } else {
            FieldKind::Text
        }
    };
    let required: Vec<(Element, FieldKind)> = elements(form_el.query_selector_all("[required]"))
        .into_iter()
        .map(|el| {
            let field_kind = kind(&el);
            (el, field_kind)
        })
        .collect();
    let emails = elements(form_el.query_selector_all(r#"#email, input[type="email"]"#));
    let fields = contact::collect_fields(required, emails);

    let form = Rc::new(RefCell::new(ContactForm::<DomPage>::new(
        form_el.clone(),
        success,
        submit,
        fields,
        config,
    )));

    {
        let form = Rc::clone(&form);
        let p = page.clone();
        let delay = config.submit_delay_ms;
        listen(&form_el, "submit", move |event| {
            event.prevent_default();
            let outcome = contact::handle_submit(&form, &p, &TimeoutScheduler, delay);
            debug!("Contact submit: {:?}", outcome);
        })?;
    }

    for field in elements(form_el.query_selector_all("input, textarea")) {
        let form = Rc::clone(&form);
        let p = page.clone();
        let el = field.clone();
        listen(&field, "input", move |_| form.borrow().clear_error(&p, &el))?;
    }
    Ok(true)
}

fn install_newsletter(page: &DomPage, config: &SiteConfig) -> Result<bool, Error> {
    let mut installed = false;
    for form_el in page.query_all(FORM_SELECTOR) {
        let input = form_el.query_selector(r#"input[type="email"]"#).ok().flatten();
        let button = form_el.query_selector("button").ok().flatten();
        let (Some(input), Some(button)) = (input, button) else {
            debug!("Newsletter form without email input or button, skipping");
            continue;
        };
        let signup = Rc::new(RefCell::new(Newsletter::<DomPage>::new(page, input, button, config)));
        let p = page.clone();
        let delay = config.newsletter_reset_ms;
        listen(&form_el, "submit", move |event| {
            event.prevent_default();
            newsletter::handle_submit(&signup, &p, &TimeoutScheduler, delay);
        })?;
        installed = true;
    }
    Ok(installed)
}

fn install_footer_year(page: &DomPage, _config: &SiteConfig) -> Result<bool, Error> {
    let Some(el) = page.by_id(YEAR_ELEMENT_ID) else {
        return Ok(false);
    };
    footer::stamp_year(page, &el, chrono::Local::now().year());
    Ok(true)
}

fn install_scroll_spy(page: &DomPage, config: &SiteConfig) -> Result<bool, Error> {
    let links = page.query_all(r##".nav-links .nav-link[href^="#"]"##);
    let sections = page
        .query_all("section[id]")
        .into_iter()
        .map(|section| {
            let id = section.id();
            let link = page.query(&format!(r##".nav-links .nav-link[href="#{}"]"##, id));
            (id, section, link)
        })
        .collect();
    let Some(spy) = ScrollSpy::install(page, sections, links, config.spy_offset) else {
        return Ok(false);
    };

    let p = page.clone();
    listen_passive(&page.window, "scroll", move |_| {
        spy.update(&p);
    })?;
    Ok(true)
}

/// Wires every behavior the current page has markup for. A feature that
/// fails to install is logged and skipped; the others still run.
pub fn start() -> Result<(), Error> {
    let window = web_sys::window().ok_or(Error::NoWindow)?;
    let document = window.document().ok_or(Error::NoDocument)?;
    let page = DomPage::new(window, document);
    let config = page.config();
    debug!("Site config: {:?}", config);

    let features: [(&str, Installer); 8] = [
        ("scroll chrome", install_scroll_chrome),
        ("mobile menu", install_mobile_menu),
        ("anchor scroll", install_anchor_scroll),
        ("fade-in", install_fade_in),
        ("contact form", install_contact_form),
        ("newsletter", install_newsletter),
        ("footer year", install_footer_year),
        ("scroll spy", install_scroll_spy),
    ];
    for (name, install) in features {
        match install(&page, &config) {
            Ok(true) => info!("Installed {}", name),
            Ok(false) => debug!("Skipped {}: no markup on this page", name),
            Err(err) => warn!("Failed to install {}: {}", name, err),
        }
    }
    Ok(())
}
