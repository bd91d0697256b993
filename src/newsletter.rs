use std::cell::RefCell;
use std::rc::Rc;

use crate::config::SiteConfig;
use crate::page::{Page, Scheduler};

pub const FORM_SELECTOR: &str = ".newsletter-form";

/// Signup stub: acknowledges the address and resets after a while.
pub struct Newsletter<P: Page> {
    input: P::Element,
    button: P::Element,
    idle_html: String,
    generation: u64,
    config: SiteConfig,
}

impl<P: Page> Newsletter<P> {
    /// Captures the button's current content so it can be restored later.
    pub fn new(page: &P, input: P::Element, button: P::Element, config: &SiteConfig) -> Self {
        let idle_html = page.inner_html(&button);
        Self { input, button, idle_html, generation: 0, config: config.clone() }
    }

    /// Returns the token the matching reset must present, or `None` when
    /// there was nothing to submit.
    pub fn submit(&mut self, page: &P) -> Option<u64> {
        if page.value(&self.input).is_empty() {
            return None;
        }
        page.set_inner_html(&self.button, &self.config.newsletter_success_html);
        page.set_style(&self.button, "background", Some(&self.config.newsletter_success_background));
        page.set_value(&self.input, "");
        page.set_placeholder(&self.input, &self.config.newsletter_thanks_placeholder);
        self.generation += 1;
        Some(self.generation)
    }

    /// Restores the idle look unless a newer submission superseded `token`.
    pub fn reset(&mut self, page: &P, token: u64) -> bool {
        if token != self.generation {
            return false;
        }
        page.set_inner_html(&self.button, &self.idle_html);
        page.set_style(&self.button, "background", None);
        page.set_placeholder(&self.input, &self.config.newsletter_placeholder);
        true
    }
}

pub fn handle_submit<P: Page, S: Scheduler>(
    signup: &Rc<RefCell<Newsletter<P>>>,
    page: &P,
    scheduler: &S,
    delay_ms: u32,
) -> bool {
    let Some(token) = signup.borrow_mut().submit(page) else {
        return false;
    };
    log::info!("Newsletter signup acknowledged");
    let signup = Rc::clone(signup);
    let page = page.clone();
    scheduler.schedule(
        delay_ms,
        Box::new(move || {
            signup.borrow_mut().reset(&page, token);
        }),
    );
    true
}
