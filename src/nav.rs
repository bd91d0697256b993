//! Mobile navigation drawer.

use crate::page::Page;

const OPEN_CLASS: &str = "open";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    Closed,
    Open,
}

/// Whether a click landed inside the header. Pages without a header count
/// clicks on the toggle or the link list as inside, so the toggle's own
/// click never closes the menu it just opened.
pub fn click_inside(in_header: Option<bool>, in_toggle: bool, in_links: bool) -> bool {
    in_header.unwrap_or(in_toggle || in_links)
}

pub struct MobileMenu<P: Page> {
    toggle: P::Element,
    links: P::Element,
    state: MenuState,
}

impl<P: Page> MobileMenu<P> {
    pub fn new(toggle: P::Element, links: P::Element) -> Self {
        Self { toggle, links, state: MenuState::Closed }
    }

    pub fn state(&self) -> MenuState {
        self.state
    }

    pub fn on_toggle(&mut self, page: &P) {
        let next = match self.state {
            MenuState::Closed => MenuState::Open,
            MenuState::Open => MenuState::Closed,
        };
        self.enter(page, next);
    }

    pub fn on_link_click(&mut self, page: &P) {
        if self.state == MenuState::Open {
            self.enter(page, MenuState::Closed);
        }
    }

    /// `inside_header` is whether the click target sits within the site header.
    pub fn on_document_click(&mut self, page: &P, inside_header: bool) {
        if !inside_header && self.state == MenuState::Open {
            self.enter(page, MenuState::Closed);
        }
    }

    fn enter(&mut self, page: &P, state: MenuState) {
        let open = state == MenuState::Open;
        self.state = state;
        page.set_class(&self.links, OPEN_CLASS, open);
        page.set_class(&self.toggle, OPEN_CLASS, open);
        page.set_attribute(&self.toggle, "aria-expanded", if open { "true" } else { "false" });
        page.lock_body_scroll(open);
        log::debug!("Mobile menu {:?}", state);
    }
}
