//! Capability seam between page behaviors and the browser.
//!
//! Controllers only talk to the document through [`Page`] and to timers
//! through [`Scheduler`], so every behavior can be driven by the in-memory
//! fake in tests and by `dom::DomPage` in the browser.

/// Layout box of an element in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Layout {
    pub top: f64,
    pub height: f64,
}

pub trait Page: Clone + 'static {
    type Element: Clone + PartialEq + 'static;

    fn scroll_y(&self) -> f64;

    /// Smooth-scrolls the window so that `top` is at the viewport top.
    fn scroll_to(&self, top: f64);

    fn layout(&self, el: &Self::Element) -> Layout;

    fn set_class(&self, el: &Self::Element, class: &str, on: bool);
    fn has_class(&self, el: &Self::Element, class: &str) -> bool;

    fn set_attribute(&self, el: &Self::Element, name: &str, value: &str);
    fn remove_attribute(&self, el: &Self::Element, name: &str);

    /// `None` removes the inline property.
    fn set_style(&self, el: &Self::Element, property: &str, value: Option<&str>);

    fn value(&self, el: &Self::Element) -> String;
    fn set_value(&self, el: &Self::Element, value: &str);
    fn set_placeholder(&self, el: &Self::Element, text: &str);

    fn set_text(&self, el: &Self::Element, text: &str);
    fn inner_html(&self, el: &Self::Element) -> String;
    fn set_inner_html(&self, el: &Self::Element, html: &str);

    fn lock_body_scroll(&self, locked: bool);

    /// Boolean attributes (`hidden`, `disabled`) are present or absent.
    fn set_flag(&self, el: &Self::Element, name: &str, on: bool) {
        if on {
            self.set_attribute(el, name, "");
        } else {
            self.remove_attribute(el, name);
        }
    }

    fn set_hidden(&self, el: &Self::Element, hidden: bool) {
        self.set_flag(el, "hidden", hidden);
    }
}

pub type Task = Box<dyn FnOnce()>;

pub trait Scheduler {
    /// Runs `task` once after `delay_ms`. Scheduled tasks can't be cancelled.
    fn schedule(&self, delay_ms: u32, task: Task);
}
