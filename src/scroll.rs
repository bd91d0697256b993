//! Header and back-to-top state derived from the scroll offset, plus the
//! smooth-scroll helpers used by in-page anchors.

use crate::config::SiteConfig;
use crate::page::Page;

pub fn is_scrolled(y: f64, threshold: f64) -> bool {
    y > threshold
}

pub fn show_back_to_top(y: f64, threshold: f64) -> bool {
    y > threshold
}

/// Header styling and back-to-top visibility. Applied on every scroll
/// event and once at startup.
pub struct ScrollChrome<P: Page> {
    header: Option<P::Element>,
    back_to_top: Option<P::Element>,
    header_threshold: f64,
    back_to_top_threshold: f64,
}

impl<P: Page> ScrollChrome<P> {
    pub fn new(header: Option<P::Element>, back_to_top: Option<P::Element>, config: &SiteConfig) -> Self {
        Self {
            header,
            back_to_top,
            header_threshold: config.header_threshold,
            back_to_top_threshold: config.back_to_top_threshold,
        }
    }

    /// Builds the controller and paints the current scroll state, so the
    /// first frame is right before any scroll event. `None` when the page
    /// has neither a header nor a back-to-top button.
    pub fn install(
        page: &P,
        header: Option<P::Element>,
        back_to_top: Option<P::Element>,
        config: &SiteConfig,
    ) -> Option<Self> {
        let chrome = Self::new(header, back_to_top, config);
        if chrome.is_empty() {
            return None;
        }
        chrome.update(page);
        Some(chrome)
    }

    pub fn is_empty(&self) -> bool {
        self.header.is_none() && self.back_to_top.is_none()
    }

    pub fn update(&self, page: &P) {
        let y = page.scroll_y();
        if let Some(header) = &self.header {
            page.set_class(header, "scrolled", is_scrolled(y, self.header_threshold));
        }
        if let Some(button) = &self.back_to_top {
            page.set_hidden(button, !show_back_to_top(y, self.back_to_top_threshold));
        }
    }
}

pub fn scroll_to_top<P: Page>(page: &P) {
    page.scroll_to(0.0);
}

/// Integer prefix of a CSS length, read the way `parseInt` would:
/// `"72px"` is 72, `" 4rem"` is 4, `"px"` is nothing.
pub fn parse_css_int(raw: &str) -> Option<f64> {
    let trimmed = raw.trim_start();
    let (sign, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (-1.0, &trimmed[1..]),
        Some(b'+') => (1.0, &trimmed[1..]),
        _ => (1.0, trimmed),
    };
    let digits: &str = &rest[..rest.bytes().take_while(u8::is_ascii_digit).count()];
    digits.parse::<f64>().ok().map(|n| sign * n)
}

/// Height to keep clear under the fixed header. Zero counts as unset.
pub fn nav_offset(css_value: Option<&str>, fallback: f64) -> f64 {
    css_value
        .and_then(parse_css_int)
        .filter(|n| *n != 0.0)
        .unwrap_or(fallback)
}

/// Document offset an anchor target should land on.
pub fn anchor_target(rect_top: f64, scroll_y: f64, offset: f64) -> f64 {
    rect_top + scroll_y - offset
}
