//! One-way fade-in of content blocks as they scroll into view.

use crate::page::Page;

pub const ANIMATED_SELECTOR: &str =
    ".menu-card, .about-content, .about-images, .contact-block, .section-header";
pub const FADE_CLASS: &str = "fade-in";
pub const VISIBLE_CLASS: &str = "visible";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stagger {
    None,
    Short,
    Long,
}

const STAGGER_CYCLE: [Stagger; 3] = [Stagger::None, Stagger::Short, Stagger::Long];

impl Stagger {
    pub fn for_index(index: usize) -> Self {
        STAGGER_CYCLE[index % STAGGER_CYCLE.len()]
    }

    pub fn class(self) -> Option<&'static str> {
        match self {
            Stagger::None => None,
            Stagger::Short => Some("fade-in-delay-1"),
            Stagger::Long => Some("fade-in-delay-2"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeState {
    Pending,
    Visible,
}

pub fn crosses(intersecting: bool, ratio: f64, threshold: f64) -> bool {
    intersecting && ratio >= threshold
}

pub struct FadeIn<P: Page> {
    elements: Vec<(P::Element, FadeState)>,
    threshold: f64,
}

impl<P: Page> FadeIn<P> {
    /// Tags every element with the fade class and its stagger class.
    pub fn new(page: &P, elements: Vec<P::Element>, threshold: f64) -> Self {
        for (i, el) in elements.iter().enumerate() {
            page.set_class(el, FADE_CLASS, true);
            if let Some(class) = Stagger::for_index(i).class() {
                page.set_class(el, class, true);
            }
        }
        Self {
            elements: elements.into_iter().map(|el| (el, FadeState::Pending)).collect(),
            threshold,
        }
    }

    pub fn elements(&self) -> impl Iterator<Item = &P::Element> {
        self.elements.iter().map(|(el, _)| el)
    }

    pub fn state(&self, el: &P::Element) -> Option<FadeState> {
        self.elements.iter().find(|(e, _)| e == el).map(|(_, s)| *s)
    }

    /// Handles one intersection report. Returns true when the element just
    /// became visible; the caller must stop observing it.
    pub fn on_intersection(&mut self, page: &P, el: &P::Element, intersecting: bool, ratio: f64) -> bool {
        if !crosses(intersecting, ratio, self.threshold) {
            return false;
        }
        let Some((_, state)) = self.elements.iter_mut().find(|(e, _)| e == el) else {
            return false;
        };
        if *state == FadeState::Visible {
            return false;
        }
        *state = FadeState::Visible;
        page.set_class(el, VISIBLE_CLASS, true);
        true
    }

    /// Picks how elements get revealed. Returns true when the caller must
    /// observe `elements()`; without an observer everything is shown now.
    pub fn start(&mut self, page: &P, has_observer: bool) -> bool {
        if !has_observer {
            self.reveal_all(page);
        }
        has_observer
    }

    /// Used when the runtime has no intersection observer.
    pub fn reveal_all(&mut self, page: &P) {
        for (el, state) in &mut self.elements {
            *state = FadeState::Visible;
            page.set_class(el, VISIBLE_CLASS, true);
        }
    }
}
