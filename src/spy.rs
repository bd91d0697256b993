//! Scroll spy: highlights the nav link of the section under the header.

use crate::page::Page;

pub const ACTIVE_CLASS: &str = "active-nav";

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

impl Section {
    pub fn contains(&self, y: f64) -> bool {
        y >= self.top && y < self.top + self.height
    }
}

/// Index of the first section (in document order) containing `y + bias`.
pub fn active_section(y: f64, bias: f64, sections: &[Section]) -> Option<usize> {
    let point = y + bias;
    sections.iter().position(|s| s.contains(point))
}

struct Tracked<E> {
    id: String,
    section: E,
    link: E,
}

pub struct ScrollSpy<P: Page> {
    tracked: Vec<Tracked<P::Element>>,
    links: Vec<P::Element>,
    bias: f64,
}

impl<P: Page> ScrollSpy<P> {
    /// `links` are all spy-able nav links; `sections` pairs each section id
    /// with its element and, if one exists, its link. Sections without a link
    /// are not tracked.
    pub fn new(
        sections: Vec<(String, P::Element, Option<P::Element>)>,
        links: Vec<P::Element>,
        bias: f64,
    ) -> Self {
        let tracked = sections
            .into_iter()
            .filter_map(|(id, section, link)| link.map(|link| Tracked { id, section, link }))
            .collect();
        Self { tracked, links, bias }
    }

    /// Like `new`, then highlights the section under the loaded scroll
    /// position. `None` when no section has a nav link.
    pub fn install(
        page: &P,
        sections: Vec<(String, P::Element, Option<P::Element>)>,
        links: Vec<P::Element>,
        bias: f64,
    ) -> Option<Self> {
        let spy = Self::new(sections, links, bias);
        if spy.is_empty() {
            return None;
        }
        spy.update(page);
        Some(spy)
    }

    pub fn is_empty(&self) -> bool {
        self.tracked.is_empty()
    }

    /// Section geometry is re-read on every call.
    pub fn sections(&self, page: &P) -> Vec<Section> {
        self.tracked
            .iter()
            .map(|t| {
                let layout = page.layout(&t.section);
                Section { id: t.id.clone(), top: layout.top, height: layout.height }
            })
            .collect()
    }

    /// Returns the id of the section now active, if any.
    pub fn update(&self, page: &P) -> Option<String> {
        let sections = self.sections(page);
        let index = active_section(page.scroll_y(), self.bias, &sections)?;
        let active = &self.tracked[index].link;
        for link in &self.links {
            if link != active {
                page.set_class(link, ACTIVE_CLASS, false);
            }
        }
        page.set_class(active, ACTIVE_CLASS, true);
        Some(sections[index].id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakePage;

    fn section(id: &str, top: f64, height: f64) -> Section {
        Section { id: id.to_string(), top, height }
    }

    type SectionMarkup = Vec<(String, usize, Option<usize>)>;

    fn markup(page: &FakePage) -> (SectionMarkup, Vec<usize>) {
        let mut links = Vec::new();
        let mut sections = Vec::new();
        for (id, top, height) in [("menu", 600.0, 800.0), ("about", 1_400.0, 700.0), ("contact", 2_100.0, 900.0)] {
            let el = page.add_with_layout(top, height);
            let link = page.add();
            links.push(link);
            sections.push((id.to_string(), el, Some(link)));
        }
        (sections, links)
    }

    fn layout(page: &FakePage) -> (ScrollSpy<FakePage>, Vec<usize>) {
        let (sections, links) = markup(page);
        (ScrollSpy::new(sections, links.clone(), 100.0), links)
    }

    fn active(page: &FakePage, links: &[usize]) -> Vec<usize> {
        links.iter().copied().filter(|l| page.has_class(l, ACTIVE_CLASS)).collect()
    }

    #[test]
    fn ranges_are_half_open() {
        let sections = [section("a", 0.0, 100.0), section("b", 100.0, 100.0)];
        assert_eq!(active_section(-100.0, 100.0, &sections), Some(0));
        assert_eq!(active_section(0.0, 100.0, &sections), Some(1));
        assert_eq!(active_section(99.0, 100.0, &sections), Some(1));
        assert_eq!(active_section(100.0, 100.0, &sections), None);
    }

    #[test]
    fn first_section_wins_on_overlap() {
        let sections = [section("a", 0.0, 500.0), section("b", 200.0, 500.0)];
        assert_eq!(active_section(250.0, 0.0, &sections), Some(0));
    }

    #[test]
    fn nothing_active_at_top() {
        let page = FakePage::new();
        let (spy, links) = layout(&page);
        page.set_scroll(0.0);
        assert_eq!(spy.update(&page), None);
        assert!(active(&page, &links).is_empty());
    }

    #[test]
    fn at_most_one_link_active_while_scrolling() {
        let page = FakePage::new();
        let (spy, links) = layout(&page);
        let mut y = 0.0;
        while y < 3_500.0 {
            page.set_scroll(y);
            spy.update(&page);
            assert!(active(&page, &links).len() <= 1, "y = {}", y);
            y += 37.0;
        }
    }

    #[test]
    fn follows_the_section_under_the_header() {
        let page = FakePage::new();
        let (spy, links) = layout(&page);
        page.set_scroll(1_350.0);
        assert_eq!(spy.update(&page).as_deref(), Some("about"));
        assert_eq!(active(&page, &links), vec![links[1]]);

        page.set_scroll(2_050.0);
        assert_eq!(spy.update(&page).as_deref(), Some("contact"));
        assert_eq!(active(&page, &links), vec![links[2]]);
    }

    #[test]
    fn gap_keeps_previous_link() {
        let page = FakePage::new();
        let (spy, links) = layout(&page);
        page.set_scroll(700.0);
        spy.update(&page);
        page.set_scroll(5_000.0);
        assert_eq!(spy.update(&page), None);
        assert_eq!(active(&page, &links), vec![links[0]]);
    }

    #[test]
    fn geometry_is_reread() {
        let page = FakePage::new();
        let section = page.add_with_layout(0.0, 100.0);
        let link = page.add();
        let spy = ScrollSpy::new(vec![("a".to_string(), section, Some(link))], vec![link], 0.0);
        page.set_scroll(150.0);
        assert_eq!(spy.update(&page), None);

        page.set_layout(section, 0.0, 400.0);
        assert_eq!(spy.sections(&page)[0].height, 400.0);
        assert_eq!(spy.update(&page).as_deref(), Some("a"));
    }

    #[test]
    fn install_highlights_before_any_scroll_event() {
        let page = FakePage::new();
        let (sections, links) = markup(&page);
        page.set_scroll(1_500.0);
        let spy = ScrollSpy::install(&page, sections, links.clone(), 100.0);
        assert!(spy.is_some());
        assert_eq!(active(&page, &links), vec![links[1]]);
    }

    #[test]
    fn install_without_linked_sections_is_none() {
        let page = FakePage::new();
        let hero = page.add_with_layout(0.0, 600.0);
        assert!(ScrollSpy::<FakePage>::install(&page, vec![("hero".to_string(), hero, None)], vec![], 100.0).is_none());
    }

    #[test]
    fn sections_without_links_are_ignored() {
        let page = FakePage::new();
        let hero = page.add_with_layout(0.0, 600.0);
        let spy = ScrollSpy::<FakePage>::new(vec![("hero".to_string(), hero, None)], vec![], 100.0);
        assert!(spy.is_empty());
        assert_eq!(spy.update(&page), None);
    }
}
