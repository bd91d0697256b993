use crate::page::Page;

pub const YEAR_ELEMENT_ID: &str = "currentYear";

pub fn stamp_year<P: Page>(page: &P, el: &P::Element, year: i32) {
    page.set_text(el, &year.to_string());
}
