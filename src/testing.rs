use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use crate::page::{Layout, Page, Scheduler, Task};

#[derive(Debug, Default, Clone)]
pub struct FakeElement {
    pub classes: BTreeSet<String>,
    pub attributes: BTreeMap<String, String>,
    pub style: BTreeMap<String, String>,
    pub layout: Layout,
    pub value: String,
    pub placeholder: String,
    pub text: String,
    pub html: String,
}

#[derive(Debug, Default)]
struct FakeState {
    elements: Vec<FakeElement>,
    scroll_y: f64,
    scrolled_to: Vec<f64>,
    body_locked: bool,
}

/// In-memory document; elements are addressed by their index.
#[derive(Debug, Default, Clone)]
pub struct FakePage {
    state: Rc<RefCell<FakeState>>,
}

impl FakePage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self) -> usize {
        let mut state = self.state.borrow_mut();
        state.elements.push(FakeElement::default());
        state.elements.len() - 1
    }

    pub fn add_with_layout(&self, top: f64, height: f64) -> usize {
        let id = self.add();
        self.set_layout(id, top, height);
        id
    }

    pub fn set_layout(&self, id: usize, top: f64, height: f64) {
        self.state.borrow_mut().elements[id].layout = Layout { top, height };
    }

    pub fn element(&self, id: usize) -> FakeElement {
        self.state.borrow().elements[id].clone()
    }

    pub fn set_scroll(&self, y: f64) {
        self.state.borrow_mut().scroll_y = y;
    }

    pub fn scrolled_to(&self) -> Vec<f64> {
        self.state.borrow().scrolled_to.clone()
    }

    pub fn body_locked(&self) -> bool {
        self.state.borrow().body_locked
    }

    pub fn is_hidden(&self, id: usize) -> bool {
        self.element(id).attributes.contains_key("hidden")
    }

    pub fn attribute(&self, id: usize, name: &str) -> Option<String> {
        self.element(id).attributes.get(name).cloned()
    }

    pub fn style(&self, id: usize, property: &str) -> Option<String> {
        self.element(id).style.get(property).cloned()
    }

    fn with<R>(&self, id: usize, f: impl FnOnce(&mut FakeElement) -> R) -> R {
        f(&mut self.state.borrow_mut().elements[id])
    }
}

impl Page for FakePage {
    type Element = usize;

    fn scroll_y(&self) -> f64 {
        self.state.borrow().scroll_y
    }

    fn scroll_to(&self, top: f64) {
        let mut state = self.state.borrow_mut();
        state.scrolled_to.push(top);
        state.scroll_y = top;
    }

    fn layout(&self, el: &usize) -> Layout {
        self.with(*el, |e| e.layout)
    }

    fn set_class(&self, el: &usize, class: &str, on: bool) {
        self.with(*el, |e| {
            if on {
                e.classes.insert(class.to_string());
            } else {
                e.classes.remove(class);
            }
        })
    }

    fn has_class(&self, el: &usize, class: &str) -> bool {
        self.with(*el, |e| e.classes.contains(class))
    }

    fn set_attribute(&self, el: &usize, name: &str, value: &str) {
        self.with(*el, |e| {
            e.attributes.insert(name.to_string(), value.to_string());
        })
    }

    fn remove_attribute(&self, el: &usize, name: &str) {
        self.with(*el, |e| {
            e.attributes.remove(name);
        })
    }

    fn set_style(&self, el: &usize, property: &str, value: Option<&str>) {
        self.with(*el, |e| match value {
            Some(v) => {
                e.style.insert(property.to_string(), v.to_string());
            }
            None => {
                e.style.remove(property);
            }
        })
    }

    fn value(&self, el: &usize) -> String {
        self.with(*el, |e| e.value.clone())
    }

    fn set_value(&self, el: &usize, value: &str) {
        self.with(*el, |e| e.value = value.to_string())
    }

    fn set_placeholder(&self, el: &usize, text: &str) {
        self.with(*el, |e| e.placeholder = text.to_string())
    }

    fn set_text(&self, el: &usize, text: &str) {
        self.with(*el, |e| e.text = text.to_string())
    }

    fn inner_html(&self, el: &usize) -> String {
        self.with(*el, |e| e.html.clone())
    }

    fn set_inner_html(&self, el: &usize, html: &str) {
        self.with(*el, |e| e.html = html.to_string())
    }

    fn lock_body_scroll(&self, locked: bool) {
        self.state.borrow_mut().body_locked = locked;
    }
}

struct Pending {
    due: u64,
    task: Task,
}

/// Scheduler whose time only moves when a test advances it.
#[derive(Default, Clone)]
pub struct ManualClock {
    now: Rc<RefCell<u64>>,
    queue: Rc<RefCell<Vec<Pending>>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Moves time forward and runs every task that became due, in due order.
    pub fn advance(&self, ms: u64) {
        let target = *self.now.borrow() + ms;
        loop {
            let next = {
                let mut queue = self.queue.borrow_mut();
                let idx = queue
                    .iter()
                    .enumerate()
                    .filter(|(_, p)| p.due <= target)
                    .min_by_key(|(_, p)| p.due)
                    .map(|(i, _)| i);
                idx.map(|i| queue.remove(i))
            };
            match next {
                Some(pending) => {
                    *self.now.borrow_mut() = pending.due;
                    (pending.task)();
                }
                None => break,
            }
        }
        *self.now.borrow_mut() = target;
    }
}

impl Scheduler for ManualClock {
    fn schedule(&self, delay_ms: u32, task: Task) {
        let due = *self.now.borrow() + u64::from(delay_ms);
        self.queue.borrow_mut().push(Pending { due, task });
    }
}
