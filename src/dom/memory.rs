//! Headless page used for tests and non-browser hosts.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use futures::future::{LocalBoxFuture, join_all};

use super::{Element, Page, Selector};

struct Node {
    tag: String,
    attributes: BTreeMap<String, String>,
    classes: Vec<String>,
    text: String,
    checked: bool,
    children: Vec<MemoryElement>,
    listeners: Vec<Rc<dyn Fn()>>,
}

#[derive(Clone)]
pub struct MemoryElement(Rc<RefCell<Node>>);

impl fmt::Debug for MemoryElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = self.0.borrow();
        f.debug_struct("MemoryElement")
            .field("tag", &node.tag)
            .field("classes", &node.classes)
            .field("attributes", &node.attributes)
            .finish()
    }
}

impl MemoryElement {
    pub fn new(tag: &str) -> Self {
        Self(Rc::new(RefCell::new(Node {
            tag: tag.to_string(),
            attributes: BTreeMap::new(),
            classes: Vec::new(),
            text: String::new(),
            checked: false,
            children: Vec::new(),
            listeners: Vec::new(),
        })))
    }

    /// `<input type="checkbox">`
    pub fn checkbox() -> Self {
        Self::new("input").with_attribute("type", "checkbox")
    }

    pub fn with_class(self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    pub fn with_data(self, key: &str, value: &str) -> Self {
        self.set_data(key, value);
        self
    }

    pub fn with_attribute(self, name: &str, value: &str) -> Self {
        self.0
            .borrow_mut()
            .attributes
            .insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_text(self, text: &str) -> Self {
        self.set_text(text);
        self
    }

    pub fn with_checked(self, checked: bool) -> Self {
        self.set_checked(checked);
        self
    }

    pub fn with_child(self, child: MemoryElement) -> Self {
        self.append(child);
        self
    }

    pub fn append(&self, child: MemoryElement) {
        self.0.borrow_mut().children.push(child);
    }

    pub fn classes(&self) -> Vec<String> {
        self.0.borrow().classes.clone()
    }

    pub fn listener_count(&self) -> usize {
        self.0.borrow().listeners.len()
    }

    fn is_checkbox(&self) -> bool {
        let node = self.0.borrow();
        node.tag == "input" && node.attributes.get("type").map(String::as_str) == Some("checkbox")
    }

    /// Dispatches a click: checkboxes flip first, then listeners run.
    pub fn click(&self) {
        if self.is_checkbox() {
            let checked = self.is_checked();
            self.set_checked(!checked);
        }
        let listeners = self.0.borrow().listeners.clone();
        for listener in listeners {
            listener();
        }
    }

    fn matches(&self, selector: &Selector) -> bool {
        if let Some(class) = &selector.class {
            if !self.has_class(class) {
                return false;
            }
        }
        match (&selector.data_key, &selector.data_value) {
            (Some(key), Some(value)) => self.data(key).as_deref() == Some(value.as_str()),
            (Some(key), None) => self.data(key).is_some(),
            _ => true,
        }
    }

    fn descendants(&self) -> Vec<MemoryElement> {
        let mut found = Vec::new();
        let children = self.0.borrow().children.clone();
        for child in children {
            found.push(child.clone());
            found.extend(child.descendants());
        }
        found
    }
}

impl Element for MemoryElement {
    fn data(&self, key: &str) -> Option<String> {
        self.0
            .borrow()
            .attributes
            .get(&format!("data-{}", key))
            .cloned()
    }

    fn set_data(&self, key: &str, value: &str) {
        self.0
            .borrow_mut()
            .attributes
            .insert(format!("data-{}", key), value.to_string());
    }

    fn text(&self) -> String {
        self.0.borrow().text.clone()
    }

    fn set_text(&self, text: &str) {
        self.0.borrow_mut().text = text.to_string();
    }

    fn has_class(&self, class: &str) -> bool {
        self.0.borrow().classes.iter().any(|c| c == class)
    }

    fn add_class(&self, class: &str) {
        if !self.has_class(class) {
            self.0.borrow_mut().classes.push(class.to_string());
        }
    }

    fn remove_class(&self, class: &str) {
        self.0.borrow_mut().classes.retain(|c| c != class);
    }

    fn is_checked(&self) -> bool {
        self.0.borrow().checked
    }

    fn set_checked(&self, checked: bool) {
        self.0.borrow_mut().checked = checked;
    }

    fn find(&self, selector: &Selector) -> Option<Self> {
        self.descendants().into_iter().find(|e| e.matches(selector))
    }

    fn find_all(&self, selector: &Selector) -> Vec<Self> {
        self.descendants()
            .into_iter()
            .filter(|e| e.matches(selector))
            .collect()
    }

    fn on_click(&self, handler: Rc<dyn Fn()>) {
        self.0.borrow_mut().listeners.push(handler);
    }
}

pub struct MemoryPage {
    body: MemoryElement,
    cookie: String,
    alerts: RefCell<Vec<String>>,
    pending: RefCell<Vec<LocalBoxFuture<'static, ()>>>,
}

impl MemoryPage {
    pub fn new(body: MemoryElement) -> Self {
        Self {
            body,
            cookie: String::new(),
            alerts: RefCell::new(Vec::new()),
            pending: RefCell::new(Vec::new()),
        }
    }

    pub fn with_cookie(mut self, cookie: &str) -> Self {
        self.cookie = cookie.to_string();
        self
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.borrow().clone()
    }

    pub fn pending_tasks(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Runs spawned tasks (and anything they spawn) to completion.
    pub async fn settle(&self) {
        loop {
            let tasks: Vec<_> = self.pending.borrow_mut().drain(..).collect();
            if tasks.is_empty() {
                break;
            }
            join_all(tasks).await;
        }
    }
}

impl Page for MemoryPage {
    type Element = MemoryElement;

    fn query_all(&self, selector: &Selector) -> Vec<MemoryElement> {
        self.body.find_all(selector)
    }

    fn alert(&self, message: &str) {
        tracing::info!("alert: {}", message);
        self.alerts.borrow_mut().push(message.to_string());
    }

    fn spawn_local(&self, task: LocalBoxFuture<'static, ()>) {
        self.pending.borrow_mut().push(task);
    }

    fn cookie(&self) -> String {
        self.cookie.clone()
    }
}
