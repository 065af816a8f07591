//! The slice of the page the controllers touch.
//!
//! Controllers never talk to `web-sys` directly; they go through [`Page`] and
//! [`Element`] so the same state machine runs in the browser and against the
//! headless [`memory`] tree in tests.

pub mod memory;
#[cfg(target_arch = "wasm32")]
pub mod web;

use std::rc::Rc;

use futures::future::LocalBoxFuture;

/// A class and/or `data-*` attribute match, rendered to CSS for real DOMs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    pub class: Option<String>,
    pub data_key: Option<String>,
    pub data_value: Option<String>,
}

impl Selector {
    pub fn class(class: impl Into<String>) -> Self {
        Self {
            class: Some(class.into()),
            ..Self::default()
        }
    }

    pub fn data_eq(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            data_key: Some(key.into()),
            data_value: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn with_data(mut self, key: impl Into<String>) -> Self {
        self.data_key = Some(key.into());
        self
    }

    pub fn to_css(&self) -> String {
        let mut css = String::new();
        if let Some(class) = &self.class {
            css.push('.');
            css.push_str(class);
        }
        match (&self.data_key, &self.data_value) {
            (Some(key), Some(value)) => css.push_str(&format!("[data-{}=\"{}\"]", key, value)),
            (Some(key), None) => css.push_str(&format!("[data-{}]", key)),
            _ => {}
        }
        if css.is_empty() {
            css.push('*');
        }
        css
    }
}

pub trait Element: Clone + 'static {
    /// Value of `data-{key}`.
    fn data(&self, key: &str) -> Option<String>;
    fn set_data(&self, key: &str, value: &str);
    fn text(&self) -> String;
    fn set_text(&self, text: &str);
    fn has_class(&self, class: &str) -> bool;
    fn add_class(&self, class: &str);
    fn remove_class(&self, class: &str);
    fn is_checked(&self) -> bool;
    fn set_checked(&self, checked: bool);
    /// First matching descendant.
    fn find(&self, selector: &Selector) -> Option<Self>;
    fn find_all(&self, selector: &Selector) -> Vec<Self>;
    /// Handlers stay registered for the lifetime of the page.
    fn on_click(&self, handler: Rc<dyn Fn()>);
}

pub trait Page: 'static {
    type Element: Element;

    fn query_all(&self, selector: &Selector) -> Vec<Self::Element>;
    /// Blocking, attention-grabbing notification.
    fn alert(&self, message: &str);
    fn spawn_local(&self, task: LocalBoxFuture<'static, ()>);
    /// Raw `document.cookie` string.
    fn cookie(&self) -> String;
}
