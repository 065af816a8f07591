use std::rc::Rc;

use futures::future::LocalBoxFuture;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlDocument, HtmlInputElement, NodeList, Window};

use super::{Element, Page, Selector};
use crate::config::PageSettings;
use crate::error::{AppError, Result};

#[derive(Clone, Debug)]
pub struct WebElement(web_sys::Element);

fn collect_elements(list: NodeList) -> Vec<WebElement> {
    (0..list.length())
        .filter_map(|index| list.get(index))
        .filter_map(|node| node.dyn_into::<web_sys::Element>().ok())
        .map(WebElement)
        .collect()
}

impl Element for WebElement {
    fn data(&self, key: &str) -> Option<String> {
        self.0.get_attribute(&format!("data-{}", key))
    }

    fn set_data(&self, key: &str, value: &str) {
        if let Err(e) = self.0.set_attribute(&format!("data-{}", key), value) {
            tracing::error!("Failed to set data-{}: {:?}", key, e);
        }
    }

    fn text(&self) -> String {
        self.0.text_content().unwrap_or_default()
    }

    fn set_text(&self, text: &str) {
        self.0.set_text_content(Some(text));
    }

    fn has_class(&self, class: &str) -> bool {
        self.0.class_list().contains(class)
    }

    fn add_class(&self, class: &str) {
        if let Err(e) = self.0.class_list().add_1(class) {
            tracing::error!("Failed to add class {}: {:?}", class, e);
        }
    }

    fn remove_class(&self, class: &str) {
        if let Err(e) = self.0.class_list().remove_1(class) {
            tracing::error!("Failed to remove class {}: {:?}", class, e);
        }
    }

    fn is_checked(&self) -> bool {
        self.0
            .dyn_ref::<HtmlInputElement>()
            .map(HtmlInputElement::checked)
            .unwrap_or(false)
    }

    fn set_checked(&self, checked: bool) {
        if let Some(input) = self.0.dyn_ref::<HtmlInputElement>() {
            input.set_checked(checked);
        }
    }

    fn find(&self, selector: &Selector) -> Option<Self> {
        self.0
            .query_selector(&selector.to_css())
            .ok()
            .flatten()
            .map(WebElement)
    }

    fn find_all(&self, selector: &Selector) -> Vec<Self> {
        match self.0.query_selector_all(&selector.to_css()) {
            Ok(list) => collect_elements(list),
            Err(e) => {
                tracing::error!("Invalid selector {}: {:?}", selector.to_css(), e);
                Vec::new()
            }
        }
    }

    fn on_click(&self, handler: Rc<dyn Fn()>) {
        let onclick: Closure<dyn Fn()> = Closure::new(move || handler());
        if let Err(e) = self
            .0
            .add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())
        {
            tracing::error!("Failed to register click handler: {:?}", e);
        }
        onclick.forget();
    }
}

pub struct WebPage {
    window: Window,
    document: Document,
}

impl WebPage {
    pub fn new() -> Result<Self> {
        let window = web_sys::window().ok_or_else(|| AppError::Dom("No window".to_string()))?;
        let document = window
            .document()
            .ok_or_else(|| AppError::Dom("No document".to_string()))?;
        Ok(Self { window, document })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// `<html lang>`, the origin and the `<body data-*>` overrides.
    pub fn settings(&self) -> Result<PageSettings> {
        let lang = self
            .document
            .document_element()
            .and_then(|root| root.get_attribute("lang"));
        let body = self.document.body();
        let body_data = |key: &str| {
            body.as_ref()
                .and_then(|body| body.get_attribute(&format!("data-{}", key)))
        };

        Ok(PageSettings {
            lang,
            origin: Some(self.origin()?),
            api_base_url: body_data("api-base-url"),
            csrf_cookie_name: body_data("csrf-cookie"),
            csrf_header_name: body_data("csrf-header"),
        })
    }

    pub fn origin(&self) -> Result<String> {
        self.window
            .location()
            .origin()
            .map_err(|e| AppError::Dom(format!("Failed to read location: {:?}", e)))
    }
}

impl Page for WebPage {
    type Element = WebElement;

    fn query_all(&self, selector: &Selector) -> Vec<WebElement> {
        match self.document.query_selector_all(&selector.to_css()) {
            Ok(list) => collect_elements(list),
            Err(e) => {
                tracing::error!("Invalid selector {}: {:?}", selector.to_css(), e);
                Vec::new()
            }
        }
    }

    fn alert(&self, message: &str) {
        if let Err(e) = self.window.alert_with_message(message) {
            tracing::error!("Failed to show alert: {:?}", e);
        }
    }

    fn spawn_local(&self, task: LocalBoxFuture<'static, ()>) {
        wasm_bindgen_futures::spawn_local(task);
    }

    fn cookie(&self) -> String {
        self.document
            .dyn_ref::<HtmlDocument>()
            .and_then(|document| document.cookie().ok())
            .unwrap_or_default()
    }
}
