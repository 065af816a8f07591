//! Browser entry point.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::{
    VoteSystem,
    config::Config,
    dom::web::WebPage,
    error::{AppError, Result},
    services::http_transport::HttpTransport,
};

thread_local! {
    static SYSTEM: RefCell<Option<VoteSystem<WebPage>>> = const { RefCell::new(None) };
}

impl From<AppError> for JsValue {
    fn from(error: AppError) -> Self {
        JsValue::from_str(&error.to_string())
    }
}

#[wasm_bindgen(start)]
pub fn start() -> std::result::Result<(), JsValue> {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();

    let page = WebPage::new()?;
    if page.document().ready_state() == "loading" {
        let on_ready = Closure::once_into_js(|| {
            if let Err(e) = boot() {
                tracing::error!("Vote system failed to start: {}", e);
            }
        });
        page.document()
            .add_event_listener_with_callback("DOMContentLoaded", on_ready.unchecked_ref())?;
    } else {
        boot()?;
    }
    Ok(())
}

fn boot() -> Result<()> {
    let page = Rc::new(WebPage::new()?);
    let config = Config::from_page(&page.settings()?)?;
    let transport = HttpTransport::from_config(&config);

    let system = VoteSystem::from_page(page, config, transport);
    system.initialize();
    SYSTEM.with(|slot| *slot.borrow_mut() = Some(system));
    Ok(())
}

/// Re-runs discovery for widgets added after page load.
#[wasm_bindgen(js_name = reinitializeVotes)]
pub fn reinitialize_votes() -> std::result::Result<(), JsValue> {
    SYSTEM.with(|slot| match slot.borrow().as_ref() {
        Some(system) => {
            system.initialize();
            Ok(())
        }
        None => Err(JsValue::from_str("Vote system has not started")),
    })
}
