pub mod config;
pub mod dom;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
#[cfg(test)]
mod test_support;
#[cfg(target_arch = "wasm32")]
pub mod web;

use std::rc::Rc;

use crate::{
    config::Config,
    dom::Page,
    handlers::{
        answers::AnswerController,
        locator::{WidgetLocator, bind_answer_widget, bind_vote_widget, sync_initial_vote},
        votes::VoteController,
    },
    services::{
        api_client::{ApiClient, ApiTransport},
        csrf::CsrfToken,
    },
};

/// What one pass of [`VoteSystem::initialize`] found and wired up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InitSummary {
    pub vote_widgets: usize,
    pub answer_widgets: usize,
    pub bound_controls: usize,
}

pub struct VoteSystem<P: Page> {
    page: Rc<P>,
    config: Rc<Config>,
    votes: Rc<VoteController<P>>,
    answers: Rc<AnswerController<P>>,
}

impl<P: Page> VoteSystem<P> {
    pub fn new(page: Rc<P>, config: Config, api: ApiClient) -> Self {
        let config = Rc::new(config);
        let api = Rc::new(api);

        Self {
            votes: Rc::new(VoteController::new(
                Rc::clone(&page),
                Rc::clone(&api),
                Rc::clone(&config),
            )),
            answers: Rc::new(AnswerController::new(
                Rc::clone(&page),
                api,
                Rc::clone(&config),
            )),
            page,
            config,
        }
    }

    /// Reads the CSRF cookie once and builds the API client around it.
    pub fn from_page(page: Rc<P>, config: Config, transport: impl ApiTransport + 'static) -> Self {
        let csrf = CsrfToken::from_cookie_header(
            &page.cookie(),
            &config.csrf_cookie_name,
            &config.csrf_header_name,
        );
        let api = ApiClient::new(transport, csrf);
        Self::new(page, config, api)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn votes(&self) -> &Rc<VoteController<P>> {
        &self.votes
    }

    pub fn answers(&self) -> &Rc<AnswerController<P>> {
        &self.answers
    }

    /// Discovery, initial style sync and handler binding. Safe to call again
    /// after new widgets are injected: already-bound widgets are left alone.
    pub fn initialize(&self) -> InitSummary {
        tracing::info!("Initializing vote system...");
        let markup = &self.config.markup;
        let locator = WidgetLocator::new(self.page.as_ref(), markup);
        let mut summary = InitSummary::default();

        let vote_widgets = locator.discover_vote_widgets();
        summary.vote_widgets = vote_widgets.len();
        for widget in vote_widgets {
            if !widget.is_bound() {
                sync_initial_vote(&widget, &self.config.styles);
            }
            summary.bound_controls += bind_vote_widget(Rc::new(widget), &self.votes, markup);
        }

        let answer_widgets = locator.discover_answer_widgets();
        summary.answer_widgets = answer_widgets.len();
        for widget in answer_widgets {
            if bind_answer_widget(Rc::new(widget), &self.answers, markup) {
                summary.bound_controls += 1;
            }
        }

        tracing::info!(
            "Initialized {} vote containers and {} answers, {} new controls bound",
            summary.vote_widgets,
            summary.answer_widgets,
            summary.bound_controls
        );
        summary
    }
}

/// Native log subscriber; the browser build uses `tracing-wasm` instead.
#[cfg(not(target_arch = "wasm32"))]
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "qa_votes=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
