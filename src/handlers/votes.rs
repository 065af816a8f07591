use std::rc::Rc;

use reqwest::StatusCode;

use crate::{
    config::Config,
    dom::Page,
    error::{RequestFailure, WidgetError},
    models::{VoteIntent, VoteResponse, VoteType, VoteWidget},
    services::api_client::ApiClient,
};

/// The single state transition a vote request ends in.
#[derive(Debug)]
pub enum VoteOutcome {
    Committed(VoteResponse),
    Reverted {
        failure: RequestFailure,
        message: String,
    },
}

pub struct VoteController<P: Page> {
    page: Rc<P>,
    api: Rc<ApiClient>,
    config: Rc<Config>,
}

impl<P: Page> VoteController<P> {
    pub fn new(page: Rc<P>, api: Rc<ApiClient>, config: Rc<Config>) -> Self {
        Self { page, api, config }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Click entry point. Spawns the request; nothing is locked while it is
    /// in flight, so a second click sends a second request.
    pub fn handle_click(
        controller: &Rc<Self>,
        widget: &Rc<VoteWidget<P::Element>>,
        control: &P::Element,
    ) -> Result<(), WidgetError> {
        let vote_type = widget
            .vote_type_of(control, &controller.config.markup)
            .inspect_err(|e| tracing::error!("Vote on {} aborted: {}", widget.content_id, e))?;

        let task_controller = Rc::clone(controller);
        let widget = Rc::clone(widget);
        controller.page.spawn_local(Box::pin(async move {
            task_controller.submit(&widget, vote_type).await;
        }));
        Ok(())
    }

    pub async fn submit(
        &self,
        widget: &VoteWidget<P::Element>,
        vote_type: VoteType,
    ) -> VoteOutcome {
        let snapshot = widget.displayed_count();
        let intent = VoteIntent {
            content_type: widget.content_type.clone(),
            content_id: widget.content_id.clone(),
            vote_type,
        };

        match self.api.vote(&intent).await {
            Ok(response) => {
                widget.set_displayed_count(response.new_rating);
                widget.render_vote(response.user_vote, &self.config.styles);
                tracing::debug!(
                    "Vote on {} {} committed: rating {}, user vote {:?}",
                    widget.content_type,
                    widget.content_id,
                    response.new_rating,
                    response.user_vote
                );
                VoteOutcome::Committed(response)
            }
            Err(failure) => {
                widget.set_displayed_count(snapshot);
                let message = self.failure_message(&failure);
                tracing::error!(
                    "Vote on {} {} failed: {}",
                    widget.content_type,
                    widget.content_id,
                    failure
                );
                self.page.alert(&message);
                VoteOutcome::Reverted { failure, message }
            }
        }
    }

    /// Server-supplied error first, then the fixed 401 text, then the status.
    pub fn failure_message(&self, failure: &RequestFailure) -> String {
        let messages = &self.config.messages;
        let reason = match failure {
            RequestFailure::Rejected {
                error: Some(error), ..
            } if !error.is_empty() => error.clone(),
            RequestFailure::Rejected { status, .. } if *status == StatusCode::UNAUTHORIZED => {
                messages.not_authenticated.clone()
            }
            RequestFailure::Rejected { status, .. } | RequestFailure::Malformed { status, .. } => {
                messages.http_error(status.as_u16())
            }
            RequestFailure::Network(reason) => reason.clone(),
            RequestFailure::Encode(_) => failure.to_string(),
        };
        format!("{}{}", messages.vote_failed_prefix, reason)
    }
}
