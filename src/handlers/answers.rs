use std::rc::Rc;

use reqwest::StatusCode;

use crate::{
    config::Config,
    dom::Page,
    error::RequestFailure,
    models::{AcceptIntent, AcceptResponse, AnswerWidget},
    services::api_client::ApiClient,
};

#[derive(Debug)]
pub enum AcceptOutcome {
    Committed(AcceptResponse),
    Reverted {
        failure: RequestFailure,
        message: String,
    },
}

pub struct AnswerController<P: Page> {
    page: Rc<P>,
    api: Rc<ApiClient>,
    config: Rc<Config>,
}

impl<P: Page> AnswerController<P> {
    pub fn new(page: Rc<P>, api: Rc<ApiClient>, config: Rc<Config>) -> Self {
        Self { page, api, config }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn handle_click(controller: &Rc<Self>, widget: &Rc<AnswerWidget<P::Element>>) {
        // The click's default action has already flipped the checkbox.
        let pre_click = !widget.is_accepted();

        let task_controller = Rc::clone(controller);
        let widget = Rc::clone(widget);
        controller.page.spawn_local(Box::pin(async move {
            task_controller.submit(&widget, pre_click).await;
        }));
    }

    /// Sets the toggle to the server's answer, or back to `pre_click`.
    pub async fn submit(
        &self,
        widget: &AnswerWidget<P::Element>,
        pre_click: bool,
    ) -> AcceptOutcome {
        let intent = AcceptIntent {
            content_id: widget.content_id.clone(),
        };

        match self.api.accept_answer(&intent).await {
            Ok(response) => {
                widget.set_accepted(response.is_correct);
                tracing::debug!(
                    "Answer {} accepted state is now {}",
                    widget.content_id,
                    response.is_correct
                );
                AcceptOutcome::Committed(response)
            }
            Err(failure) => {
                widget.set_accepted(pre_click);
                let message = self.failure_message(&failure);
                tracing::error!("Accepting answer {} failed: {}", widget.content_id, failure);
                self.page.alert(&message);
                AcceptOutcome::Reverted { failure, message }
            }
        }
    }

    pub fn failure_message(&self, failure: &RequestFailure) -> String {
        if failure.status() == Some(StatusCode::FORBIDDEN) {
            self.config.messages.cannot_accept_foreign_answer.clone()
        } else {
            self.config.messages.accept_failed.clone()
        }
    }
}
