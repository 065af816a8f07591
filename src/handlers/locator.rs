//! Finds the vote and answer widgets on the page and wires their controls.

use std::rc::Rc;

use crate::{
    config::{Markup, VoteStyles},
    dom::{Element, Page, Selector},
    handlers::{answers::AnswerController, votes::VoteController},
    models::{AnswerWidget, VoteWidget},
};

pub struct WidgetLocator<'a, P: Page> {
    page: &'a P,
    markup: &'a Markup,
}

impl<'a, P: Page> WidgetLocator<'a, P> {
    pub fn new(page: &'a P, markup: &'a Markup) -> Self {
        Self { page, markup }
    }

    /// Malformed widgets are logged and skipped.
    pub fn discover_vote_widgets(&self) -> Vec<VoteWidget<P::Element>> {
        let selector =
            Selector::class(&self.markup.vote_widget_class).with_data(&self.markup.content_id_key);

        self.page
            .query_all(&selector)
            .into_iter()
            .filter_map(|root| match VoteWidget::from_root(root, self.markup) {
                Ok(widget) => Some(widget),
                Err(e) => {
                    tracing::warn!("Skipping malformed vote widget: {}", e);
                    None
                }
            })
            .collect()
    }

    pub fn discover_answer_widgets(&self) -> Vec<AnswerWidget<P::Element>> {
        let selector = Selector::class(&self.markup.answer_widget_class)
            .with_data(&self.markup.content_id_key);

        self.page
            .query_all(&selector)
            .into_iter()
            .filter_map(|root| match AnswerWidget::from_root(root, self.markup) {
                Ok(widget) => Some(widget),
                Err(e) => {
                    tracing::warn!("Skipping malformed answer widget: {}", e);
                    None
                }
            })
            .collect()
    }
}

/// Reproduces the server-rendered vote in the button styling. No request.
pub fn sync_initial_vote<E: Element>(widget: &VoteWidget<E>, styles: &VoteStyles) {
    widget.render_vote(widget.initial_vote, styles);
}

/// Returns how many controls were bound; `0` if the widget already was.
pub fn bind_vote_widget<P: Page>(
    widget: Rc<VoteWidget<P::Element>>,
    controller: &Rc<VoteController<P>>,
    markup: &Markup,
) -> usize {
    if widget.is_bound() {
        return 0;
    }

    for control in widget.buttons() {
        let controller = Rc::clone(controller);
        let widget_ref = Rc::clone(&widget);
        let clicked = control.clone();
        control.on_click(Rc::new(move || {
            // Local errors are already logged by the controller.
            let _ = VoteController::handle_click(&controller, &widget_ref, &clicked);
        }));
    }

    widget.mark_bound(markup);
    widget.buttons().len()
}

pub fn bind_answer_widget<P: Page>(
    widget: Rc<AnswerWidget<P::Element>>,
    controller: &Rc<AnswerController<P>>,
    markup: &Markup,
) -> bool {
    if widget.is_bound() {
        return false;
    }

    let controller = Rc::clone(controller);
    let widget_ref = Rc::clone(&widget);
    widget.toggle().on_click(Rc::new(move || {
        AnswerController::handle_click(&controller, &widget_ref);
    }));

    widget.mark_bound(markup);
    true
}
