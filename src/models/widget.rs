//! Typed handles over the server-rendered widget markup.
//!
//! Identity (`content-id`, `content-type`) and the sub-elements a controller
//! touches are resolved once, at discovery.

use std::cell::Cell;

use crate::config::{Markup, VoteStyles};
use crate::dom::{Element, Selector};
use crate::error::WidgetError;
use crate::models::{UserVote, VoteType};

/// Leading integer of the trimmed text, `0` when there is none.
pub fn parse_count(text: &str) -> i64 {
    let trimmed = text.trim();
    let end = trimmed
        .char_indices()
        .skip_while(|(index, c)| *index == 0 && (*c == '-' || *c == '+'))
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(index, _)| index)
        .unwrap_or(trimmed.len());
    trimmed[..end].parse().unwrap_or(0)
}

fn required_data<E: Element>(element: &E, key: &str) -> Result<String, WidgetError> {
    element
        .data(key)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| WidgetError::MissingAttribute(key.to_string()))
}

fn required_child<E: Element>(root: &E, selector: Selector) -> Result<E, WidgetError> {
    root.find(&selector)
        .ok_or_else(|| WidgetError::MissingElement(selector.to_css()))
}

#[derive(Debug)]
pub struct VoteWidget<E: Element> {
    pub content_id: String,
    pub content_type: String,
    /// Server-rendered `data-user-vote`, absent or unknown meaning no vote.
    pub initial_vote: UserVote,
    root: E,
    counter: E,
    upvote: E,
    downvote: E,
    buttons: Vec<E>,
    bound: Cell<bool>,
}

impl<E: Element> VoteWidget<E> {
    pub fn from_root(root: E, markup: &Markup) -> Result<Self, WidgetError> {
        let content_id = required_data(&root, &markup.content_id_key)?;
        let content_type = required_data(&root, &markup.content_type_key)?;
        let counter = required_child(&root, Selector::class(&markup.counter_class))?;
        let upvote = required_child(
            &root,
            Selector::data_eq(&markup.vote_type_key, VoteType::Upvote.as_str()),
        )?;
        let downvote = required_child(
            &root,
            Selector::data_eq(&markup.vote_type_key, VoteType::Downvote.as_str()),
        )?;

        let initial_vote = match root.data(&markup.user_vote_key).filter(|v| !v.is_empty()) {
            Some(value) => match value.parse() {
                Ok(vote_type) => Some(vote_type),
                Err(e) => {
                    tracing::warn!("Widget {} has {}, treating as no vote", content_id, e);
                    None
                }
            },
            None => None,
        };

        let buttons = root.find_all(&Selector::class(&markup.vote_button_class));
        let bound = Cell::new(root.data(&markup.bound_key).is_some());

        Ok(Self {
            content_id,
            content_type,
            initial_vote,
            root,
            counter,
            upvote,
            downvote,
            buttons,
            bound,
        })
    }

    pub fn counter(&self) -> &E {
        &self.counter
    }

    pub fn upvote(&self) -> &E {
        &self.upvote
    }

    pub fn downvote(&self) -> &E {
        &self.downvote
    }

    /// Every `.vote-btn` inside the widget, in document order.
    pub fn buttons(&self) -> &[E] {
        &self.buttons
    }

    pub fn displayed_count(&self) -> i64 {
        parse_count(&self.counter.text())
    }

    pub fn set_displayed_count(&self, count: i64) {
        self.counter.set_text(&count.to_string());
    }

    /// At most one control ends up active; the other is neutral.
    pub fn render_vote(&self, vote: UserVote, styles: &VoteStyles) {
        for control in [&self.upvote, &self.downvote] {
            control.remove_class(&styles.neutral);
            control.remove_class(&styles.upvote_active);
            control.remove_class(&styles.downvote_active);
        }

        match vote {
            Some(VoteType::Upvote) => {
                self.upvote.add_class(&styles.upvote_active);
                self.downvote.add_class(&styles.neutral);
            }
            Some(VoteType::Downvote) => {
                self.downvote.add_class(&styles.downvote_active);
                self.upvote.add_class(&styles.neutral);
            }
            None => {
                self.upvote.add_class(&styles.neutral);
                self.downvote.add_class(&styles.neutral);
            }
        }
    }

    pub fn vote_type_of(&self, control: &E, markup: &Markup) -> Result<VoteType, WidgetError> {
        required_data(control, &markup.vote_type_key)?.parse()
    }

    pub fn is_bound(&self) -> bool {
        self.bound.get()
    }

    pub fn mark_bound(&self, markup: &Markup) {
        self.root.set_data(&markup.bound_key, "true");
        self.bound.set(true);
    }
}

#[derive(Debug)]
pub struct AnswerWidget<E: Element> {
    pub content_id: String,
    root: E,
    toggle: E,
    bound: Cell<bool>,
}

impl<E: Element> AnswerWidget<E> {
    pub fn from_root(root: E, markup: &Markup) -> Result<Self, WidgetError> {
        let content_id = required_data(&root, &markup.content_id_key)?;
        let toggle = required_child(&root, Selector::class(&markup.toggle_class))?;
        let bound = Cell::new(root.data(&markup.bound_key).is_some());

        Ok(Self {
            content_id,
            root,
            toggle,
            bound,
        })
    }

    pub fn toggle(&self) -> &E {
        &self.toggle
    }

    pub fn is_accepted(&self) -> bool {
        self.toggle.is_checked()
    }

    pub fn set_accepted(&self, accepted: bool) {
        self.toggle.set_checked(accepted);
    }

    pub fn is_bound(&self) -> bool {
        self.bound.get()
    }

    pub fn mark_bound(&self, markup: &Markup) {
        self.root.set_data(&markup.bound_key, "true");
        self.bound.set(true);
    }
}
