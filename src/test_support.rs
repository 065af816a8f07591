use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use async_trait::async_trait;
use futures::channel::oneshot;
use reqwest::StatusCode;
use serde_json::Value;

use crate::config::Config;
use crate::dom::memory::{MemoryElement, MemoryPage};
use crate::error::RequestFailure;
use crate::services::api_client::{ApiClient, ApiRequest, ApiResponse, ApiTransport};
use crate::services::csrf::CsrfToken;
use crate::VoteSystem;

type Reply = Result<ApiResponse, RequestFailure>;

enum Scripted {
    Ready(Reply),
    Gated(oneshot::Receiver<Reply>),
}

/// Transport that answers from a script and records what was sent.
#[derive(Clone, Default)]
pub struct StubTransport {
    script: Rc<RefCell<VecDeque<Scripted>>>,
    requests: Rc<RefCell<Vec<ApiRequest>>>,
}

impl StubTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, status: StatusCode, body: Value) {
        self.script
            .borrow_mut()
            .push_back(Scripted::Ready(Ok(ApiResponse::json(status, &body))));
    }

    pub fn respond_raw(&self, status: StatusCode, body: &str) {
        self.script
            .borrow_mut()
            .push_back(Scripted::Ready(Ok(ApiResponse {
                status,
                body: body.as_bytes().to_vec(),
            })));
    }

    pub fn fail(&self, failure: RequestFailure) {
        self.script
            .borrow_mut()
            .push_back(Scripted::Ready(Err(failure)));
    }

    /// The request stays in flight until the returned sender fires.
    pub fn respond_later(&self) -> oneshot::Sender<Reply> {
        let (tx, rx) = oneshot::channel();
        self.script.borrow_mut().push_back(Scripted::Gated(rx));
        tx
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.borrow().clone()
    }
}

#[async_trait(?Send)]
impl ApiTransport for StubTransport {
    async fn send(&self, request: ApiRequest) -> Reply {
        self.requests.borrow_mut().push(request);
        let next = self.script.borrow_mut().pop_front();
        match next {
            Some(Scripted::Ready(reply)) => reply,
            Some(Scripted::Gated(rx)) => rx
                .await
                .unwrap_or_else(|_| Err(RequestFailure::Network("dropped".to_string()))),
            None => Err(RequestFailure::Network("no scripted response".to_string())),
        }
    }
}

pub fn json_reply(status: StatusCode, body: Value) -> Reply {
    Ok(ApiResponse::json(status, &body))
}

pub fn token(value: &str) -> CsrfToken {
    CsrfToken::new("X-CSRFToken", Some(value.to_string()))
}

fn vote_button(vote_type: &str) -> MemoryElement {
    MemoryElement::new("button")
        .with_class("vote-btn")
        .with_data("vote-type", vote_type)
}

pub fn vote_widget_root(
    content_id: &str,
    content_type: &str,
    count: i64,
    user_vote: Option<&str>,
) -> MemoryElement {
    let mut root = MemoryElement::new("div")
        .with_class("card__likes")
        .with_data("content-id", content_id)
        .with_data("content-type", content_type);
    if let Some(vote) = user_vote {
        root = root.with_data("user-vote", vote);
    }
    root.with_child(vote_button("upvote"))
        .with_child(
            MemoryElement::new("span")
                .with_class("vote-counter")
                .with_text(&count.to_string()),
        )
        .with_child(vote_button("downvote"))
}

pub fn answer_root(content_id: &str, accepted: bool) -> MemoryElement {
    MemoryElement::new("div")
        .with_class("question__answer")
        .with_data("content-id", content_id)
        .with_child(
            MemoryElement::checkbox()
                .with_class("correct-tick")
                .with_checked(accepted),
        )
}

pub fn page_with(children: Vec<MemoryElement>) -> Rc<MemoryPage> {
    let body = MemoryElement::new("body");
    for child in children {
        body.append(child);
    }
    Rc::new(MemoryPage::new(body).with_cookie("csrftoken=abc"))
}

pub fn system_for(page: &Rc<MemoryPage>, transport: &StubTransport) -> VoteSystem<MemoryPage> {
    let api = ApiClient::new(transport.clone(), token("abc"));
    VoteSystem::new(Rc::clone(page), Config::default(), api)
}
