use async_trait::async_trait;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use reqwest::StatusCode;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{
    error::RequestFailure,
    models::{AcceptIntent, AcceptResponse, VoteIntent, VoteResponse},
    services::csrf::CsrfToken,
};

const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'?')
    .add(b'<')
    .add(b'>');

#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Value,
}

#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn json(status: StatusCode, body: &Value) -> Self {
        Self {
            status,
            body: body.to_string().into_bytes(),
        }
    }

    /// The `error` field of a JSON error body, if any.
    pub fn error_message(&self) -> Option<String> {
        let body: Value = serde_json::from_slice(&self.body).ok()?;
        body.get("error")?.as_str().map(str::to_string)
    }
}

/// Delivers one POST to the API and hands back whatever came back.
#[async_trait(?Send)]
pub trait ApiTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, RequestFailure>;
}

pub struct ApiClient {
    transport: Box<dyn ApiTransport>,
    csrf: CsrfToken,
}

impl ApiClient {
    pub fn new(transport: impl ApiTransport + 'static, csrf: CsrfToken) -> Self {
        Self {
            transport: Box::new(transport),
            csrf,
        }
    }

    pub fn csrf(&self) -> &CsrfToken {
        &self.csrf
    }

    pub async fn vote(&self, intent: &VoteIntent) -> Result<VoteResponse, RequestFailure> {
        tracing::debug!(
            "Voting {} on {} {}",
            intent.vote_type,
            intent.content_type,
            intent.content_id
        );
        self.post_json("/api/vote/".to_string(), intent).await
    }

    pub async fn accept_answer(
        &self,
        intent: &AcceptIntent,
    ) -> Result<AcceptResponse, RequestFailure> {
        tracing::debug!("Accepting answer {}", intent.content_id);
        let path = format!(
            "/api/accept_answer/{}/",
            utf8_percent_encode(&intent.content_id, PATH_SEGMENT)
        );
        self.post_json(path, intent).await
    }

    async fn post_json<B, T>(&self, path: String, body: &B) -> Result<T, RequestFailure>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let body =
            serde_json::to_value(body).map_err(|e| RequestFailure::Encode(e.to_string()))?;
        let request = ApiRequest {
            path,
            headers: self.csrf.header().into_iter().collect(),
            body,
        };

        let response = self.transport.send(request).await?;

        if !response.status.is_success() {
            return Err(RequestFailure::Rejected {
                status: response.status,
                error: response.error_message(),
            });
        }

        serde_json::from_slice(&response.body).map_err(|e| RequestFailure::Malformed {
            status: response.status,
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VoteType;
    use crate::test_support::{StubTransport, token};
    use futures::executor::block_on;
    use serde_json::json;
    use std::collections::HashMap;

    fn intent() -> VoteIntent {
        VoteIntent {
            content_type: "answer".to_string(),
            content_id: "7".to_string(),
            vote_type: VoteType::Downvote,
        }
    }

    #[test]
    fn vote_posts_intent_with_csrf_header() {
        let transport = StubTransport::new();
        transport.respond(StatusCode::OK, json!({"new_rating": -1, "user_vote": "downvote"}));
        let client = ApiClient::new(transport.clone(), token("abc"));

        let response = block_on(client.vote(&intent())).unwrap();

        assert_eq!(response.new_rating, -1);
        assert_eq!(response.user_vote, Some(VoteType::Downvote));
        let sent = transport.requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].path, "/api/vote/");
        assert_eq!(
            sent[0].headers,
            vec![("X-CSRFToken".to_string(), "abc".to_string())]
        );
        assert_eq!(
            sent[0].body,
            json!({"object_type": "answer", "object_id": "7", "vote_type": "downvote"})
        );
    }

    #[test]
    fn accept_embeds_encoded_id_in_path() {
        let transport = StubTransport::new();
        transport.respond(StatusCode::OK, json!({"is_correct": true}));
        let client = ApiClient::new(transport.clone(), CsrfToken::new("X-CSRFToken", None));

        let intent = AcceptIntent {
            content_id: "a/b 1".to_string(),
        };
        let response = block_on(client.accept_answer(&intent)).unwrap();

        assert!(response.is_correct);
        let sent = transport.requests();
        assert_eq!(sent[0].path, "/api/accept_answer/a%2Fb%201/");
        assert!(sent[0].headers.is_empty());
        assert_eq!(sent[0].body, json!({"object_id": "a/b 1"}));
    }

    #[test]
    fn non_success_status_is_rejected_with_server_error() {
        let transport = StubTransport::new();
        transport.respond(StatusCode::BAD_REQUEST, json!({"error": "Invalid vote type"}));
        let client = ApiClient::new(transport, token("abc"));

        match block_on(client.vote(&intent())) {
            Err(RequestFailure::Rejected { status, error }) => {
                assert_eq!(status, StatusCode::BAD_REQUEST);
                assert_eq!(error.as_deref(), Some("Invalid vote type"));
            }
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[test]
    fn success_without_expected_fields_is_malformed() {
        let transport = StubTransport::new();
        transport.respond(StatusCode::OK, json!({"status": "ok"}));
        let client = ApiClient::new(transport, token("abc"));

        let failure = block_on(client.vote(&intent())).unwrap_err();
        assert!(matches!(failure, RequestFailure::Malformed { .. }));
        assert_eq!(failure.status(), Some(StatusCode::OK));
    }

    #[test]
    fn unencodable_body_fails_without_sending() {
        let transport = StubTransport::new();
        let client = ApiClient::new(transport.clone(), token("abc"));
        let body: HashMap<(u8, u8), u8> = [((1, 2), 3)].into_iter().collect();

        let result =
            block_on(client.post_json::<_, VoteResponse>("/api/vote/".to_string(), &body));

        match result {
            Err(failure @ RequestFailure::Encode(_)) => assert_eq!(failure.status(), None),
            other => panic!("expected encode failure, got {:?}", other),
        }
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn error_message_ignores_non_json_bodies() {
        let response = ApiResponse {
            status: StatusCode::BAD_GATEWAY,
            body: b"<html>bad gateway</html>".to_vec(),
        };
        assert_eq!(response.error_message(), None);
    }
}
