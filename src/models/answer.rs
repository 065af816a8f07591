use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AcceptIntent {
    #[serde(rename = "object_id")]
    pub content_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct AcceptResponse {
    pub is_correct: bool,
}
